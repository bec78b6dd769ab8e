mod common;

use common::{id, WorldBuilder};
use std::collections::HashMap;
use thicket_core::{DeathCause, LiveEvent, SimConfig, World};
use thicket_data::{HealthTier, LifeState, Species};
use thicket_lib::demo::{self, DemoLayout};

#[test]
fn test_grazing_consumes_moss_in_six_bites() {
    let mut world = WorldBuilder::new()
        .with_config(|c| c.feeding.eat_cooldown = 0.0)
        .with_plain_room(0)
        .with_species(Species::Moss, 100.0, 100.0)
        .with_species_edit(Species::Rabbit, 105.0, 100.0, |e| {
            e.change_hunger(e.max_hunger())
        })
        .build();

    for step in 1..=5 {
        let report = world.update();
        assert_weight!(world, id(1), 0.3 - 0.05 * f64::from(step));
        assert_eq!(world.entity(id(1)).unwrap().state, LifeState::Alive);
        assert!(
            !report
                .events
                .iter()
                .any(|e| matches!(e, LiveEvent::PlantDepleted { .. })),
            "moss depleted early at step {step}"
        );
    }

    let report = world.update();
    assert!(report.events.iter().any(|e| matches!(
        e,
        LiveEvent::PlantDepleted { id: moss, eater: Some(rabbit), .. }
            if *moss == id(1) && *rabbit == id(2)
    )));
    assert!(report.events.iter().any(|e| matches!(
        e,
        LiveEvent::Death { id: moss, cause: DeathCause::Consumed, .. } if *moss == id(1)
    )));
    assert_removed!(world, id(1));
    assert!(world.entity(id(2)).unwrap().current_target().is_none());
}

#[test]
fn test_committed_target_beats_closer_food() {
    let mut world = WorldBuilder::new()
        .with_plain_room(0)
        .with_species(Species::Moss, 135.0, 100.0)
        .with_species(Species::Moss, 90.0, 100.0)
        .with_species_edit(Species::Rabbit, 100.0, 100.0, |e| {
            e.change_hunger(e.max_hunger());
            e.set_current_target(Some(id(1)));
        })
        .build();

    for _ in 0..3 {
        world.update();
        assert_eq!(world.entity(id(3)).unwrap().current_target(), Some(id(1)));
        assert_weight!(world, id(2), 0.3);
    }
}

#[test]
fn test_weights_never_increase() {
    let (rooms, entities) = demo::generate(
        11,
        DemoLayout {
            rooms: 2,
            per_room: 40,
            with_player: false,
        },
    );
    let mut world = World::new(SimConfig::default(), rooms, entities).unwrap();
    let mut last: HashMap<_, f64> = world.entities().iter().map(|e| (e.id, e.weight)).collect();

    for _ in 0..300 {
        world.update();
        for e in world.entities() {
            if let Some(prev) = last.get(&e.id) {
                assert!(e.weight <= *prev, "{} gained weight", e.id);
            }
            assert!(e.weight > 0.0, "{} left with no weight", e.id);
        }
        assert_eq!(world.brain_count(), world.entities().len());
        last = world.entities().iter().map(|e| (e.id, e.weight)).collect();
    }
}

#[test]
fn test_movement_alone_never_hurts() {
    let mut world = WorldBuilder::new()
        .with_plain_room(0)
        .with_species(Species::Deer, 300.0, 200.0)
        .build();

    for _ in 0..150 {
        world.update();
        let deer = world.entity(id(1)).unwrap();
        assert_eq!(deer.health, deer.max_health);
        assert_eq!(deer.state, LifeState::Alive);
    }
}

#[test]
fn test_predator_kills_weak_prey() {
    let mut world = WorldBuilder::new()
        .with_plain_room(0)
        .with_species_edit(Species::Rabbit, 200.0, 200.0, |e| e.health = 1.0)
        .with_species_edit(Species::Fox, 210.0, 200.0, |e| {
            e.change_hunger(e.max_hunger())
        })
        .build();

    let report = world.update();
    assert!(report.events.iter().any(|e| matches!(
        e,
        LiveEvent::Attack { attacker, killed: true, .. } if *attacker == id(2)
    )));
    assert!(report.events.iter().any(|e| matches!(
        e,
        LiveEvent::Death { cause: DeathCause::Predation, .. }
    )));
    assert_removed!(world, id(1));
    let fox = world.entity(id(2)).unwrap();
    assert!(fox.hunger() < fox.max_hunger());
    assert_population!(world, 0, 0, 1);
}

#[test]
fn test_starvation_kills_and_removes() {
    let mut world = WorldBuilder::new()
        .with_config(|c| c.metabolism.starvation_damage = 3000.0)
        .with_plain_room(0)
        .with_species_edit(Species::Snail, 100.0, 100.0, |e| {
            e.change_hunger(e.max_hunger())
        })
        .build();

    let report = world.update();
    assert!(report.events.iter().any(|e| matches!(
        e,
        LiveEvent::Death { cause: DeathCause::Starvation, .. }
    )));
    assert_removed!(world, id(1));
    assert_eq!(world.health_tier(), HealthTier::Critical);
}

#[test]
fn test_health_tier_from_population_mix() {
    let mut builder = WorldBuilder::new().with_plain_room(0);
    for i in 0..6 {
        builder = builder.with_species(Species::Fern, 50.0 + 80.0 * f64::from(i), 50.0);
    }
    for i in 0..3 {
        builder = builder.with_species(Species::Beetle, 50.0 + 80.0 * f64::from(i), 300.0);
    }
    let world = builder.with_species(Species::Owl, 550.0, 350.0).build();
    assert_eq!(world.snapshot().health_tier, HealthTier::Excellent);

    let empty = WorldBuilder::new().with_plain_room(0).build();
    assert_eq!(empty.snapshot().health_tier, HealthTier::Critical);
}
