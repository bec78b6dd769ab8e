mod common;

use common::{id, WorldBuilder};
use thicket_core::{ActionKind, DeathCause, LiveEvent, PlayerCommand, SimConfig, World};
use thicket_data::{Position, RoomId, Species};
use thicket_lib::demo::{self, DemoLayout};

fn act(kind: ActionKind, target: Option<u128>) -> PlayerCommand {
    PlayerCommand::Act {
        kind,
        target: target.map(id),
    }
}

#[test]
fn test_player_walks_through_east_door() {
    let (rooms, entities) = demo::generate(
        21,
        DemoLayout {
            rooms: 2,
            per_room: 10,
            with_player: true,
        },
    );
    let mut world = World::new(SimConfig::default(), rooms, entities).unwrap();
    assert_eq!(world.player().unwrap().room_id, RoomId(0));

    world.queue_player(PlayerCommand::Move(Position::new(790.0, 300.0)));
    assert_eq!(world.pending_commands(), 1);
    let report = world.update();

    assert_eq!(world.pending_commands(), 0);
    assert!(report.outcomes[0].success, "{}", report.outcomes[0].message);
    assert!(report.events.iter().any(|e| matches!(
        e,
        LiveEvent::Teleport { from: RoomId(0), to: RoomId(1), .. }
    )));
    let player = world.player().unwrap();
    assert_eq!(player.room_id, RoomId(1));
    let bounds = world.rooms().bounds(RoomId(1)).unwrap();
    assert!(bounds.contains(&player.position));
}

#[test]
fn test_fatal_attack_removes_prey() {
    let mut world = WorldBuilder::new()
        .with_plain_room(0)
        .with_player(100.0, 100.0)
        .with_species_edit(Species::Rabbit, 110.0, 100.0, |e| e.health = 10.0)
        .build();

    world.queue_player(act(ActionKind::Attack, Some(2)));
    let report = world.update();

    assert!(report.outcomes[0].success);
    assert!(report.events.iter().any(|e| matches!(
        e,
        LiveEvent::Death { cause: DeathCause::Player, .. }
    )));
    assert_removed!(world, id(2));
    assert_population!(world, 0, 0, 0);
}

#[test]
fn test_commands_run_in_queue_order() {
    let mut world = WorldBuilder::new()
        .with_plain_room(0)
        .with_player(100.0, 100.0)
        .with_species(Species::Deer, 300.0, 300.0)
        .build();

    // Out of reach until the move lands.
    world.queue_player(PlayerCommand::Move(Position::new(295.0, 300.0)));
    world.queue_player(act(ActionKind::Restore, Some(2)));
    let report = world.update();

    assert_eq!(report.outcomes.len(), 2);
    assert!(report.outcomes.iter().all(|o| o.success));
}

#[test]
fn test_failures_are_reported_not_raised() {
    let mut world = WorldBuilder::new()
        .with_plain_room(0)
        .with_player(100.0, 100.0)
        .with_species(Species::Fox, 500.0, 300.0)
        .with_species(Species::Fern, 105.0, 100.0)
        .build();

    world.queue_player(act(ActionKind::Attack, None));
    world.queue_player(act(ActionKind::Attack, Some(2)));
    world.queue_player(act(ActionKind::Gather, Some(2)));
    world.queue_player(act(ActionKind::Attack, Some(3)));
    world.queue_player(act(ActionKind::Observe, Some(99)));
    let report = world.update();

    let messages: Vec<&str> = report.outcomes.iter().map(|o| o.message.as_str()).collect();
    assert!(report.outcomes.iter().all(|o| !o.success), "{messages:?}");
    assert_eq!(messages[0], "attack needs a target");
    assert!(messages[1].contains("units away"));
    assert!(messages[2].starts_with("cannot gather"));
    assert!(messages[3].starts_with("cannot attack"));
    assert!(messages[4].starts_with("cannot observe"));
    assert_eq!(world.tick(), 1);
    assert_population!(world, 1, 0, 1);
}

#[test]
fn test_planting_adds_a_plant() {
    let mut world = WorldBuilder::new()
        .with_plain_room(0)
        .with_player(200.0, 200.0)
        .build();

    world.queue_player(act(ActionKind::Plant, None));
    let report = world.update();

    assert!(report.outcomes[0].success);
    assert!(report.outcomes[0].ecosystem_impact > 0.0);
    assert!(report.events.iter().any(|e| matches!(
        e,
        LiveEvent::Birth { parent_id: None, species: Species::Fern, .. }
    )));
    assert!(world.counts().plants >= 1);
    assert_eq!(world.brain_count(), world.entities().len() - 1);
}

#[test]
fn test_planting_respects_room_cap() {
    let mut world = WorldBuilder::new()
        .with_config(|c| c.world.max_room_population = 1)
        .with_plain_room(0)
        .with_player(200.0, 200.0)
        .with_species(Species::Moss, 400.0, 300.0)
        .build();

    world.queue_player(act(ActionKind::Plant, None));
    let report = world.update();

    assert!(!report.outcomes[0].success);
    assert!(report.outcomes[0].message.ends_with("is full"));
    assert_population!(world, 1, 0, 0);
}
