use crate::ai::{CarnivoreAi, CreatureBrain, HerbivoreAi, PlantAi};
use crate::config::SimConfig;
use rand::Rng;
use thicket_data::{Entity, EntityKind, Species};

/// Builds a fresh brain for a creature of `kind` and `species`.
///
/// # Panics
///
/// Players have no brain, and a species must belong to `kind`. Either
/// mistake means an upstream data-model bug, so it panics.
pub fn create_brain<R: Rng + ?Sized>(
    kind: EntityKind,
    species: Species,
    config: &SimConfig,
    rng: &mut R,
) -> CreatureBrain {
    assert!(
        kind != EntityKind::Player,
        "create_brain called for the player"
    );
    assert_eq!(
        species.kind(),
        kind,
        "species {species} is not a {kind}"
    );
    match kind {
        EntityKind::Plant => CreatureBrain::Plant(PlantAi::new()),
        EntityKind::Herbivore => CreatureBrain::Herbivore(HerbivoreAi::new(config, rng)),
        EntityKind::Carnivore => CreatureBrain::Carnivore(CarnivoreAi::new(config, rng)),
        EntityKind::Player => unreachable!(),
    }
}

/// Brain for an existing entity, or `None` for the player.
pub fn brain_for<R: Rng + ?Sized>(
    entity: &Entity,
    config: &SimConfig,
    rng: &mut R,
) -> Option<CreatureBrain> {
    let species = entity.species?;
    Some(create_brain(entity.kind(), species, config, rng))
}
