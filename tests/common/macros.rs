/// Asserts that an entity with the given ID is no longer in the world.
#[macro_export]
macro_rules! assert_removed {
    ($world:expr, $id:expr) => {
        assert!(
            $world.entity($id).is_none(),
            "Entity {} should be removed but was found",
            $id
        );
        assert!(
            $world.brain($id).is_none(),
            "Brain of {} should have been dropped",
            $id
        );
    };
}

/// Asserts the live plant/herbivore/carnivore counts.
#[macro_export]
macro_rules! assert_population {
    ($world:expr, $plants:expr, $herbivores:expr, $carnivores:expr) => {
        assert_eq!(
            $world.counts(),
            thicket_data::PopulationCounts::new($plants, $herbivores, $carnivores),
            "Population count mismatch"
        );
    };
}

/// Asserts that a world entity's weight is within 1e-9 of `expected`.
#[macro_export]
macro_rules! assert_weight {
    ($world:expr, $id:expr, $expected:expr) => {
        let entity = $world.entity($id).expect("Entity not found in world");
        assert!(
            (entity.weight - $expected).abs() < 1e-9,
            "Entity {} weight {} is not {}",
            $id,
            entity.weight,
            $expected
        );
    };
}
