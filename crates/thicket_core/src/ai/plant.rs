use super::Decision;
use crate::biome::BiomeModifiers;
use thicket_data::{BehaviorState, Entity};

/// Plants do not move or decide anything; growth happens in the lifecycle
/// step.
#[derive(Debug, Clone, Default)]
pub struct PlantAi;

impl PlantAi {
    pub fn new() -> Self {
        Self
    }

    pub fn update(&mut self, me: &Entity) -> Decision {
        Decision::stay(me, BehaviorState::Growing)
    }

    pub fn should_reproduce(&self, me: &Entity, modifiers: &BiomeModifiers) -> bool {
        me.is_alive() && super::should_reproduce(me, modifiers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thicket_data::{EntityId, Position, RoomId, Species, Vec2};

    #[test]
    fn test_plant_never_moves() {
        let moss = Entity::spawn(
            EntityId::from_u128(1),
            Species::Moss,
            Position::new(12.0, 34.0),
            RoomId(0),
        );
        let mut ai = PlantAi::new();
        let d = ai.update(&moss);
        assert_eq!(d.position, moss.position);
        assert_eq!(d.velocity, Vec2::ZERO);
        assert_eq!(d.behavior, BehaviorState::Growing);
    }
}
