use serde::{Deserialize, Serialize};
use thicket_data::Biome;

/// Multiplier bundle a biome applies to the creatures living in it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiomeModifiers {
    pub speed: f64,
    pub aggression: f64,
    pub reproduction_rate: f64,
    pub food_efficiency: f64,
    pub territory_size: f64,
    pub pack_behavior: bool,
    /// Scales the memory recency windows.
    pub memory_retention: f64,
}

impl Default for BiomeModifiers {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl BiomeModifiers {
    pub const NEUTRAL: BiomeModifiers = BiomeModifiers {
        speed: 1.0,
        aggression: 1.0,
        reproduction_rate: 1.0,
        food_efficiency: 1.0,
        territory_size: 1.0,
        pack_behavior: false,
        memory_retention: 1.0,
    };

    /// Fixed table per biome; [`Biome::Unknown`] is neutral.
    pub fn for_biome(biome: Biome) -> Self {
        match biome {
            Biome::Forest => Self {
                speed: 1.0,
                aggression: 1.0,
                reproduction_rate: 1.1,
                food_efficiency: 1.1,
                territory_size: 1.0,
                pack_behavior: true,
                memory_retention: 1.0,
            },
            Biome::Cave => Self {
                speed: 0.8,
                aggression: 1.2,
                reproduction_rate: 0.8,
                food_efficiency: 0.9,
                territory_size: 0.7,
                pack_behavior: false,
                memory_retention: 1.3,
            },
            Biome::Swamp => Self {
                speed: 0.7,
                aggression: 1.1,
                reproduction_rate: 1.2,
                food_efficiency: 1.0,
                territory_size: 0.8,
                pack_behavior: false,
                memory_retention: 0.9,
            },
            Biome::Desert => Self {
                speed: 1.1,
                aggression: 1.3,
                reproduction_rate: 0.6,
                food_efficiency: 1.3,
                territory_size: 1.5,
                pack_behavior: false,
                memory_retention: 1.4,
            },
            Biome::Tundra => Self {
                speed: 0.9,
                aggression: 1.2,
                reproduction_rate: 0.7,
                food_efficiency: 1.2,
                territory_size: 1.4,
                pack_behavior: true,
                memory_retention: 1.2,
            },
            Biome::Meadow => Self {
                speed: 1.2,
                aggression: 0.8,
                reproduction_rate: 1.3,
                food_efficiency: 1.0,
                territory_size: 1.2,
                pack_behavior: true,
                memory_retention: 0.8,
            },
            Biome::Crystal => Self {
                speed: 1.0,
                aggression: 0.9,
                reproduction_rate: 0.9,
                food_efficiency: 1.1,
                territory_size: 1.0,
                pack_behavior: false,
                memory_retention: 1.5,
            },
            Biome::Unknown => Self::NEUTRAL,
        }
    }
}
