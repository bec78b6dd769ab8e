use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of entity classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Plant,
    Herbivore,
    Carnivore,
    Player,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntityKind::Plant => "plant",
            EntityKind::Herbivore => "herbivore",
            EntityKind::Carnivore => "carnivore",
            EntityKind::Player => "player",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HuntingStyle {
    /// Prefers the prey least likely to notice: the farthest one still in range.
    Stealth,
    /// Always the nearest prey.
    Chase,
    /// Intercepts along the prey's last known heading.
    Ambush,
}

/// Environment tag of a room. Unrecognized tags deserialize to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Biome {
    Forest,
    Cave,
    Swamp,
    Desert,
    Tundra,
    Meadow,
    Crystal,
    #[serde(other)]
    Unknown,
}

impl Biome {
    pub const ALL: [Biome; 7] = [
        Biome::Forest,
        Biome::Cave,
        Biome::Swamp,
        Biome::Desert,
        Biome::Tundra,
        Biome::Meadow,
        Biome::Crystal,
    ];

    pub fn from_tag(tag: &str) -> Biome {
        match tag.trim().to_ascii_lowercase().as_str() {
            "forest" => Biome::Forest,
            "cave" => Biome::Cave,
            "swamp" => Biome::Swamp,
            "desert" => Biome::Desert,
            "tundra" => Biome::Tundra,
            "meadow" => Biome::Meadow,
            "crystal" => Biome::Crystal,
            _ => Biome::Unknown,
        }
    }

    /// Plant species that grow natively in this biome, most common first.
    pub fn native_plants(&self) -> &'static [Species] {
        match self {
            Biome::Forest => &[Species::Fern, Species::Moss, Species::Mushroom],
            Biome::Cave => &[Species::Mushroom, Species::Lichen, Species::Moss],
            Biome::Swamp => &[Species::Moss, Species::Fern, Species::Mushroom],
            Biome::Desert => &[Species::Cactus, Species::Flower],
            Biome::Tundra => &[Species::Lichen, Species::Moss],
            Biome::Meadow => &[Species::Flower, Species::Fern, Species::Moss],
            Biome::Crystal => &[Species::Lichen, Species::Mushroom],
            Biome::Unknown => &[Species::Moss],
        }
    }

    pub fn native_herbivores(&self) -> &'static [Species] {
        match self {
            Biome::Forest | Biome::Meadow => &[Species::Rabbit, Species::Deer],
            Biome::Cave | Biome::Crystal => &[Species::Beetle, Species::Snail],
            Biome::Swamp => &[Species::Snail, Species::Beetle],
            Biome::Desert => &[Species::Beetle],
            Biome::Tundra => &[Species::Rabbit],
            Biome::Unknown => &[Species::Rabbit],
        }
    }

    pub fn native_carnivores(&self) -> &'static [Species] {
        match self {
            Biome::Forest => &[Species::Fox, Species::Wolf],
            Biome::Meadow => &[Species::Fox, Species::Owl],
            Biome::Cave | Biome::Crystal => &[Species::Spider],
            Biome::Swamp => &[Species::Spider, Species::Owl],
            Biome::Desert => &[Species::Fox],
            Biome::Tundra => &[Species::Wolf],
            Biome::Unknown => &[Species::Fox],
        }
    }
}

impl fmt::Display for Biome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format!("{self:?}").to_ascii_lowercase())
    }
}

/// Closed species set. Each species belongs to exactly one [`EntityKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Moss,
    Fern,
    Mushroom,
    Flower,
    Cactus,
    Lichen,
    Rabbit,
    Deer,
    Beetle,
    Snail,
    Fox,
    Wolf,
    Spider,
    Owl,
}

impl Species {
    pub fn kind(&self) -> EntityKind {
        self.profile().kind
    }

    pub fn name(&self) -> &'static str {
        self.profile().name
    }

    pub fn profile(&self) -> &'static SpeciesProfile {
        match self {
            Species::Moss => &MOSS,
            Species::Fern => &FERN,
            Species::Mushroom => &MUSHROOM,
            Species::Flower => &FLOWER,
            Species::Cactus => &CACTUS,
            Species::Lichen => &LICHEN,
            Species::Rabbit => &RABBIT,
            Species::Deer => &DEER,
            Species::Beetle => &BEETLE,
            Species::Snail => &SNAIL,
            Species::Fox => &FOX,
            Species::Wolf => &WOLF,
            Species::Spider => &SPIDER,
            Species::Owl => &OWL,
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Static per-species constants. Individuals start from these values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeciesProfile {
    pub name: &'static str,
    pub kind: EntityKind,
    /// World units per second.
    pub base_speed: f64,
    /// Kilograms at spawn.
    pub weight: f64,
    pub max_health: f64,
    pub max_energy: f64,
    /// Nutrition delivered per kilogram eaten.
    pub food_value_per_kg: f64,
    /// Health regained per second while not starving (plants: growth).
    pub growth_rate: f64,
    /// Chance per second of reproducing once eligible.
    pub reproduction_rate: f64,
    pub attack_power: f64,
    pub hunting_style: Option<HuntingStyle>,
    pub stealth_level: f64,
    /// Sensing radius for threats (herbivores) or prey (carnivores).
    pub detection_range: f64,
}

const fn plant(
    name: &'static str,
    weight: f64,
    max_health: f64,
    max_energy: f64,
    food_value_per_kg: f64,
    growth_rate: f64,
    reproduction_rate: f64,
) -> SpeciesProfile {
    SpeciesProfile {
        name,
        kind: EntityKind::Plant,
        base_speed: 0.0,
        weight,
        max_health,
        max_energy,
        food_value_per_kg,
        growth_rate,
        reproduction_rate,
        attack_power: 0.0,
        hunting_style: None,
        stealth_level: 0.0,
        detection_range: 0.0,
    }
}

const fn herbivore(
    name: &'static str,
    base_speed: f64,
    weight: f64,
    max_health: f64,
    max_energy: f64,
    food_value_per_kg: f64,
    reproduction_rate: f64,
    detection_range: f64,
) -> SpeciesProfile {
    SpeciesProfile {
        name,
        kind: EntityKind::Herbivore,
        base_speed,
        weight,
        max_health,
        max_energy,
        food_value_per_kg,
        growth_rate: 1.0,
        reproduction_rate,
        attack_power: 0.0,
        hunting_style: None,
        stealth_level: 0.0,
        detection_range,
    }
}

#[allow(clippy::too_many_arguments)]
const fn carnivore(
    name: &'static str,
    base_speed: f64,
    weight: f64,
    max_health: f64,
    max_energy: f64,
    attack_power: f64,
    style: HuntingStyle,
    stealth_level: f64,
    detection_range: f64,
    reproduction_rate: f64,
) -> SpeciesProfile {
    SpeciesProfile {
        name,
        kind: EntityKind::Carnivore,
        base_speed,
        weight,
        max_health,
        max_energy,
        food_value_per_kg: 10.0,
        growth_rate: 1.5,
        reproduction_rate,
        attack_power,
        hunting_style: Some(style),
        stealth_level,
        detection_range,
    }
}

pub const MOSS: SpeciesProfile = plant("moss", 0.3, 20.0, 50.0, 18.0, 0.5, 0.02);
pub const FERN: SpeciesProfile = plant("fern", 1.2, 35.0, 60.0, 15.0, 0.4, 0.015);
pub const MUSHROOM: SpeciesProfile = plant("mushroom", 0.5, 25.0, 40.0, 20.0, 0.6, 0.025);
pub const FLOWER: SpeciesProfile = plant("flower", 0.2, 15.0, 50.0, 25.0, 0.5, 0.02);
pub const CACTUS: SpeciesProfile = plant("cactus", 2.0, 60.0, 80.0, 12.0, 0.2, 0.008);
pub const LICHEN: SpeciesProfile = plant("lichen", 0.4, 20.0, 40.0, 14.0, 0.3, 0.012);

pub const RABBIT: SpeciesProfile = herbivore("rabbit", 60.0, 2.0, 50.0, 100.0, 22.0, 0.010, 140.0);
pub const DEER: SpeciesProfile = herbivore("deer", 55.0, 6.0, 120.0, 150.0, 18.0, 0.004, 180.0);
pub const BEETLE: SpeciesProfile = herbivore("beetle", 30.0, 0.4, 20.0, 60.0, 25.0, 0.015, 90.0);
pub const SNAIL: SpeciesProfile = herbivore("snail", 15.0, 0.3, 15.0, 50.0, 20.0, 0.015, 70.0);

pub const FOX: SpeciesProfile = carnivore(
    "fox",
    70.0,
    6.0,
    80.0,
    120.0,
    12.0,
    HuntingStyle::Chase,
    0.3,
    180.0,
    0.004,
);
pub const WOLF: SpeciesProfile = carnivore(
    "wolf",
    75.0,
    15.0,
    140.0,
    160.0,
    20.0,
    HuntingStyle::Chase,
    0.2,
    200.0,
    0.002,
);
pub const SPIDER: SpeciesProfile = carnivore(
    "spider",
    40.0,
    1.0,
    30.0,
    70.0,
    8.0,
    HuntingStyle::Ambush,
    0.8,
    120.0,
    0.006,
);
pub const OWL: SpeciesProfile = carnivore(
    "owl",
    80.0,
    2.5,
    45.0,
    90.0,
    10.0,
    HuntingStyle::Stealth,
    0.9,
    220.0,
    0.004,
);
