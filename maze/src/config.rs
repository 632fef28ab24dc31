use clap::Parser;
use serde::{Deserialize, Serialize};

/// Config for a maze factory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seed of the random generator
    /// -> None means that every build draws a fresh one
    pub seed: Option<u64>,
    /// Smallest side of a room
    pub min_room_size: usize,
    /// Largest side of a room
    pub max_room_size: usize,
    /// Failed room placements tolerated before giving up
    pub room_tries: usize,
}

impl Config {
    /// Seed of the reproducible builds used by tests
    pub const DETERMINISTIC_SEED: u64 = 3;

    /// Config whose builds are all the same for a given order
    pub fn deterministic() -> Self {
        Self {
            seed: Some(Self::DETERMINISTIC_SEED),
            ..Default::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            min_room_size: 3,
            max_room_size: 8,
            room_tries: 250,
        }
    }
}

/// Partial config for a maze factory
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Parser, Default)]
pub struct PartialConfig {
    /// Seed of the random generator
    #[clap(long)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Smallest side of a room
    #[clap(long)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_room_size: Option<usize>,
    /// Largest side of a room
    #[clap(long)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_room_size: Option<usize>,
    /// Failed room placements tolerated before giving up
    #[clap(long)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_tries: Option<usize>,
}
impl PartialConfig {
    pub fn merge(self, other: PartialConfig) -> Self {
        Self {
            seed: other.seed.or(self.seed),
            min_room_size: other.min_room_size.or(self.min_room_size),
            max_room_size: other.max_room_size.or(self.max_room_size),
            room_tries: other.room_tries.or(self.room_tries),
        }
    }
    pub fn or_defaults(self) -> Config {
        let default = Config::default();
        Config {
            seed: self.seed.or(default.seed),
            min_room_size: self.min_room_size.unwrap_or(default.min_room_size),
            max_room_size: self.max_room_size.unwrap_or(default.max_room_size),
            room_tries: self.room_tries.unwrap_or(default.room_tries),
        }
    }
}

/// Shape and room budget of the mazes of a skill level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Skill {
    pub level: u8,
    pub width: usize,
    pub height: usize,
    pub rooms: usize,
}

impl Skill {
    pub const MAX_LEVEL: u8 = 15;

    const WIDTH: [usize; 16] = [
        4, 12, 15, 20, 25, 25, 35, 35, 40, 60, 70, 80, 90, 110, 150, 300,
    ];
    const HEIGHT: [usize; 16] = [
        4, 12, 15, 15, 20, 25, 25, 35, 40, 60, 70, 75, 75, 90, 120, 250,
    ];
    const ROOMS: [usize; 16] = [0, 2, 2, 3, 4, 5, 10, 10, 20, 25, 25, 50, 60, 70, 80, 150];

    /// Parameters of a skill level, clamping unknown ones to the hardest
    ///
    /// A level above the table asks for more than the game offers: it gets the largest maze,
    /// 300x250 with 150 rooms, and a warning.
    pub fn level(level: u8) -> Self {
        let level = if level > Self::MAX_LEVEL {
            log::warn!("Skill level {level} out of range, using {}", Self::MAX_LEVEL);
            Self::MAX_LEVEL
        } else {
            level
        };
        let i = level as usize;
        Self {
            level,
            width: Self::WIDTH[i],
            height: Self::HEIGHT[i],
            rooms: Self::ROOMS[i],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_configs_merge_right_to_left() {
        let file = PartialConfig {
            seed: Some(1),
            room_tries: Some(10),
            ..Default::default()
        };
        let cli = PartialConfig {
            seed: Some(2),
            ..Default::default()
        };
        let config = file.merge(cli).or_defaults();
        assert_eq!(config.seed, Some(2));
        assert_eq!(config.room_tries, 10);
        assert_eq!(config.max_room_size, Config::default().max_room_size);
    }

    #[test]
    fn config_reads_from_toml() {
        let config: Config = toml::from_str("seed = 42\nmax_room_size = 5").unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.max_room_size, 5);
        assert_eq!(config.min_room_size, 3);
    }

    #[test]
    fn skill_levels_follow_the_table() {
        assert_eq!(
            Skill::level(0),
            Skill {
                level: 0,
                width: 4,
                height: 4,
                rooms: 0
            }
        );
        assert_eq!(Skill::level(1).rooms, 2);
        assert_eq!(Skill::level(15).width, 300);
    }

    #[test]
    fn out_of_range_skill_is_clamped() {
        assert_eq!(Skill::level(99), Skill::level(Skill::MAX_LEVEL));
        assert_eq!(Skill::level(u8::MAX).level, Skill::MAX_LEVEL);
        assert_eq!(
            [Skill::level(16).width, Skill::level(16).height],
            [300, 250]
        );
    }
}
