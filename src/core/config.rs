//! Game configuration.
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration and older files keep loading as settings are added.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use super::constants::*;
use crate::home::types::{default_homes, HomeDefinition};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for the world RNG. A fixed seed makes runs replayable.
    pub seed: Option<u64>,
    pub tick_divider: u32,
    pub starting_money: f64,
    pub log_capacity: usize,
    pub offline: OfflineConfig,
    pub combat: CombatConfig,
    pub followers: FollowersConfig,
    pub farm: FarmConfig,
    pub home: HomeConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            tick_divider: DEFAULT_TICK_DIVIDER,
            starting_money: 0.0,
            log_capacity: LOG_CAPACITY,
            offline: OfflineConfig::default(),
            combat: CombatConfig::default(),
            followers: FollowersConfig::default(),
            farm: FarmConfig::default(),
            home: HomeConfig::default(),
        }
    }
}

impl GameConfig {
    /// A default configuration with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfflineConfig {
    /// Away time is worth `1 / efficiency_divider` of live time.
    pub efficiency_divider: u64,
    pub max_catch_up_ticks: u64,
}

impl Default for OfflineConfig {
    fn default() -> Self {
        Self {
            efficiency_divider: OFFLINE_EFFICIENCY_DIVIDER,
            max_catch_up_ticks: MAX_CATCH_UP_TICKS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub max_family_techniques: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            max_family_techniques: DEFAULT_MAX_FAMILY_TECHNIQUES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowersConfig {
    pub max_followers: u32,
    pub wage: f64,
}

impl Default for FollowersConfig {
    fn default() -> Self {
        Self {
            max_followers: DEFAULT_MAX_FOLLOWERS,
            wage: FOLLOWER_DAILY_WAGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FarmConfig {
    pub max_fields: u32,
}

impl Default for FarmConfig {
    fn default() -> Self {
        Self {
            max_fields: DEFAULT_MAX_FIELDS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeConfig {
    pub starting_home: String,
    /// Stop the clock when upkeep cannot be paid.
    pub pause_on_upkeep_failure: bool,
    /// The home ladder, cheapest first.
    pub homes: Vec<HomeDefinition>,
}

impl Default for HomeConfig {
    fn default() -> Self {
        let homes = default_homes();
        Self {
            starting_home: homes
                .first()
                .map(|h| h.name.clone())
                .unwrap_or_default(),
            pause_on_upkeep_failure: false,
            homes,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
}
