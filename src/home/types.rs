//! Home data structures and the default home ladder.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One rung of the home ladder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeDefinition {
    pub name: String,
    /// Price paid to move in.
    pub cost: f64,
    /// Charged every day.
    pub upkeep: f64,
    /// Daily health recovery while living here.
    pub health_recovery: f64,
    /// Daily stamina recovery while living here.
    pub stamina_recovery: f64,
}

impl HomeDefinition {
    pub fn new(name: &str, cost: f64, upkeep: f64, health: f64, stamina: f64) -> Self {
        Self {
            name: name.to_string(),
            cost,
            upkeep,
            health_recovery: health,
            stamina_recovery: stamina,
        }
    }
}

pub fn default_homes() -> Vec<HomeDefinition> {
    vec![
        HomeDefinition::new("Shack", 0.0, 0.0, 1.0, 5.0),
        HomeDefinition::new("Tent", 50.0, 0.5, 2.0, 8.0),
        HomeDefinition::new("Hut", 250.0, 1.0, 3.0, 12.0),
        HomeDefinition::new("Cottage", 2_000.0, 5.0, 6.0, 20.0),
        HomeDefinition::new("Courtyard House", 20_000.0, 25.0, 12.0, 35.0),
        HomeDefinition::new("Manor", 250_000.0, 150.0, 25.0, 60.0),
    ]
}

/// Result of the daily upkeep charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpkeepOutcome {
    Paid,
    /// Upkeep went unpaid and the character was hurt. The clock should
    /// stop if `pause_requested` is set.
    Shortfall { pause_requested: bool },
}

/// Persisted home state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeProperties {
    pub current_home: String,
    pub missed_upkeep_days: u64,
}

/// A broken home configuration. The game cannot start with one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HomeError {
    #[error("home ladder is empty")]
    EmptyLadder,
    #[error("starting home {0:?} is not in the home ladder")]
    UnknownStartingHome(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ladder_is_sorted_by_cost() {
        let homes = default_homes();
        assert!(homes.windows(2).all(|w| w[0].cost <= w[1].cost));
        assert_eq!(homes[0].cost, 0.0);
        assert_eq!(homes[0].upkeep, 0.0, "the first home is free to keep");
    }

    #[test]
    fn test_error_messages_name_the_home() {
        let err = HomeError::UnknownStartingHome("Palace".to_string());
        assert!(err.to_string().contains("Palace"));
    }
}
