//! Status pools: the spendable, regenerating resources (health, stamina, qi,
//! nutrition).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum StatusType {
    Health,
    Stamina,
    Qi,
    Nutrition,
}

impl StatusType {
    pub fn all() -> [StatusType; 4] {
        [
            StatusType::Health,
            StatusType::Stamina,
            StatusType::Qi,
            StatusType::Nutrition,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            StatusType::Health => "health",
            StatusType::Stamina => "stamina",
            StatusType::Qi => "qi",
            StatusType::Nutrition => "nutrition",
        }
    }
}

/// A bounded resource. `0 <= value <= max` holds after [`StatusPool::clamp`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct StatusPool {
    pub value: f64,
    pub max: f64,
    /// Restored once per day.
    #[serde(default)]
    pub tick_recovery: f64,
    /// Restored once per battle tick while engaged.
    #[serde(default)]
    pub battle_tick_recovery: f64,
}

impl Default for StatusPool {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl StatusPool {
    pub fn new(value: f64, max: f64) -> Self {
        Self {
            value,
            max,
            tick_recovery: 0.0,
            battle_tick_recovery: 0.0,
        }
    }

    pub fn with_recovery(mut self, tick_recovery: f64, battle_tick_recovery: f64) -> Self {
        self.tick_recovery = tick_recovery;
        self.battle_tick_recovery = battle_tick_recovery;
        self
    }

    pub fn clamp(&mut self) {
        if self.max < 0.0 {
            self.max = 0.0;
        }
        self.value = self.value.clamp(0.0, self.max);
    }

    /// Fraction of max currently filled; 0 for an empty-capacity pool.
    pub fn fraction(&self) -> f64 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.value / self.max
        }
    }

    /// Spends `amount` if available. Returns false and leaves the pool
    /// untouched otherwise.
    pub fn spend(&mut self, amount: f64) -> bool {
        if amount <= 0.0 {
            return true;
        }
        if self.value < amount {
            return false;
        }
        self.value -= amount;
        true
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct StatusPools {
    #[serde(default)]
    pub health: StatusPool,
    #[serde(default)]
    pub stamina: StatusPool,
    #[serde(default)]
    pub qi: StatusPool,
    #[serde(default)]
    pub nutrition: StatusPool,
}

impl StatusPools {
    pub fn get(&self, status: StatusType) -> &StatusPool {
        match status {
            StatusType::Health => &self.health,
            StatusType::Stamina => &self.stamina,
            StatusType::Qi => &self.qi,
            StatusType::Nutrition => &self.nutrition,
        }
    }

    pub fn get_mut(&mut self, status: StatusType) -> &mut StatusPool {
        match status {
            StatusType::Health => &mut self.health,
            StatusType::Stamina => &mut self.stamina,
            StatusType::Qi => &mut self.qi,
            StatusType::Nutrition => &mut self.nutrition,
        }
    }

    pub fn clamp_all(&mut self) {
        for status in StatusType::all() {
            self.get_mut(status).clamp();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_bounds_value() {
        let mut pool = StatusPool::new(150.0, 100.0);
        pool.clamp();
        assert_eq!(pool.value, 100.0);

        pool.value = -3.0;
        pool.clamp();
        assert_eq!(pool.value, 0.0);
    }

    #[test]
    fn test_spend_refuses_overdraw() {
        let mut pool = StatusPool::new(5.0, 10.0);
        assert!(!pool.spend(6.0));
        assert_eq!(pool.value, 5.0);
        assert!(pool.spend(5.0));
        assert_eq!(pool.value, 0.0);
    }

    #[test]
    fn test_fraction_of_empty_pool_is_zero() {
        assert_eq!(StatusPool::new(0.0, 0.0).fraction(), 0.0);
    }
}
