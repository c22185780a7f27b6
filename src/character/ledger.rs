//! The character ledger: attributes, status pools, money and lifespan.
//!
//! Every other subsystem reads and mutates the character through the methods
//! here. Mutations may leave pools out of bounds; callers restore the
//! invariant with [`Character::check_overage`].

use super::attributes::{AttributeType, Attributes};
use super::location::Location;
use super::status::{StatusPool, StatusPools, StatusType};
use crate::core::constants::*;
use crate::items::inventory::Inventory;
use crate::items::types::{ItemKind, ItemSelector};
use crate::log::{LogService, LogTopic};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Main character state.
///
/// IMPORTANT: When adding new fields, keep the container-level
/// `#[serde(default)]` working so older saves still load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Character {
    pub id: String,
    pub attributes: Attributes,
    pub status: StatusPools,
    pub money: f64,
    pub hell_money: f64,
    /// Age in days.
    pub age: u32,
    /// Lifespan in days.
    pub lifespan: u32,
    pub dead: bool,
    /// Permanent rank deciding what survives reincarnation.
    pub bloodline_rank: u32,
    pub yin: f64,
    pub yang: f64,
    pub location: Location,
    /// Number of completed lives.
    pub lives: u32,
    pub attack_power: BTreeMap<AttributeType, f64>,
    pub defense: f64,
}

impl Default for Character {
    fn default() -> Self {
        Self::new()
    }
}

impl Character {
    pub fn new() -> Self {
        use uuid::Uuid;

        let mut character = Self {
            id: Uuid::new_v4().to_string(),
            attributes: Attributes::new(),
            status: starting_status(),
            money: 0.0,
            hell_money: 0.0,
            age: STARTING_AGE_DAYS,
            lifespan: BASE_LIFESPAN_DAYS,
            dead: false,
            bloodline_rank: 0,
            yin: 0.0,
            yang: 0.0,
            location: Location::default(),
            lives: 0,
            attack_power: BTreeMap::new(),
            defense: 0.0,
        };
        character.recalculate_derived_stats();
        character
    }

    pub fn attribute(&self, attr: AttributeType) -> f64 {
        self.attributes.value(attr)
    }

    pub fn increase_attribute(&mut self, attr: AttributeType, amount: f64) {
        self.attributes.increase(attr, amount);
    }

    pub fn pool(&self, status: StatusType) -> &StatusPool {
        self.status.get(status)
    }

    pub fn pool_mut(&mut self, status: StatusType) -> &mut StatusPool {
        self.status.get_mut(status)
    }

    /// Restores `0 <= value <= max` on every status pool.
    pub fn check_overage(&mut self) {
        self.status.clamp_all();
        if self.money.is_nan() {
            self.money = 0.0;
        }
    }

    /// Marks the character dead if health is gone or lifespan is spent.
    /// Returns the (possibly updated) dead flag.
    pub fn check_for_death(&mut self) -> bool {
        if !self.dead && (self.status.health.value <= 0.0 || self.age >= self.lifespan) {
            self.dead = true;
        }
        self.dead
    }

    /// Adds `delta` to money. With `clamp_to_zero`, a negative result is
    /// floored at zero instead of becoming debt.
    pub fn update_money(&mut self, delta: f64, clamp_to_zero: bool) {
        self.money += delta;
        if clamp_to_zero && self.money < 0.0 {
            self.money = 0.0;
        }
    }

    pub fn update_hell_money(&mut self, delta: f64) {
        self.hell_money = (self.hell_money + delta).max(0.0);
    }

    pub fn is_well_fed(&self) -> bool {
        self.status.nutrition.fraction() > WELL_FED_THRESHOLD
    }

    /// How evenly yin and yang are cultivated, from 0 up to
    /// `YIN_YANG_MAX_BALANCE` when they are equal.
    pub fn yin_yang_balance(&self) -> f64 {
        if self.yin <= 0.0 || self.yang <= 0.0 {
            return 0.0;
        }
        YIN_YANG_MAX_BALANCE * self.yin.min(self.yang) / self.yin.max(self.yang)
    }

    /// Divisor applied last to incoming enemy damage. Only justice trained
    /// beyond the starting value counts.
    pub fn justice_divisor(&self) -> f64 {
        let trained = (self.attribute(AttributeType::Justice) - STARTING_ATTRIBUTE_VALUE).max(0.0);
        1.0 + trained.sqrt() / JUSTICE_DIVISOR_SCALE
    }

    pub fn attack_power(&self, attr: AttributeType) -> f64 {
        self.attack_power.get(&attr).copied().unwrap_or(1.0)
    }

    /// Overrides a derived attack power until the next recalculation.
    pub fn set_attack_power(&mut self, attr: AttributeType, power: f64) {
        self.attack_power.insert(attr, power);
    }

    pub fn recalculate_derived_stats(&mut self) {
        for (attr, attribute) in self.attributes.iter() {
            let scaled = if attr.is_lore() {
                attribute.value * LORE_ATTACK_POWER_SCALE
            } else {
                attribute.value
            };
            self.attack_power.insert(attr, scaled.max(1.0).sqrt());
        }
        self.defense = self.attribute(AttributeType::Toughness).max(0.0) / TOUGHNESS_PER_DEFENSE;
    }

    pub fn lifespan_for_aptitude(&self) -> u32 {
        let aptitude = self.attributes.get(AttributeType::Toughness).aptitude.max(0.0);
        BASE_LIFESPAN_DAYS + (aptitude * LIFESPAN_DAYS_PER_TOUGHNESS_APTITUDE) as u32
    }

    pub fn battle_recovery(&mut self) {
        for status in StatusType::all() {
            let pool = self.status.get_mut(status);
            pool.value += pool.battle_tick_recovery;
        }
    }

    /// Daily upkeep of the body: aging, recovery, hunger and eating.
    pub fn on_day(&mut self, inventory: &mut Inventory, log: &mut LogService) {
        if self.dead {
            return;
        }
        self.age = self.age.saturating_add(1);

        for status in StatusType::all() {
            let pool = self.status.get_mut(status);
            pool.value += pool.tick_recovery;
        }

        self.status.nutrition.value -= DAILY_NUTRITION_DECAY;
        self.eat(inventory);
        if self.status.nutrition.value <= 0.0 {
            self.status.health.value -= STARVATION_DAMAGE;
            log.injury(LogTopic::Event, "Hunger gnaws at you. You need food.");
        }

        self.check_overage();
        if self.check_for_death() {
            let cause = if self.age >= self.lifespan {
                "You have died of old age."
            } else {
                "Your body gives out."
            };
            log.injury(LogTopic::Story, cause);
        }
    }

    fn eat(&mut self, inventory: &mut Inventory) {
        if self.status.nutrition.value >= self.status.nutrition.max {
            return;
        }
        let Some(food) = inventory.first_of_kind(ItemKind::Food).map(|s| s.item.clone()) else {
            return;
        };
        if inventory.consume(ItemSelector::Id(&food.id), 1) == 0 {
            return;
        }
        if let Some(effect) = food.effect {
            crate::items::inventory::apply_effect(&effect, self);
        }
    }
}

pub(crate) fn starting_status() -> StatusPools {
    StatusPools {
        health: StatusPool::new(BASE_HEALTH, BASE_HEALTH),
        stamina: StatusPool::new(BASE_STAMINA, BASE_STAMINA)
            .with_recovery(DAILY_STAMINA_RECOVERY, 0.0),
        qi: StatusPool::new(0.0, 0.0),
        nutrition: StatusPool::new(BASE_NUTRITION / 2.0, BASE_NUTRITION),
    }
}
