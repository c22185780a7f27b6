//! Hell realms.
//!
//! While the character is inside a realm, ordinary trouble stops and the
//! realm sends its own demons instead. Demons pay out in hell money.

use serde::{Deserialize, Serialize};

use crate::combat::engine::Battle;
use crate::combat::types::{DefeatEffect, Enemy, Technique, TechniqueEffect};
use crate::log::{LogService, LogTopic};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HellRealm {
    MountainOfKnives,
    CauldronOfOil,
    ForestOfSwords,
    PoolOfBlood,
}

impl HellRealm {
    pub fn all() -> [HellRealm; 4] {
        [
            HellRealm::MountainOfKnives,
            HellRealm::CauldronOfOil,
            HellRealm::ForestOfSwords,
            HellRealm::PoolOfBlood,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            HellRealm::MountainOfKnives => "Mountain of Knives",
            HellRealm::CauldronOfOil => "Cauldron of Oil",
            HellRealm::ForestOfSwords => "Forest of Swords",
            HellRealm::PoolOfBlood => "Pool of Blood",
        }
    }

    /// The demon guarding this realm.
    pub fn demon(&self) -> Enemy {
        let (name, power, reward, effect) = match self {
            HellRealm::MountainOfKnives => ("Knife Demon", 1_000.0, 1.0, None),
            HellRealm::CauldronOfOil => ("Oil Demon", 2_000.0, 2.0, Some(TechniqueEffect::Poison)),
            HellRealm::ForestOfSwords => ("Sword Demon", 4_000.0, 4.0, None),
            HellRealm::PoolOfBlood => ("Blood Demon", 8_000.0, 8.0, Some(TechniqueEffect::Poison)),
        };
        let mut attack = Technique::new("Infernal Strike", 8, power / 20.0);
        attack.effect = effect;
        Enemy::new(name, power * power, power / 10.0)
            .with_technique(attack)
            .with_defeat_effect(DefeatEffect::HellMoney(reward))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HellProperties {
    pub current_realm: Option<HellRealm>,
    pub demons_summoned: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Hell {
    pub current_realm: Option<HellRealm>,
    pub demons_summoned: u64,
}

impl Hell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&mut self, realm: HellRealm, log: &mut LogService) {
        self.current_realm = Some(realm);
        log.log(
            LogTopic::Story,
            format!("You descend into the {}.", realm.name()),
        );
    }

    pub fn exit(&mut self, log: &mut LogService) {
        if let Some(realm) = self.current_realm.take() {
            log.log(
                LogTopic::Story,
                format!("You claw your way out of the {}.", realm.name()),
            );
        }
    }

    /// True while inside a realm; mortal trouble does not reach here.
    pub fn overrides_trouble(&self) -> bool {
        self.current_realm.is_some()
    }

    /// Sends the realm's demon whenever the battlefield is quiet.
    pub fn on_day(&mut self, battle: &mut Battle, log: &mut LogService) {
        let Some(realm) = self.current_realm else {
            return;
        };
        if battle.is_engaged() {
            return;
        }
        self.demons_summoned += 1;
        battle.add_enemy(realm.demon(), log);
    }

    pub fn reincarnate(&mut self) {
        self.current_realm = None;
    }

    pub fn properties(&self) -> HellProperties {
        HellProperties {
            current_realm: self.current_realm,
            demons_summoned: self.demons_summoned,
        }
    }

    pub fn set_properties(&mut self, properties: HellProperties) {
        self.current_realm = properties.current_realm;
        self.demons_summoned = properties.demons_summoned;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demons_spawn_only_when_idle_and_inside() {
        let mut hell = Hell::new();
        let mut battle = Battle::default();
        let mut log = LogService::default();

        hell.on_day(&mut battle, &mut log);
        assert!(!battle.is_engaged(), "no demons outside hell");

        hell.enter(HellRealm::MountainOfKnives, &mut log);
        assert!(hell.overrides_trouble());
        hell.on_day(&mut battle, &mut log);
        hell.on_day(&mut battle, &mut log);

        assert_eq!(battle.enemies.len(), 1);
        assert_eq!(battle.enemies[0].name, "Knife Demon");
        assert_eq!(hell.demons_summoned, 1);
    }

    #[test]
    fn test_every_demon_pays_hell_money() {
        for realm in HellRealm::all() {
            assert!(matches!(
                realm.demon().defeat_effect,
                Some(DefeatEffect::HellMoney(amount)) if amount > 0.0
            ));
        }
    }

    #[test]
    fn test_exit_and_reincarnate_leave_hell() {
        let mut hell = Hell::new();
        let mut log = LogService::default();
        hell.enter(HellRealm::PoolOfBlood, &mut log);
        hell.exit(&mut log);
        assert!(!hell.overrides_trouble());

        hell.enter(HellRealm::PoolOfBlood, &mut log);
        hell.reincarnate();
        assert!(hell.current_realm.is_none());
    }
}
