//! Monster templates per location and the spawn curve used by trouble.

use std::collections::BTreeMap;

use super::math::{modified_base_power, quality_index};
use super::types::{DefeatEffect, Element, Enemy, Technique, TechniqueEffect};
use crate::character::location::Location;
use crate::core::constants::*;
use crate::items::repository::ItemRepository;
use crate::items::types::{Item, ItemKind};

/// Name prefixes by quality tier, weakest first.
pub const QUALITY_NAMES: [&str; 6] = ["Weak", "Young", "Grown", "Strong", "Fierce", "Ancient"];

#[derive(Debug, Clone, PartialEq)]
pub struct MonsterTemplate {
    pub name: String,
    pub location: Location,
    pub base_power: f64,
    pub element: Option<Element>,
    /// Item ids and quantities dropped on death.
    pub loot: Vec<(String, u32)>,
    pub venomous: bool,
    pub defeat_effect: Option<DefeatEffect>,
    /// Unique monsters appear at most once per life and skip quality naming.
    pub unique: bool,
}

impl MonsterTemplate {
    pub fn new(name: &str, location: Location, base_power: f64) -> Self {
        Self {
            name: name.to_string(),
            location,
            base_power,
            element: None,
            loot: Vec::new(),
            venomous: false,
            defeat_effect: None,
            unique: false,
        }
    }

    fn element(mut self, element: Element) -> Self {
        self.element = Some(element);
        self
    }

    fn drops(mut self, item_id: &str, quantity: u32) -> Self {
        self.loot.push((item_id.to_string(), quantity));
        self
    }

    fn venomous(mut self) -> Self {
        self.venomous = true;
        self
    }

    fn on_defeat(mut self, effect: DefeatEffect) -> Self {
        self.defeat_effect = Some(effect);
        self
    }

    fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Bestiary {
    templates: Vec<MonsterTemplate>,
}

impl Default for Bestiary {
    fn default() -> Self {
        Self::new(default_monsters())
    }
}

impl Bestiary {
    pub fn new(templates: Vec<MonsterTemplate>) -> Self {
        Self { templates }
    }

    pub fn templates(&self) -> &[MonsterTemplate] {
        &self.templates
    }

    /// Monsters that may appear at `location`, skipping unique monsters
    /// already killed this life.
    pub fn candidates(
        &self,
        location: Location,
        kills_by_monster: &BTreeMap<String, u64>,
    ) -> Vec<&MonsterTemplate> {
        self.templates
            .iter()
            .filter(|t| t.location == location)
            .filter(|t| !(t.unique && kills_by_monster.get(&t.name).copied().unwrap_or(0) > 0))
            .collect()
    }

    /// Builds an enemy from a template, scaled by kills at its location.
    pub fn spawn(
        template: &MonsterTemplate,
        kills_at_location: u64,
        items: &ItemRepository,
    ) -> Enemy {
        let power = modified_base_power(template.base_power, kills_at_location);
        let name = if template.unique {
            template.name.clone()
        } else {
            let quality = QUALITY_NAMES[quality_index(kills_at_location, QUALITY_NAMES.len())];
            format!("{} {}", quality, template.name)
        };

        let mut attack = Technique::new(
            &format!("{} Attack", template.name),
            ENEMY_ATTACK_TICKS_REQUIRED,
            power * ENEMY_DAMAGE_FRACTION,
        );
        if template.venomous {
            attack.effect = Some(TechniqueEffect::Poison);
        }

        let mut enemy = Enemy::new(&name, power * power, power / ENEMY_DEFENSE_DIVISOR)
            .with_technique(attack);
        enemy.base_name = template.name.clone();
        enemy.element = template.element;
        enemy.defeat_effect = template.defeat_effect;
        enemy.unique = template.unique;
        for (item_id, quantity) in &template.loot {
            let item = items
                .get_item_by_id(item_id)
                .cloned()
                .unwrap_or_else(|| Item::new(item_id, item_id, ItemKind::Treasure));
            enemy = enemy.with_loot(item, *quantity);
        }
        enemy
    }
}

pub fn default_monsters() -> Vec<MonsterTemplate> {
    use Location::*;
    vec![
        MonsterTemplate::new("Frog", SmallPond, 10.0)
            .element(Element::Water)
            .drops("meat", 1),
        MonsterTemplate::new("Water Snake", SmallPond, 20.0)
            .element(Element::Water)
            .drops("hide", 1)
            .venomous(),
        MonsterTemplate::new("Wolf", Forest, 50.0)
            .element(Element::Wood)
            .drops("meat", 1)
            .drops("hide", 1),
        MonsterTemplate::new("Boar", Forest, 80.0)
            .element(Element::Earth)
            .drops("meat", 2),
        MonsterTemplate::new("Mountain Goat", Mountains, 100.0)
            .element(Element::Earth)
            .drops("meat", 2)
            .drops("hide", 1),
        MonsterTemplate::new("Rock Slime", Mountains, 150.0)
            .element(Element::Earth)
            .drops("copperOre", 1)
            .on_defeat(DefeatEffect::RespawnDouble),
        MonsterTemplate::new("Sand Scorpion", Desert, 200.0)
            .element(Element::Fire)
            .drops("hide", 1)
            .venomous(),
        MonsterTemplate::new("Fire Lizard", Desert, 250.0)
            .element(Element::Fire)
            .drops("ironOre", 1),
        MonsterTemplate::new("Venomous Spider", Jungle, 300.0)
            .element(Element::Wood)
            .drops("ginseng", 1)
            .venomous(),
        MonsterTemplate::new("Great Ape", Jungle, 400.0)
            .element(Element::Wood)
            .drops("meat", 4),
        MonsterTemplate::new("Shark", Ocean, 500.0)
            .element(Element::Water)
            .drops("meat", 5),
        MonsterTemplate::new("Sea Serpent King", Ocean, 2_000.0)
            .element(Element::Water)
            .drops("spiritGem", 1)
            .unique(),
    ]
}
