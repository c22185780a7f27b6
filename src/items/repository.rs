//! Canonical item catalog.
//!
//! Loot tables and followers refer to items by id; the repository resolves
//! those ids to full item definitions. Unknown ids are not an error: callers
//! fall back to whatever literal item they were holding.

use super::types::{Item, ItemEffect, ItemKind};
use crate::character::status::StatusType;
use crate::combat::types::FormationKind;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct ItemRepository {
    items: BTreeMap<String, Item>,
}

impl Default for ItemRepository {
    fn default() -> Self {
        Self::with_catalog(default_catalog())
    }
}

impl ItemRepository {
    pub fn empty() -> Self {
        Self {
            items: BTreeMap::new(),
        }
    }

    pub fn with_catalog(items: Vec<Item>) -> Self {
        let mut repo = Self::empty();
        for item in items {
            repo.insert(item);
        }
        repo
    }

    pub fn insert(&mut self, item: Item) {
        self.items.insert(item.id.clone(), item);
    }

    pub fn get_item_by_id(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    pub fn get_item_by_name(&self, name: &str) -> Option<&Item> {
        self.items
            .values()
            .find(|item| item.name.eq_ignore_ascii_case(name))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub fn default_catalog() -> Vec<Item> {
    vec![
        Item::new("rice", "Rice", ItemKind::Food)
            .with_value(1.0)
            .with_effect(ItemEffect::Restore {
                status: StatusType::Nutrition,
                amount: 1.0,
            }),
        Item::new("cabbage", "Cabbage", ItemKind::Food)
            .with_value(2.0)
            .with_effect(ItemEffect::Restore {
                status: StatusType::Nutrition,
                amount: 2.0,
            }),
        Item::new("meat", "Meat", ItemKind::Food)
            .with_value(3.0)
            .with_effect(ItemEffect::Restore {
                status: StatusType::Nutrition,
                amount: 3.0,
            }),
        Item::new("ginseng", "Ginseng", ItemKind::Ingredient)
            .with_value(20.0)
            .with_subtype("herb"),
        Item::new("hide", "Hide", ItemKind::Hide).with_value(2.0),
        Item::new("copperOre", "Copper Ore", ItemKind::Ore)
            .with_value(5.0)
            .with_subtype("copper"),
        Item::new("ironOre", "Iron Ore", ItemKind::Ore)
            .with_value(10.0)
            .with_subtype("iron"),
        Item::new("spiritGem", "Spirit Gem", ItemKind::Treasure).with_value(100.0),
        Item::new("healthPotion", "Health Potion", ItemKind::Potion)
            .with_value(25.0)
            .with_cooldown(20)
            .with_effect(ItemEffect::Restore {
                status: StatusType::Health,
                amount: 50.0,
            }),
        Item::new("staminaPill", "Stamina Pill", ItemKind::Pill)
            .with_value(25.0)
            .with_cooldown(20)
            .with_effect(ItemEffect::Restore {
                status: StatusType::Stamina,
                amount: 50.0,
            }),
        Item::new("qiPill", "Qi Pill", ItemKind::Pill)
            .with_value(50.0)
            .with_cooldown(20)
            .with_effect(ItemEffect::Restore {
                status: StatusType::Qi,
                amount: 20.0,
            }),
        Item::new("powerFlag", "Power Formation Flag", ItemKind::FormationFlag)
            .with_value(200.0)
            .with_cooldown(100)
            .with_effect(ItemEffect::Formation {
                kind: FormationKind::Power,
                power: 0.5,
                duration: 50,
                cooldown: 100,
            }),
        Item::new("bulwarkFlag", "Bulwark Formation Flag", ItemKind::FormationFlag)
            .with_value(200.0)
            .with_cooldown(100)
            .with_effect(ItemEffect::Formation {
                kind: FormationKind::Bulwark,
                power: 1.0,
                duration: 50,
                cooldown: 100,
            }),
        Item::new("greedFlag", "Greed Formation Flag", ItemKind::FormationFlag)
            .with_value(500.0)
            .with_cooldown(200)
            .with_effect(ItemEffect::Formation {
                kind: FormationKind::Greed,
                power: 1.0,
                duration: 100,
                cooldown: 200,
            }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_id_and_name() {
        let repo = ItemRepository::default();
        assert_eq!(repo.get_item_by_id("meat").unwrap().name, "Meat");
        assert_eq!(repo.get_item_by_name("iron ore").unwrap().id, "ironOre");
        assert!(repo.get_item_by_id("dragonScale").is_none());
    }

    #[test]
    fn test_catalog_ids_are_unique() {
        let catalog = default_catalog();
        let repo = ItemRepository::with_catalog(catalog.clone());
        assert_eq!(repo.len(), catalog.len());
    }
}
