use crate::character::status::StatusType;
use crate::combat::types::FormationKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Potion,
    Pill,
    Food,
    Ingredient,
    Ore,
    Hide,
    FormationFlag,
    Treasure,
}

impl ItemKind {
    pub fn name(&self) -> &'static str {
        match self {
            ItemKind::Potion => "potion",
            ItemKind::Pill => "pill",
            ItemKind::Food => "food",
            ItemKind::Ingredient => "ingredient",
            ItemKind::Ore => "ore",
            ItemKind::Hide => "hide",
            ItemKind::FormationFlag => "formation flag",
            ItemKind::Treasure => "treasure",
        }
    }
}

/// What happens when an item is used.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ItemEffect {
    Restore { status: StatusType, amount: f64 },
    /// Handled by the battle engine rather than the character.
    Formation {
        kind: FormationKind,
        power: f64,
        duration: u32,
        cooldown: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub effect: Option<ItemEffect>,
    /// Battle ticks before a pouch slot holding this item may fire again.
    #[serde(default)]
    pub cooldown: u32,
}

impl Item {
    pub fn new(id: &str, name: &str, kind: ItemKind) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            subtype: None,
            value: 0.0,
            effect: None,
            cooldown: 0,
        }
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    pub fn with_effect(mut self, effect: ItemEffect) -> Self {
        self.effect = Some(effect);
        self
    }

    pub fn with_subtype(mut self, subtype: &str) -> Self {
        self.subtype = Some(subtype.to_string());
        self
    }

    pub fn with_cooldown(mut self, cooldown: u32) -> Self {
        self.cooldown = cooldown;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item: Item,
    pub quantity: u32,
}

/// Selects inventory stacks either by exact item id or by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemSelector<'a> {
    Id(&'a str),
    Kind(ItemKind),
}

impl ItemSelector<'_> {
    pub fn matches(&self, item: &Item) -> bool {
        match self {
            ItemSelector::Id(id) => item.id == *id,
            ItemSelector::Kind(kind) => item.kind == *kind,
        }
    }
}
