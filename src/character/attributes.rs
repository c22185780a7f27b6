use crate::core::constants::STARTING_ATTRIBUTE_VALUE;
use serde::{Deserialize, Serialize};

pub const NUM_ATTRIBUTES: usize = 21;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeType {
    Strength,
    Toughness,
    Speed,
    Intelligence,
    Charisma,
    Spirituality,
    EarthLore,
    MetalLore,
    WoodLore,
    WaterLore,
    FireLore,
    AnimalHandling,
    Performance,
    Smithing,
    Alchemy,
    Woodwork,
    Leatherwork,
    FormationMastery,
    Cooking,
    CombatMastery,
    Justice,
}

impl AttributeType {
    pub fn all() -> [AttributeType; NUM_ATTRIBUTES] {
        [
            AttributeType::Strength,
            AttributeType::Toughness,
            AttributeType::Speed,
            AttributeType::Intelligence,
            AttributeType::Charisma,
            AttributeType::Spirituality,
            AttributeType::EarthLore,
            AttributeType::MetalLore,
            AttributeType::WoodLore,
            AttributeType::WaterLore,
            AttributeType::FireLore,
            AttributeType::AnimalHandling,
            AttributeType::Performance,
            AttributeType::Smithing,
            AttributeType::Alchemy,
            AttributeType::Woodwork,
            AttributeType::Leatherwork,
            AttributeType::FormationMastery,
            AttributeType::Cooking,
            AttributeType::CombatMastery,
            AttributeType::Justice,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            AttributeType::Strength => "Strength",
            AttributeType::Toughness => "Toughness",
            AttributeType::Speed => "Speed",
            AttributeType::Intelligence => "Intelligence",
            AttributeType::Charisma => "Charisma",
            AttributeType::Spirituality => "Spirituality",
            AttributeType::EarthLore => "Earth Lore",
            AttributeType::MetalLore => "Metal Lore",
            AttributeType::WoodLore => "Wood Lore",
            AttributeType::WaterLore => "Water Lore",
            AttributeType::FireLore => "Fire Lore",
            AttributeType::AnimalHandling => "Animal Handling",
            AttributeType::Performance => "Performance",
            AttributeType::Smithing => "Smithing",
            AttributeType::Alchemy => "Alchemy",
            AttributeType::Woodwork => "Woodwork",
            AttributeType::Leatherwork => "Leatherwork",
            AttributeType::FormationMastery => "Formation Mastery",
            AttributeType::Cooking => "Cooking",
            AttributeType::CombatMastery => "Combat Mastery",
            AttributeType::Justice => "Justice",
        }
    }

    /// Elemental lores train slowly, so their attack power is scaled up.
    pub fn is_lore(&self) -> bool {
        matches!(
            self,
            AttributeType::EarthLore
                | AttributeType::MetalLore
                | AttributeType::WoodLore
                | AttributeType::WaterLore
                | AttributeType::FireLore
        )
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// A trained skill value plus the aptitude that speeds up its training.
///
/// Values only go up through training; penalties are the one way down.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Attribute {
    pub value: f64,
    #[serde(default)]
    pub aptitude: f64,
}

impl Default for Attribute {
    fn default() -> Self {
        Self {
            value: STARTING_ATTRIBUTE_VALUE,
            aptitude: 1.0,
        }
    }
}

/// Training gain multiplier for a given aptitude.
pub fn aptitude_multiplier(aptitude: f64) -> f64 {
    1.0 + aptitude.max(0.0).sqrt() / 10.0
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Attributes {
    values: [Attribute; NUM_ATTRIBUTES],
}

impl Default for Attributes {
    fn default() -> Self {
        Self::new()
    }
}

impl Attributes {
    pub fn new() -> Self {
        Self {
            values: [Attribute::default(); NUM_ATTRIBUTES],
        }
    }

    pub fn get(&self, attr: AttributeType) -> &Attribute {
        &self.values[attr.index()]
    }

    pub fn get_mut(&mut self, attr: AttributeType) -> &mut Attribute {
        &mut self.values[attr.index()]
    }

    pub fn value(&self, attr: AttributeType) -> f64 {
        self.values[attr.index()].value
    }

    pub fn set(&mut self, attr: AttributeType, value: f64) {
        self.values[attr.index()].value = value;
    }

    /// Trains an attribute, scaled by its aptitude. Negative amounts are
    /// penalties and bypass aptitude.
    pub fn increase(&mut self, attr: AttributeType, amount: f64) {
        let slot = &mut self.values[attr.index()];
        if amount >= 0.0 {
            slot.value += amount * aptitude_multiplier(slot.aptitude);
        } else {
            slot.value = (slot.value + amount).max(0.0);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (AttributeType, &Attribute)> {
        AttributeType::all()
            .into_iter()
            .map(move |attr| (attr, &self.values[attr.index()]))
    }
}
