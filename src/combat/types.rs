use serde::{Deserialize, Serialize};

use crate::character::attributes::AttributeType;
use crate::core::constants::*;
use crate::items::types::Item;

/// The five elements. Each one overcomes two others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Wood,
    Water,
    Metal,
    Earth,
}

impl Element {
    pub fn all() -> [Element; 5] {
        [
            Element::Fire,
            Element::Wood,
            Element::Water,
            Element::Metal,
            Element::Earth,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Element::Fire => "fire",
            Element::Wood => "wood",
            Element::Water => "water",
            Element::Metal => "metal",
            Element::Earth => "earth",
        }
    }

    /// True if `self` has the advantage over `other`.
    pub fn overcomes(&self, other: Element) -> bool {
        use Element::*;
        matches!(
            (self, other),
            (Fire, Metal)
                | (Fire, Wood)
                | (Wood, Water)
                | (Wood, Earth)
                | (Water, Fire)
                | (Water, Metal)
                | (Metal, Wood)
                | (Metal, Earth)
                | (Earth, Water)
                | (Earth, Fire)
        )
    }

    /// The lore attribute that trains with this element.
    pub fn lore(&self) -> AttributeType {
        match self {
            Element::Fire => AttributeType::FireLore,
            Element::Wood => AttributeType::WoodLore,
            Element::Water => AttributeType::WaterLore,
            Element::Metal => AttributeType::MetalLore,
            Element::Earth => AttributeType::EarthLore,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusEffectKind {
    /// Damage over time, `power` per tick.
    Poison,
    /// Extra technique ticks per battle tick.
    Haste,
    /// Halves incoming hits.
    Shield,
    /// Blocks incoming hits outright.
    Protection,
    /// Returns `power` times each incoming hit to the attacker.
    Reflect,
}

impl StatusEffectKind {
    pub fn name(&self) -> &'static str {
        match self {
            StatusEffectKind::Poison => "Poison",
            StatusEffectKind::Haste => "Haste",
            StatusEffectKind::Shield => "Shield",
            StatusEffectKind::Protection => "Protection",
            StatusEffectKind::Reflect => "Reflect",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub kind: StatusEffectKind,
    pub power: f64,
    pub ticks_left: i32,
}

impl StatusEffect {
    pub fn new(kind: StatusEffectKind, power: f64, ticks_left: i32) -> Self {
        Self {
            kind,
            power,
            ticks_left,
        }
    }
}

/// Adds an effect to a list, merging with an existing effect of the same
/// kind: the remaining ticks are extended and the stronger power is kept.
pub fn add_status_effect(effects: &mut Vec<StatusEffect>, effect: StatusEffect) {
    match effects.iter_mut().find(|e| e.kind == effect.kind) {
        Some(existing) => {
            existing.ticks_left = existing.ticks_left.max(0) + effect.ticks_left;
            existing.power = existing.power.max(effect.power);
        }
        None => effects.push(effect),
    }
}

pub fn status_effect(effects: &[StatusEffect], kind: StatusEffectKind) -> Option<&StatusEffect> {
    effects.iter().find(|e| e.kind == kind)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TechniqueEffect {
    Element(Element),
    /// Tenfold damage.
    Corruption,
    /// Ignores half the target's defense.
    Piercing,
    Poison,
    LifeSteal,
    Shield,
    Haste,
}

impl TechniqueEffect {
    pub fn element(&self) -> Option<Element> {
        match self {
            TechniqueEffect::Element(element) => Some(*element),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TechniqueEffect::Element(element) => element.name(),
            TechniqueEffect::Corruption => "corruption",
            TechniqueEffect::Piercing => "piercing",
            TechniqueEffect::Poison => "poison",
            TechniqueEffect::LifeSteal => "life steal",
            TechniqueEffect::Shield => "shield",
            TechniqueEffect::Haste => "haste",
        }
    }
}

/// An attack or utility action, owned by the player or by an enemy.
///
/// `ticks` accumulates every battle tick and is reset to 0 the moment it
/// reaches `ticks_required` and the technique fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Technique {
    pub name: String,
    pub ticks: u32,
    pub ticks_required: u32,
    pub base_damage: f64,
    /// Scaling attribute. Strength when absent.
    pub attribute: Option<AttributeType>,
    pub qi_cost: f64,
    pub stamina_cost: f64,
    pub health_cost: f64,
    pub effect: Option<TechniqueEffect>,
    pub unlocked: bool,
    pub disabled: bool,
    /// Survives reincarnation.
    pub family_technique: bool,
    pub extra_multiplier: f64,
    /// Carries leftover damage into the next enemy.
    pub blow_through: bool,
}

impl Default for Technique {
    fn default() -> Self {
        Self {
            name: String::new(),
            ticks: 0,
            ticks_required: 10,
            base_damage: 1.0,
            attribute: None,
            qi_cost: 0.0,
            stamina_cost: 0.0,
            health_cost: 0.0,
            effect: None,
            unlocked: true,
            disabled: false,
            family_technique: false,
            extra_multiplier: 1.0,
            blow_through: false,
        }
    }
}

impl Technique {
    pub fn new(name: &str, ticks_required: u32, base_damage: f64) -> Self {
        Self {
            name: name.to_string(),
            ticks_required,
            base_damage,
            ..Self::default()
        }
    }

    /// The technique every life starts with.
    pub fn basic_strike() -> Self {
        Self {
            attribute: Some(AttributeType::Strength),
            ..Self::new(BASIC_STRIKE, 10, 1.0)
        }
    }

    pub fn with_attribute(mut self, attribute: AttributeType) -> Self {
        self.attribute = Some(attribute);
        self
    }

    pub fn with_effect(mut self, effect: TechniqueEffect) -> Self {
        self.effect = Some(effect);
        self
    }

    pub fn with_blow_through(mut self) -> Self {
        self.blow_through = true;
        self
    }

    pub fn is_active(&self) -> bool {
        self.unlocked && !self.disabled
    }

    pub fn scaling_attribute(&self) -> AttributeType {
        self.attribute.unwrap_or(AttributeType::Strength)
    }
}

pub const BASIC_STRIKE: &str = "Basic Strike";
pub const METAL_FIST: &str = "Metal Fist";
pub const PYROCLASM: &str = "Pyroclasm";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormationKind {
    /// Multiplies outgoing damage by `1 + power`.
    Power,
    /// Divides incoming damage by `1 + power`.
    Bulwark,
    /// Multiplies loot quantities by `1 + power`.
    Greed,
}

impl FormationKind {
    pub fn name(&self) -> &'static str {
        match self {
            FormationKind::Power => "Power",
            FormationKind::Bulwark => "Bulwark",
            FormationKind::Greed => "Greed",
        }
    }
}

/// The single active battle formation. `active == None` is the neutral state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Formation {
    pub active: Option<FormationKind>,
    pub duration: u32,
    pub cooldown: u32,
    pub power: f64,
}

impl Formation {
    pub fn is(&self, kind: FormationKind) -> bool {
        self.active == Some(kind)
    }

    /// Power of `kind` if it is the active formation, otherwise 0.
    pub fn power_of(&self, kind: FormationKind) -> f64 {
        if self.is(kind) {
            self.power
        } else {
            0.0
        }
    }

    /// Counts down one battle tick. When the duration runs out the
    /// formation returns to neutral; the cooldown keeps running.
    pub fn age(&mut self) {
        self.cooldown = self.cooldown.saturating_sub(1);
        if self.active.is_none() {
            return;
        }
        self.duration = self.duration.saturating_sub(1);
        if self.duration == 0 {
            self.active = None;
            self.power = 0.0;
        }
    }

    /// Activates a formation. Refused while one is active or cooling down,
    /// unless `force` is set.
    pub fn set(
        &mut self,
        kind: FormationKind,
        power: f64,
        duration: u32,
        cooldown: u32,
        force: bool,
    ) -> bool {
        if !force && (self.active.is_some() || self.cooldown > 0) {
            return false;
        }
        self.active = Some(kind);
        self.power = power;
        self.duration = duration;
        self.cooldown = cooldown;
        true
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DefeatEffect {
    /// Two fresh copies take the fallen enemy's place.
    RespawnDouble,
    /// Grants hell money on death.
    HellMoney(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loot {
    pub item: Item,
    pub quantity: u32,
}

impl Loot {
    pub fn new(item: Item, quantity: u32) -> Self {
        Self { item, quantity }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub name: String,
    pub base_name: String,
    pub health: f64,
    pub max_health: f64,
    #[serde(default)]
    pub defense: f64,
    #[serde(default)]
    pub techniques: Vec<Technique>,
    #[serde(default)]
    pub status_effects: Vec<StatusEffect>,
    #[serde(default)]
    pub element: Option<Element>,
    #[serde(default)]
    pub immunities: Vec<StatusEffectKind>,
    #[serde(default)]
    pub loot: Vec<Loot>,
    #[serde(default)]
    pub defeat_effect: Option<DefeatEffect>,
    #[serde(default)]
    pub unique: bool,
}

impl Enemy {
    pub fn new(name: &str, health: f64, defense: f64) -> Self {
        Self {
            name: name.to_string(),
            base_name: name.to_string(),
            health,
            max_health: health,
            defense,
            techniques: Vec::new(),
            status_effects: Vec::new(),
            element: None,
            immunities: Vec::new(),
            loot: Vec::new(),
            defeat_effect: None,
            unique: false,
        }
    }

    pub fn with_technique(mut self, technique: Technique) -> Self {
        self.techniques.push(technique);
        self
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.element = Some(element);
        self
    }

    pub fn with_loot(mut self, item: Item, quantity: u32) -> Self {
        self.loot.push(Loot::new(item, quantity));
        self
    }

    pub fn with_defeat_effect(mut self, effect: DefeatEffect) -> Self {
        self.defeat_effect = Some(effect);
        self
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn is_immune(&self, kind: StatusEffectKind) -> bool {
        self.immunities.contains(&kind)
    }

    /// A full-health copy of this enemy's template, as spawned by a defeat
    /// effect. Copies never inherit the defeat effect.
    pub fn fresh_copy(&self) -> Self {
        let mut copy = self.clone();
        copy.name = self.base_name.clone();
        copy.health = self.max_health;
        copy.status_effects.clear();
        copy.defeat_effect = None;
        for technique in copy.techniques.iter_mut() {
            technique.ticks = 0;
        }
        copy
    }
}

/// The outcome of a kill, for callers that want to react to it.
#[derive(Debug, Clone, PartialEq)]
pub struct KillReport {
    pub name: String,
    pub loot: Vec<(String, u32)>,
    pub hell_money: f64,
    pub respawned: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_cycle_each_element_overcomes_two() {
        for element in Element::all() {
            let beaten = Element::all()
                .into_iter()
                .filter(|other| element.overcomes(*other))
                .count();
            assert_eq!(beaten, 2, "{} should overcome two elements", element.name());
            assert!(!element.overcomes(element));
        }
        assert!(Element::Fire.overcomes(Element::Wood));
        assert!(Element::Earth.overcomes(Element::Fire));
    }

    #[test]
    fn test_status_effects_merge_by_kind() {
        let mut effects = Vec::new();
        add_status_effect(&mut effects, StatusEffect::new(StatusEffectKind::Poison, 2.0, 5));
        add_status_effect(&mut effects, StatusEffect::new(StatusEffectKind::Poison, 1.0, 3));
        add_status_effect(&mut effects, StatusEffect::new(StatusEffectKind::Haste, 1.0, 3));

        assert_eq!(effects.len(), 2);
        let poison = status_effect(&effects, StatusEffectKind::Poison).unwrap();
        assert_eq!(poison.ticks_left, 8);
        assert_eq!(poison.power, 2.0);
    }

    #[test]
    fn test_formation_expires_to_neutral() {
        let mut formation = Formation::default();
        assert!(formation.set(FormationKind::Power, 0.5, 1, 0, false));

        formation.age();

        assert_eq!(formation.active, None);
        assert_eq!(formation.power, 0.0);
        assert_eq!(formation.duration, 0);
    }

    #[test]
    fn test_formation_refused_while_active_unless_forced() {
        let mut formation = Formation::default();
        assert!(formation.set(FormationKind::Power, 0.5, 10, 20, false));
        assert!(!formation.set(FormationKind::Greed, 1.0, 10, 20, false));
        assert!(formation.is(FormationKind::Power));
        assert!(formation.set(FormationKind::Greed, 1.0, 10, 20, true));
        assert!(formation.is(FormationKind::Greed));
    }

    #[test]
    fn test_formation_cooldown_blocks_after_expiry() {
        let mut formation = Formation::default();
        formation.set(FormationKind::Bulwark, 1.0, 1, 3, false);
        formation.age();
        assert!(!formation.set(FormationKind::Bulwark, 1.0, 1, 3, false));
        formation.age();
        formation.age();
        assert!(formation.set(FormationKind::Bulwark, 1.0, 1, 3, false));
    }

    #[test]
    fn test_fresh_copy_drops_defeat_effect() {
        let mut enemy = Enemy::new("Slime", 10.0, 0.0).with_defeat_effect(DefeatEffect::RespawnDouble);
        enemy.name = "Slime 2".to_string();
        enemy.health = 1.0;

        let copy = enemy.fresh_copy();

        assert_eq!(copy.name, "Slime");
        assert_eq!(copy.health, 10.0);
        assert!(copy.defeat_effect.is_none());
    }
}
