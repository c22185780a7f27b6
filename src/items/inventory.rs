use super::types::{Item, ItemEffect, ItemKind, ItemSelector, ItemStack};
use crate::character::ledger::Character;
use crate::character::status::StatusType;
use crate::core::constants::POUCH_SLOTS;
use serde::{Deserialize, Serialize};

/// Auto-use trigger: fire when `status` drops below `fraction` of its max.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PouchThreshold {
    pub status: StatusType,
    pub fraction: f64,
}

/// A quick-use slot carried into battle.
///
/// Slots without a threshold fire as soon as they are off cooldown, which is
/// how formation flags are deployed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PouchSlot {
    pub item: Item,
    pub quantity: u32,
    #[serde(default)]
    pub threshold: Option<PouchThreshold>,
    #[serde(default)]
    pub cooldown_left: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Inventory {
    pub stacks: Vec<ItemStack>,
    pub pouch: Vec<PouchSlot>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_item(&mut self, item: &Item, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self.stacks.iter_mut().find(|s| s.item.id == item.id) {
            Some(stack) => stack.quantity = stack.quantity.saturating_add(quantity),
            None => self.stacks.push(ItemStack {
                item: item.clone(),
                quantity,
            }),
        }
    }

    pub fn find(&self, id: &str) -> Option<&ItemStack> {
        self.stacks.iter().find(|s| s.item.id == id)
    }

    pub fn first_of_kind(&self, kind: ItemKind) -> Option<&ItemStack> {
        self.stacks
            .iter()
            .find(|s| s.item.kind == kind && s.quantity > 0)
    }

    pub fn count(&self, id: &str) -> u32 {
        self.find(id).map(|s| s.quantity).unwrap_or(0)
    }

    /// True if at least `quantity` items of `kind` (and `subtype`, when given)
    /// are held across all stacks.
    pub fn check_for(&self, kind: ItemKind, quantity: u32, subtype: Option<&str>) -> bool {
        let held: u64 = self
            .stacks
            .iter()
            .filter(|s| s.item.kind == kind)
            .filter(|s| subtype.is_none() || s.item.subtype.as_deref() == subtype)
            .map(|s| s.quantity as u64)
            .sum();
        held >= quantity as u64
    }

    /// Removes up to `quantity` matching items, oldest stacks first. Returns
    /// how many were actually removed.
    pub fn consume(&mut self, selector: ItemSelector<'_>, quantity: u32) -> u32 {
        let mut remaining = quantity;
        for stack in self.stacks.iter_mut() {
            if remaining == 0 {
                break;
            }
            if !selector.matches(&stack.item) {
                continue;
            }
            let taken = stack.quantity.min(remaining);
            stack.quantity -= taken;
            remaining -= taken;
        }
        self.stacks.retain(|s| s.quantity > 0);
        quantity - remaining
    }

    /// Uses one item from the bag. Items without an effect are left alone.
    ///
    /// Character-side effects are applied here; the effect is returned so the
    /// caller can act on the ones it owns (formations).
    pub fn use_item(&mut self, id: &str, character: &mut Character) -> Option<ItemEffect> {
        let effect = self.find(id)?.item.effect?;
        if self.consume(ItemSelector::Id(id), 1) == 0 {
            return None;
        }
        apply_effect(&effect, character);
        Some(effect)
    }

    /// Moves up to `quantity` items from the bag into a pouch slot.
    pub fn equip_pouch(
        &mut self,
        id: &str,
        quantity: u32,
        threshold: Option<PouchThreshold>,
    ) -> bool {
        let Some(item) = self.find(id).map(|s| s.item.clone()) else {
            return false;
        };
        let existing = self.pouch.iter().position(|slot| slot.item.id == id);
        if existing.is_none() && self.pouch.len() >= POUCH_SLOTS {
            return false;
        }
        let moved = self.consume(ItemSelector::Id(id), quantity);
        if moved == 0 {
            return false;
        }
        match existing {
            Some(index) => {
                let slot = &mut self.pouch[index];
                slot.quantity += moved;
                slot.threshold = threshold;
            }
            None => self.pouch.push(PouchSlot {
                item,
                quantity: moved,
                threshold,
                cooldown_left: 0,
            }),
        }
        true
    }

    pub fn tick_pouch_cooldowns(&mut self) {
        for slot in self.pouch.iter_mut() {
            slot.cooldown_left = slot.cooldown_left.saturating_sub(1);
        }
    }

    pub fn reset_pouch_cooldowns(&mut self) {
        for slot in self.pouch.iter_mut() {
            slot.cooldown_left = 0;
        }
    }

    /// Fires every ready pouch slot whose threshold is crossed. Returns the
    /// name and effect of each item used, in slot order.
    pub fn auto_use_pouch(&mut self, character: &mut Character) -> Vec<(String, ItemEffect)> {
        let mut used = Vec::new();
        for slot in self.pouch.iter_mut() {
            if slot.quantity == 0 || slot.cooldown_left > 0 {
                continue;
            }
            let Some(effect) = slot.item.effect else {
                continue;
            };
            if let Some(threshold) = slot.threshold {
                if character.status.get(threshold.status).fraction() >= threshold.fraction {
                    continue;
                }
            }
            apply_effect(&effect, character);
            slot.quantity -= 1;
            slot.cooldown_left = slot.item.cooldown;
            used.push((slot.item.name.clone(), effect));
        }
        self.pouch.retain(|slot| slot.quantity > 0);
        used
    }

    pub fn reincarnate(&mut self) {
        self.stacks.clear();
        self.pouch.clear();
    }
}

/// Applies the character-side part of an effect. Returns false for effects
/// that belong to another subsystem.
pub fn apply_effect(effect: &ItemEffect, character: &mut Character) -> bool {
    match effect {
        ItemEffect::Restore { status, amount } => {
            let pool = character.status.get_mut(*status);
            pool.value += amount;
            pool.clamp();
            true
        }
        ItemEffect::Formation { .. } => false,
    }
}
