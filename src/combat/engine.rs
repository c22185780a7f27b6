//! The battle engine.
//!
//! An encounter moves Idle → Engaged → Resolved → Idle. Every battle tick
//! ages formations and status effects, advances player and enemy techniques,
//! and resolves the hits that come due. Nothing in here fails: a missing
//! target is a no-op and a dead character drops the encounter back to Idle.

use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::bestiary::Bestiary;
use super::family::generate_family_technique;
use super::math::{
    element_multiplier, enemy_damage_after_defense, family_technique_threshold, lore_multiplier,
    player_damage_after_defense,
};
use super::types::*;
use crate::character::attributes::AttributeType;
use crate::character::ledger::Character;
use crate::character::location::Location;
use crate::core::config::CombatConfig;
use crate::core::constants::*;
use crate::followers::Followers;
use crate::items::inventory::Inventory;
use crate::items::repository::ItemRepository;
use crate::items::types::ItemEffect;
use crate::log::{LogService, LogTopic};

/// Everything the battle engine touches outside its own state.
pub struct BattleContext<'a> {
    pub character: &'a mut Character,
    pub inventory: &'a mut Inventory,
    pub items: &'a ItemRepository,
    pub followers: &'a mut Followers,
    pub log: &'a mut LogService,
    pub rng: &'a mut dyn RngCore,
}

/// Persisted battle state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleProperties {
    pub enemies: Vec<Enemy>,
    pub current_enemy: Option<usize>,
    pub techniques: Vec<Technique>,
    pub status_effects: Vec<StatusEffect>,
    pub formation: Formation,
    pub total_kills: u64,
    pub kills_by_location: BTreeMap<Location, u64>,
    pub kills_by_monster: BTreeMap<String, u64>,
    pub times_fled: u64,
    pub family_technique_progress: f64,
}

#[derive(Debug, Clone)]
pub struct Battle {
    pub enemies: Vec<Enemy>,
    pub current_enemy: Option<usize>,
    /// The player's known techniques, in firing order.
    pub techniques: Vec<Technique>,
    /// Effects on the player.
    pub status_effects: Vec<StatusEffect>,
    pub formation: Formation,
    pub total_kills: u64,
    pub kills_by_location: BTreeMap<Location, u64>,
    pub kills_by_monster: BTreeMap<String, u64>,
    pub times_fled: u64,
    pub family_technique_progress: f64,
    max_family_techniques: u32,
    bestiary: Bestiary,
}

impl Default for Battle {
    fn default() -> Self {
        Self::new(&CombatConfig::default())
    }
}

impl Battle {
    pub fn new(config: &CombatConfig) -> Self {
        Self {
            enemies: Vec::new(),
            current_enemy: None,
            techniques: vec![Technique::basic_strike()],
            status_effects: Vec::new(),
            formation: Formation::default(),
            total_kills: 0,
            kills_by_location: BTreeMap::new(),
            kills_by_monster: BTreeMap::new(),
            times_fled: 0,
            family_technique_progress: 0.0,
            max_family_techniques: config.max_family_techniques,
            bestiary: Bestiary::default(),
        }
    }

    pub fn with_bestiary(mut self, bestiary: Bestiary) -> Self {
        self.bestiary = bestiary;
        self
    }

    pub fn is_engaged(&self) -> bool {
        !self.enemies.is_empty()
    }

    pub fn current(&self) -> Option<&Enemy> {
        self.current_enemy.and_then(|i| self.enemies.get(i))
    }

    pub fn family_technique_count(&self) -> u32 {
        self.techniques.iter().filter(|t| t.family_technique).count() as u32
    }

    pub fn learn_technique(&mut self, technique: Technique) {
        self.techniques.push(technique);
    }

    pub fn player_status(&self, kind: StatusEffectKind) -> Option<&StatusEffect> {
        status_effect(&self.status_effects, kind)
    }

    // ── Encounter management ──────────────────────────────────────────

    /// Adds an enemy to the encounter, numbering duplicates ("Wolf",
    /// "Wolf 2", ...). Targets it only if nothing is targeted.
    pub fn add_enemy(&mut self, mut enemy: Enemy, log: &mut LogService) {
        let same_kind = self
            .enemies
            .iter()
            .filter(|e| e.base_name == enemy.base_name)
            .count();
        if same_kind > 0 {
            let mut ordinal = same_kind + 1;
            let mut name = format!("{} {}", enemy.name, ordinal);
            while self.enemies.iter().any(|e| e.name == name) {
                ordinal += 1;
                name = format!("{} {}", enemy.name, ordinal);
            }
            enemy.name = name;
        }

        log.log(LogTopic::Combat, format!("A {} appears!", enemy.name));
        self.enemies.push(enemy);
        if self.current_enemy.is_none() {
            self.current_enemy = Some(self.enemies.len() - 1);
        }
    }

    pub fn clear_enemies(&mut self) {
        self.enemies.clear();
        self.current_enemy = None;
    }

    /// Spawns a monster for the character's location, scaled by how many
    /// have been killed there this life. No-op while engaged or when
    /// `overridden` by a hell realm.
    pub fn trouble(&mut self, ctx: &mut BattleContext<'_>, overridden: bool) {
        if self.is_engaged() || overridden {
            return;
        }
        let location = ctx.character.location;
        let template = self
            .bestiary
            .candidates(location, &self.kills_by_monster)
            .choose(&mut *ctx.rng)
            .map(|t| (*t).clone());
        let Some(template) = template else {
            return;
        };
        let kills = self.kills_by_location.get(&location).copied().unwrap_or(0);
        let enemy = Bestiary::spawn(&template, kills, ctx.items);
        tracing::debug!(enemy = %enemy.name, health = enemy.health, "trouble spawned");
        self.add_enemy(enemy, ctx.log);
    }

    /// Daily chance of trouble in dangerous places.
    pub fn on_day(&mut self, ctx: &mut BattleContext<'_>, overridden: bool) {
        if ctx.character.location.is_dangerous() {
            self.trouble(ctx, overridden);
        }
    }

    pub fn set_formation(
        &mut self,
        kind: FormationKind,
        power: f64,
        duration: u32,
        cooldown: u32,
        force: bool,
    ) -> bool {
        self.formation.set(kind, power, duration, cooldown, force)
    }

    pub fn age_formation(&mut self) {
        self.formation.age();
    }

    // ── Battle tick ───────────────────────────────────────────────────

    pub fn tick(&mut self, ctx: &mut BattleContext<'_>) {
        // ── 1. A dead character cannot fight ──
        if ctx.character.check_for_death() {
            if self.is_engaged() {
                self.clear_enemies();
            }
            return;
        }

        // ── 2. Timers ──
        self.age_formation();
        let poison = age_effects(&mut self.status_effects);
        if poison > 0.0 {
            ctx.character.status.health.value -= poison;
            ctx.log.injury(
                LogTopic::Combat,
                format!("Poison burns through you for {:.1} damage.", poison),
            );
        }
        for enemy in self.enemies.iter_mut() {
            enemy.health -= age_effects(&mut enemy.status_effects);
        }
        ctx.inventory.tick_pouch_cooldowns();

        // ── 3. Clear out anything poison finished off ──
        self.sweep_dead_enemies(ctx);

        if self.is_engaged() {
            // ── 4. Recovery and pouch ──
            ctx.character.battle_recovery();
            self.use_pouch(ctx);

            // ── 5. Player techniques ──
            self.player_pass(ctx);

            // ── 6. Enemy techniques ──
            self.enemy_pass(ctx);

            // ── 7. Aftermath ──
            self.sweep_dead_enemies(ctx);
            self.develop_family_technique(ctx);
        }

        ctx.character.check_overage();
        if ctx.character.check_for_death() {
            ctx.log.injury(LogTopic::Combat, "You have been slain.");
            self.clear_enemies();
        }
    }

    fn use_pouch(&mut self, ctx: &mut BattleContext<'_>) {
        for (name, effect) in ctx.inventory.auto_use_pouch(ctx.character) {
            match effect {
                ItemEffect::Formation {
                    kind,
                    power,
                    duration,
                    cooldown,
                } => {
                    if self.set_formation(kind, power, duration, cooldown, false) {
                        ctx.log.log(
                            LogTopic::Combat,
                            format!("You plant the {} and a {} formation rises.", name, kind.name()),
                        );
                    } else {
                        ctx.log.log(LogTopic::Combat, format!("The {} fizzles.", name));
                    }
                }
                ItemEffect::Restore { .. } => {
                    ctx.log.log(LogTopic::Combat, format!("You use a {}.", name));
                }
            }
        }
    }

    fn player_pass(&mut self, ctx: &mut BattleContext<'_>) {
        let haste = self
            .player_status(StatusEffectKind::Haste)
            .map(|e| e.power.max(0.0).floor() as u32)
            .unwrap_or(0);

        for index in 0..self.techniques.len() {
            if self.current_enemy.is_none() {
                break;
            }
            let technique = &mut self.techniques[index];
            if !technique.is_active() {
                continue;
            }
            technique.ticks = (technique.ticks + 1 + haste).min(technique.ticks_required);
            if technique.ticks < technique.ticks_required {
                continue;
            }
            technique.ticks = 0;

            let technique = technique.clone();
            if !pay_costs(&technique, ctx.character) {
                ctx.log.log(
                    LogTopic::Combat,
                    format!("You lack the strength to use {}.", technique.name),
                );
                continue;
            }
            self.you_attack(&technique, ctx);
        }
    }

    /// One round of enemy technique accumulation. Each enemy lands at most
    /// one attack per round even if several techniques come due.
    fn enemy_pass(&mut self, ctx: &mut BattleContext<'_>) {
        for enemy_index in 0..self.enemies.len() {
            if ctx.character.status.health.value <= 0.0 {
                break;
            }
            let enemy = &mut self.enemies[enemy_index];
            if !enemy.is_alive() {
                continue;
            }
            let mut fired = None;
            for (technique_index, technique) in enemy.techniques.iter_mut().enumerate() {
                if !technique.is_active() {
                    continue;
                }
                technique.ticks = (technique.ticks + 1).min(technique.ticks_required);
                if fired.is_none() && technique.ticks >= technique.ticks_required {
                    technique.ticks = 0;
                    fired = Some(technique_index);
                }
            }
            if let Some(technique_index) = fired {
                self.enemy_attack(enemy_index, technique_index, ctx);
            }
        }
    }

    fn develop_family_technique(&mut self, ctx: &mut BattleContext<'_>) {
        let count = self.family_technique_count();
        if count >= self.max_family_techniques {
            return;
        }
        self.family_technique_progress += 1.0;
        if self.family_technique_progress <= family_technique_threshold(count) {
            return;
        }
        self.family_technique_progress = 0.0;
        let technique = generate_family_technique(count, &mut *ctx.rng);
        tracing::info!(technique = %technique.name, "family technique developed");
        ctx.log.log(
            LogTopic::Story,
            format!(
                "Countless battles have taught you something new. Your family will remember the {}.",
                technique.name
            ),
        );
        self.techniques.push(technique);
    }

    // ── Attacks ───────────────────────────────────────────────────────

    /// Damage `technique` would deal to `enemy`. Pure.
    pub fn attack_damage(&self, technique: &Technique, enemy: &Enemy, character: &Character) -> f64 {
        let mut damage =
            character.attack_power(technique.scaling_attribute()) * technique.base_damage;
        if character.is_well_fed() {
            damage *= WELL_FED_DAMAGE_MULTIPLIER;
        }
        damage *= technique.extra_multiplier;
        match technique.name.as_str() {
            METAL_FIST => damage *= lore_multiplier(character.attribute(AttributeType::MetalLore)),
            PYROCLASM => damage *= lore_multiplier(character.attribute(AttributeType::FireLore)),
            _ => {}
        }

        let mut defense = enemy.defense;
        match technique.effect {
            Some(TechniqueEffect::Element(element)) => {
                damage *= element_multiplier(Some(element), enemy.element);
            }
            Some(TechniqueEffect::Corruption) => damage *= CORRUPTION_DAMAGE_MULTIPLIER,
            Some(TechniqueEffect::Piercing) => defense /= PIERCING_DEFENSE_DIVISOR,
            Some(TechniqueEffect::Poison)
            | Some(TechniqueEffect::LifeSteal)
            | Some(TechniqueEffect::Shield)
            | Some(TechniqueEffect::Haste)
            | None => {}
        }

        damage *= 1.0 + self.formation.power_of(FormationKind::Power);
        damage += damage * character.yin_yang_balance();
        player_damage_after_defense(damage, defense)
    }

    /// Resolves one player technique against the current enemy.
    pub fn you_attack(&mut self, technique: &Technique, ctx: &mut BattleContext<'_>) {
        let Some(index) = self.current_enemy else {
            return;
        };
        let Some(enemy) = self.enemies.get(index) else {
            self.current_enemy = None;
            return;
        };
        let damage = self.attack_damage(technique, enemy, ctx.character);

        match technique.effect {
            Some(TechniqueEffect::Poison) => {
                let enemy = &mut self.enemies[index];
                if !enemy.is_immune(StatusEffectKind::Poison) {
                    add_status_effect(
                        &mut enemy.status_effects,
                        StatusEffect::new(
                            StatusEffectKind::Poison,
                            damage * POISON_POWER_FRACTION,
                            POISON_TICKS,
                        ),
                    );
                }
            }
            Some(TechniqueEffect::LifeSteal) => {
                ctx.character.status.health.value += damage * LIFE_STEAL_FRACTION;
            }
            Some(TechniqueEffect::Shield) => add_status_effect(
                &mut self.status_effects,
                StatusEffect::new(StatusEffectKind::Shield, SHIELD_POWER, SHIELD_TICKS),
            ),
            Some(TechniqueEffect::Haste) => add_status_effect(
                &mut self.status_effects,
                StatusEffect::new(StatusEffectKind::Haste, HASTE_POWER, HASTE_TICKS),
            ),
            Some(TechniqueEffect::Element(_))
            | Some(TechniqueEffect::Corruption)
            | Some(TechniqueEffect::Piercing)
            | None => {}
        }

        let mut overage = self.damage_enemy(damage, ctx);
        while technique.blow_through && overage > 0.0 && self.current_enemy.is_some() {
            ctx.log.log(
                LogTopic::Combat,
                format!("Your {} carries on into the next foe.", technique.name),
            );
            overage = self.damage_enemy(overage, ctx);
        }
    }

    /// Damages the current enemy. On a lethal hit the enemy is killed and
    /// half the excess is returned for blow-through; otherwise 0.
    pub fn damage_enemy(&mut self, amount: f64, ctx: &mut BattleContext<'_>) -> f64 {
        let Some(enemy) = self.current_enemy.and_then(|i| self.enemies.get_mut(i)) else {
            return 0.0;
        };
        if amount >= enemy.health {
            let overage = (amount - enemy.health) / 2.0;
            enemy.health = 0.0;
            self.kill_current_enemy(ctx);
            return overage;
        }
        enemy.health -= amount;
        ctx.log.log(
            LogTopic::Combat,
            format!(
                "You hit the {} for {:.1} damage ({:.1} left).",
                enemy.name, amount, enemy.health
            ),
        );
        0.0
    }

    /// Resolves one enemy technique against the player.
    pub fn enemy_attack(
        &mut self,
        enemy_index: usize,
        technique_index: usize,
        ctx: &mut BattleContext<'_>,
    ) {
        let Some(enemy) = self.enemies.get(enemy_index) else {
            return;
        };
        let Some(technique) = enemy.techniques.get(technique_index) else {
            return;
        };
        let enemy_name = enemy.name.clone();
        let technique_name = technique.name.clone();
        let poisons = technique.effect == Some(TechniqueEffect::Poison);

        let mut damage = technique.base_damage;
        damage -= damage * ctx.character.yin_yang_balance();

        if self.player_status(StatusEffectKind::Protection).is_some() {
            ctx.log.log(
                LogTopic::Combat,
                format!("Your protection turns aside the {}'s {}.", enemy_name, technique_name),
            );
            return;
        }
        if let Some(shield) = self.player_status(StatusEffectKind::Shield) {
            damage *= 1.0 - shield.power.clamp(0.0, 1.0);
        }
        damage /= 1.0 + self.formation.power_of(FormationKind::Bulwark);

        if let Some(reflect) = self.player_status(StatusEffectKind::Reflect) {
            let reflected = damage * reflect.power;
            self.enemies[enemy_index].health -= reflected;
            ctx.log.log(
                LogTopic::Combat,
                format!("{:.1} damage is reflected back at the {}.", reflected, enemy_name),
            );
        }

        damage = enemy_damage_after_defense(damage, ctx.character.defense);
        damage /= ctx.character.justice_divisor();
        ctx.character.status.health.value -= damage;
        ctx.log.injury(
            LogTopic::Combat,
            format!(
                "The {} hits you with {} for {:.1} damage.",
                enemy_name, technique_name, damage
            ),
        );

        if poisons {
            let power = self.enemies[enemy_index].techniques[technique_index].base_damage
                * POISON_POWER_FRACTION;
            add_status_effect(
                &mut self.status_effects,
                StatusEffect::new(StatusEffectKind::Poison, power, POISON_TICKS),
            );
        }
    }

    // ── Resolution ────────────────────────────────────────────────────

    pub fn kill_current_enemy(&mut self, ctx: &mut BattleContext<'_>) -> Option<KillReport> {
        let index = self.current_enemy?;
        self.kill_enemy(index, ctx)
    }

    fn kill_enemy(&mut self, index: usize, ctx: &mut BattleContext<'_>) -> Option<KillReport> {
        if index >= self.enemies.len() {
            self.current_enemy = None;
            return None;
        }
        let enemy = self.enemies.remove(index);
        self.current_enemy = match self.current_enemy {
            Some(current) if current == index => {
                if self.enemies.is_empty() {
                    None
                } else {
                    Some(0)
                }
            }
            Some(current) if current > index => Some(current - 1),
            other => other,
        };

        self.total_kills += 1;
        *self
            .kills_by_location
            .entry(ctx.character.location)
            .or_insert(0) += 1;
        *self
            .kills_by_monster
            .entry(enemy.base_name.clone())
            .or_insert(0) += 1;
        ctx.log
            .log(LogTopic::Combat, format!("You defeat the {}!", enemy.name));

        let greed = self.formation.power_of(FormationKind::Greed);
        let mut loot = Vec::with_capacity(enemy.loot.len());
        for drop in &enemy.loot {
            let item = ctx
                .items
                .get_item_by_id(&drop.item.id)
                .cloned()
                .unwrap_or_else(|| drop.item.clone());
            let quantity = if greed > 0.0 {
                (drop.quantity as f64 * (1.0 + greed)).ceil() as u32
            } else {
                drop.quantity
            };
            ctx.inventory.add_item(&item, quantity);
            ctx.log.log(
                LogTopic::Combat,
                format!("You gain {} {}.", quantity, item.name),
            );
            loot.push((item.id, quantity));
        }

        let mut report = KillReport {
            name: enemy.name.clone(),
            loot,
            hell_money: 0.0,
            respawned: 0,
        };
        match enemy.defeat_effect {
            Some(DefeatEffect::RespawnDouble) => {
                for _ in 0..2 {
                    self.add_enemy(enemy.fresh_copy(), ctx.log);
                }
                report.respawned = 2;
            }
            Some(DefeatEffect::HellMoney(amount)) => {
                ctx.character.update_hell_money(amount);
                report.hell_money = amount;
            }
            None => {}
        }

        if self.enemies.is_empty() {
            ctx.inventory.reset_pouch_cooldowns();
        }
        Some(report)
    }

    fn sweep_dead_enemies(&mut self, ctx: &mut BattleContext<'_>) {
        for index in (0..self.enemies.len()).rev() {
            if index < self.enemies.len() && !self.enemies[index].is_alive() {
                self.kill_enemy(index, ctx);
            }
        }
    }

    /// Runs from the encounter. The enemies get three free rounds first, and
    /// the youngest follower loses faith.
    pub fn flee(&mut self, ctx: &mut BattleContext<'_>) {
        if !self.is_engaged() {
            return;
        }
        for _ in 0..FLEE_PENALTY_PASSES {
            self.enemy_pass(ctx);
        }
        ctx.character.check_overage();
        self.clear_enemies();
        self.times_fled += 1;
        ctx.log.log(LogTopic::Combat, "You flee from the fight.");
        ctx.followers.dismiss_youngest(ctx.log);
        ctx.character.check_for_death();
    }

    // ── Lifecycle ─────────────────────────────────────────────────────

    /// Only family techniques survive into the next life.
    pub fn reincarnate(&mut self) {
        self.techniques.retain(|t| t.family_technique);
        if !self.techniques.iter().any(|t| t.name == BASIC_STRIKE) {
            self.techniques.insert(0, Technique::basic_strike());
        }
        for technique in self.techniques.iter_mut() {
            technique.ticks = 0;
        }
        self.clear_enemies();
        self.status_effects.clear();
        self.formation.clear();
        self.kills_by_location.clear();
        self.kills_by_monster.clear();
    }

    pub fn properties(&self) -> BattleProperties {
        BattleProperties {
            enemies: self.enemies.clone(),
            current_enemy: self.current_enemy,
            techniques: self.techniques.clone(),
            status_effects: self.status_effects.clone(),
            formation: self.formation.clone(),
            total_kills: self.total_kills,
            kills_by_location: self.kills_by_location.clone(),
            kills_by_monster: self.kills_by_monster.clone(),
            times_fled: self.times_fled,
            family_technique_progress: self.family_technique_progress,
        }
    }

    pub fn set_properties(&mut self, properties: BattleProperties) {
        self.enemies = properties.enemies;
        self.current_enemy = match properties.current_enemy {
            Some(index) if index < self.enemies.len() => Some(index),
            _ if self.enemies.is_empty() => None,
            _ => Some(0),
        };
        self.techniques = if properties.techniques.is_empty() {
            vec![Technique::basic_strike()]
        } else {
            properties.techniques
        };
        self.status_effects = properties.status_effects;
        self.formation = properties.formation;
        self.total_kills = properties.total_kills;
        self.kills_by_location = properties.kills_by_location;
        self.kills_by_monster = properties.kills_by_monster;
        self.times_fled = properties.times_fled;
        self.family_technique_progress = properties.family_technique_progress;
    }
}

/// Counts every effect down by one tick, removing the expired ones. Poison
/// deals its damage before the countdown; the total is returned.
fn age_effects(effects: &mut Vec<StatusEffect>) -> f64 {
    let mut poison = 0.0;
    for index in (0..effects.len()).rev() {
        let effect = &mut effects[index];
        if effect.kind == StatusEffectKind::Poison {
            poison += effect.power;
        }
        effect.ticks_left -= 1;
        if effect.ticks_left <= 0 {
            effects.remove(index);
        }
    }
    poison
}

fn pay_costs(technique: &Technique, character: &mut Character) -> bool {
    let status = &mut character.status;
    if status.qi.value < technique.qi_cost
        || status.stamina.value < technique.stamina_cost
        || status.health.value <= technique.health_cost
    {
        return false;
    }
    status.qi.value -= technique.qi_cost;
    status.stamina.value -= technique.stamina_cost;
    status.health.value -= technique.health_cost;
    true
}
