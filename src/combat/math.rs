//! Pure damage formulas.
//!
//! The defense curves are tuned balance values. Player and enemy curves are
//! deliberately asymmetric.

use super::types::Element;
use crate::core::constants::*;

/// Elemental modifier of an attack element against a defender element.
pub fn element_multiplier(attack: Option<Element>, defend: Option<Element>) -> f64 {
    match (attack, defend) {
        (Some(a), Some(d)) if a.overcomes(d) => ELEMENT_ADVANTAGE_MULTIPLIER,
        (Some(a), Some(d)) if d.overcomes(a) => 1.0 / ELEMENT_ADVANTAGE_MULTIPLIER,
        _ => 1.0,
    }
}

/// Applies enemy defense to a player hit, floored at pity damage.
pub fn player_damage_after_defense(damage: f64, defense: f64) -> f64 {
    let mut damage = damage;
    if defense >= 1.0 {
        damage /= defense.powf(PLAYER_ATTACK_DEFENSE_EXPONENT)
            + PLAYER_ATTACK_DEFENSE_BASE.powf((defense - damage) / defense);
    }
    damage.max(PITY_DAMAGE)
}

/// Applies player defense to an enemy hit. Never negative.
pub fn enemy_damage_after_defense(damage: f64, defense: f64) -> f64 {
    let mut damage = damage;
    if defense >= 1.0 {
        damage /= defense.powf(ENEMY_ATTACK_DEFENSE_EXPONENT)
            + ENEMY_ATTACK_DEFENSE_BASE.powf((defense - damage) / defense);
    }
    damage.max(0.0)
}

/// Logarithmic bonus from a lore attribute, used by the named lore techniques.
pub fn lore_multiplier(lore: f64) -> f64 {
    if lore <= 0.0 {
        return LORE_MULTIPLIER_MIN;
    }
    (1.0 + lore.ln() / 10.0).clamp(LORE_MULTIPLIER_MIN, LORE_MULTIPLIER_MAX)
}

/// Battle ticks of development needed for the next family technique.
pub fn family_technique_threshold(family_count: u32) -> f64 {
    FAMILY_TECHNIQUE_BASE_THRESHOLD * 10f64.powi(family_count as i32)
}

/// Quality tier for the next monster at a location, clamped to the table.
pub fn quality_index(kills_at_location: u64, table_len: usize) -> usize {
    let index = ((kills_at_location + 1) / KILLS_TO_NEXT_QUALITY_RANK) as usize;
    index.min(table_len.saturating_sub(1))
}

pub fn modified_base_power(base_power: f64, kills_at_location: u64) -> f64 {
    base_power * (kills_at_location + 1) as f64 / KILLS_TO_NEXT_QUALITY_RANK as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_multiplier() {
        assert_eq!(element_multiplier(Some(Element::Fire), Some(Element::Wood)), 2.0);
        assert_eq!(element_multiplier(Some(Element::Wood), Some(Element::Fire)), 0.5);
        assert_eq!(element_multiplier(Some(Element::Fire), None), 1.0);
        assert_eq!(element_multiplier(None, Some(Element::Fire)), 1.0);
        assert_eq!(element_multiplier(Some(Element::Fire), Some(Element::Fire)), 1.0);
    }

    #[test]
    fn test_player_curve_skipped_below_one_defense() {
        assert_eq!(player_damage_after_defense(5.0, 0.0), 5.0);
        assert_eq!(player_damage_after_defense(5.0, 0.99), 5.0);
        assert_eq!(player_damage_after_defense(0.2, 0.0), PITY_DAMAGE);
    }

    #[test]
    fn test_player_curve_at_equal_damage_and_defense() {
        // exponent term is 20000^0 = 1
        let damage = player_damage_after_defense(100.0, 100.0);
        let expected = 100.0 / (100f64.powf(0.2) + 1.0);
        assert!((damage - expected).abs() < 1e-9);
    }

    #[test]
    fn test_player_curve_crushes_weak_hits_to_pity() {
        assert_eq!(player_damage_after_defense(10.0, 1_000.0), PITY_DAMAGE);
    }

    #[test]
    fn test_enemy_curve_has_no_pity_floor() {
        let damage = enemy_damage_after_defense(1.0, 1_000.0);
        assert!(damage < 0.01);
        assert!(damage >= 0.0);
        assert_eq!(enemy_damage_after_defense(7.0, 0.5), 7.0);
    }

    #[test]
    fn test_lore_multiplier_is_clamped() {
        assert_eq!(lore_multiplier(0.0), 1.0);
        assert_eq!(lore_multiplier(0.5), 1.0);
        assert!((lore_multiplier(std::f64::consts::E.powi(10)) - 2.0).abs() < 1e-9);
        assert_eq!(lore_multiplier(1e300), LORE_MULTIPLIER_MAX);
    }

    #[test]
    fn test_family_threshold_grows_tenfold() {
        assert_eq!(family_technique_threshold(0), 20_000.0);
        assert_eq!(family_technique_threshold(2), 2_000_000.0);
    }

    #[test]
    fn test_quality_and_power_scaling() {
        assert_eq!(quality_index(0, 5), 0);
        assert_eq!(quality_index(9, 5), 1);
        assert_eq!(quality_index(10_000, 5), 4);
        assert_eq!(quality_index(10_000, 0), 0);
        assert!((modified_base_power(10.0, 9) - 10.0).abs() < 1e-12);
        assert!((modified_base_power(10.0, 0) - 1.0).abs() < 1e-12);
    }
}
