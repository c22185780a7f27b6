//! Procedural family techniques, earned through sustained fighting and
//! carried into every later life.

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use super::types::{Element, Technique, TechniqueEffect};
use crate::character::attributes::AttributeType;
use crate::core::constants::FAMILY_TECHNIQUE_BONUS_EFFECT_CHANCE;

const PREFIXES: [&str; 10] = [
    "Ancestral",
    "Heavenly",
    "Whispering",
    "Thundering",
    "Jade",
    "Crimson",
    "Silent",
    "Dragon",
    "Iron Lotus",
    "Nine Mountains",
];

/// Attributes a family technique may scale with, and the noun it takes.
const ATTRIBUTE_NOUNS: [(AttributeType, &str); 8] = [
    (AttributeType::Strength, "Fist"),
    (AttributeType::Speed, "Step"),
    (AttributeType::Toughness, "Shoulder"),
    (AttributeType::Spirituality, "Spirit Wave"),
    (AttributeType::CombatMastery, "Palm"),
    (AttributeType::FireLore, "Flame"),
    (AttributeType::WaterLore, "Tide"),
    (AttributeType::MetalLore, "Blade"),
];

const BONUS_EFFECTS: [TechniqueEffect; 5] = [
    TechniqueEffect::Piercing,
    TechniqueEffect::Poison,
    TechniqueEffect::LifeSteal,
    TechniqueEffect::Shield,
    TechniqueEffect::Haste,
];

/// Generates the `family_count + 1`-th family technique.
///
/// Lore-scaled techniques always carry their element. Others roll for a
/// bonus effect.
pub fn generate_family_technique(family_count: u32, rng: &mut dyn RngCore) -> Technique {
    let prefix = PREFIXES[rng.gen_range(0..PREFIXES.len())];
    let (attribute, noun) = ATTRIBUTE_NOUNS[rng.gen_range(0..ATTRIBUTE_NOUNS.len())];

    let effect = match attribute {
        AttributeType::FireLore => Some(TechniqueEffect::Element(Element::Fire)),
        AttributeType::WaterLore => Some(TechniqueEffect::Element(Element::Water)),
        AttributeType::MetalLore => Some(TechniqueEffect::Element(Element::Metal)),
        _ if rng.gen_bool(FAMILY_TECHNIQUE_BONUS_EFFECT_CHANCE) => {
            BONUS_EFFECTS.choose(rng).copied()
        }
        _ => None,
    };

    Technique {
        name: format!("{} {}", prefix, noun),
        ticks_required: rng.gen_range(8..=15),
        base_damage: 2.0 + family_count as f64,
        attribute: Some(attribute),
        stamina_cost: 1.0 + family_count as f64,
        effect,
        family_technique: true,
        ..Technique::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_generated_techniques_are_family_and_usable() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for count in 0..50 {
            let technique = generate_family_technique(count % 3, &mut rng);
            assert!(technique.family_technique);
            assert!(technique.is_active());
            assert!((8..=15).contains(&technique.ticks_required));
            assert_eq!(technique.ticks, 0);
            assert!(technique.attribute.is_some());
        }
    }

    #[test]
    fn test_lore_techniques_carry_their_element() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..100 {
            let technique = generate_family_technique(0, &mut rng);
            if technique.attribute == Some(AttributeType::FireLore) {
                assert_eq!(
                    technique.effect,
                    Some(TechniqueEffect::Element(Element::Fire))
                );
            }
        }
    }

    #[test]
    fn test_same_seed_same_technique() {
        let a = generate_family_technique(1, &mut ChaCha8Rng::seed_from_u64(3));
        let b = generate_family_technique(1, &mut ChaCha8Rng::seed_from_u64(3));
        assert_eq!(a, b);
    }
}
