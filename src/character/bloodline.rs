use super::attributes::{AttributeType, Attributes};
use super::ledger::{starting_status, Character};
use super::location::Location;
use crate::core::constants::*;
use crate::log::{LogService, LogTopic};

/// What a bloodline rank carries from one life into the next.
#[derive(Debug, Clone, PartialEq)]
pub struct BloodlineTier {
    pub rank: u32,
    pub name: &'static str,
    /// Fraction of money inherited by the next life.
    pub money_kept: f64,
    /// Fraction of each attribute value inherited by the next life.
    pub attributes_kept: f64,
    pub keeps_hell_money: bool,
}

fn bloodline_name(rank: u32) -> &'static str {
    match rank {
        0 => "Commoner",
        1 => "Minor Family",
        2 => "Noble House",
        3 => "Ancient Clan",
        _ => "Heavenly Lineage",
    }
}

/// Gets the bloodline tier for a given rank.
///
/// Rank 1 passes down a share of the family fortune, rank 2 adds a share of
/// trained attributes, and rank 3 and above also keep hell money.
pub fn get_bloodline_tier(rank: u32) -> BloodlineTier {
    BloodlineTier {
        rank,
        name: bloodline_name(rank),
        money_kept: if rank >= 1 { BLOODLINE_MONEY_KEPT } else { 0.0 },
        attributes_kept: if rank >= 2 {
            BLOODLINE_ATTRIBUTE_KEPT
        } else {
            0.0
        },
        keeps_hell_money: rank >= 3,
    }
}

/// Starts the character's next life.
///
/// Every attribute grows its aptitude by `value / APTITUDE_GAIN_DIVISOR`
/// before values reset; the bloodline tier then decides how much of the old
/// life survives.
pub fn perform_reincarnation(character: &mut Character, log: &mut LogService) {
    let tier = get_bloodline_tier(character.bloodline_rank);
    let old = character.attributes.clone();

    let mut attributes = Attributes::new();
    for attr in AttributeType::all() {
        let previous = old.get(attr);
        let next = attributes.get_mut(attr);
        next.aptitude = previous.aptitude + previous.value.max(0.0) / APTITUDE_GAIN_DIVISOR;
        next.value = STARTING_ATTRIBUTE_VALUE + previous.value.max(0.0) * tier.attributes_kept;
    }
    character.attributes = attributes;

    character.money = (character.money.max(0.0) * tier.money_kept).floor();
    if !tier.keeps_hell_money {
        character.hell_money = 0.0;
    }

    character.status = starting_status();
    character.age = STARTING_AGE_DAYS;
    character.lifespan = character.lifespan_for_aptitude();
    character.dead = false;
    character.yin = 0.0;
    character.yang = 0.0;
    character.location = Location::SmallTown;
    character.lives += 1;
    character.recalculate_derived_stats();

    tracing::info!(
        lives = character.lives,
        bloodline = tier.name,
        "character reincarnated"
    );
    log.log(
        LogTopic::Story,
        format!(
            "You are reborn into the {} bloodline. This is life number {}.",
            tier.name,
            character.lives + 1
        ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_are_cumulative() {
        let commoner = get_bloodline_tier(0);
        assert_eq!(commoner.money_kept, 0.0);
        assert_eq!(commoner.attributes_kept, 0.0);
        assert!(!commoner.keeps_hell_money);

        let noble = get_bloodline_tier(2);
        assert!(noble.money_kept > 0.0);
        assert!(noble.attributes_kept > 0.0);
        assert!(!noble.keeps_hell_money);

        assert!(get_bloodline_tier(7).keeps_hell_money);
        assert_eq!(get_bloodline_tier(7).name, "Heavenly Lineage");
    }

    #[test]
    fn test_reincarnation_grows_aptitude_and_resets_values() {
        let mut character = Character::new();
        let mut log = LogService::default();
        character.attributes.set(AttributeType::Strength, 51.0);
        character.money = 500.0;
        character.hell_money = 20.0;
        character.dead = true;
        character.status.health.value = 0.0;

        perform_reincarnation(&mut character, &mut log);

        let strength = character.attributes.get(AttributeType::Strength);
        assert!((strength.aptitude - 6.1).abs() < 1e-9);
        assert_eq!(strength.value, STARTING_ATTRIBUTE_VALUE);
        assert_eq!(character.money, 0.0, "commoners keep nothing");
        assert_eq!(character.hell_money, 0.0);
        assert!(!character.dead);
        assert_eq!(character.status.health.value, BASE_HEALTH);
        assert_eq!(character.age, STARTING_AGE_DAYS);
        assert_eq!(character.lives, 1);
        assert!(log.contains("reborn"));
    }

    #[test]
    fn test_bloodline_keeps_money_and_attributes() {
        let mut character = Character::new();
        let mut log = LogService::default();
        character.bloodline_rank = 3;
        character.attributes.set(AttributeType::Toughness, 101.0);
        character.money = 1_000.0;
        character.hell_money = 40.0;

        perform_reincarnation(&mut character, &mut log);

        assert_eq!(character.money, 100.0);
        assert_eq!(character.hell_money, 40.0);
        let toughness = character.attributes.get(AttributeType::Toughness);
        assert!((toughness.value - (1.0 + 10.1)).abs() < 1e-9);
        assert!(
            character.lifespan > BASE_LIFESPAN_DAYS,
            "toughness aptitude extends the next lifespan"
        );
    }
}
