//! Integration tests for the wired world: trouble and combat driven by the
//! clock, hell realms, followers, farming, homes and rebirth.

use ascension::character::{AttributeType, Location};
use ascension::combat::{Enemy, Technique};
use ascension::core::constants::*;
use ascension::farm::Crop;
use ascension::followers::FollowerJob;
use ascension::hell::HellRealm;
use ascension::{Game, GameConfig};

fn game(seed: u64) -> Game {
    let mut game = Game::new(GameConfig::seeded(seed)).unwrap();
    let rice = game.world.items.get_item_by_id("rice").cloned().unwrap();
    game.world.inventory.add_item(&rice, 500);
    game
}

/// A character that one-shots anything mortal and shrugs off most hits.
fn make_strong(game: &mut Game) {
    let character = &mut game.world.character;
    character.attributes.set(AttributeType::Strength, 1e14);
    character.attributes.set(AttributeType::Toughness, 1e8);
    character.recalculate_derived_stats();
}

#[test]
fn test_forest_trouble_is_fought_every_day() {
    let mut game = game(21);
    make_strong(&mut game);
    game.world.travel(Location::Forest);

    game.run_days(30);

    let battle = &game.world.battle;
    assert!(battle.total_kills >= 20, "only {} kills", battle.total_kills);
    assert_eq!(
        battle.kills_by_location.get(&Location::Forest).copied(),
        Some(battle.total_kills)
    );
    assert!(game.world.log.contains("You defeat"));
    assert_eq!(game.world.character.lives, 0);
    // kills are tallied per kind, whatever the quality tier
    assert!(battle
        .kills_by_monster
        .keys()
        .all(|name| name == "Wolf" || name == "Boar"));
    assert_eq!(battle.kills_by_monster.values().sum::<u64>(), battle.total_kills);
}

#[test]
fn test_safe_town_has_no_trouble() {
    let mut game = game(22);
    game.run_days(30);
    assert_eq!(game.world.battle.total_kills, 0);
    assert!(!game.world.battle.is_engaged());
}

#[test]
fn test_hell_replaces_trouble_with_demons() {
    let mut game = game(23);
    make_strong(&mut game);
    game.world.travel(Location::Forest);
    game.world.enter_hell(HellRealm::MountainOfKnives);

    game.run_days(5);

    let battle = &game.world.battle;
    assert!(battle.kills_by_monster.get("Knife Demon").copied().unwrap_or(0) >= 1);
    assert!(!battle.kills_by_monster.contains_key("Wolf"));
    assert!(!battle.kills_by_monster.contains_key("Boar"));
    assert!(game.world.character.hell_money >= 1.0);
    assert!(game.world.hell.demons_summoned >= 2);

    game.world.exit_hell();
    assert!(!game.world.hell.overrides_trouble());
}

#[test]
fn test_flee_costs_three_hits_and_a_follower() {
    let mut game = game(24);
    game.world.character.money = 100.0;
    assert!(game.world.hire(FollowerJob::Hunter));
    let bandit = Enemy::new("Bandit", 1_000.0, 0.0).with_technique(Technique::new("Slash", 1, 5.0));
    game.world.battle.add_enemy(bandit, &mut game.world.log);

    game.world.flee();

    assert_eq!(game.world.character.status.health.value, BASE_HEALTH - 15.0);
    assert_eq!(game.world.battle.times_fled, 1);
    assert!(!game.world.battle.is_engaged());
    assert!(game.world.followers.is_empty());
}

#[test]
fn test_followers_draw_wages_daily() {
    let mut game = game(25);
    game.world.character.money = 100.0;
    assert!(game.world.hire(FollowerJob::Hunter));

    game.run_days(10);

    assert_eq!(game.world.followers.len(), 1);
    assert_eq!(game.world.character.money, 90.0);
}

#[test]
fn test_farm_harvests_into_inventory() {
    let mut game = game(26);
    assert!(game.world.plow(Crop::Rice));

    game.run_days(Crop::Rice.days_to_grow() as u64);

    assert_eq!(game.world.farm.total_harvested, Crop::Rice.yield_per_harvest() as u64);
    assert!(game.world.log.contains("harvest"));
}

#[test]
fn test_home_upgrade_improves_recovery() {
    let mut game = game(27);
    game.world.character.money = 60.0;

    assert!(game.world.upgrade_home());

    assert_eq!(game.world.home.current().name, "Tent");
    assert_eq!(game.world.character.money, 10.0);
    assert_eq!(game.world.character.status.health.tick_recovery, 2.0);
}

#[test]
fn test_long_tick_recalculates_derived_stats() {
    let mut game = game(28);
    game.world
        .character
        .set_attack_power(AttributeType::Strength, 99.0);

    for _ in 0..LONG_TICK_INTERVAL {
        game.tick();
    }

    assert_eq!(game.world.character.attack_power(AttributeType::Strength), 1.0);
}

#[test]
fn test_old_age_leads_to_rebirth() {
    let mut game = game(29);
    game.world.character.attributes.set(AttributeType::Toughness, 50.0);
    game.world.character.age = game.world.character.lifespan - 1;

    game.run_days(1);

    let character = &game.world.character;
    assert_eq!(character.lives, 1);
    assert!(!character.dead);
    assert_eq!(character.age, STARTING_AGE_DAYS);
    // 50 toughness grows aptitude by 5, which buys a longer life
    assert!(character.lifespan > BASE_LIFESPAN_DAYS);
    assert_eq!(character.location, Location::SmallTown);
    assert!(game.world.log.contains("reborn"));
}
