//! Integration tests for the scheduler: event ordering, pausing, offline
//! catch-up, and the composition root's reaction to subsystem requests.
//!
//! All games are seeded so runs are replayable.

use std::cell::RefCell;
use std::rc::Rc;

use ascension::character::Location;
use ascension::core::constants::*;
use ascension::core::events::{ClockEvent, EventKind};
use ascension::core::game::{Game, GameError, World};
use ascension::home::{HomeDefinition, HomeError};
use ascension::GameConfig;

/// A seeded game whose character will not starve for a good while.
fn fed_game(seed: u64) -> Game {
    let mut game = Game::new(GameConfig::seeded(seed)).unwrap();
    let rice = game.world.items.get_item_by_id("rice").cloned().unwrap();
    game.world.inventory.add_item(&rice, 1_000);
    game
}

fn spy(game: &mut Game) -> Rc<RefCell<Vec<ClockEvent>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    for kind in [
        EventKind::BattleTick,
        EventKind::DayTick,
        EventKind::YearTick,
        EventKind::LongTick,
        EventKind::Reincarnate,
    ] {
        let sink = Rc::clone(&seen);
        game.subscribe(kind, move |event: &ClockEvent, _: &mut World| {
            sink.borrow_mut().push(*event);
        });
    }
    seen
}

#[test]
fn test_events_arrive_in_order_across_day_and_year_boundaries() {
    let mut game = fed_game(1);
    let seen = spy(&mut game);
    let ticks_per_year = BATTLE_TICKS_PER_DAY * DAYS_PER_YEAR as u64;

    for _ in 0..ticks_per_year {
        game.tick();
    }

    assert_eq!(game.world.character.lives, 0, "the character must survive the year");
    let seen = seen.borrow();

    // the tick that closes the first day
    let day_one = seen
        .iter()
        .position(|e| *e == ClockEvent::DayTick { day: 1 })
        .unwrap();
    assert_eq!(
        seen[day_one - 1],
        ClockEvent::BattleTick {
            tick: BATTLE_TICKS_PER_DAY
        }
    );

    // the tick that closes the year fires everything, in order
    let tail = &seen[seen.len() - 4..];
    assert_eq!(
        tail,
        &[
            ClockEvent::BattleTick {
                tick: ticks_per_year
            },
            ClockEvent::DayTick {
                day: DAYS_PER_YEAR as u64
            },
            ClockEvent::YearTick { days: DAYS_PER_YEAR },
            ClockEvent::LongTick,
        ]
    );

    let days = seen
        .iter()
        .filter(|e| matches!(e, ClockEvent::DayTick { .. }))
        .count();
    assert_eq!(days, DAYS_PER_YEAR as usize);
}

#[test]
fn test_subscribers_run_in_registration_order() {
    let mut game = fed_game(2);
    let order = Rc::new(RefCell::new(Vec::new()));
    for label in ["first", "second", "third"] {
        let sink = Rc::clone(&order);
        game.subscribe(EventKind::BattleTick, move |_: &ClockEvent, _: &mut World| {
            sink.borrow_mut().push(label);
        });
    }

    game.tick();

    assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
}

#[test]
fn test_handlers_can_mutate_the_world() {
    let mut game = fed_game(3);
    game.subscribe(EventKind::DayTick, |_: &ClockEvent, world: &mut World| {
        world.character.update_money(1.0, false);
    });

    game.run_days(5);

    assert_eq!(game.world.character.money, 5.0);
}

#[test]
fn test_reincarnate_is_dispatched() {
    let mut game = fed_game(4);
    let seen = spy(&mut game);
    game.world.character.money = 500.0;
    game.world.character.bloodline_rank = 1;

    let event = game.reincarnate();

    assert_eq!(event, ClockEvent::Reincarnate);
    assert_eq!(*seen.borrow(), vec![ClockEvent::Reincarnate]);
    assert_eq!(game.world.character.lives, 1);
    assert_eq!(game.world.character.money, 50.0);
    assert!(game.world.inventory.stacks.is_empty());
}

#[test]
fn test_catch_up_matches_live_play() {
    let mut live = fed_game(11);
    let mut away = fed_game(11);
    live.world.travel(Location::Forest);
    away.world.travel(Location::Forest);

    away.catch_up(1_000_000);
    // 2_000 ticks: 2_000 * 10 efficiency * 500 ms per tick
    let report = away.catch_up(1_000_000 + 10_000_000);
    for _ in 0..2_000 {
        live.tick();
    }

    assert_eq!(report.ticks_replayed, 2_000);
    assert_eq!(away.clock.elapsed_ticks, live.clock.elapsed_ticks);
    assert_eq!(away.world.battle.properties(), live.world.battle.properties());
    assert_eq!(away.world.character.status, live.world.character.status);
    assert_eq!(away.world.character.money, live.world.character.money);
    assert_eq!(
        away.world.inventory.count("rice"),
        live.world.inventory.count("rice")
    );
    assert_eq!(away.world.log.len(), live.world.log.len());
}

#[test]
fn test_live_play_is_not_replayed_by_catch_up() {
    let mut game = fed_game(12);
    let t0 = 1_000_000;
    game.catch_up(t0);

    // 2_000 live ticks at the default divider cover 1_000_000 ms
    let ran = game.advance_frames(2_000 * DEFAULT_TICK_DIVIDER as u64);
    let report = game.catch_up(t0 + 1_000_000);

    assert_eq!(ran, 2_000);
    assert_eq!(report.ticks_banked, 0);
    assert_eq!(report.ticks_replayed, 0);
    assert_eq!(game.clock.elapsed_ticks, 2_000);

    // real time away afterwards is still owed
    let report = game.catch_up(t0 + 1_000_000 + 5_000_000);
    assert_eq!(report.ticks_replayed, 1_000);
    assert_eq!(game.clock.elapsed_ticks, 3_000);
}

#[test]
fn test_catch_up_is_capped() {
    let config = GameConfig {
        seed: Some(5),
        offline: ascension::core::config::OfflineConfig {
            efficiency_divider: 1,
            max_catch_up_ticks: 50,
        },
        ..GameConfig::default()
    };
    let mut game = Game::new(config).unwrap();
    game.catch_up(1_000);

    let report = game.catch_up(1_000 + 3_600_000);

    assert!(report.capped);
    assert_eq!(report.ticks_banked, 50);
    assert_eq!(game.clock.elapsed_ticks, 50);
}

#[test]
fn test_upkeep_shortfall_pauses_the_clock() {
    let mut config = GameConfig::seeded(6);
    config.home.pause_on_upkeep_failure = true;
    config.home.homes = vec![HomeDefinition::new("Inn Room", 0.0, 5.0, 1.0, 5.0)];
    config.home.starting_home = "Inn Room".to_string();
    let mut game = Game::new(config).unwrap();

    for _ in 0..BATTLE_TICKS_PER_DAY {
        game.tick();
    }

    assert!(game.is_paused());
    assert_eq!(game.world.home.missed_upkeep_days, 1);
    assert!(game.world.log.contains("upkeep"));
    assert!(game.world.character.status.health.value < BASE_HEALTH);

    // nothing moves until the player resumes
    assert!(game.tick().is_empty());
    assert_eq!(game.clock.elapsed_days, 1);
    game.resume();
    assert_eq!(game.tick().len(), 1);
}

#[test]
fn test_upkeep_shortfall_without_pause_keeps_running() {
    let mut config = GameConfig::seeded(6);
    config.home.homes = vec![HomeDefinition::new("Inn Room", 0.0, 5.0, 1.0, 5.0)];
    config.home.starting_home = "Inn Room".to_string();
    let mut game = Game::new(config).unwrap();

    game.run_days(2);

    assert!(!game.is_paused());
    assert_eq!(game.world.home.missed_upkeep_days, 2);
}

#[test]
fn test_bad_home_config_is_fatal() {
    let mut config = GameConfig::seeded(7);
    config.home.starting_home = "Palace".to_string();
    match Game::new(config) {
        Err(GameError::Home(HomeError::UnknownStartingHome(name))) => assert_eq!(name, "Palace"),
        other => panic!("expected unknown starting home, got {:?}", other.map(|_| ())),
    }

    let mut config = GameConfig::seeded(7);
    config.home.homes.clear();
    assert!(matches!(
        Game::new(config),
        Err(GameError::Home(HomeError::EmptyLadder))
    ));
}

#[test]
fn test_speed_changes_pace_frames() {
    let mut game = fed_game(8);
    assert!(game.set_speed(5).is_err());
    game.clock.unlocks.faster = true;
    game.set_speed(5).unwrap();

    assert_eq!(game.advance_frames(50), 10);
    assert_eq!(game.clock.elapsed_ticks, 10);
    assert_eq!(game.clock.elapsed_days, 1);
}
