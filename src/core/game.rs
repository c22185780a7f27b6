//! The composition root.
//!
//! `World` owns every component. `Game` owns the world, the clock and the
//! subscription table, and is the only thing that moves time forward.
//! Construction is two-phase: `World::new` builds the components, then
//! `Game::wire` registers the built-in subscriptions in their fixed order.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::clock::{ClockError, TickClock};
use super::config::GameConfig;
use super::constants::FRAME_MS;
use super::events::{ClockEvent, EventKind, Subscriptions, System, TickHandler};
use super::offline::{away_millis, now_millis, uncapped_catch_up_ticks, CatchUpReport};
use crate::character::bloodline::perform_reincarnation;
use crate::character::ledger::Character;
use crate::character::location::Location;
use crate::combat::engine::{Battle, BattleContext, BattleProperties};
use crate::farm::{Crop, Farm, FarmProperties};
use crate::followers::{FollowerJob, Followers, FollowersProperties};
use crate::hell::{Hell, HellProperties, HellRealm};
use crate::home::{Home, HomeError, HomeProperties, UpkeepOutcome};
use crate::items::inventory::Inventory;
use crate::items::repository::ItemRepository;
use crate::log::{LogService, LogTopic};

#[derive(Debug, Error)]
pub enum GameError {
    #[error("home configuration: {0}")]
    Home(#[from] HomeError),
    #[error("saved properties: {0}")]
    Properties(#[from] serde_json::Error),
}

/// Everything a save file holds. Missing sections load as defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameProperties {
    pub clock: TickClock,
    pub character: Character,
    pub inventory: Inventory,
    pub battle: BattleProperties,
    pub followers: FollowersProperties,
    pub farm: FarmProperties,
    pub home: HomeProperties,
    pub hell: HellProperties,
}

/// All simulation state except the clock.
#[derive(Debug)]
pub struct World {
    pub character: Character,
    pub inventory: Inventory,
    pub items: ItemRepository,
    pub battle: Battle,
    pub followers: Followers,
    pub farm: Farm,
    pub home: Home,
    pub hell: Hell,
    pub log: LogService,
    pub rng: StdRng,
    /// Set by a subsystem that wants the clock stopped after this tick.
    pub pause_requested: bool,
}

impl World {
    pub fn new(config: &GameConfig) -> Result<Self, HomeError> {
        let home = Home::new(&config.home)?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut character = Character::new();
        character.money = config.starting_money;
        home.apply_recovery(&mut character);

        Ok(Self {
            character,
            inventory: Inventory::new(),
            items: ItemRepository::default(),
            battle: Battle::new(&config.combat),
            followers: Followers::new(&config.followers),
            farm: Farm::new(&config.farm),
            home,
            hell: Hell::new(),
            log: LogService::new(config.log_capacity),
            rng,
            pause_requested: false,
        })
    }

    /// Splits the world into the battle engine and everything it touches.
    pub fn battle_parts(&mut self) -> (&mut Battle, BattleContext<'_>) {
        let ctx = BattleContext {
            character: &mut self.character,
            inventory: &mut self.inventory,
            items: &self.items,
            followers: &mut self.followers,
            log: &mut self.log,
            rng: &mut self.rng,
        };
        (&mut self.battle, ctx)
    }

    /// Runs one built-in system's reaction to `event`. Pairs with no
    /// reaction are ignored.
    pub fn handle_system(&mut self, system: System, event: &ClockEvent) {
        match (system, event) {
            (System::Battle, ClockEvent::BattleTick { .. }) => {
                let (battle, mut ctx) = self.battle_parts();
                battle.tick(&mut ctx);
            }
            (System::Battle, ClockEvent::DayTick { .. }) => {
                let overridden = self.hell.overrides_trouble();
                let (battle, mut ctx) = self.battle_parts();
                battle.on_day(&mut ctx, overridden);
            }
            (System::Battle, ClockEvent::Reincarnate) => self.battle.reincarnate(),

            (System::Character, ClockEvent::DayTick { .. }) => {
                self.character.on_day(&mut self.inventory, &mut self.log)
            }
            (System::Character, ClockEvent::LongTick) => self.character.recalculate_derived_stats(),
            (System::Character, ClockEvent::Reincarnate) => {
                perform_reincarnation(&mut self.character, &mut self.log)
            }

            (System::Home, ClockEvent::DayTick { .. }) => {
                let outcome = self.home.on_day(&mut self.character, &mut self.log);
                if let UpkeepOutcome::Shortfall {
                    pause_requested: true,
                } = outcome
                {
                    self.pause_requested = true;
                }
            }
            (System::Home, ClockEvent::Reincarnate) => self.home.reincarnate(&mut self.character),

            (System::Farm, ClockEvent::DayTick { .. }) => {
                self.farm
                    .on_day(&mut self.inventory, &self.items, &mut self.log)
            }
            (System::Farm, ClockEvent::Reincarnate) => self.farm.reincarnate(),

            (System::Followers, ClockEvent::DayTick { .. }) => self.followers.on_day(
                &mut self.character,
                &mut self.inventory,
                &self.items,
                &mut self.log,
            ),
            (System::Followers, ClockEvent::YearTick { days }) => {
                self.followers.on_year(*days, &mut self.log)
            }
            (System::Followers, ClockEvent::Reincarnate) => self.followers.reincarnate(),

            (System::Hell, ClockEvent::DayTick { .. }) => {
                self.hell.on_day(&mut self.battle, &mut self.log)
            }
            (System::Hell, ClockEvent::Reincarnate) => self.hell.reincarnate(),

            (System::Inventory, ClockEvent::Reincarnate) => self.inventory.reincarnate(),

            _ => {}
        }
    }

    // ── Player actions ────────────────────────────────────────────────

    pub fn flee(&mut self) {
        let (battle, mut ctx) = self.battle_parts();
        battle.flee(&mut ctx);
    }

    pub fn hire(&mut self, job: FollowerJob) -> bool {
        self.followers
            .hire(job, &mut self.rng, &mut self.log)
            .is_some()
    }

    pub fn plow(&mut self, crop: Crop) -> bool {
        self.farm.plow(crop, &mut self.log)
    }

    pub fn upgrade_home(&mut self) -> bool {
        self.home.upgrade(&mut self.character, &mut self.log)
    }

    pub fn enter_hell(&mut self, realm: HellRealm) {
        self.hell.enter(realm, &mut self.log);
    }

    pub fn exit_hell(&mut self) {
        self.hell.exit(&mut self.log);
    }

    /// Travel abandons any fight in progress.
    pub fn travel(&mut self, location: Location) {
        if self.character.location == location {
            return;
        }
        self.battle.clear_enemies();
        self.character.location = location;
        self.log
            .log(LogTopic::Event, format!("You travel to {}.", location.name()));
    }
}

pub struct Game {
    pub clock: TickClock,
    pub world: World,
    subscriptions: Subscriptions,
    max_catch_up_ticks: u64,
    efficiency_divider: u64,
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("clock", &self.clock)
            .field("subscriptions", &self.subscriptions.len())
            .finish_non_exhaustive()
    }
}

impl Game {
    /// Builds and wires a game. A home table that cannot be used is the only
    /// failure.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        let world = World::new(&config)?;
        let mut game = Self {
            clock: TickClock::new(config.tick_divider),
            world,
            subscriptions: Subscriptions::new(),
            max_catch_up_ticks: config.offline.max_catch_up_ticks,
            efficiency_divider: config.offline.efficiency_divider,
        };
        game.wire();
        tracing::info!(
            seed = ?config.seed,
            home = %game.world.home.current().name,
            "game wired"
        );
        Ok(game)
    }

    /// Registers the built-in systems. Order within a kind is load-bearing:
    /// hell claims the day before the battle engine looks for trouble, and
    /// home re-applies recovery after the character is reborn.
    fn wire(&mut self) {
        use EventKind::*;

        let subs = &mut self.subscriptions;
        subs.add_system(BattleTick, System::Battle);

        for system in [
            System::Character,
            System::Home,
            System::Farm,
            System::Followers,
            System::Hell,
            System::Battle,
        ] {
            subs.add_system(DayTick, system);
        }

        subs.add_system(YearTick, System::Followers);
        subs.add_system(LongTick, System::Character);

        for system in [
            System::Battle,
            System::Character,
            System::Inventory,
            System::Followers,
            System::Farm,
            System::Home,
            System::Hell,
        ] {
            subs.add_system(Reincarnate, system);
        }
    }

    /// Adds an external handler. It runs after everything registered before
    /// it for the same kind.
    pub fn subscribe(&mut self, kind: EventKind, handler: impl TickHandler + 'static) {
        self.subscriptions.add_handler(kind, Box::new(handler));
    }

    pub fn subscriptions(&self) -> &Subscriptions {
        &self.subscriptions
    }

    /// Runs one tick to completion. Returns the events that fired; empty
    /// while paused.
    pub fn tick(&mut self) -> Vec<ClockEvent> {
        let events = self.clock.tick();
        self.run(&events);
        events
    }

    /// Runs one tick even while paused.
    pub fn step(&mut self) -> Vec<ClockEvent> {
        let events = self.clock.step();
        self.run(&events);
        events
    }

    pub fn run_days(&mut self, days: u64) {
        let target = self.clock.elapsed_days + days;
        while self.clock.elapsed_days < target && !self.clock.paused {
            self.tick();
        }
    }

    fn run(&mut self, events: &[ClockEvent]) {
        for event in events {
            self.subscriptions.dispatch(event, &mut self.world);
        }
        if events.is_empty() {
            return;
        }

        if std::mem::take(&mut self.world.pause_requested) {
            self.clock.paused = true;
            tracing::warn!(tick = self.clock.elapsed_ticks, "auto-paused");
        }
        if self.world.character.dead {
            self.reincarnate();
        }
    }

    /// Ends the current life and starts the next one.
    pub fn reincarnate(&mut self) -> ClockEvent {
        let event = ClockEvent::Reincarnate;
        self.subscriptions.dispatch(&event, &mut self.world);
        self.clock.reincarnate();
        self.world.pause_requested = false;
        tracing::info!(
            lives = self.world.character.lives,
            tick = self.clock.elapsed_ticks,
            "reincarnated"
        );
        event
    }

    pub fn pause(&mut self) {
        self.clock.paused = true;
    }

    pub fn resume(&mut self) {
        self.clock.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.clock.paused
    }

    pub fn set_speed(&mut self, divider: u32) -> Result<(), ClockError> {
        self.clock.set_speed(divider)
    }

    /// Feeds wall-clock frames and runs every tick that came due. Live
    /// frames count as activity, so a later catch-up skips them.
    pub fn advance_frames(&mut self, frames: u64) -> u64 {
        if self.clock.last_active_time > 0 {
            let elapsed = i64::try_from(frames.saturating_mul(FRAME_MS)).unwrap_or(i64::MAX);
            self.clock.last_active_time = self.clock.last_active_time.saturating_add(elapsed);
        }
        let due = self.clock.advance_frames(frames);
        for _ in 0..due {
            self.tick();
        }
        due
    }

    // ── Offline catch-up ──────────────────────────────────────────────

    /// Banks the ticks owed since the last activity and replays them. The
    /// first call only records `now_ms`. While paused the ticks stay banked.
    pub fn catch_up(&mut self, now_ms: i64) -> CatchUpReport {
        let last = self.clock.last_active_time;
        if now_ms > last {
            self.clock.last_active_time = now_ms;
        }
        let Some(away_ms) = away_millis(last, now_ms) else {
            return CatchUpReport::default();
        };

        let owed = uncapped_catch_up_ticks(away_ms, self.clock.tick_divider, self.efficiency_divider);
        let banked = owed.min(self.max_catch_up_ticks);
        self.clock.banked_ticks = self
            .clock
            .banked_ticks
            .saturating_add(banked)
            .min(self.max_catch_up_ticks);

        let replayed = self.drain_banked_ticks(u64::MAX);
        tracing::info!(away_ms, banked, replayed, "offline catch-up");

        CatchUpReport {
            away_seconds: (away_ms / 1000) as i64,
            ticks_banked: banked,
            ticks_replayed: replayed,
            capped: owed > self.max_catch_up_ticks,
        }
    }

    /// Records live activity at `now_ms` for hosts that drive `tick`
    /// directly instead of feeding frames.
    pub fn mark_active(&mut self, now_ms: i64) {
        if now_ms > self.clock.last_active_time {
            self.clock.last_active_time = now_ms;
        }
    }

    pub fn catch_up_now(&mut self) -> CatchUpReport {
        self.catch_up(now_millis())
    }

    /// Replays up to `max` banked ticks. Stops early if the game pauses.
    pub fn drain_banked_ticks(&mut self, max: u64) -> u64 {
        let mut replayed = 0;
        while replayed < max && self.clock.banked_ticks > 0 && !self.clock.paused {
            self.clock.banked_ticks -= 1;
            self.tick();
            replayed += 1;
        }
        replayed
    }

    // ── Persistence ───────────────────────────────────────────────────

    pub fn properties(&self) -> GameProperties {
        let world = &self.world;
        GameProperties {
            clock: self.clock.clone(),
            character: world.character.clone(),
            inventory: world.inventory.clone(),
            battle: world.battle.properties(),
            followers: world.followers.properties(),
            farm: world.farm.properties(),
            home: world.home.properties(),
            hell: world.hell.properties(),
        }
    }

    pub fn set_properties(&mut self, properties: GameProperties) {
        let world = &mut self.world;
        self.clock = properties.clock;
        world.character = properties.character;
        world.character.check_overage();
        world.inventory = properties.inventory;
        world.battle.set_properties(properties.battle);
        world.followers.set_properties(properties.followers);
        world.farm.set_properties(properties.farm);
        world.home.set_properties(properties.home, &mut world.character);
        world.hell.set_properties(properties.hell);
        world.pause_requested = false;
    }

    pub fn save_json(&self) -> Result<String, GameError> {
        Ok(serde_json::to_string_pretty(&self.properties())?)
    }

    pub fn load_json(&mut self, json: &str) -> Result<(), GameError> {
        let properties: GameProperties = serde_json::from_str(json)?;
        self.set_properties(properties);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::types::Enemy;
    use crate::core::constants::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn game() -> Game {
        Game::new(GameConfig::seeded(7)).unwrap()
    }

    #[test]
    fn test_wiring_order() {
        let game = game();
        let subs = game.subscriptions();
        assert_eq!(subs.systems_for(EventKind::BattleTick), vec![System::Battle]);
        assert_eq!(
            subs.systems_for(EventKind::DayTick),
            vec![
                System::Character,
                System::Home,
                System::Farm,
                System::Followers,
                System::Hell,
                System::Battle
            ]
        );
        assert_eq!(subs.systems_for(EventKind::YearTick), vec![System::Followers]);
        let reborn = subs.systems_for(EventKind::Reincarnate);
        let character = reborn.iter().position(|s| *s == System::Character);
        let home = reborn.iter().position(|s| *s == System::Home);
        assert!(character < home);
    }

    #[test]
    fn test_external_handler_sees_every_event() {
        let mut game = game();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        game.subscribe(EventKind::DayTick, move |event: &ClockEvent, _: &mut World| {
            sink.borrow_mut().push(*event);
        });

        for _ in 0..BATTLE_TICKS_PER_DAY * 2 {
            game.tick();
        }

        assert_eq!(
            *seen.borrow(),
            vec![ClockEvent::DayTick { day: 1 }, ClockEvent::DayTick { day: 2 }]
        );
    }

    #[test]
    fn test_paused_game_does_not_advance() {
        let mut game = game();
        game.pause();
        assert!(game.tick().is_empty());
        assert_eq!(game.clock.elapsed_ticks, 0);

        game.step();
        assert_eq!(game.clock.elapsed_ticks, 1);
        assert!(game.is_paused());
    }

    #[test]
    fn test_death_triggers_rebirth() {
        let mut game = game();
        game.world.character.age = game.world.character.lifespan - 1;
        for _ in 0..BATTLE_TICKS_PER_DAY {
            game.tick();
        }
        assert_eq!(game.world.character.lives, 1);
        assert!(!game.world.character.dead);
        assert_eq!(game.world.character.age, STARTING_AGE_DAYS);
    }

    #[test]
    fn test_reincarnation_reapplies_home_recovery() {
        let mut game = game();
        game.world.character.money = 1_000.0;
        assert!(game.world.upgrade_home());
        game.reincarnate();

        let recovery = game.world.home.current().health_recovery;
        assert_eq!(game.world.home.current().name, "Shack");
        assert_eq!(game.world.character.status.health.tick_recovery, recovery);
    }

    #[test]
    fn test_first_catch_up_only_records_time() {
        let mut game = game();
        let report = game.catch_up(1_000_000);
        assert_eq!(report, CatchUpReport::default());
        assert_eq!(game.clock.last_active_time, 1_000_000);
        assert_eq!(game.clock.elapsed_ticks, 0);
    }

    #[test]
    fn test_catch_up_replays_banked_ticks() {
        let mut game = game();
        game.catch_up(1_000_000);
        // 100 s at divider 20 and efficiency 10: 100_000 / 500 / 10
        let report = game.catch_up(1_100_000);
        assert_eq!(report.ticks_banked, 20);
        assert_eq!(report.ticks_replayed, 20);
        assert_eq!(report.away_seconds, 100);
        assert!(!report.capped);
        assert_eq!(game.clock.elapsed_ticks, 20);
        assert_eq!(game.clock.banked_ticks, 0);
    }

    #[test]
    fn test_catch_up_while_paused_banks() {
        let mut game = game();
        game.catch_up(1_000_000);
        game.pause();
        let report = game.catch_up(1_100_000);
        assert_eq!(report.ticks_replayed, 0);
        assert_eq!(game.clock.banked_ticks, 20);

        game.resume();
        assert_eq!(game.drain_banked_ticks(5), 5);
        assert_eq!(game.clock.banked_ticks, 15);
        assert_eq!(game.clock.elapsed_ticks, 5);
    }

    #[test]
    fn test_backwards_clock_is_ignored() {
        let mut game = game();
        game.catch_up(1_000_000);
        let report = game.catch_up(500_000);
        assert_eq!(report.ticks_banked, 0);
        assert_eq!(game.clock.last_active_time, 1_000_000);
    }

    #[test]
    fn test_travel_clears_fight() {
        let mut game = game();
        let wolf = Enemy::new("Wolf", 10.0, 0.0);
        game.world.battle.add_enemy(wolf, &mut game.world.log);
        assert!(game.world.battle.is_engaged());

        game.world.travel(Location::Forest);

        assert!(!game.world.battle.is_engaged());
        assert!(game.world.battle.enemies.is_empty());
        assert_eq!(game.world.character.location, Location::Forest);
        assert!(game.world.log.contains("travel"));
    }

    #[test]
    fn test_reincarnate_dispatches_before_clock_reset() {
        let mut game = game();
        let fired = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&fired);
        game.subscribe(EventKind::Reincarnate, move |_: &ClockEvent, _: &mut World| {
            *sink.borrow_mut() += 1;
        });
        game.run_days(3);
        assert_eq!(game.clock.days_since_year(), 3);

        assert_eq!(game.reincarnate(), ClockEvent::Reincarnate);

        assert_eq!(*fired.borrow(), 1);
        assert_eq!(game.clock.days_since_year(), 0);
        assert_eq!(game.clock.elapsed_days, 3, "wall counters survive");
    }

    #[test]
    fn test_live_frames_move_the_activity_mark() {
        let mut game = game();
        game.catch_up(1_000);
        game.advance_frames(40);
        assert_eq!(game.clock.last_active_time, 1_000 + 40 * FRAME_MS as i64);

        game.mark_active(500);
        assert_eq!(game.clock.last_active_time, 2_000);
    }
}
