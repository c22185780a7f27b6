//! The tick clock: the single source of "when" for the simulation.
//!
//! `tick()` advances time by one battle tick and returns the events due, in
//! publication order. The clock never touches game state itself.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::constants::*;
use super::events::ClockEvent;

/// Which of the faster speed settings the player has unlocked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedUnlocks {
    pub fast: bool,
    pub faster: bool,
    pub fastest: bool,
}

impl SpeedUnlocks {
    pub fn all() -> Self {
        Self {
            fast: true,
            faster: true,
            fastest: true,
        }
    }

    fn allows(&self, divider: u32) -> bool {
        match divider {
            10 => self.fast,
            5 => self.faster,
            1 => self.fastest,
            _ => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClockError {
    #[error("tick divider {0} is not a supported speed")]
    UnsupportedDivider(u32),
    #[error("speed with tick divider {0} is locked")]
    Locked(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickClock {
    /// Monotonic; survives reincarnation.
    pub elapsed_ticks: u64,
    /// Monotonic; survives reincarnation.
    pub elapsed_days: u64,
    /// Frames per tick. Lower is faster.
    pub tick_divider: u32,
    pub paused: bool,
    /// Catch-up ticks waiting to be replayed.
    pub banked_ticks: u64,
    /// Unix milliseconds of the last live or replayed activity. 0 means never.
    pub last_active_time: i64,
    pub unlocks: SpeedUnlocks,
    ticks_into_day: u64,
    days_since_year: u32,
    ticks_since_long: u64,
    #[serde(skip)]
    frame_accumulator: u64,
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_DIVIDER)
    }
}

impl TickClock {
    pub fn new(tick_divider: u32) -> Self {
        let tick_divider = if TICK_DIVIDERS.contains(&tick_divider) {
            tick_divider
        } else {
            DEFAULT_TICK_DIVIDER
        };
        Self {
            elapsed_ticks: 0,
            elapsed_days: 0,
            tick_divider,
            paused: false,
            banked_ticks: 0,
            last_active_time: 0,
            unlocks: SpeedUnlocks::default(),
            ticks_into_day: 0,
            days_since_year: 0,
            ticks_since_long: 0,
            frame_accumulator: 0,
        }
    }

    /// Advances one tick unless paused.
    pub fn tick(&mut self) -> Vec<ClockEvent> {
        if self.paused {
            return Vec::new();
        }
        self.advance()
    }

    /// Advances one tick even while paused, for single-stepping.
    pub fn step(&mut self) -> Vec<ClockEvent> {
        self.advance()
    }

    fn advance(&mut self) -> Vec<ClockEvent> {
        self.elapsed_ticks += 1;
        let mut events = vec![ClockEvent::BattleTick {
            tick: self.elapsed_ticks,
        }];

        self.ticks_into_day += 1;
        if self.ticks_into_day >= BATTLE_TICKS_PER_DAY {
            self.ticks_into_day = 0;
            self.elapsed_days += 1;
            events.push(ClockEvent::DayTick {
                day: self.elapsed_days,
            });

            self.days_since_year += 1;
            if self.days_since_year >= DAYS_PER_YEAR {
                events.push(ClockEvent::YearTick {
                    days: self.days_since_year,
                });
                self.days_since_year = 0;
            }
        }

        self.ticks_since_long += 1;
        if self.ticks_since_long >= LONG_TICK_INTERVAL {
            self.ticks_since_long = 0;
            events.push(ClockEvent::LongTick);
        }

        events
    }

    /// Returns the reincarnate event and restarts the life-scoped counters.
    /// Monotonic counters are untouched.
    pub fn reincarnate(&mut self) -> ClockEvent {
        self.ticks_into_day = 0;
        self.days_since_year = 0;
        self.ticks_since_long = 0;
        ClockEvent::Reincarnate
    }

    /// Days accumulated toward the next year tick.
    pub fn days_since_year(&self) -> u32 {
        self.days_since_year
    }

    pub fn set_speed(&mut self, divider: u32) -> Result<(), ClockError> {
        if !TICK_DIVIDERS.contains(&divider) {
            return Err(ClockError::UnsupportedDivider(divider));
        }
        if !self.unlocks.allows(divider) {
            return Err(ClockError::Locked(divider));
        }
        self.tick_divider = divider;
        self.frame_accumulator = 0;
        Ok(())
    }

    /// Feeds elapsed wall-clock frames and returns how many ticks are due.
    pub fn advance_frames(&mut self, frames: u64) -> u64 {
        if self.paused {
            return 0;
        }
        self.frame_accumulator += frames;
        let divider = self.tick_divider.max(1) as u64;
        let due = self.frame_accumulator / divider;
        self.frame_accumulator %= divider;
        due
    }

    pub fn tick_interval_ms(&self) -> u64 {
        FRAME_MS * self.tick_divider.max(1) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(clock: &mut TickClock, ticks: u64) -> Vec<ClockEvent> {
        (0..ticks).flat_map(|_| clock.tick()).collect()
    }

    #[test]
    fn test_every_tick_is_a_battle_tick() {
        let mut clock = TickClock::default();
        let events = clock.tick();
        assert_eq!(events, vec![ClockEvent::BattleTick { tick: 1 }]);
    }

    #[test]
    fn test_day_boundary_follows_battle_tick() {
        let mut clock = TickClock::default();
        run(&mut clock, BATTLE_TICKS_PER_DAY - 1);
        let events = clock.tick();
        assert_eq!(
            events,
            vec![
                ClockEvent::BattleTick {
                    tick: BATTLE_TICKS_PER_DAY
                },
                ClockEvent::DayTick { day: 1 },
            ]
        );
    }

    #[test]
    fn test_year_tick_carries_day_count() {
        let mut clock = TickClock::default();
        let events = run(&mut clock, BATTLE_TICKS_PER_DAY * DAYS_PER_YEAR as u64);
        let years: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, ClockEvent::YearTick { .. }))
            .collect();
        assert_eq!(years, vec![&ClockEvent::YearTick { days: DAYS_PER_YEAR }]);
        assert_eq!(clock.elapsed_days, DAYS_PER_YEAR as u64);
    }

    #[test]
    fn test_events_ordered_within_a_tick() {
        let mut clock = TickClock::default();
        for _ in 0..BATTLE_TICKS_PER_DAY * DAYS_PER_YEAR as u64 * 2 {
            let kinds: Vec<_> = clock.tick().iter().map(|e| e.kind() as u8).collect();
            assert!(kinds.windows(2).all(|w| w[0] < w[1]), "{kinds:?}");
        }
    }

    #[test]
    fn test_long_tick_interval() {
        let mut clock = TickClock::default();
        let events = run(&mut clock, LONG_TICK_INTERVAL * 3);
        let longs = events.iter().filter(|e| **e == ClockEvent::LongTick).count();
        assert_eq!(longs, 3);
    }

    #[test]
    fn test_paused_clock_is_silent_but_steps() {
        let mut clock = TickClock::default();
        clock.paused = true;
        assert!(clock.tick().is_empty());
        assert_eq!(clock.elapsed_ticks, 0);
        assert_eq!(clock.step().len(), 1);
        assert_eq!(clock.elapsed_ticks, 1);
    }

    #[test]
    fn test_reincarnate_resets_life_counters_only() {
        let mut clock = TickClock::default();
        run(&mut clock, BATTLE_TICKS_PER_DAY * 3 + 4);

        assert_eq!(clock.reincarnate(), ClockEvent::Reincarnate);

        assert_eq!(clock.elapsed_ticks, BATTLE_TICKS_PER_DAY * 3 + 4);
        assert_eq!(clock.elapsed_days, 3);
        assert_eq!(clock.days_since_year(), 0);
        // a full day is needed again before the next day tick
        let events = run(&mut clock, BATTLE_TICKS_PER_DAY - 1);
        assert!(!events.iter().any(|e| matches!(e, ClockEvent::DayTick { .. })));
    }

    #[test]
    fn test_set_speed_validation() {
        let mut clock = TickClock::default();
        assert_eq!(clock.set_speed(7), Err(ClockError::UnsupportedDivider(7)));
        assert_eq!(clock.set_speed(5), Err(ClockError::Locked(5)));
        assert_eq!(clock.set_speed(40), Ok(()));

        clock.unlocks = SpeedUnlocks::all();
        assert_eq!(clock.set_speed(1), Ok(()));
        assert_eq!(clock.tick_divider, 1);
    }

    #[test]
    fn test_advance_frames_paces_ticks() {
        let mut clock = TickClock::new(20);
        assert_eq!(clock.advance_frames(19), 0);
        assert_eq!(clock.advance_frames(1), 1);
        assert_eq!(clock.advance_frames(45), 2);
        assert_eq!(clock.advance_frames(15), 1);

        clock.paused = true;
        assert_eq!(clock.advance_frames(100), 0);
    }
}
