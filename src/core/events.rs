//! Scheduler events and the subscription table.
//!
//! Subscribers to the same event kind run in registration order. Replay
//! determinism depends on that order, so the table is a plain `Vec` and is
//! never sorted.

use super::game::World;

/// One lifecycle event published by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    /// Every tick. Drives combat.
    BattleTick { tick: u64 },
    /// Every `BATTLE_TICKS_PER_DAY` ticks.
    DayTick { day: u64 },
    /// Every `DAYS_PER_YEAR` days, carrying the days elapsed since the last one.
    YearTick { days: u32 },
    /// Low-frequency refresh of derived state.
    LongTick,
    /// A new life begins.
    Reincarnate,
}

impl ClockEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ClockEvent::BattleTick { .. } => EventKind::BattleTick,
            ClockEvent::DayTick { .. } => EventKind::DayTick,
            ClockEvent::YearTick { .. } => EventKind::YearTick,
            ClockEvent::LongTick => EventKind::LongTick,
            ClockEvent::Reincarnate => EventKind::Reincarnate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    BattleTick,
    DayTick,
    YearTick,
    LongTick,
    Reincarnate,
}

/// A handler registered from outside the crate's built-in systems.
pub trait TickHandler {
    fn handle(&mut self, event: &ClockEvent, world: &mut World);
}

impl<F> TickHandler for F
where
    F: FnMut(&ClockEvent, &mut World),
{
    fn handle(&mut self, event: &ClockEvent, world: &mut World) {
        self(event, world)
    }
}

/// The built-in systems the composition root wires up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum System {
    Character,
    Battle,
    Home,
    Farm,
    Followers,
    Hell,
    Inventory,
}

pub enum Subscriber {
    System(System),
    Handler(Box<dyn TickHandler>),
}

impl std::fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Subscriber::System(system) => write!(f, "System({:?})", system),
            Subscriber::Handler(_) => write!(f, "Handler"),
        }
    }
}

#[derive(Debug, Default)]
pub struct Subscriptions {
    entries: Vec<(EventKind, Subscriber)>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_system(&mut self, kind: EventKind, system: System) {
        self.entries.push((kind, Subscriber::System(system)));
    }

    pub fn add_handler(&mut self, kind: EventKind, handler: Box<dyn TickHandler>) {
        self.entries.push((kind, Subscriber::Handler(handler)));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Built-in systems subscribed to `kind`, in registration order.
    pub fn systems_for(&self, kind: EventKind) -> Vec<System> {
        self.entries
            .iter()
            .filter(|(k, _)| *k == kind)
            .filter_map(|(_, s)| match s {
                Subscriber::System(system) => Some(*system),
                Subscriber::Handler(_) => None,
            })
            .collect()
    }

    /// Delivers one event to every subscriber of its kind.
    pub fn dispatch(&mut self, event: &ClockEvent, world: &mut World) {
        let kind = event.kind();
        for (subscribed, subscriber) in self.entries.iter_mut() {
            if *subscribed != kind {
                continue;
            }
            match subscriber {
                Subscriber::System(system) => world.handle_system(*system, event),
                Subscriber::Handler(handler) => handler.handle(event, world),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kinds() {
        assert_eq!(ClockEvent::BattleTick { tick: 3 }.kind(), EventKind::BattleTick);
        assert_eq!(ClockEvent::YearTick { days: 365 }.kind(), EventKind::YearTick);
        assert_eq!(ClockEvent::Reincarnate.kind(), EventKind::Reincarnate);
    }

    #[test]
    fn test_systems_keep_registration_order() {
        let mut subs = Subscriptions::new();
        subs.add_system(EventKind::DayTick, System::Home);
        subs.add_system(EventKind::BattleTick, System::Battle);
        subs.add_system(EventKind::DayTick, System::Character);
        subs.add_handler(EventKind::DayTick, Box::new(|_: &ClockEvent, _: &mut World| {}));
        subs.add_system(EventKind::DayTick, System::Farm);

        assert_eq!(
            subs.systems_for(EventKind::DayTick),
            vec![System::Home, System::Character, System::Farm]
        );
        assert_eq!(subs.len(), 5);
    }
}
