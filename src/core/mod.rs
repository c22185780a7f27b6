//! Scheduler, configuration and the composition root.

pub mod clock;
pub mod config;
pub mod constants;
pub mod events;
pub mod game;
pub mod offline;

pub use clock::{ClockError, SpeedUnlocks, TickClock};
pub use config::{ConfigError, GameConfig};
pub use events::{ClockEvent, EventKind, Subscriptions, System, TickHandler};
pub use game::{Game, GameError, GameProperties, World};
pub use offline::CatchUpReport;
