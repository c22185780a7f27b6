//! Ascension - idle cultivation simulation core.
//!
//! A tick-driven scheduler publishes battle, day, year and display events to
//! the subsystems wired into a [`Game`]. Everything is deterministic for a
//! given seed, so offline catch-up replays exactly what live play would do.

pub mod character;
pub mod combat;
pub mod core;
pub mod farm;
pub mod followers;
pub mod hell;
pub mod home;
pub mod items;
pub mod log;

pub use crate::core::{ClockEvent, EventKind, Game, GameConfig, GameError, World};
