//! The character's home: a ladder of dwellings with daily upkeep.
//!
//! Home is the one subsystem whose configuration can fail: the game refuses
//! to start without a valid starting home.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
