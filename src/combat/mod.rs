//! Combat: techniques, status effects, formations, and the battle engine.

pub mod bestiary;
pub mod engine;
pub mod family;
pub mod math;
pub mod types;

pub use bestiary::*;
pub use engine::*;
pub use types::*;
