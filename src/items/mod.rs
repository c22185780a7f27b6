//! Item system: types, the canonical catalog, and the player's inventory.

pub mod inventory;
pub mod repository;
pub mod types;

pub use inventory::*;
pub use repository::*;
pub use types::*;
