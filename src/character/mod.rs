//! The character ledger, its attributes and status pools, and reincarnation.

pub mod attributes;
pub mod bloodline;
pub mod ledger;
pub mod location;
pub mod status;

pub use attributes::*;
pub use bloodline::*;
pub use ledger::*;
pub use location::*;
pub use status::*;
