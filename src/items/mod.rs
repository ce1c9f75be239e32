//! Equipment items, slots and consumables.

pub mod equipment;
pub mod types;

pub use equipment::*;
pub use types::*;
