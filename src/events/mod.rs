//! Zone events and quick-time events.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
