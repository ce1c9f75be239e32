//! Player progression: XP and levels, upgrades, artifacts, ascension and eldritch power.

pub mod ascension;
pub mod ledger;
pub mod types;

pub use ascension::{affordable_increase, triangular, AscensionResult};
pub use ledger::*;
pub use types::*;
