//! Guild membership, tourneys and raids.

pub mod raid;
pub mod tourney;
pub mod types;

pub use raid::*;
pub use tourney::*;
pub use types::*;
