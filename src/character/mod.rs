//! Stat aggregation for players, monsters and pets.

pub mod attributes;
pub mod damage;
pub mod derived_stats;
pub mod modifiers;

pub use attributes::*;
pub use damage::*;
pub use derived_stats::*;
pub use modifiers::*;
