//! Zone definitions and per-player quest counters.

mod data;
mod progression;

pub use data::*;
pub use progression::*;
