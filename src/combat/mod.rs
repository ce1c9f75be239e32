//! Turn-based combat: state, step function, policies and monster spawns.

pub mod logic;
pub mod monsters;
pub mod policy;
pub mod types;

pub use logic::*;
pub use monsters::*;
pub use policy::*;
pub use types::*;
