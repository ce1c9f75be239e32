//! Configuration, constants, errors and shared helpers.

pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod time;

pub use config::*;
pub use error::{GameError, Result};
pub use ids::*;
