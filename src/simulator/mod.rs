//! Balance simulator for Monte Carlo analysis.
//!
//! Plays many seeded characters through the simulation core to analyze:
//! - Leveling pace per in-game day
//! - Quest success rates as zones get harder
//! - Encounter win rates at each gear level
//! - Artifact and ascension pacing

mod config;
mod report;
mod runner;

pub use config::SimConfig;
pub use report::SimReport;
pub use runner::{run_simulation, RunStats};
