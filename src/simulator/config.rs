//! Simulation configuration.

use serde::{Deserialize, Serialize};

use crate::character::damage::{Damage, Element};
use crate::character::derived_stats::Stance;
use crate::zones::Zone;

/// Configuration for a simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Number of simulated players
    pub num_runs: u32,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// In-game days simulated per run
    pub days: u32,

    /// Number of generated zones
    pub zone_count: u32,

    /// Level difference between consecutive zones
    pub zone_level_step: u32,

    /// Stance the simulated player fights in
    pub stance: Stance,

    /// Monster encounters fought during each quest
    pub encounters_per_quest: u32,

    /// Potions packed before each encounter
    pub potions_per_encounter: u32,

    /// Whether to ascend as soon as the player is eligible
    pub simulate_ascension: bool,

    /// Log verbosity (0 = silent, 1 = summary, 2 = per run)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 200,
            seed: None,
            days: 180,
            zone_count: 10,
            zone_level_step: 5,
            stance: Stance::Balanced,
            encounters_per_quest: 1,
            potions_per_encounter: 1,
            simulate_ascension: false,
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// Short run for quick balance checks
    pub fn quick() -> Self {
        Self {
            num_runs: 50,
            days: 60,
            ..Default::default()
        }
    }

    /// Long run that includes ascensions
    pub fn full_progression() -> Self {
        Self {
            num_runs: 50,
            days: 730,
            simulate_ascension: true,
            ..Default::default()
        }
    }

    /// World used by the simulation. Zone `i` sits at level `1 + (i - 1) * step`
    /// and its monsters favour a different element each time.
    pub fn zones(&self) -> Vec<Zone> {
        let elements = Element::all();
        (1..=self.zone_count)
            .map(|id| {
                let level = 1 + (id - 1) * self.zone_level_step;
                let element = elements[(id as usize - 1) % elements.len()];
                let mut zone = Zone::new(id, format!("Zone {}", id), level);
                zone.damage_modifiers = Damage::single(element, 1);
                zone.resist_modifiers = Damage::single(element, 1);
                zone.event_bonus = id as u64;
                zone
            })
            .collect()
    }
}
