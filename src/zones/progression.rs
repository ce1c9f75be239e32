//! Per-player quest counters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::data::ZoneId;

/// Quest attempts made by one player, keyed by zone.
///
/// Counters only ever grow. Failed attempts count the same as successes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestProgress {
    attempts: BTreeMap<ZoneId, u32>,
}

impl QuestProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quest number for the next attempt in `zone_id`.
    pub fn quest_number(&self, zone_id: ZoneId) -> u32 {
        self.attempts.get(&zone_id).copied().unwrap_or(0)
    }

    /// Records one attempt and returns the new counter.
    pub fn record_attempt(&mut self, zone_id: ZoneId) -> u32 {
        let counter = self.attempts.entry(zone_id).or_insert(0);
        *counter += 1;
        *counter
    }

    pub fn zones_visited(&self) -> usize {
        self.attempts.len()
    }
}
