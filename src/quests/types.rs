use std::collections::BTreeMap;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::character::attributes::StatKind;
use crate::zones::ZoneId;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// Natural 1.
    CriticalFailure,
    RollTooLow,
}

/// How a single d20 roll was judged.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RollVerdict {
    CriticalSuccess,
    Success,
    Failure(FailureReason),
}

impl RollVerdict {
    pub fn is_success(&self) -> bool {
        matches!(self, RollVerdict::CriticalSuccess | RollVerdict::Success)
    }

    pub fn failure_reason(&self) -> Option<FailureReason> {
        match self {
            RollVerdict::Failure(reason) => Some(*reason),
            _ => None,
        }
    }
}

/// The result of one quest attempt. Never modified after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestOutcome {
    pub id: Uuid,
    pub zone_id: ZoneId,
    pub quest_number: u32,
    pub success: bool,
    pub roll: u32,
    pub threshold: u32,
    pub xp_delta: u64,
    pub money_delta: u64,
    pub prestige_delta: u64,
    pub artifact_piece_found: bool,
    #[serde(with = "crate::core::time")]
    pub duration: Duration,
    #[serde(default)]
    pub essences: BTreeMap<StatKind, u32>,
    #[serde(default)]
    pub failure_reason: Option<FailureReason>,
}

/// XP and money produced by a reward formula, before it becomes an outcome.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestRewards {
    pub xp: u64,
    pub money: u64,
}
