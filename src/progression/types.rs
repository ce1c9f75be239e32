use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::character::attributes::{StatKind, Stats};
use crate::character::derived_stats::BaseCharacter;
use crate::combat::CombatReward;
use crate::core::config::GameConfig;
use crate::core::constants::DEFAULT_SANITY;
use crate::core::ids::PlayerId;
use crate::items::Equipment;
use crate::quests::QuestOutcome;
use crate::zones::{QuestProgress, ZoneId};

/// A permanent, uniquely identified artifact. Each one raises max eldritch power.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Artifact {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RewardSource {
    /// Quest attempts advance the zone's quest counter, success or not.
    Quest { zone_id: ZoneId },
    Combat,
    Event,
    Raid,
    Tourney,
}

/// Gains produced by one outcome, ready to be applied to a record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RewardDelta {
    pub outcome_id: Uuid,
    pub source: RewardSource,
    pub xp: u64,
    pub money: u64,
    pub artifact_pieces: u32,
    #[serde(default)]
    pub essences: BTreeMap<StatKind, u32>,
    #[serde(default)]
    pub renown: u64,
}

impl RewardDelta {
    pub fn new(outcome_id: Uuid, source: RewardSource) -> Self {
        Self {
            outcome_id,
            source,
            xp: 0,
            money: 0,
            artifact_pieces: 0,
            essences: BTreeMap::new(),
            renown: 0,
        }
    }

    pub fn from_combat(outcome_id: Uuid, reward: &CombatReward) -> Self {
        Self {
            xp: reward.xp,
            money: reward.money,
            artifact_pieces: reward.artifact_piece as u32,
            ..Self::new(outcome_id, RewardSource::Combat)
        }
    }
}

impl From<&QuestOutcome> for RewardDelta {
    fn from(outcome: &QuestOutcome) -> Self {
        Self {
            xp: outcome.xp_delta,
            money: outcome.money_delta,
            artifact_pieces: outcome.artifact_piece_found as u32,
            essences: outcome.essences.clone(),
            renown: outcome.prestige_delta,
            ..Self::new(
                outcome.id,
                RewardSource::Quest {
                    zone_id: outcome.zone_id,
                },
            )
        }
    }
}

/// Everything about a player that progression touches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgressionRecord {
    pub player_id: PlayerId,
    pub name: String,
    pub level: u32,
    pub xp: u64,
    pub gear_level: u32,
    pub home_level: u32,
    pub money: u64,
    pub artifact_pieces: u32,
    pub artifacts: Vec<Artifact>,
    pub essences: BTreeMap<StatKind, u32>,
    pub renown: u64,
    pub ascension: u32,
    pub stats: Stats,
    #[serde(default)]
    pub equipment: Equipment,
    #[serde(default)]
    pub quest_progress: QuestProgress,
    pub last_cast: DateTime<Utc>,
    pub max_level_reached: u32,
    /// Lowered by horrors met on the road. Can drop below zero.
    #[serde(default = "default_sanity")]
    pub sanity: i32,
    /// Ids of every outcome already applied. Grows without bound here; the
    /// storage layer is expected to prune ids older than any outcome that
    /// could still be replayed.
    #[serde(default)]
    pub applied_outcomes: HashSet<Uuid>,
}

fn default_sanity() -> i32 {
    DEFAULT_SANITY
}

impl ProgressionRecord {
    pub fn new(player_id: PlayerId, name: impl Into<String>, config: &GameConfig, now: DateTime<Utc>) -> Self {
        let progression = &config.progression;
        Self {
            player_id,
            name: name.into(),
            level: 1,
            xp: 0,
            gear_level: progression.default_gear_level,
            home_level: progression.default_home_level,
            money: progression.default_money,
            artifact_pieces: 0,
            artifacts: Vec::new(),
            essences: BTreeMap::new(),
            renown: 0,
            ascension: 0,
            stats: Stats::new(),
            equipment: Equipment::new(),
            quest_progress: QuestProgress::new(),
            last_cast: now,
            max_level_reached: 1,
            sanity: DEFAULT_SANITY,
            applied_outcomes: HashSet::new(),
        }
    }

    pub fn has_applied(&self, outcome_id: &Uuid) -> bool {
        self.applied_outcomes.contains(outcome_id)
    }

    /// Base sheet for [`crate::character::effective_stats`].
    pub fn base_character(&self) -> BaseCharacter {
        let mut base = BaseCharacter::new(self.name.clone(), self.level);
        base.gear_level = self.gear_level;
        base.home_level = self.home_level;
        base.stats = self.stats;
        base.artifacts = self.artifacts.len() as u32;
        base.ascension = self.ascension;
        base.sanity = self.sanity;
        base
    }
}

/// Level changes caused by a single XP grant.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LevelReport {
    pub xp_gained: u64,
    pub levels_gained: u32,
    pub level: u32,
}
