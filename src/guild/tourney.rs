//! Biweekly guild tourney.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::types::{Guild, MemberReward};
use crate::core::config::GuildConfig;
use crate::core::ids::{new_outcome_id, GuildId};
use crate::progression::{RewardDelta, RewardSource};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tourney {
    pub edition: u32,
    pub start: DateTime<Utc>,
    #[serde(with = "crate::core::time")]
    pub duration: Duration,
}

impl Tourney {
    pub fn new(start: DateTime<Utc>, config: &GuildConfig) -> Self {
        Self {
            edition: 1,
            start,
            duration: Duration::days(config.tourney_duration_days),
        }
    }

    pub fn ends_at(&self) -> DateTime<Utc> {
        self.start + self.duration
    }

    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        now >= self.ends_at()
    }

    /// Whole days until the end, 0 once it has ended.
    pub fn days_left(&self, now: DateTime<Utc>) -> i64 {
        (self.ends_at() - now).num_days().max(0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TourneyPlacement {
    pub rank: u32,
    pub guild_id: GuildId,
    pub score: u64,
    pub reward_per_member: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TourneyResult {
    pub edition: u32,
    pub placements: Vec<TourneyPlacement>,
    pub rewards: Vec<MemberReward>,
}

/// Guilds with a positive score, best first. Equal scores go to the lower id.
pub fn rank_guilds(guilds: &[Guild]) -> Vec<&Guild> {
    let mut ranked: Vec<&Guild> = guilds.iter().filter(|g| g.tourney_score > 0).collect();
    ranked.sort_by(|a, b| b.tourney_score.cmp(&a.tourney_score).then(a.id.cmp(&b.id)));
    ranked
}

/// Closes the current edition.
///
/// The top guilds pay every member the reward for their rank and the winning
/// owner also gets an artifact piece. Every score goes back to zero and the
/// next edition starts at `now`.
pub fn reset_tourney(
    tourney: &mut Tourney,
    guilds: &mut [Guild],
    now: DateTime<Utc>,
    config: &GuildConfig,
    rng: &mut impl Rng,
) -> TourneyResult {
    let mut placements = Vec::new();
    let mut rewards = Vec::new();

    for (rank, guild) in rank_guilds(guilds)
        .into_iter()
        .take(config.tourney_rewards.len())
        .enumerate()
    {
        let reward = config.tourney_rewards[rank];
        placements.push(TourneyPlacement {
            rank: rank as u32 + 1,
            guild_id: guild.id,
            score: guild.tourney_score,
            reward_per_member: reward,
        });
        for &player_id in &guild.members {
            let mut delta = RewardDelta::new(new_outcome_id(rng), RewardSource::Tourney);
            delta.money = reward;
            if rank == 0 && player_id == guild.owner {
                delta.artifact_pieces = 1;
            }
            rewards.push(MemberReward { player_id, delta });
        }
    }

    for guild in guilds.iter_mut() {
        guild.tourney_score = 0;
    }

    let result = TourneyResult {
        edition: tourney.edition,
        placements,
        rewards,
    };

    tracing::info!(
        edition = tourney.edition,
        winners = result.placements.len(),
        "tourney reset"
    );

    tourney.edition += 1;
    tourney.start = now;
    result
}
