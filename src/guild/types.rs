//! Guild records and the operations that only touch a single guild.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::config::GuildConfig;
use crate::core::error::{GameError, Result};
use crate::core::ids::{GuildId, PlayerId};
use crate::progression::{quadratic_cost, RewardDelta};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Guild {
    pub id: GuildId,
    pub name: String,
    pub owner: PlayerId,
    /// 1..=max_level.
    pub level: u32,
    /// Owner first, then in join order.
    pub members: Vec<PlayerId>,
    pub prestige: u64,
    pub tourney_score: u64,
    /// Percent of member quest money paid into the bank.
    pub tax: u32,
    pub bank: u64,
    pub created_at: DateTime<Utc>,
    pub last_raid: Option<DateTime<Utc>>,
}

/// A reward addressed to one guild member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemberReward {
    pub player_id: PlayerId,
    pub delta: RewardDelta,
}

/// Tourney points for one quest: `prestige * scale / max(1, members)`.
pub fn tourney_contribution(prestige: u64, members: usize, config: &GuildConfig) -> u64 {
    prestige * config.tourney_score_scale / members.max(1) as u64
}

impl Guild {
    pub fn new(
        id: GuildId,
        name: impl Into<String>,
        owner: PlayerId,
        config: &GuildConfig,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            owner,
            level: 1,
            members: vec![owner],
            prestige: 0,
            tourney_score: 0,
            tax: config.default_tax,
            bank: 0,
            created_at: now,
            last_raid: None,
        }
    }

    /// Members allowed at the current level.
    pub fn capacity(&self, config: &GuildConfig) -> u32 {
        (config.players_per_level * self.level).min(config.max_players)
    }

    pub fn is_member(&self, player: PlayerId) -> bool {
        self.members.contains(&player)
    }

    pub fn add_member(&mut self, player: PlayerId, config: &GuildConfig) -> Result<()> {
        if self.is_member(player) {
            return Err(GameError::AlreadyMember(player));
        }
        let capacity = self.capacity(config);
        if self.members.len() as u32 >= capacity {
            return Err(GameError::GuildFull { capacity });
        }
        self.members.push(player);
        Ok(())
    }

    /// The owner cannot leave their own guild.
    pub fn remove_member(&mut self, player: PlayerId) -> Result<()> {
        if player == self.owner {
            return Err(GameError::ActionNotPermitted(
                "the owner cannot leave the guild".to_string(),
            ));
        }
        let index = self
            .members
            .iter()
            .position(|&m| m == player)
            .ok_or(GameError::NotAMember(player))?;
        self.members.remove(index);
        Ok(())
    }

    pub fn upgrade_cost(&self, config: &GuildConfig) -> u64 {
        quadratic_cost(config.upgrade_cost, self.level)
    }

    /// Levels the guild up, paid from the bank. Returns the amount spent.
    pub fn upgrade(&mut self, config: &GuildConfig) -> Result<u64> {
        if self.level >= config.max_level {
            return Err(GameError::MaxLevelReached(config.max_level));
        }
        let cost = self.upgrade_cost(config);
        if self.bank < cost {
            return Err(GameError::InsufficientFunds {
                required: cost,
                available: self.bank,
            });
        }
        self.bank -= cost;
        self.level += 1;
        tracing::info!(guild = self.id, level = self.level, cost, "guild upgraded");
        Ok(cost)
    }

    pub fn set_tax(&mut self, rate: u32, config: &GuildConfig) -> Result<()> {
        if rate > config.max_tax {
            return Err(GameError::InvalidTax {
                rate,
                max: config.max_tax,
            });
        }
        self.tax = rate;
        Ok(())
    }

    pub fn deposit(&mut self, amount: u64) {
        self.bank += amount;
    }

    pub fn withdraw(&mut self, amount: u64) -> Result<()> {
        if self.bank < amount {
            return Err(GameError::InsufficientFunds {
                required: amount,
                available: self.bank,
            });
        }
        self.bank -= amount;
        Ok(())
    }

    /// Moves the guild's share of `money` into the bank and returns what the member keeps.
    pub fn collect_tax(&mut self, money: u64) -> u64 {
        let cut = money * self.tax as u64 / 100;
        self.bank += cut;
        money - cut
    }

    pub fn tourney_contribution(&self, prestige: u64, config: &GuildConfig) -> u64 {
        tourney_contribution(prestige, self.members.len(), config)
    }

    /// Books a member's completed quest. Returns the tourney points it earned.
    pub fn record_quest(&mut self, prestige: u64, config: &GuildConfig) -> u64 {
        let points = self.tourney_contribution(prestige, config);
        self.prestige += prestige;
        self.tourney_score += points;
        points
    }
}
