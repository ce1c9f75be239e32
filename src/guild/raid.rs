//! Guild raids.
//!
//! A raid is formed by a guild, joined by members who are in town, and then
//! driven by the caller with explicit timestamps:
//! `Forming -> Active -> BossPhase -> Resolved | Failed(LeaderDead)`.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::{Guild, MemberReward};
use crate::character::derived_stats::CharacterStats;
use crate::combat::scaled_monster;
use crate::core::config::RaidConfig;
use crate::core::error::{GameError, Result};
use crate::core::ids::{member_outcome_id, new_outcome_id, GuildId, PlayerId};
use crate::progression::{RewardDelta, RewardSource};
use crate::zones::Zone;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RaidFailure {
    LeaderDead,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RaidPhase {
    Forming,
    Active,
    BossPhase,
    Resolved,
    Failed(RaidFailure),
}

impl RaidPhase {
    pub fn is_running(&self) -> bool {
        matches!(self, RaidPhase::Active | RaidPhase::BossPhase)
    }

    pub fn is_over(&self) -> bool {
        matches!(self, RaidPhase::Resolved | RaidPhase::Failed(_))
    }
}

/// Snapshot of a member taken when they join.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RaidParticipant {
    pub player_id: PlayerId,
    pub name: String,
    pub level: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub in_town: bool,
}

impl RaidParticipant {
    pub fn from_stats(player_id: PlayerId, stats: &CharacterStats, in_town: bool) -> Self {
        Self {
            player_id,
            name: stats.name.clone(),
            level: stats.level,
            hp: stats.hp,
            max_hp: stats.max_hp,
            in_town,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Raid {
    pub id: Uuid,
    pub guild_id: GuildId,
    pub leader: PlayerId,
    pub zone: Zone,
    pub phase: RaidPhase,
    pub participants: Vec<RaidParticipant>,
    /// One per participant, spawned at start.
    pub monsters: Vec<CharacterStats>,
    pub boss: Option<CharacterStats>,
    pub started_at: Option<DateTime<Utc>>,
    #[serde(with = "crate::core::time")]
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RaidResult {
    pub raid_id: Uuid,
    pub guild_id: GuildId,
    pub success: bool,
    pub phase: RaidPhase,
    pub participants: Vec<PlayerId>,
    pub rewards: Vec<MemberReward>,
}

impl Raid {
    /// Opens a raid led by the guild owner.
    pub fn form(guild: &Guild, zone: Zone, rng: &mut impl Rng) -> Result<Self> {
        zone.validate()?;
        Ok(Self {
            id: new_outcome_id(rng),
            guild_id: guild.id,
            leader: guild.owner,
            zone,
            phase: RaidPhase::Forming,
            participants: Vec::new(),
            monsters: Vec::new(),
            boss: None,
            started_at: None,
            elapsed: Duration::zero(),
        })
    }

    fn invalid_transition(&self) -> GameError {
        GameError::InvalidRaidTransition(format!("{:?}", self.phase))
    }

    pub fn participant(&self, player: PlayerId) -> Option<&RaidParticipant> {
        self.participants.iter().find(|p| p.player_id == player)
    }

    pub fn leader_alive(&self) -> bool {
        self.participant(self.leader).map_or(false, |p| p.hp > 0)
    }

    pub fn join(&mut self, guild: &Guild, participant: RaidParticipant) -> Result<()> {
        if self.phase != RaidPhase::Forming {
            return Err(self.invalid_transition());
        }
        if !guild.is_member(participant.player_id) {
            return Err(GameError::NotAMember(participant.player_id));
        }
        if self.participant(participant.player_id).is_some() {
            return Err(GameError::AlreadyMember(participant.player_id));
        }
        self.participants.push(participant);
        Ok(())
    }

    /// Starts the raid and spawns one scaled monster per participant.
    ///
    /// The leader must have joined, everybody must be in town and the guild's
    /// raid cooldown must have passed. Location is not checked again later.
    pub fn start(
        &mut self,
        guild: &mut Guild,
        now: DateTime<Utc>,
        config: &RaidConfig,
        rng: &mut impl Rng,
    ) -> Result<()> {
        if self.phase != RaidPhase::Forming {
            return Err(self.invalid_transition());
        }
        if let Some(last) = guild.last_raid {
            let ready_at = last + config.cooldown();
            if now < ready_at {
                return Err(GameError::RaidPreconditionFailed(format!(
                    "guild can raid again at {}",
                    ready_at
                )));
            }
        }
        if self.participant(self.leader).is_none() {
            return Err(GameError::RaidPreconditionFailed(
                "the guild leader has not joined".to_string(),
            ));
        }
        if let Some(away) = self.participants.iter().find(|p| !p.in_town) {
            return Err(GameError::RaidPreconditionFailed(format!(
                "{} is not in town",
                away.name
            )));
        }

        self.monsters = self
            .participants
            .iter()
            .map(|_| scaled_monster(&self.zone, 0, rng))
            .collect();
        self.phase = RaidPhase::Active;
        self.started_at = Some(now);
        guild.last_raid = Some(now);

        tracing::info!(
            raid = %self.id,
            guild = self.guild_id,
            participants = self.participants.len(),
            "raid started"
        );
        Ok(())
    }

    /// Moves the raid clock to `now`. Spawns the boss once the threshold has
    /// passed and resolves the raid at the end of its duration.
    pub fn advance(&mut self, now: DateTime<Utc>, config: &RaidConfig, rng: &mut impl Rng) -> Result<RaidPhase> {
        let started_at = match self.started_at {
            Some(t) if self.phase.is_running() => t,
            _ => return Err(self.invalid_transition()),
        };
        self.elapsed = (now - started_at).max(Duration::zero());

        if self.phase == RaidPhase::Active && self.elapsed >= config.boss_threshold() {
            self.boss = Some(scaled_monster(&self.zone, config.boss_level_bonus, rng));
            self.phase = RaidPhase::BossPhase;
            tracing::info!(raid = %self.id, "raid boss spawned");
        }
        if self.elapsed >= config.duration() {
            self.phase = RaidPhase::Resolved;
            tracing::info!(raid = %self.id, "raid resolved");
        }
        Ok(self.phase)
    }

    /// Records a participant's HP. The raid fails at once if the leader drops to 0.
    pub fn update_participant_hp(&mut self, player: PlayerId, hp: u32) -> Result<RaidPhase> {
        if !self.phase.is_running() {
            return Err(self.invalid_transition());
        }
        let participant = self
            .participants
            .iter_mut()
            .find(|p| p.player_id == player)
            .ok_or(GameError::NotAMember(player))?;
        participant.hp = hp.min(participant.max_hp);

        if player == self.leader && participant.hp == 0 {
            self.phase = RaidPhase::Failed(RaidFailure::LeaderDead);
            tracing::info!(raid = %self.id, "raid failed, leader dead");
        }
        Ok(self.phase)
    }

    /// Final report of a finished raid. Successful raids reward every participant.
    ///
    /// Reward ids are derived from the raid id, so asking twice yields the
    /// same deltas and a replayed reward is rejected by the ledger.
    pub fn result(&self, config: &RaidConfig) -> Result<RaidResult> {
        if !self.phase.is_over() {
            return Err(self.invalid_transition());
        }
        let success = self.phase == RaidPhase::Resolved;
        let zone_level = self.zone.level as u64;
        let rewards = if success {
            self.participants
                .iter()
                .map(|p| {
                    let id = member_outcome_id(&self.id, p.player_id);
                    let mut delta = RewardDelta::new(id, RewardSource::Raid);
                    delta.xp = config.xp_per_zone_level * zone_level;
                    delta.money = config.money_per_zone_level * zone_level;
                    MemberReward {
                        player_id: p.player_id,
                        delta,
                    }
                })
                .collect()
        } else {
            Vec::new()
        };

        Ok(RaidResult {
            raid_id: self.id,
            guild_id: self.guild_id,
            success,
            phase: self.phase,
            participants: self.participants.iter().map(|p| p.player_id).collect(),
            rewards,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::GuildConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn participant(player_id: PlayerId, in_town: bool) -> RaidParticipant {
        RaidParticipant {
            player_id,
            name: format!("Player {}", player_id),
            level: 10,
            hp: 100,
            max_hp: 100,
            in_town,
        }
    }

    fn setup(rng: &mut ChaCha8Rng) -> (Guild, Raid) {
        let config = GuildConfig::default();
        let mut guild = Guild::new(1, "Ashen Road", 10, &config, Utc::now());
        guild.add_member(11, &config).unwrap();
        guild.add_member(12, &config).unwrap();
        let raid = Raid::form(&guild, Zone::new(4, "Sunken Keep", 8), rng).unwrap();
        (guild, raid)
    }

    #[test]
    fn test_join_rules() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let (guild, mut raid) = setup(&mut rng);
        raid.join(&guild, participant(10, true)).unwrap();
        assert!(matches!(
            raid.join(&guild, participant(10, true)),
            Err(GameError::AlreadyMember(10))
        ));
        assert!(matches!(
            raid.join(&guild, participant(99, true)),
            Err(GameError::NotAMember(99))
        ));
    }

    #[test]
    fn test_start_requires_everyone_in_town() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let (mut guild, mut raid) = setup(&mut rng);
        raid.join(&guild, participant(10, true)).unwrap();
        raid.join(&guild, participant(11, false)).unwrap();
        let result = raid.start(&mut guild, Utc::now(), &RaidConfig::default(), &mut rng);
        assert!(matches!(result, Err(GameError::RaidPreconditionFailed(_))));
        assert_eq!(raid.phase, RaidPhase::Forming);
        assert!(guild.last_raid.is_none());
    }

    #[test]
    fn test_start_requires_leader() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let (mut guild, mut raid) = setup(&mut rng);
        raid.join(&guild, participant(11, true)).unwrap();
        let result = raid.start(&mut guild, Utc::now(), &RaidConfig::default(), &mut rng);
        assert!(matches!(result, Err(GameError::RaidPreconditionFailed(_))));
    }

    #[test]
    fn test_cooldown() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let config = RaidConfig::default();
        let (mut guild, mut raid) = setup(&mut rng);
        let now = Utc::now();
        guild.last_raid = Some(now - Duration::days(6));
        raid.join(&guild, participant(10, true)).unwrap();
        assert!(raid.start(&mut guild, now, &config, &mut rng).is_err());
        guild.last_raid = Some(now - Duration::days(7));
        assert!(raid.start(&mut guild, now, &config, &mut rng).is_ok());
        assert_eq!(guild.last_raid, Some(now));
    }

    #[test]
    fn test_full_lifecycle() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let config = RaidConfig::default();
        let (mut guild, mut raid) = setup(&mut rng);
        for id in [10, 11, 12] {
            raid.join(&guild, participant(id, true)).unwrap();
        }
        let start = Utc::now();
        raid.start(&mut guild, start, &config, &mut rng).unwrap();
        assert_eq!(raid.monsters.len(), 3);
        assert!(raid.monsters.iter().all(|m| m.level == 8));

        assert_eq!(raid.advance(start + Duration::hours(17), &config, &mut rng).unwrap(), RaidPhase::Active);
        assert!(raid.boss.is_none());
        assert_eq!(raid.advance(start + Duration::hours(18), &config, &mut rng).unwrap(), RaidPhase::BossPhase);
        assert_eq!(raid.boss.as_ref().map(|b| b.level), Some(13));

        raid.update_participant_hp(11, 0).unwrap();
        assert_eq!(raid.phase, RaidPhase::BossPhase);

        assert_eq!(raid.advance(start + Duration::hours(24), &config, &mut rng).unwrap(), RaidPhase::Resolved);
        let result = raid.result(&config).unwrap();
        assert!(result.success);
        assert_eq!(result.rewards.len(), 3);
        assert_eq!(result.rewards[0].delta.xp, 8_000);
        assert_eq!(result.rewards[0].delta.money, 4_000);
        assert_eq!(raid.result(&config).unwrap(), result);
    }

    #[test]
    fn test_leader_death_fails_immediately() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let config = RaidConfig::default();
        let (mut guild, mut raid) = setup(&mut rng);
        raid.join(&guild, participant(10, true)).unwrap();
        raid.join(&guild, participant(11, true)).unwrap();
        let start = Utc::now();
        raid.start(&mut guild, start, &config, &mut rng).unwrap();

        let phase = raid.update_participant_hp(10, 0).unwrap();
        assert_eq!(phase, RaidPhase::Failed(RaidFailure::LeaderDead));
        assert!(raid.advance(start + Duration::hours(24), &config, &mut rng).is_err());

        let result = raid.result(&config).unwrap();
        assert!(!result.success);
        assert!(result.rewards.is_empty());
    }

    #[test]
    fn test_result_before_end_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let (_, raid) = setup(&mut rng);
        assert!(matches!(
            raid.result(&RaidConfig::default()),
            Err(GameError::InvalidRaidTransition(_))
        ));
    }
}
