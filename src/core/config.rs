//! Game configuration.
//!
//! All tunable numbers of the simulation live here and are passed explicitly
//! into every resolver. Each section falls back to the defaults in
//! `constants.rs`, so a config file only has to name what it overrides.

use std::fs;
use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::constants::*;
use super::error::{GameError, Result};
use crate::events::QteDefinition;

/// Top-level configuration consumed by the simulation core.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub quest: QuestConfig,
    pub combat: CombatConfig,
    pub progression: ProgressionConfig,
    pub guild: GuildConfig,
    pub raid: RaidConfig,
    pub events: EventConfig,
}

impl GameConfig {
    /// Parses a TOML document and validates the result.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!(path = %path.as_ref().display(), "loaded game config");
        Ok(config)
    }

    /// Rejects combinations that would make the formulas meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.quest.threshold_min > self.quest.threshold_max {
            return Err(GameError::Config(format!(
                "quest.threshold_min ({}) is above quest.threshold_max ({})",
                self.quest.threshold_min, self.quest.threshold_max
            )));
        }
        if self.quest.threshold_max > QUEST_DIE_FACES {
            return Err(GameError::Config(format!(
                "quest.threshold_max ({}) exceeds the die size ({})",
                self.quest.threshold_max, QUEST_DIE_FACES
            )));
        }
        if self.quest.min_duration_minutes <= 0 {
            return Err(GameError::Config(
                "quest.min_duration_minutes must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.combat.max_dodge_reduction) {
            return Err(GameError::Config(
                "combat.max_dodge_reduction must be within [0, 1]".to_string(),
            ));
        }
        if !(self.combat.stamina_weight_scale.is_finite() && self.combat.stamina_weight_scale > 0.0) {
            return Err(GameError::Config(
                "combat.stamina_weight_scale must be a positive number".to_string(),
            ));
        }
        if self.combat.sudden_death_damage == 0 {
            return Err(GameError::Config(
                "combat.sudden_death_damage must be positive".to_string(),
            ));
        }
        let curves = [
            ("progression.xp_curve", self.progression.xp_curve),
            ("progression.gear_cost", self.progression.gear_cost),
            ("progression.home_cost", self.progression.home_cost),
            ("guild.upgrade_cost", self.guild.upgrade_cost),
        ];
        for (name, (a, b)) in curves {
            if a.saturating_add(b) == 0 {
                return Err(GameError::Config(format!("{} must cost something at level 1", name)));
            }
        }
        if self.progression.artifact_assembly_threshold == 0 {
            return Err(GameError::Config(
                "progression.artifact_assembly_threshold must be at least 1".to_string(),
            ));
        }
        if self.guild.players_per_level == 0 || self.guild.max_level == 0 {
            return Err(GameError::Config(
                "guild capacity table must be non-empty".to_string(),
            ));
        }
        if self.raid.boss_threshold_hours > self.raid.duration_hours {
            return Err(GameError::Config(
                "raid.boss_threshold_hours must not exceed raid.duration_hours".to_string(),
            ));
        }
        for qte in &self.events.qtes {
            qte.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestConfig {
    pub base_xp_reward: u64,
    pub base_money_reward: u64,
    pub threshold_min: u32,
    pub threshold_max: u32,
    pub artifact_chance: f64,
    pub base_duration_minutes: i64,
    pub duration_per_zone_level_minutes: i64,
    pub duration_per_quest_number_minutes: i64,
    pub random_duration_minutes: i64,
    pub agility_reduction_minutes: i64,
    pub min_duration_minutes: i64,
}

impl Default for QuestConfig {
    fn default() -> Self {
        Self {
            base_xp_reward: BASE_XP_REWARD,
            base_money_reward: BASE_MONEY_REWARD,
            threshold_min: QUEST_THRESHOLD_MIN,
            threshold_max: QUEST_THRESHOLD_MAX,
            artifact_chance: QUEST_ARTIFACT_CHANCE,
            base_duration_minutes: QUEST_BASE_DURATION_MINUTES,
            duration_per_zone_level_minutes: QUEST_DURATION_PER_ZONE_LEVEL_MINUTES,
            duration_per_quest_number_minutes: QUEST_DURATION_PER_QUEST_NUMBER_MINUTES,
            random_duration_minutes: QUEST_RANDOM_DURATION_MINUTES,
            agility_reduction_minutes: QUEST_DURATION_REDUCTION_PER_AGILITY_MINUTES,
            min_duration_minutes: QUEST_BASE_DURATION_MINUTES,
        }
    }
}

impl QuestConfig {
    pub fn base_duration(&self) -> Duration {
        Duration::minutes(self.base_duration_minutes)
    }

    pub fn min_duration(&self) -> Duration {
        Duration::minutes(self.min_duration_minutes)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub aim_multiplier: f64,
    pub max_dodge_reduction: f64,
    pub dodge_base_charge: f64,
    pub dodge_charge_per_agility: f64,
    pub dodge_penalty_per_weight: f64,
    pub auto_heal_hp_fraction: f64,
    pub revive_hp_fraction: f64,
    pub attack_stamina_base: f64,
    pub stamina_per_weight: f64,
    pub stamina_regen: f64,
    pub stamina_weight_scale: f64,
    pub max_turns: u32,
    pub sudden_death_damage: u32,
    pub reward_per_level: u64,
    pub reward_per_level_gap: u64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            aim_multiplier: AIM_MULTIPLIER,
            max_dodge_reduction: MAX_DODGE_REDUCTION,
            dodge_base_charge: DODGE_BASE_CHARGE,
            dodge_charge_per_agility: DODGE_CHARGE_PER_AGILITY,
            dodge_penalty_per_weight: DODGE_CHARGE_PENALTY_PER_WEIGHT,
            auto_heal_hp_fraction: AUTO_HEAL_HP_FRACTION,
            revive_hp_fraction: REVIVE_HP_FRACTION,
            attack_stamina_base: ATTACK_STAMINA_BASE,
            stamina_per_weight: STAMINA_PER_WEIGHT,
            stamina_regen: STAMINA_REGEN,
            stamina_weight_scale: STAMINA_WEIGHT_SCALE,
            max_turns: MAX_COMBAT_TURNS,
            sudden_death_damage: SUDDEN_DEATH_DAMAGE_PER_TURN,
            reward_per_level: COMBAT_REWARD_PER_LEVEL,
            reward_per_level_gap: COMBAT_REWARD_PER_LEVEL_GAP,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    pub xp_curve: (u64, u64),
    pub gear_cost: (u64, u64),
    pub home_cost: (u64, u64),
    pub max_home_level: u32,
    pub artifact_assembly_threshold: u32,
    pub power_per_artifact: u32,
    pub power_per_ascension: u32,
    pub power_per_day: u32,
    pub ascension_minimum_level: u32,
    pub ascension_level_increase: u32,
    pub ascension_threshold: u32,
    pub ascension_xp_bonus: f64,
    pub default_money: u64,
    pub default_gear_level: u32,
    pub default_home_level: u32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            xp_curve: (XP_CURVE_QUADRATIC, XP_CURVE_LINEAR),
            gear_cost: (GEAR_COST_QUADRATIC, GEAR_COST_LINEAR),
            home_cost: (HOME_COST_QUADRATIC, HOME_COST_LINEAR),
            max_home_level: MAX_HOME_LEVEL,
            artifact_assembly_threshold: ARTIFACT_ASSEMBLY_THRESHOLD,
            power_per_artifact: POWER_PER_ARTIFACT,
            power_per_ascension: POWER_PER_ASCENSION,
            power_per_day: POWER_PER_DAY,
            ascension_minimum_level: ASCENSION_MINIMUM_LEVEL,
            ascension_level_increase: ASCENSION_LEVEL_INCREASE,
            ascension_threshold: ASCENSION_ARTIFACT_THRESHOLD,
            ascension_xp_bonus: ASCENSION_XP_BONUS,
            default_money: DEFAULT_MONEY,
            default_gear_level: DEFAULT_GEAR_LEVEL,
            default_home_level: DEFAULT_HOME_LEVEL,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuildConfig {
    pub max_level: u32,
    pub players_per_level: u32,
    pub max_players: u32,
    pub upgrade_cost: (u64, u64),
    pub max_tax: u32,
    pub default_tax: u32,
    pub tourney_score_scale: u64,
    pub tourney_duration_days: i64,
    pub tourney_rewards: [u64; 3],
}

impl Default for GuildConfig {
    fn default() -> Self {
        Self {
            max_level: GUILD_MAX_LEVEL,
            players_per_level: GUILD_PLAYERS_PER_LEVEL,
            max_players: GUILD_MAX_PLAYERS,
            upgrade_cost: (GUILD_COST_QUADRATIC, GUILD_COST_LINEAR),
            max_tax: GUILD_MAX_TAX,
            default_tax: GUILD_DEFAULT_TAX,
            tourney_score_scale: TOURNEY_SCORE_SCALE,
            tourney_duration_days: TOURNEY_DURATION_DAYS,
            tourney_rewards: TOURNEY_REWARDS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RaidConfig {
    pub duration_hours: i64,
    pub boss_threshold_hours: i64,
    pub cooldown_days: i64,
    pub boss_level_bonus: u32,
    pub xp_per_zone_level: u64,
    pub money_per_zone_level: u64,
}

impl Default for RaidConfig {
    fn default() -> Self {
        Self {
            duration_hours: RAID_DURATION_HOURS,
            boss_threshold_hours: RAID_BOSS_THRESHOLD_HOURS,
            cooldown_days: RAID_COOLDOWN_DAYS,
            boss_level_bonus: RAID_BOSS_LEVEL_BONUS,
            xp_per_zone_level: RAID_XP_PER_ZONE_LEVEL,
            money_per_zone_level: RAID_MONEY_PER_ZONE_LEVEL,
        }
    }
}

impl RaidConfig {
    pub fn duration(&self) -> Duration {
        Duration::hours(self.duration_hours)
    }

    pub fn boss_threshold(&self) -> Duration {
        Duration::hours(self.boss_threshold_hours)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::days(self.cooldown_days)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    pub base_value: u64,
    pub level_tolerance: u32,
    pub qtes: Vec<QteDefinition>,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            base_value: EVENT_BASE_VALUE,
            level_tolerance: EVENT_LEVEL_TOLERANCE,
            qtes: Vec::new(),
        }
    }
}
