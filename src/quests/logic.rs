use std::collections::BTreeMap;

use chrono::Duration;
use rand::Rng;

use super::types::{FailureReason, QuestOutcome, QuestRewards, RollVerdict};
use crate::character::attributes::StatKind;
use crate::character::derived_stats::CharacterStats;
use crate::character::modifiers::Modifier;
use crate::core::config::{GameConfig, QuestConfig};
use crate::core::constants::*;
use crate::core::error::{GameError, Result};
use crate::core::ids::new_outcome_id;
use crate::zones::Zone;

/// Value a d20 roll has to reach for a quest to succeed.
///
/// # Arguments
/// * `player_level` / `gear_level` - Player sheet values
/// * `zone_level` - Must be at least 1
/// * `quest_number` - Attempts already made in the zone; 0 drops the sqrt term
///
/// # Returns
/// The threshold clamped to the configured bounds and truncated.
pub fn quest_threshold(
    player_level: u32,
    gear_level: u32,
    zone_level: u32,
    quest_number: u32,
    config: &QuestConfig,
) -> Result<u32> {
    if zone_level < 1 {
        return Err(GameError::InvalidZoneLevel(zone_level));
    }

    let zl = zone_level as f64;
    let pl = player_level as f64;
    let gl = gear_level as f64;

    let mut threshold = QUEST_THRESHOLD_BASE + zl - pl;
    if quest_number > 0 {
        let multiplier = QUEST_THRESHOLD_ZONE_FACTOR * zl - (gl + pl) / 2.0;
        let root = ((QUEST_THRESHOLD_SQRT_NUMERATOR / zl) * (quest_number - 1) as f64).sqrt();
        threshold += multiplier * root;
    }

    if !threshold.is_finite() {
        return Err(GameError::InvalidZoneLevel(zone_level));
    }

    let clamped = threshold.clamp(config.threshold_min as f64, config.threshold_max as f64);
    Ok(clamped as u32)
}

/// Judges a raw d20 roll. Natural 1 always fails and 19+ always succeeds;
/// anything else needs `roll + roll_bonus >= threshold`.
pub fn classify_roll(roll: u32, roll_bonus: i32, threshold: u32) -> RollVerdict {
    if roll <= 1 {
        return RollVerdict::Failure(FailureReason::CriticalFailure);
    }
    if roll >= QUEST_CRITICAL_SUCCESS_ROLL {
        return RollVerdict::CriticalSuccess;
    }
    if roll as i64 + roll_bonus as i64 >= threshold as i64 {
        RollVerdict::Success
    } else {
        RollVerdict::Failure(FailureReason::RollTooLow)
    }
}

/// XP and money for completing a quest, scaled by the quest multipliers of `modifier`.
pub fn quest_rewards(
    zone_level: u32,
    quest_number: u32,
    guild_level: u32,
    modifier: &Modifier,
    config: &QuestConfig,
    rng: &mut impl Rng,
) -> QuestRewards {
    let mult = zone_level as u64 * quest_number as u64 + guild_level as u64;
    let bonus = rng.gen_range(QUEST_BONUS_RANGE.0..=QUEST_BONUS_RANGE.1);

    let xp = config.base_xp_reward * mult + bonus;
    let money = config.base_money_reward * mult + bonus;

    QuestRewards {
        xp: (xp as f64 * modifier.quest_xp_mult.max(0.0)) as u64,
        money: (money as f64 * modifier.quest_money_mult.max(0.0)) as u64,
    }
}

/// Time a quest takes, floored at the configured minimum.
pub fn quest_duration(
    zone_level: u32,
    quest_number: u32,
    agility: u32,
    time_mult: f64,
    config: &QuestConfig,
    rng: &mut impl Rng,
) -> Duration {
    let random_steps = rng.gen_range(0..=zone_level) as i64;
    let variable = config.duration_per_zone_level_minutes * zone_level as i64
        + config.duration_per_quest_number_minutes * quest_number as i64
        + config.random_duration_minutes * random_steps;
    let scaled = (variable as f64 * time_mult.max(0.0)) as i64;

    let minutes =
        config.base_duration_minutes + scaled - config.agility_reduction_minutes * agility as i64;
    Duration::minutes(minutes).max(config.min_duration())
}

fn essence_rewards(zone: &Zone, rng: &mut impl Rng) -> BTreeMap<StatKind, u32> {
    if !zone.essences.is_empty() {
        return zone.essences.clone();
    }
    let all = StatKind::all();
    let stat = all[rng.gen_range(0..all.len())];
    BTreeMap::from([(stat, 1)])
}

/// Rolls a d20 and resolves a quest attempt.
pub fn resolve_quest(
    player: &CharacterStats,
    zone: &Zone,
    quest_number: u32,
    guild_level: u32,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> Result<QuestOutcome> {
    zone.validate()?;
    let roll = rng.gen_range(1..=QUEST_DIE_FACES);
    resolve_with_roll(player, zone, quest_number, guild_level, roll, config, rng)
}

/// Resolves a quest attempt against an already rolled d20.
///
/// The remaining random draws (reward bonus, artifact, essence, duration)
/// still come from `rng`.
pub fn resolve_with_roll(
    player: &CharacterStats,
    zone: &Zone,
    quest_number: u32,
    guild_level: u32,
    roll: u32,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> Result<QuestOutcome> {
    let threshold = quest_threshold(
        player.level,
        player.gear_level,
        zone.level,
        quest_number,
        &config.quest,
    )?;
    let modifier = &player.modifiers;
    let verdict = classify_roll(roll, modifier.roll_bonus, threshold);
    let success = verdict.is_success();

    let rewards = quest_rewards(
        zone.level,
        quest_number,
        guild_level,
        modifier,
        &config.quest,
        rng,
    );

    let (xp_delta, money_delta, prestige_delta, artifact_piece_found, essences) = if success {
        let chance = (config.quest.artifact_chance + modifier.artifact_drop_bonus).clamp(0.0, 1.0);
        let artifact = rng.gen_bool(chance);
        let essences = essence_rewards(zone, rng);
        (
            rewards.xp,
            rewards.money,
            zone.level as u64 + quest_number as u64,
            artifact,
            essences,
        )
    } else {
        let fail_mult = modifier.quest_fail_rewards_mult.max(0.0);
        (
            (rewards.xp as f64 * fail_mult) as u64,
            (rewards.money as f64 * fail_mult) as u64,
            0,
            false,
            BTreeMap::new(),
        )
    };

    let duration = quest_duration(
        zone.level,
        quest_number,
        player.stats.agility(),
        modifier.quest_time_mult,
        &config.quest,
        rng,
    );

    tracing::debug!(
        player = %player.name,
        zone = zone.id,
        quest_number,
        roll,
        threshold,
        success,
        "quest resolved"
    );

    Ok(QuestOutcome {
        id: new_outcome_id(rng),
        zone_id: zone.id,
        quest_number,
        success,
        roll,
        threshold,
        xp_delta,
        money_delta,
        prestige_delta,
        artifact_piece_found,
        duration,
        essences,
        failure_reason: verdict.failure_reason(),
    })
}
