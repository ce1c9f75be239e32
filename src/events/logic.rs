use rand::Rng;

use super::types::{EventOutcome, QteDefinition, QteOutcome};
use crate::character::derived_stats::CharacterStats;
use crate::core::config::EventConfig;
use crate::core::constants::EVENT_ROLL_RANGE;
use crate::core::error::{GameError, Result};
use crate::core::ids::new_outcome_id;
use crate::zones::Zone;

/// One roll of the event reward formula.
///
/// Players close enough to the zone level also get the zone level in the
/// multiplier. Town events (`zone_level == 0`) only scale with home level.
pub fn event_value(
    player_level: u32,
    home_level: u32,
    zone_level: u32,
    zone_bonus: u64,
    config: &EventConfig,
    rng: &mut impl Rng,
) -> u64 {
    let roll = rng.gen_range(EVENT_ROLL_RANGE.0..=EVENT_ROLL_RANGE.1);
    let mut base = config.base_value + home_level as u64;
    if player_level >= zone_level.saturating_sub(config.level_tolerance) {
        base += zone_level as u64;
    }
    base * roll + zone_bonus
}

/// Rewards of an event in `zone`, or in town when `zone` is `None`.
/// XP and money are rolled separately.
pub fn resolve_zone_event(
    player: &CharacterStats,
    zone: Option<&Zone>,
    config: &EventConfig,
    rng: &mut impl Rng,
) -> EventOutcome {
    let (zone_level, bonus) = zone.map_or((0, 0), |z| (z.level, z.event_bonus));
    let modifier = &player.modifiers;

    let xp_value = event_value(player.level, player.home_level, zone_level, bonus, config, rng);
    let money_value = event_value(player.level, player.home_level, zone_level, bonus, config, rng);
    let xp = (xp_value as f64 * modifier.event_xp_mult) as u64;
    let money = (money_value as f64 * modifier.event_money_mult) as u64;

    tracing::debug!(player = %player.name, zone_level, xp, money, "zone event");

    EventOutcome {
        id: new_outcome_id(rng),
        zone_level,
        xp,
        money,
    }
}

/// Rolls 1..=100 against the chance of the chosen option.
///
/// Success hands back the option's rewards, failure its maluses.
pub fn resolve_qte(qte: &QteDefinition, option: usize, rng: &mut impl Rng) -> Result<QteOutcome> {
    let chosen = qte.options.get(option).ok_or(GameError::InvalidQteOption(option))?;
    let roll = rng.gen_range(1..=100);
    let success = roll <= chosen.chance;

    tracing::debug!(option = %chosen.label, roll, success, "quick time event");

    let (gains, losses) = if success {
        (chosen.rewards.effects().to_vec(), Vec::new())
    } else {
        (Vec::new(), chosen.maluses.effects().to_vec())
    };

    Ok(QteOutcome {
        id: new_outcome_id(rng),
        option,
        success,
        roll,
        gains,
        losses,
    })
}
