//! Ascension: trade levels, money and gear for permanent stat growth.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::types::ProgressionRecord;
use crate::character::attributes::StatKind;
use crate::core::config::GameConfig;
use crate::core::error::{GameError, Result};

/// `n`th triangular number: the essence cost of raising a stat by `n`.
pub fn triangular(n: u32) -> u64 {
    let n = n as u64;
    n * (n + 1) / 2
}

/// Largest `n` with `triangular(n) <= essence`.
pub fn affordable_increase(essence: u32) -> u32 {
    // Closed form, then corrected for float rounding
    let mut n = (((8.0 * essence as f64 + 1.0).sqrt() - 1.0) / 2.0) as u32;
    while triangular(n + 1) <= essence as u64 {
        n += 1;
    }
    while n > 0 && triangular(n) > essence as u64 {
        n -= 1;
    }
    n
}

/// Level needed to ascend from `ascension`.
pub fn required_level(ascension: u32, config: &GameConfig) -> u32 {
    let p = &config.progression;
    p.ascension_minimum_level + p.ascension_level_increase * ascension
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AscensionResult {
    pub ascension: u32,
    pub stat_increases: BTreeMap<StatKind, u32>,
    pub essence_spent: BTreeMap<StatKind, u32>,
    pub essence_left: BTreeMap<StatKind, u32>,
    pub pieces_consumed: u32,
}

/// Checks both ascension preconditions without touching the record.
pub fn check_eligibility(record: &ProgressionRecord, config: &GameConfig) -> Result<()> {
    let level = required_level(record.ascension, config);
    if record.level < level {
        return Err(GameError::AscensionIneligible(format!(
            "level {} required, currently {}",
            level, record.level
        )));
    }
    let pieces = config.progression.ascension_threshold;
    if record.artifact_pieces < pieces {
        return Err(GameError::AscensionIneligible(format!(
            "{} artifact pieces required, {} held",
            pieces, record.artifact_pieces
        )));
    }
    Ok(())
}

/// Ascends the player.
///
/// Level, XP, gear level and money go back to their defaults and every
/// non-relic item is lost. Each essence counter buys the largest stat
/// increase it can afford; whatever is left over stays for the next time.
pub fn ascend(record: &mut ProgressionRecord, config: &GameConfig) -> Result<AscensionResult> {
    check_eligibility(record, config)?;

    let progression = &config.progression;
    let mut stat_increases = BTreeMap::new();
    let mut essence_spent = BTreeMap::new();

    for (stat, essence) in record.essences.iter_mut() {
        let n = affordable_increase(*essence);
        if n == 0 {
            continue;
        }
        let cost = triangular(n) as u32;
        *essence -= cost;
        record.stats.increase(*stat, n);
        stat_increases.insert(*stat, n);
        essence_spent.insert(*stat, cost);
    }

    record.artifact_pieces -= progression.ascension_threshold;
    record.level = 1;
    record.xp = 0;
    record.gear_level = progression.default_gear_level;
    record.money = progression.default_money;
    record.equipment.strip_non_relics();
    record.ascension += 1;

    tracing::info!(
        player = record.player_id,
        ascension = record.ascension,
        ?stat_increases,
        "ascended"
    );

    Ok(AscensionResult {
        ascension: record.ascension,
        stat_increases,
        essence_spent,
        essence_left: record.essences.clone(),
        pieces_consumed: progression.ascension_threshold,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn eligible(config: &GameConfig) -> ProgressionRecord {
        let mut record = ProgressionRecord::new(1, "Ada", config, Utc::now());
        record.level = 30;
        record.artifact_pieces = 12;
        record.money = 99_999;
        record.gear_level = 14;
        record
    }

    #[test]
    fn test_triangular_numbers() {
        let expected = [0, 1, 3, 6, 10, 15];
        for (n, cost) in expected.iter().enumerate() {
            assert_eq!(triangular(n as u32), *cost);
        }
    }

    #[test]
    fn test_affordable_increase() {
        assert_eq!(affordable_increase(0), 0);
        assert_eq!(affordable_increase(1), 1);
        assert_eq!(affordable_increase(2), 1);
        assert_eq!(affordable_increase(3), 2);
        assert_eq!(affordable_increase(9), 3);
        assert_eq!(affordable_increase(10), 4);
    }

    #[test]
    fn test_required_level_grows() {
        let config = GameConfig::default();
        assert_eq!(required_level(0, &config), 30);
        assert_eq!(required_level(2, &config), 50);
    }

    #[test]
    fn test_ascension_resets_and_converts() {
        let config = GameConfig::default();
        let mut record = eligible(&config);
        record.essences.insert(StatKind::Strength, 8);
        record.essences.insert(StatKind::Mind, 1);

        let result = ascend(&mut record, &config).unwrap();
        assert_eq!(result.ascension, 1);
        assert_eq!(result.stat_increases.get(&StatKind::Strength), Some(&3));
        assert_eq!(result.essence_left.get(&StatKind::Strength), Some(&2));
        assert_eq!(result.essence_left.get(&StatKind::Mind), Some(&0));
        assert_eq!(record.stats.get(StatKind::Strength), 4);
        assert_eq!(record.stats.get(StatKind::Mind), 2);
        assert_eq!(record.level, 1);
        assert_eq!(record.money, config.progression.default_money);
        assert_eq!(record.gear_level, config.progression.default_gear_level);
        assert_eq!(record.artifact_pieces, 2);
    }

    #[test]
    fn test_ineligible_is_untouched() {
        let config = GameConfig::default();
        let mut record = eligible(&config);
        record.level = 29;
        let before = record.clone();
        assert!(matches!(
            ascend(&mut record, &config),
            Err(GameError::AscensionIneligible(_))
        ));
        assert_eq!(record, before);

        let mut record = eligible(&config);
        record.artifact_pieces = 9;
        assert!(ascend(&mut record, &config).is_err());
    }
}
