use chrono::{DateTime, Utc};

use super::ascension::{self, AscensionResult};
use super::types::{Artifact, LevelReport, ProgressionRecord, RewardDelta, RewardSource};
use crate::character::derived_stats::{max_power, max_sanity};
use crate::character::modifiers::Modifier;
use crate::core::config::GameConfig;
use crate::core::error::{GameError, Result};
use crate::events::{QteEffectKind, QteOutcome};

/// `a·lv² + b·lv`, the shape shared by every upgrade cost and the XP curve.
pub fn quadratic_cost((a, b): (u64, u64), level: u32) -> u64 {
    let lv = level as u64;
    a * lv * lv + b * lv
}

fn sanity_amount(amount: u64) -> i32 {
    i32::try_from(amount).unwrap_or(i32::MAX)
}

/// Applies reward deltas and purchases to progression records.
///
/// Every mutator validates first and only then writes, so a returned error
/// means the record is exactly as it was.
#[derive(Debug, Clone, Copy)]
pub struct ProgressionLedger<'a> {
    config: &'a GameConfig,
}

impl<'a> ProgressionLedger<'a> {
    pub fn new(config: &'a GameConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GameConfig {
        self.config
    }

    /// XP needed to go from `level` to `level + 1`.
    pub fn xp_to_level(&self, level: u32) -> u64 {
        quadratic_cost(self.config.progression.xp_curve, level)
    }

    /// Permanent bonus from ascensions, applied to every XP grant.
    pub fn xp_multiplier(&self, record: &ProgressionRecord) -> f64 {
        1.0 + self.config.progression.ascension_xp_bonus * record.ascension as f64
    }

    pub fn gear_upgrade_cost(&self, gear_level: u32) -> u64 {
        quadratic_cost(self.config.progression.gear_cost, gear_level)
    }

    pub fn home_upgrade_cost(&self, home_level: u32) -> u64 {
        quadratic_cost(self.config.progression.home_cost, home_level + 1)
    }

    /// Adds XP (after the ascension multiplier) and resolves every level-up it causes.
    pub fn grant_xp(&self, record: &mut ProgressionRecord, xp: u64) -> LevelReport {
        let gained = (xp as f64 * self.xp_multiplier(record)) as u64;
        record.xp += gained;

        let mut levels_gained = 0;
        loop {
            let needed = self.xp_to_level(record.level);
            if record.xp < needed {
                break;
            }
            record.xp -= needed;
            record.level += 1;
            levels_gained += 1;
        }

        if levels_gained > 0 {
            record.max_level_reached = record.max_level_reached.max(record.level);
            tracing::info!(
                player = record.player_id,
                level = record.level,
                levels_gained,
                "level up"
            );
        }

        LevelReport {
            xp_gained: gained,
            levels_gained,
            level: record.level,
        }
    }

    /// Applies one outcome. Each outcome id is accepted once per record.
    pub fn apply_outcome(&self, record: &mut ProgressionRecord, delta: &RewardDelta) -> Result<LevelReport> {
        if record.has_applied(&delta.outcome_id) {
            return Err(GameError::DuplicateOutcome(delta.outcome_id));
        }

        record.money += delta.money;
        record.artifact_pieces += delta.artifact_pieces;
        record.renown += delta.renown;
        for (stat, amount) in &delta.essences {
            *record.essences.entry(*stat).or_insert(0) += amount;
        }
        if let RewardSource::Quest { zone_id } = delta.source {
            record.quest_progress.record_attempt(zone_id);
        }
        record.applied_outcomes.insert(delta.outcome_id);

        Ok(self.grant_xp(record, delta.xp))
    }

    /// Raises gear level by one. Returns the amount paid.
    pub fn upgrade_gear(&self, record: &mut ProgressionRecord) -> Result<u64> {
        let cost = self.gear_upgrade_cost(record.gear_level);
        if record.money < cost {
            return Err(GameError::InsufficientFunds {
                required: cost,
                available: record.money,
            });
        }
        record.money -= cost;
        record.gear_level += 1;
        Ok(cost)
    }

    /// Raises home level by one, up to the configured cap. Returns the amount paid.
    pub fn upgrade_home(&self, record: &mut ProgressionRecord) -> Result<u64> {
        let max = self.config.progression.max_home_level;
        if record.home_level >= max {
            return Err(GameError::MaxLevelReached(max));
        }
        let cost = self.home_upgrade_cost(record.home_level);
        if record.money < cost {
            return Err(GameError::InsufficientFunds {
                required: cost,
                available: record.money,
            });
        }
        record.money -= cost;
        record.home_level += 1;
        Ok(cost)
    }

    /// Turns the configured number of pieces into `artifact`.
    pub fn assemble_artifact(&self, record: &mut ProgressionRecord, artifact: Artifact) -> Result<()> {
        let required = self.config.progression.artifact_assembly_threshold;
        if record.artifact_pieces < required {
            return Err(GameError::InsufficientArtifactPieces {
                required,
                available: record.artifact_pieces,
            });
        }
        if record.artifacts.iter().any(|a| a.id == artifact.id) {
            return Err(GameError::DuplicateArtifact(artifact.id));
        }
        record.artifact_pieces -= required;
        tracing::info!(player = record.player_id, artifact = %artifact.name, "artifact assembled");
        record.artifacts.push(artifact);
        Ok(())
    }

    pub fn max_power(&self, record: &ProgressionRecord, modifier: &Modifier) -> u32 {
        let attunement = record.stats.attunement() + modifier.stats_bonus.attunement();
        max_power(
            record.artifacts.len() as u32,
            record.ascension,
            attunement,
            modifier,
            self.config,
        )
    }

    /// Eldritch power recharged since the last cast, capped at max power.
    pub fn spell_charge(&self, record: &ProgressionRecord, modifier: &Modifier, now: DateTime<Utc>) -> u32 {
        let elapsed = (now - record.last_cast).num_seconds().max(0) as f64;
        let days = elapsed / 86_400.0;
        let charge = (days * self.config.progression.power_per_day as f64) as u32;
        charge.min(self.max_power(record, modifier))
    }

    /// Casts a spell costing `required`. Casting spends the whole charge.
    pub fn cast_spell(
        &self,
        record: &mut ProgressionRecord,
        required: u32,
        modifier: &Modifier,
        now: DateTime<Utc>,
    ) -> Result<u32> {
        let charge = self.spell_charge(record, modifier, now);
        if charge < required {
            return Err(GameError::InsufficientPower {
                required,
                available: charge,
            });
        }
        record.last_cast = now;
        Ok(charge)
    }

    /// Applies the effects of a resolved quick-time event. Losses stop at zero.
    pub fn apply_qte(&self, record: &mut ProgressionRecord, outcome: &QteOutcome) -> Result<LevelReport> {
        if record.has_applied(&outcome.id) {
            return Err(GameError::DuplicateOutcome(outcome.id));
        }
        record.applied_outcomes.insert(outcome.id);

        let mut xp_gain = 0;
        for effect in &outcome.gains {
            match effect.kind {
                QteEffectKind::Xp => xp_gain += effect.amount,
                QteEffectKind::Money => record.money += effect.amount,
                QteEffectKind::ArtifactPieces => record.artifact_pieces += effect.amount as u32,
                QteEffectKind::Renown => record.renown += effect.amount,
                QteEffectKind::Sanity => {
                    let cap = max_sanity(record.stats.mind());
                    record.sanity = record.sanity.saturating_add(sanity_amount(effect.amount)).min(cap);
                }
            }
        }
        for effect in &outcome.losses {
            match effect.kind {
                QteEffectKind::Xp => record.xp = record.xp.saturating_sub(effect.amount),
                QteEffectKind::Money => record.money = record.money.saturating_sub(effect.amount),
                QteEffectKind::ArtifactPieces => {
                    record.artifact_pieces = record.artifact_pieces.saturating_sub(effect.amount as u32)
                }
                QteEffectKind::Renown => record.renown = record.renown.saturating_sub(effect.amount),
                QteEffectKind::Sanity => {
                    record.sanity = record.sanity.saturating_sub(sanity_amount(effect.amount))
                }
            }
        }

        Ok(self.grant_xp(record, xp_gain))
    }

    pub fn ascend(&self, record: &mut ProgressionRecord) -> Result<AscensionResult> {
        ascension::ascend(record, self.config)
    }
}
