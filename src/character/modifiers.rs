//! Multiplicative and flat modifiers granted by cults, vocations, guilds and buffs.
//!
//! Modifiers stack the same way regardless of where they come from:
//! multipliers multiply, flat bonuses add and capability flags are OR'ed.

use serde::{Deserialize, Serialize};

use super::attributes::Stats;
use super::damage::Damage;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModifierSource {
    Cult,
    #[default]
    Vocation,
    Guild,
    Buff,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Modifier {
    pub source: ModifierSource,
    pub name: String,
    // Applied after additive equipment sums
    pub damage_mult: f64,
    pub resist_mult: f64,
    pub hp_mult: f64,
    pub hp_bonus: u32,
    pub stats_bonus: Stats,
    pub damage_bonus: Damage,
    pub resist_bonus: Damage,
    // Economy
    pub general_xp_mult: f64,
    pub general_money_mult: f64,
    pub quest_xp_mult: f64,
    pub quest_money_mult: f64,
    pub event_xp_mult: f64,
    pub event_money_mult: f64,
    pub combat_rewards_mult: f64,
    pub quest_fail_rewards_mult: f64,
    pub quest_time_mult: f64,
    // Rolls and drops
    pub roll_bonus: i32,
    pub artifact_drop_bonus: f64,
    pub power_bonus: u32,
    // Capabilities
    pub lick_wounds: bool,
}

impl Default for Modifier {
    fn default() -> Self {
        Self {
            source: ModifierSource::default(),
            name: String::new(),
            damage_mult: 1.0,
            resist_mult: 1.0,
            hp_mult: 1.0,
            hp_bonus: 0,
            stats_bonus: Stats::zero(),
            damage_bonus: Damage::zero(),
            resist_bonus: Damage::zero(),
            general_xp_mult: 1.0,
            general_money_mult: 1.0,
            quest_xp_mult: 1.0,
            quest_money_mult: 1.0,
            event_xp_mult: 1.0,
            event_money_mult: 1.0,
            combat_rewards_mult: 1.0,
            quest_fail_rewards_mult: 0.0,
            quest_time_mult: 1.0,
            roll_bonus: 0,
            artifact_drop_bonus: 0.0,
            power_bonus: 0,
            lick_wounds: false,
        }
    }
}

impl Modifier {
    pub fn named(source: ModifierSource, name: impl Into<String>) -> Self {
        Self {
            source,
            name: name.into(),
            ..Self::default()
        }
    }

    /// Stacks `other` on top of `self`.
    pub fn combine(&self, other: &Modifier) -> Modifier {
        let mut stats_bonus = self.stats_bonus;
        stats_bonus.add(&other.stats_bonus);

        Modifier {
            source: self.source,
            name: [self.name.as_str(), other.name.as_str()]
                .iter()
                .filter(|n| !n.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join(" "),
            damage_mult: self.damage_mult * other.damage_mult,
            resist_mult: self.resist_mult * other.resist_mult,
            hp_mult: self.hp_mult * other.hp_mult,
            hp_bonus: self.hp_bonus + other.hp_bonus,
            stats_bonus,
            damage_bonus: self.damage_bonus + other.damage_bonus,
            resist_bonus: self.resist_bonus + other.resist_bonus,
            general_xp_mult: self.general_xp_mult * other.general_xp_mult,
            general_money_mult: self.general_money_mult * other.general_money_mult,
            quest_xp_mult: self.quest_xp_mult * other.quest_xp_mult,
            quest_money_mult: self.quest_money_mult * other.quest_money_mult,
            event_xp_mult: self.event_xp_mult * other.event_xp_mult,
            event_money_mult: self.event_money_mult * other.event_money_mult,
            combat_rewards_mult: self.combat_rewards_mult * other.combat_rewards_mult,
            quest_fail_rewards_mult: self.quest_fail_rewards_mult + other.quest_fail_rewards_mult,
            quest_time_mult: self.quest_time_mult * other.quest_time_mult,
            roll_bonus: self.roll_bonus + other.roll_bonus,
            artifact_drop_bonus: self.artifact_drop_bonus + other.artifact_drop_bonus,
            power_bonus: self.power_bonus + other.power_bonus,
            lick_wounds: self.lick_wounds || other.lick_wounds,
        }
    }
}

/// Collapses a list of active modifiers into one.
pub fn aggregate_modifiers(modifiers: &[Modifier]) -> Modifier {
    modifiers
        .iter()
        .fold(Modifier::default(), |acc, m| acc.combine(m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::attributes::StatKind;

    #[test]
    fn test_default_is_identity() {
        let cult = Modifier {
            damage_mult: 1.5,
            hp_bonus: 10,
            ..Modifier::named(ModifierSource::Cult, "Ashen Choir")
        };
        let combined = Modifier::default().combine(&cult);
        assert_eq!(combined.damage_mult, 1.5);
        assert_eq!(combined.hp_bonus, 10);
        assert_eq!(combined.name, "Ashen Choir");
    }

    #[test]
    fn test_multipliers_multiply_and_bonuses_add() {
        let vocation = Modifier {
            quest_xp_mult: 1.2,
            roll_bonus: 1,
            ..Modifier::named(ModifierSource::Vocation, "Scholar")
        };
        let guild = Modifier {
            quest_xp_mult: 1.5,
            roll_bonus: 2,
            lick_wounds: true,
            ..Modifier::named(ModifierSource::Guild, "Wolves")
        };

        let total = aggregate_modifiers(&[vocation, guild]);
        assert!((total.quest_xp_mult - 1.8).abs() < 1e-9);
        assert_eq!(total.roll_bonus, 3);
        assert!(total.lick_wounds);
        assert_eq!(total.name, "Scholar Wolves");
    }

    #[test]
    fn test_stat_bonuses_add() {
        let mut a = Modifier::default();
        a.stats_bonus.set(StatKind::Mind, 2);
        let mut b = Modifier::default();
        b.stats_bonus.set(StatKind::Mind, 3);
        assert_eq!(a.combine(&b).stats_bonus.get(StatKind::Mind), 5);
    }

    #[test]
    fn test_empty_aggregate() {
        assert_eq!(aggregate_modifiers(&[]), Modifier::default());
    }
}
