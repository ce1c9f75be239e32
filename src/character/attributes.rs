use crate::core::constants::{DEFAULT_STAT_VALUE, NUM_STATS};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StatKind {
    Vitality,
    Strength,
    Skill,
    Toughness,
    Attunement,
    Mind,
    Agility,
}

impl StatKind {
    pub fn all() -> [StatKind; NUM_STATS] {
        [
            StatKind::Vitality,
            StatKind::Strength,
            StatKind::Skill,
            StatKind::Toughness,
            StatKind::Attunement,
            StatKind::Mind,
            StatKind::Agility,
        ]
    }

    pub fn abbrev(&self) -> &str {
        match self {
            StatKind::Vitality => "VIT",
            StatKind::Strength => "STR",
            StatKind::Skill => "SKL",
            StatKind::Toughness => "TGH",
            StatKind::Attunement => "ATT",
            StatKind::Mind => "MND",
            StatKind::Agility => "AGI",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            StatKind::Vitality => 0,
            StatKind::Strength => 1,
            StatKind::Skill => 2,
            StatKind::Toughness => 3,
            StatKind::Attunement => 4,
            StatKind::Mind => 5,
            StatKind::Agility => 6,
        }
    }
}

/// The seven base attributes shared by players, monsters and pets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stats {
    values: [u32; NUM_STATS],
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

impl Stats {
    pub fn new() -> Self {
        Self::uniform(DEFAULT_STAT_VALUE)
    }

    pub fn uniform(value: u32) -> Self {
        Self {
            values: [value; NUM_STATS],
        }
    }

    pub fn zero() -> Self {
        Self::uniform(0)
    }

    pub fn get(&self, stat: StatKind) -> u32 {
        self.values[stat.index()]
    }

    pub fn set(&mut self, stat: StatKind, value: u32) {
        self.values[stat.index()] = value;
    }

    pub fn increase(&mut self, stat: StatKind, amount: u32) {
        self.values[stat.index()] = self.values[stat.index()].saturating_add(amount);
    }

    /// Adds another sheet's values to this one (for equipment and modifier bonuses).
    pub fn add(&mut self, other: &Stats) {
        for stat in StatKind::all() {
            self.increase(stat, other.get(stat));
        }
    }

    pub fn total(&self) -> u32 {
        self.values.iter().sum()
    }

    pub fn vitality(&self) -> u32 {
        self.get(StatKind::Vitality)
    }

    pub fn agility(&self) -> u32 {
        self.get(StatKind::Agility)
    }

    pub fn attunement(&self) -> u32 {
        self.get(StatKind::Attunement)
    }

    pub fn mind(&self) -> u32 {
        self.get(StatKind::Mind)
    }

    /// Base sheet plus `points` single-point increases on random attributes.
    pub fn generate_random(base: u32, points: u32, rng: &mut impl rand::Rng) -> Self {
        let mut stats = Self::uniform(base);
        let all = StatKind::all();
        for _ in 0..points {
            let stat = all[rng.gen_range(0..all.len())];
            stats.increase(stat, 1);
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_new_stats() {
        let stats = Stats::new();
        for stat in StatKind::all() {
            assert_eq!(stats.get(stat), 1);
        }
        assert_eq!(stats.total(), 7);
    }

    #[test]
    fn test_get_set() {
        let mut stats = Stats::new();
        stats.set(StatKind::Strength, 6);
        assert_eq!(stats.get(StatKind::Strength), 6);
        assert_eq!(stats.get(StatKind::Skill), 1);
    }

    #[test]
    fn test_add() {
        let mut stats = Stats::new();
        let mut bonus = Stats::zero();
        bonus.set(StatKind::Agility, 3);
        stats.add(&bonus);
        assert_eq!(stats.agility(), 4);
        assert_eq!(stats.vitality(), 1);
    }

    #[test]
    fn test_indices_are_unique() {
        let mut seen = [false; NUM_STATS];
        for stat in StatKind::all() {
            assert!(!seen[stat.index()]);
            seen[stat.index()] = true;
        }
    }

    #[test]
    fn test_generate_random_distributes_all_points() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let stats = Stats::generate_random(0, 12, &mut rng);
        assert_eq!(stats.total(), 12);
    }
}
