//! Elemental damage and resistance vectors.

use serde::{Deserialize, Serialize};

use super::attributes::{StatKind, Stats};
use crate::core::constants::NUM_ELEMENTS;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Slash,
    Pierce,
    Blunt,
    Occult,
    Fire,
    Acid,
    Freeze,
    Electric,
}

impl Element {
    pub fn all() -> [Element; NUM_ELEMENTS] {
        [
            Element::Slash,
            Element::Pierce,
            Element::Blunt,
            Element::Occult,
            Element::Fire,
            Element::Acid,
            Element::Freeze,
            Element::Electric,
        ]
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// One value per element. Used for both damage dealt and damage resisted.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Damage {
    #[serde(default)]
    pub slash: u32,
    #[serde(default)]
    pub pierce: u32,
    #[serde(default)]
    pub blunt: u32,
    #[serde(default)]
    pub occult: u32,
    #[serde(default)]
    pub fire: u32,
    #[serde(default)]
    pub acid: u32,
    #[serde(default)]
    pub freeze: u32,
    #[serde(default)]
    pub electric: u32,
}

impl Damage {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn single(element: Element, value: u32) -> Self {
        let mut damage = Self::zero();
        damage.set(element, value);
        damage
    }

    pub fn get(&self, element: Element) -> u32 {
        match element {
            Element::Slash => self.slash,
            Element::Pierce => self.pierce,
            Element::Blunt => self.blunt,
            Element::Occult => self.occult,
            Element::Fire => self.fire,
            Element::Acid => self.acid,
            Element::Freeze => self.freeze,
            Element::Electric => self.electric,
        }
    }

    pub fn set(&mut self, element: Element, value: u32) {
        let slot = match element {
            Element::Slash => &mut self.slash,
            Element::Pierce => &mut self.pierce,
            Element::Blunt => &mut self.blunt,
            Element::Occult => &mut self.occult,
            Element::Fire => &mut self.fire,
            Element::Acid => &mut self.acid,
            Element::Freeze => &mut self.freeze,
            Element::Electric => &mut self.electric,
        };
        *slot = value;
    }

    pub fn total(&self) -> u32 {
        Element::all().iter().map(|e| self.get(*e)).sum()
    }

    pub fn is_zero(&self) -> bool {
        self.total() == 0
    }

    /// Multiplies every element, truncating toward zero.
    pub fn scale(&self, factor: f64) -> Damage {
        let factor = factor.max(0.0);
        self.map(|_, v| (v as f64 * factor) as u32)
    }

    /// Adds `bonus` to every element that is already non-zero.
    pub fn apply_bonus(&self, bonus: u32) -> Damage {
        self.map(|_, v| if v > 0 { v.saturating_add(bonus) } else { 0 })
    }

    /// Grows with the wielder's attributes. Each attribute with a non-zero
    /// `scaling` weight multiplies the result by `1 + stat * weight / 100`,
    /// truncating after every step.
    pub fn scale_with_stats(&self, stats: &Stats, scaling: &Stats) -> Damage {
        StatKind::all()
            .into_iter()
            .filter(|stat| scaling.get(*stat) > 0)
            .fold(*self, |acc, stat| {
                let weight = stats.get(stat) as f64 * scaling.get(stat) as f64 / 100.0;
                acc.scale(1.0 + weight)
            })
    }

    /// Damage left after `resist` is subtracted element by element, clamped at zero.
    pub fn against(&self, resist: &Damage) -> Damage {
        self.map(|e, v| v.saturating_sub(resist.get(e)))
    }

    fn map(&self, f: impl Fn(Element, u32) -> u32) -> Damage {
        let mut result = Damage::zero();
        for element in Element::all() {
            result.set(element, f(element, self.get(element)));
        }
        result
    }
}

impl std::ops::Add for Damage {
    type Output = Damage;

    fn add(self, rhs: Damage) -> Damage {
        self.map(|e, v| v.saturating_add(rhs.get(e)))
    }
}

impl std::iter::Sum for Damage {
    fn sum<I: Iterator<Item = Damage>>(iter: I) -> Damage {
        iter.fold(Damage::zero(), |acc, d| acc + d)
    }
}
