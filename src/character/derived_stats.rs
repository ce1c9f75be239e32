use serde::{Deserialize, Serialize};

use super::attributes::Stats;
use super::damage::{Damage, Element};
use super::modifiers::{aggregate_modifiers, Modifier};
use crate::core::config::GameConfig;
use crate::core::constants::*;
use crate::core::error::{GameError, Result};
use crate::items::{Equipment, EquipmentSlot};
use crate::zones::Zone;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Stance {
    #[default]
    Balanced,
    Safe,
    Reckless,
}

/// Persistent character data a stat sheet is built from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BaseCharacter {
    pub name: String,
    pub level: u32,
    pub gear_level: u32,
    pub home_level: u32,
    pub stats: Stats,
    pub artifacts: u32,
    pub ascension: u32,
    /// Current HP, or `None` for full health.
    #[serde(default)]
    pub hp: Option<u32>,
    #[serde(default)]
    pub power: u32,
    /// Can drop below zero.
    #[serde(default = "default_sanity")]
    pub sanity: i32,
    #[serde(default)]
    pub stance: Stance,
}

fn default_sanity() -> i32 {
    DEFAULT_SANITY
}

impl BaseCharacter {
    pub fn new(name: impl Into<String>, level: u32) -> Self {
        Self {
            name: name.into(),
            level: level.max(1),
            gear_level: DEFAULT_GEAR_LEVEL,
            home_level: DEFAULT_HOME_LEVEL,
            stats: Stats::new(),
            artifacts: 0,
            ascension: 0,
            hp: None,
            power: 0,
            sanity: DEFAULT_SANITY,
            stance: Stance::Balanced,
        }
    }
}

/// Effective stat sheet used by quests and combat. Built fresh for each resolution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CharacterStats {
    pub name: String,
    pub level: u32,
    pub gear_level: u32,
    pub home_level: u32,
    pub stats: Stats,
    pub damage: Damage,
    pub resist: Damage,
    pub hp: u32,
    pub max_hp: u32,
    pub max_power: u32,
    pub power: u32,
    pub sanity: i32,
    pub stance: Stance,
    pub modifiers: Modifier,
    pub weight: u32,
}

impl CharacterStats {
    /// Sum of all eight elemental damage values.
    pub fn total_attack(&self) -> u32 {
        self.damage.total()
    }

    /// Sum of all eight elemental resist values.
    pub fn total_defense(&self) -> u32 {
        self.resist.total()
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }
}

/// Builds the effective stat sheet of a player.
///
/// Equipment values are scaled by the wearer's attributes and summed first,
/// then sanity and the aggregated modifiers are applied on top. An empty
/// weapon slot means fighting bare-handed. Fails with
/// [`GameError::InvalidEquipmentSlot`] if any item sits in a slot it cannot go in.
pub fn effective_stats(
    base: &BaseCharacter,
    equipment: &Equipment,
    modifiers: &[Modifier],
    config: &GameConfig,
) -> Result<CharacterStats> {
    for slot in EquipmentSlot::all() {
        if let Some(item) = equipment.get(slot) {
            if !item.supports(slot) {
                return Err(GameError::InvalidEquipmentSlot {
                    item: item.name.clone(),
                    slot,
                });
            }
        }
    }

    let modifier = aggregate_modifiers(modifiers);
    let level = base.level.max(1);

    let mut stats = base.stats;
    stats.add(&modifier.stats_bonus);

    let mut damage: Damage = equipment
        .iter_equipped()
        .map(|item| item.damage.scale_with_stats(&stats, &item.scaling))
        .sum();
    let fist = Damage::single(Element::Blunt, FIST_BLUNT_DAMAGE);
    if equipment.primary.is_none() {
        damage = damage + fist.scale(level as f64);
    }
    if equipment.secondary.is_none() {
        damage = damage + fist.apply_bonus(base.gear_level);
    }
    let insanity = insanity_scaling(base.sanity);
    let damage = (damage.scale(insanity.min(MAX_INSANITY_DAMAGE_FACTOR)) + modifier.damage_bonus)
        .scale(modifier.damage_mult);

    let resist: Damage = equipment
        .iter_equipped()
        .map(|item| item.resist.scale_with_stats(&stats, &item.scaling))
        .sum();
    let resist = (resist.scale(1.0 / insanity) + modifier.resist_bonus).scale(modifier.resist_mult);

    let max_hp = max_hp(
        level,
        base.gear_level,
        stats.vitality(),
        equipment.total_hp_bonus(),
        &modifier,
    );
    let hp = base.hp.unwrap_or(max_hp).min(max_hp);

    let max_power = max_power(base.artifacts, base.ascension, stats.attunement(), &modifier, config);

    Ok(CharacterStats {
        name: base.name.clone(),
        level,
        gear_level: base.gear_level,
        home_level: base.home_level,
        stats,
        damage,
        resist,
        hp,
        max_hp,
        max_power,
        power: base.power.min(max_power),
        sanity: base.sanity,
        stance: base.stance,
        modifiers: modifier,
        weight: equipment.total_weight(),
    })
}

pub fn max_sanity(mind: u32) -> i32 {
    MAX_SANITY_BASE.saturating_add(mind.min(i32::MAX as u32) as i32)
}

/// Damage multiplier caused by low sanity. Resist is divided by the same factor.
///
/// Above the stable threshold there is no effect. Below it the factor starts at
/// `INSANITY_BASE_FACTOR` and grows by 0.01 per point once sanity is negative.
pub fn insanity_scaling(sanity: i32) -> f64 {
    if sanity > SANITY_STABLE_THRESHOLD {
        1.0
    } else if sanity > 0 {
        INSANITY_BASE_FACTOR
    } else {
        INSANITY_BASE_FACTOR - sanity as f64 / 100.0
    }
}

/// `(level×10 + gear×5 + vitality×5 + equipment) × hp_mult + hp_bonus`, at least 1.
pub fn max_hp(level: u32, gear_level: u32, vitality: u32, equipment_bonus: u32, modifier: &Modifier) -> u32 {
    let base = level * HP_PER_LEVEL
        + gear_level * HP_PER_GEAR_LEVEL
        + vitality * HP_PER_VITALITY
        + equipment_bonus;
    let scaled = (base as f64 * modifier.hp_mult.max(0.0)) as u32;
    (scaled + modifier.hp_bonus).max(1)
}

/// Maximum eldritch power. Each assembled artifact adds a fixed amount.
pub fn max_power(
    artifacts: u32,
    ascension: u32,
    attunement: u32,
    modifier: &Modifier,
    config: &GameConfig,
) -> u32 {
    artifacts * config.progression.power_per_artifact
        + modifier.power_bonus
        + ascension * config.progression.power_per_ascension
        + attunement
}

/// A monster archetype from the content catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonsterTemplate {
    pub name: String,
    pub stats: Stats,
    /// Offset from the zone level, within `MONSTER_LEVEL_MODIFIER_RANGE` for generated monsters.
    #[serde(default)]
    pub level_modifier: i32,
    #[serde(default = "default_monster_weight")]
    pub weight: u32,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
}

fn default_monster_weight() -> u32 {
    MONSTER_BASE_WEIGHT
}

fn elemental_sheet(modifiers: &Damage, stat_sum: u32, level: u32, zone_level: u32) -> Damage {
    modifiers.scale((stat_sum + level) as f64).apply_bonus(zone_level)
}

/// Stat sheet of a monster spawned in `zone`.
pub fn monster_stats(template: &MonsterTemplate, zone: &Zone) -> CharacterStats {
    let level = (zone.level as i64 + template.level_modifier as i64).max(1) as u32;
    let s = template.stats;
    let hp_per_level = (MONSTER_BASE_HP + s.vitality() as i64 + template.level_modifier as i64).max(1);
    let max_hp = (hp_per_level * zone.level.max(1) as i64) as u32;
    build_creature(template, zone, level, max_hp)
}

/// Stat sheet of a pet of the given level fighting in `zone`.
pub fn pet_stats(template: &MonsterTemplate, level: u32, zone: &Zone) -> CharacterStats {
    let level = level.max(1);
    let max_hp = (MONSTER_BASE_HP as u32 + template.stats.vitality()) * level;
    build_creature(template, zone, level, max_hp)
}

fn build_creature(template: &MonsterTemplate, zone: &Zone, level: u32, max_hp: u32) -> CharacterStats {
    use super::attributes::StatKind::*;
    let s = template.stats;
    let modifier = aggregate_modifiers(&template.modifiers);

    let offense = s.get(Strength) + s.get(Skill) + s.get(Attunement);
    let defense = s.get(Toughness) + s.get(Agility) + s.get(Mind);

    CharacterStats {
        name: template.name.clone(),
        level,
        gear_level: 0,
        home_level: 0,
        stats: s,
        damage: elemental_sheet(&zone.damage_modifiers, offense, level, zone.level)
            .scale(modifier.damage_mult),
        resist: elemental_sheet(&zone.resist_modifiers, defense, level, zone.level)
            .scale(modifier.resist_mult),
        hp: max_hp,
        max_hp,
        max_power: 0,
        power: 0,
        sanity: DEFAULT_SANITY,
        stance: Stance::Balanced,
        modifiers: modifier,
        weight: template.weight,
    }
}
