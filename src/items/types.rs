use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::character::attributes::Stats;
use crate::character::damage::Damage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentSlot {
    Head,
    Chest,
    Legs,
    Arms,
    Primary,
    Secondary,
}

impl EquipmentSlot {
    pub fn all() -> [EquipmentSlot; 6] {
        [
            EquipmentSlot::Head,
            EquipmentSlot::Chest,
            EquipmentSlot::Legs,
            EquipmentSlot::Arms,
            EquipmentSlot::Primary,
            EquipmentSlot::Secondary,
        ]
    }

    pub fn is_weapon(&self) -> bool {
        matches!(self, EquipmentSlot::Primary | EquipmentSlot::Secondary)
    }
}

/// An equippable item as supplied by the content catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub slot: EquipmentSlot,
    pub level: u32,
    #[serde(default)]
    pub damage: Damage,
    #[serde(default)]
    pub resist: Damage,
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub hp_bonus: u32,
    /// Per-attribute weights for [`Damage::scale_with_stats`]. Zero means no scaling.
    #[serde(default = "Stats::zero")]
    pub scaling: Stats,
    /// Relics survive ascension.
    #[serde(default)]
    pub relic: bool,
}

impl Item {
    pub fn new(id: Uuid, name: impl Into<String>, slot: EquipmentSlot, level: u32) -> Self {
        Self {
            id,
            name: name.into(),
            slot,
            level,
            damage: Damage::zero(),
            resist: Damage::zero(),
            weight: 0,
            hp_bonus: 0,
            scaling: Stats::zero(),
            relic: false,
        }
    }

    pub fn supports(&self, slot: EquipmentSlot) -> bool {
        self.slot == slot
    }
}

/// A single-use satchel item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consumable {
    pub name: String,
    #[serde(default)]
    pub hp_restored: u32,
    #[serde(default)]
    pub hp_percent_restored: f64,
    /// Consumed automatically when the holder would otherwise die.
    #[serde(default)]
    pub revive: bool,
}

impl Consumable {
    pub fn potion(name: impl Into<String>, hp_restored: u32) -> Self {
        Self {
            name: name.into(),
            hp_restored,
            hp_percent_restored: 0.0,
            revive: false,
        }
    }

    pub fn revive(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hp_restored: 0,
            hp_percent_restored: 0.0,
            revive: true,
        }
    }

    pub fn heals(&self) -> bool {
        !self.revive && (self.hp_restored > 0 || self.hp_percent_restored > 0.0)
    }

    /// HP restored for a combatant with the given max HP.
    pub fn heal_amount(&self, max_hp: u32) -> u32 {
        self.hp_restored + (max_hp as f64 * self.hp_percent_restored) as u32
    }
}
