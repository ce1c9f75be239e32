//! Zone definitions supplied by world content.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::character::attributes::StatKind;
use crate::character::damage::Damage;
use crate::core::error::{GameError, Result};

pub type ZoneId = u32;

/// A questing area. `level` is the minimum recommended player level,
/// not a position in any zone list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    pub name: String,
    pub level: u32,
    /// Element weights for monsters spawned here.
    #[serde(default)]
    pub damage_modifiers: Damage,
    #[serde(default)]
    pub resist_modifiers: Damage,
    /// Essence granted per successful quest. Empty means one random stat.
    #[serde(default)]
    pub essences: BTreeMap<StatKind, u32>,
    /// Flat bonus added to zone event rewards.
    #[serde(default)]
    pub event_bonus: u64,
}

impl Zone {
    pub fn new(id: ZoneId, name: impl Into<String>, level: u32) -> Self {
        Self {
            id,
            name: name.into(),
            level,
            damage_modifiers: Damage::zero(),
            resist_modifiers: Damage::zero(),
            essences: BTreeMap::new(),
            event_bonus: 0,
        }
    }

    /// Level 0 zones break every formula that divides by the zone level.
    pub fn validate(&self) -> Result<()> {
        if self.level < 1 {
            return Err(GameError::InvalidZoneLevel(self.level));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_level_zero_is_invalid() {
        let zone = Zone::new(1, "Ashen Fields", 0);
        assert!(matches!(zone.validate(), Err(GameError::InvalidZoneLevel(0))));
        assert!(Zone::new(1, "Ashen Fields", 1).validate().is_ok());
    }

    #[test]
    fn test_zone_deserializes_with_defaults() {
        let zone: Zone = serde_json::from_str(
            r#"{"id": 3, "name": "Sunken Crypt", "level": 12, "essences": {"mind": 2}}"#,
        )
        .unwrap();
        assert_eq!(zone.level, 12);
        assert_eq!(zone.essences.get(&StatKind::Mind), Some(&2));
        assert!(zone.damage_modifiers.is_zero());
    }
}
