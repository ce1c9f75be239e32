use super::types::{EquipmentSlot, Item};
use crate::character::damage::Damage;
use crate::core::error::{GameError, Result};
use serde::{Deserialize, Serialize};

/// The six equipment slots of a player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    #[serde(default)]
    pub head: Option<Item>,
    #[serde(default)]
    pub chest: Option<Item>,
    #[serde(default)]
    pub legs: Option<Item>,
    #[serde(default)]
    pub arms: Option<Item>,
    #[serde(default)]
    pub primary: Option<Item>,
    #[serde(default)]
    pub secondary: Option<Item>,
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: EquipmentSlot) -> &Option<Item> {
        match slot {
            EquipmentSlot::Head => &self.head,
            EquipmentSlot::Chest => &self.chest,
            EquipmentSlot::Legs => &self.legs,
            EquipmentSlot::Arms => &self.arms,
            EquipmentSlot::Primary => &self.primary,
            EquipmentSlot::Secondary => &self.secondary,
        }
    }

    fn slot_mut(&mut self, slot: EquipmentSlot) -> &mut Option<Item> {
        match slot {
            EquipmentSlot::Head => &mut self.head,
            EquipmentSlot::Chest => &mut self.chest,
            EquipmentSlot::Legs => &mut self.legs,
            EquipmentSlot::Arms => &mut self.arms,
            EquipmentSlot::Primary => &mut self.primary,
            EquipmentSlot::Secondary => &mut self.secondary,
        }
    }

    /// Puts `item` into `slot`, returning whatever was there before.
    pub fn equip(&mut self, slot: EquipmentSlot, item: Item) -> Result<Option<Item>> {
        if !item.supports(slot) {
            return Err(GameError::InvalidEquipmentSlot {
                item: item.name,
                slot,
            });
        }
        Ok(self.slot_mut(slot).replace(item))
    }

    pub fn unequip(&mut self, slot: EquipmentSlot) -> Option<Item> {
        self.slot_mut(slot).take()
    }

    pub fn iter_equipped(&self) -> impl Iterator<Item = &Item> {
        [
            &self.head,
            &self.chest,
            &self.legs,
            &self.arms,
            &self.primary,
            &self.secondary,
        ]
        .into_iter()
        .filter_map(|item| item.as_ref())
    }

    pub fn total_damage(&self) -> Damage {
        self.iter_equipped().map(|i| i.damage).sum()
    }

    pub fn total_resist(&self) -> Damage {
        self.iter_equipped().map(|i| i.resist).sum()
    }

    pub fn total_weight(&self) -> u32 {
        self.iter_equipped().map(|i| i.weight).sum()
    }

    pub fn total_hp_bonus(&self) -> u32 {
        self.iter_equipped().map(|i| i.hp_bonus).sum()
    }

    /// Drops every non-relic item, keeping relics in place.
    pub fn strip_non_relics(&mut self) {
        for slot in EquipmentSlot::all() {
            let entry = self.slot_mut(slot);
            if entry.as_ref().is_some_and(|item| !item.relic) {
                *entry = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::damage::Element;
    use uuid::Uuid;

    fn create_test_item(slot: EquipmentSlot) -> Item {
        let mut item = Item::new(Uuid::nil(), "Test Item", slot, 1);
        item.damage = Damage::single(Element::Slash, 4);
        item.resist = Damage::single(Element::Fire, 2);
        item.weight = 3;
        item
    }

    #[test]
    fn test_equipment_starts_empty() {
        let eq = Equipment::new();
        assert!(eq.primary.is_none());
        assert_eq!(eq.iter_equipped().count(), 0);
        assert_eq!(eq.total_weight(), 0);
    }

    #[test]
    fn test_equip_into_supported_slot() {
        let mut eq = Equipment::new();
        let sword = create_test_item(EquipmentSlot::Primary);
        let previous = eq.equip(EquipmentSlot::Primary, sword.clone()).unwrap();
        assert!(previous.is_none());
        assert_eq!(eq.get(EquipmentSlot::Primary), &Some(sword));
    }

    #[test]
    fn test_equip_into_wrong_slot_fails() {
        let mut eq = Equipment::new();
        let helmet = create_test_item(EquipmentSlot::Head);
        let result = eq.equip(EquipmentSlot::Primary, helmet);
        assert!(matches!(
            result,
            Err(GameError::InvalidEquipmentSlot {
                slot: EquipmentSlot::Primary,
                ..
            })
        ));
        assert!(eq.primary.is_none());
    }

    #[test]
    fn test_totals_sum_across_slots() {
        let mut eq = Equipment::new();
        for slot in [EquipmentSlot::Head, EquipmentSlot::Chest, EquipmentSlot::Primary] {
            eq.equip(slot, create_test_item(slot)).unwrap();
        }
        assert_eq!(eq.total_damage().slash, 12);
        assert_eq!(eq.total_resist().fire, 6);
        assert_eq!(eq.total_weight(), 9);
    }

    #[test]
    fn test_strip_non_relics() {
        let mut eq = Equipment::new();
        let mut relic = create_test_item(EquipmentSlot::Arms);
        relic.relic = true;
        eq.equip(EquipmentSlot::Arms, relic).unwrap();
        eq.equip(EquipmentSlot::Legs, create_test_item(EquipmentSlot::Legs))
            .unwrap();

        eq.strip_non_relics();
        assert!(eq.arms.is_some());
        assert!(eq.legs.is_none());
    }
}
