//! Integration test: purchases, artifacts, eldritch power and ascension
//!
//! Walks a record through the ledger the way a long-lived player would.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, TimeZone, Utc};
use pilgrimage::character::{Modifier, StatKind};
use pilgrimage::core::{new_outcome_id, GameConfig, GameError};
use pilgrimage::items::{EquipmentSlot, Item};
use pilgrimage::progression::{Artifact, ProgressionLedger, ProgressionRecord, RewardDelta, RewardSource};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
}

fn artifact(rng: &mut ChaCha8Rng, name: &str) -> Artifact {
    Artifact {
        id: new_outcome_id(rng),
        name: name.to_string(),
    }
}

#[test]
fn test_gear_upgrade_needs_exact_funds() {
    let config = GameConfig::default();
    let ledger = ProgressionLedger::new(&config);
    let mut record = ProgressionRecord::new(1, "Wanderer", &config, start());
    record.money = 0;

    // 50 * 1 + 1000 * 1
    assert_eq!(ledger.gear_upgrade_cost(1), 1050);
    let err = ledger.upgrade_gear(&mut record).unwrap_err();
    assert!(matches!(
        err,
        GameError::InsufficientFunds {
            required: 1050,
            available: 0
        }
    ));
    assert_eq!(record.money, 0);
    assert_eq!(record.gear_level, 1);

    record.money = 1050;
    assert_eq!(ledger.upgrade_gear(&mut record).unwrap(), 1050);
    assert_eq!(record.money, 0);
    assert_eq!(record.gear_level, 2);
}

#[test]
fn test_home_upgrades_stop_at_cap() {
    let config = GameConfig::default();
    let ledger = ProgressionLedger::new(&config);
    let mut record = ProgressionRecord::new(1, "Wanderer", &config, start());
    record.money = 10_000_000;

    while ledger.upgrade_home(&mut record).is_ok() {}
    assert_eq!(record.home_level, config.progression.max_home_level);

    let money = record.money;
    assert!(matches!(
        ledger.upgrade_home(&mut record),
        Err(GameError::MaxLevelReached(10))
    ));
    assert_eq!(record.money, money);
}

#[test]
fn test_level_up_on_exact_xp() {
    let config = GameConfig::default();
    let ledger = ProgressionLedger::new(&config);
    let mut record = ProgressionRecord::new(1, "Wanderer", &config, start());
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    let needed = ledger.xp_to_level(1);
    assert_eq!(needed, 1100);

    let mut delta = RewardDelta::new(new_outcome_id(&mut rng), RewardSource::Event);
    delta.xp = needed - 1;
    let report = ledger.apply_outcome(&mut record, &delta).unwrap();
    assert_eq!(report.levels_gained, 0);
    assert_eq!(record.level, 1);

    let mut delta = RewardDelta::new(new_outcome_id(&mut rng), RewardSource::Event);
    delta.xp = 1;
    let report = ledger.apply_outcome(&mut record, &delta).unwrap();
    assert_eq!(report.levels_gained, 1);
    assert_eq!(record.level, 2);
    assert_eq!(record.xp, 0);
    assert_eq!(record.max_level_reached, 2);
}

#[test]
fn test_artifact_assembly_and_power() {
    let config = GameConfig::default();
    let ledger = ProgressionLedger::new(&config);
    let mut record = ProgressionRecord::new(1, "Wanderer", &config, start());
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let modifier = Modifier::default();

    record.artifact_pieces = 9;
    let err = ledger
        .assemble_artifact(&mut record, artifact(&mut rng, "Lantern of Ash"))
        .unwrap_err();
    assert!(matches!(
        err,
        GameError::InsufficientArtifactPieces {
            required: 10,
            available: 9
        }
    ));
    assert!(record.artifacts.is_empty());

    let power_before = ledger.max_power(&record, &modifier);
    record.artifact_pieces = 10;
    let lantern = artifact(&mut rng, "Lantern of Ash");
    ledger.assemble_artifact(&mut record, lantern.clone()).unwrap();
    assert_eq!(record.artifact_pieces, 0);
    assert_eq!(record.artifacts, vec![lantern.clone()]);
    assert_eq!(ledger.max_power(&record, &modifier), power_before + 10);

    record.artifact_pieces = 10;
    let err = ledger.assemble_artifact(&mut record, lantern.clone()).unwrap_err();
    assert!(matches!(err, GameError::DuplicateArtifact(id) if id == lantern.id));
    assert_eq!(record.artifact_pieces, 10);
}

#[test]
fn test_spell_charge_recovers_over_days() {
    let config = GameConfig::default();
    let ledger = ProgressionLedger::new(&config);
    let mut record = ProgressionRecord::new(1, "Wanderer", &config, start());
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let modifier = Modifier::default();

    record.artifact_pieces = 10;
    ledger
        .assemble_artifact(&mut record, artifact(&mut rng, "Salt Crown"))
        .unwrap();
    // One artifact plus the base attunement point
    assert_eq!(ledger.max_power(&record, &modifier), 11);

    let one_day = start() + Duration::days(1);
    assert_eq!(ledger.spell_charge(&record, &modifier, one_day), 10);
    let err = ledger.cast_spell(&mut record, 11, &modifier, one_day).unwrap_err();
    assert!(matches!(
        err,
        GameError::InsufficientPower {
            required: 11,
            available: 10
        }
    ));
    assert_eq!(record.last_cast, start());

    let three_days = start() + Duration::days(3);
    assert_eq!(ledger.spell_charge(&record, &modifier, three_days), 11);
    assert_eq!(ledger.cast_spell(&mut record, 11, &modifier, three_days).unwrap(), 11);
    assert_eq!(record.last_cast, three_days);
    assert_eq!(ledger.spell_charge(&record, &modifier, three_days), 0);
}

#[test]
fn test_ascension_cycle() {
    let config = GameConfig::default();
    let ledger = ProgressionLedger::new(&config);
    let mut record = ProgressionRecord::new(1, "Wanderer", &config, start());
    let mut rng = ChaCha8Rng::seed_from_u64(4);

    let mut relic = Item::new(new_outcome_id(&mut rng), "Pilgrim's Staff", EquipmentSlot::Primary, 5);
    relic.relic = true;
    let mail = Item::new(new_outcome_id(&mut rng), "Chain Mail", EquipmentSlot::Chest, 5);
    record.equipment.equip(EquipmentSlot::Primary, relic).unwrap();
    record.equipment.equip(EquipmentSlot::Chest, mail).unwrap();

    record.level = 29;
    record.artifact_pieces = 10;
    record.essences = BTreeMap::from([(StatKind::Strength, 7), (StatKind::Mind, 2)]);
    assert!(matches!(
        ledger.ascend(&mut record),
        Err(GameError::AscensionIneligible(_))
    ));
    assert_eq!(record.level, 29);

    record.level = 30;
    record.gear_level = 12;
    record.money = 5_000;
    let result = ledger.ascend(&mut record).unwrap();

    assert_eq!(result.ascension, 1);
    assert_eq!(result.pieces_consumed, 10);
    // 7 essence buys +3 (1 + 2 + 3) and keeps 1, 2 essence buys +1 and keeps 1
    assert_eq!(result.stat_increases.get(&StatKind::Strength), Some(&3));
    assert_eq!(result.stat_increases.get(&StatKind::Mind), Some(&1));
    assert_eq!(result.essence_left.get(&StatKind::Strength), Some(&1));
    assert_eq!(result.essence_left.get(&StatKind::Mind), Some(&1));
    assert_eq!(record.stats.get(StatKind::Strength), 4);

    assert_eq!(record.level, 1);
    assert_eq!(record.xp, 0);
    assert_eq!(record.gear_level, config.progression.default_gear_level);
    assert_eq!(record.money, config.progression.default_money);
    assert_eq!(record.artifact_pieces, 0);
    assert!(record.equipment.get(EquipmentSlot::Primary).is_some());
    assert!(record.equipment.get(EquipmentSlot::Chest).is_none());

    // Each ascension makes XP worth more and the next one harder to reach
    assert!((ledger.xp_multiplier(&record) - 1.25).abs() < 1e-9);
    let report = ledger.grant_xp(&mut record, 100);
    assert_eq!(report.xp_gained, 125);

    record.level = 30;
    record.artifact_pieces = 10;
    assert!(matches!(
        ledger.ascend(&mut record),
        Err(GameError::AscensionIneligible(_))
    ));
}
