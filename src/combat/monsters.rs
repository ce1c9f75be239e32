//! Monster generation for quests, zone encounters and raids.

use rand::Rng;

use crate::character::attributes::Stats;
use crate::character::derived_stats::{monster_stats, CharacterStats, MonsterTemplate};
use crate::core::constants::*;
use crate::zones::Zone;

pub fn generate_monster_name(rng: &mut impl Rng) -> String {
    let prefixes = [
        "Grizz", "Sav", "Dark", "Blood", "Bone", "Shadow", "Fel", "Dire", "Wild", "Grim",
    ];
    let roots = [
        "led", "age", "en", "tooth", "claw", "fang", "heart", "eye", "maw", "tail",
    ];
    let suffixes = [
        "Ghoul", "Wraith", "Drake", "Crawler", "Render", "Maw", "Beast", "Fiend", "Horror", "Shade",
    ];

    let prefix = prefixes[rng.gen_range(0..prefixes.len())];
    let root = roots[rng.gen_range(0..roots.len())];
    let suffix = suffixes[rng.gen_range(0..suffixes.len())];

    format!("{}{} {}", prefix, root, suffix)
}

/// A template with randomly spread attribute points, sized to the zone.
pub fn random_template(zone: &Zone, rng: &mut impl Rng) -> MonsterTemplate {
    MonsterTemplate {
        name: generate_monster_name(rng),
        stats: Stats::generate_random(DEFAULT_STAT_VALUE, zone.level, rng),
        level_modifier: 0,
        weight: MONSTER_BASE_WEIGHT,
        modifiers: Vec::new(),
    }
}

/// Spawns `template` in `zone` with a random level offset.
pub fn spawn_monster(template: &MonsterTemplate, zone: &Zone, rng: &mut impl Rng) -> CharacterStats {
    let (low, high) = MONSTER_LEVEL_MODIFIER_RANGE;
    let mut template = template.clone();
    template.level_modifier = rng.gen_range(low..=high);
    monster_stats(&template, zone)
}

/// A generated monster fixed `level_bonus` levels above the zone. Used for raid spawns.
pub fn scaled_monster(zone: &Zone, level_bonus: u32, rng: &mut impl Rng) -> CharacterStats {
    let mut template = random_template(zone, rng);
    template.level_modifier = level_bonus as i32;
    monster_stats(&template, zone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_name_has_two_parts() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let name = generate_monster_name(&mut rng);
        assert_eq!(name.split(' ').count(), 2);
    }

    #[test]
    fn test_spawned_level_within_range() {
        let zone = Zone::new(1, "Barrows", 10);
        let template = MonsterTemplate {
            name: "Barrow Wight".to_string(),
            stats: Stats::new(),
            level_modifier: 0,
            weight: MONSTER_BASE_WEIGHT,
            modifiers: vec![],
        };
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..50 {
            let monster = spawn_monster(&template, &zone, &mut rng);
            assert!((5..=12).contains(&monster.level));
            assert!(monster.max_hp > 0);
        }
    }

    #[test]
    fn test_spawn_in_level_one_zone_never_below_one() {
        let zone = Zone::new(1, "Meadow", 1);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..20 {
            let template = random_template(&zone, &mut rng);
            assert!(spawn_monster(&template, &zone, &mut rng).level >= 1);
        }
    }

    #[test]
    fn test_scaled_monster_level() {
        let zone = Zone::new(1, "Barrows", 10);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let boss = scaled_monster(&zone, 5, &mut rng);
        assert_eq!(boss.level, 15);
        assert_eq!(boss.stats.total(), 7 + 10);
    }
}
