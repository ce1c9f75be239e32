// Attributes and elements
pub const NUM_STATS: usize = 7;
pub const NUM_ELEMENTS: usize = 8;
pub const DEFAULT_STAT_VALUE: u32 = 1;

// Derived stat formulas
pub const HP_PER_LEVEL: u32 = 10;
pub const HP_PER_GEAR_LEVEL: u32 = 5;
pub const HP_PER_VITALITY: u32 = 5;
pub const POWER_PER_ARTIFACT: u32 = 10;
pub const POWER_PER_ASCENSION: u32 = 5;
pub const POWER_PER_DAY: u32 = 10;
pub const FIST_BLUNT_DAMAGE: u32 = 1;

// Sanity
pub const DEFAULT_SANITY: i32 = 100;
pub const MAX_SANITY_BASE: i32 = 99;
pub const SANITY_STABLE_THRESHOLD: i32 = 25;
pub const INSANITY_BASE_FACTOR: f64 = 1.15;
pub const MAX_INSANITY_DAMAGE_FACTOR: f64 = 2.0;

// Monster formulas
pub const MONSTER_BASE_HP: i64 = 45;
pub const MONSTER_LEVEL_MODIFIER_RANGE: (i32, i32) = (-5, 2);
pub const MONSTER_BASE_WEIGHT: u32 = 7;

// Quests
pub const BASE_XP_REWARD: u64 = 100;
pub const BASE_MONEY_REWARD: u64 = 50;
pub const QUEST_BONUS_RANGE: (u64, u64) = (1, 50);
pub const QUEST_THRESHOLD_BASE: f64 = 6.0;
pub const QUEST_THRESHOLD_ZONE_FACTOR: f64 = 1.2;
pub const QUEST_THRESHOLD_SQRT_NUMERATOR: f64 = 4.0;
pub const QUEST_THRESHOLD_MIN: u32 = 2;
pub const QUEST_THRESHOLD_MAX: u32 = 19;
pub const QUEST_DIE_FACES: u32 = 20;
pub const QUEST_CRITICAL_SUCCESS_ROLL: u32 = 19;
pub const QUEST_ARTIFACT_CHANCE: f64 = 0.20;
pub const QUEST_BASE_DURATION_MINUTES: i64 = 24 * 60;
pub const QUEST_DURATION_PER_ZONE_LEVEL_MINUTES: i64 = 60;
pub const QUEST_DURATION_PER_QUEST_NUMBER_MINUTES: i64 = 120;
pub const QUEST_RANDOM_DURATION_MINUTES: i64 = 180;
pub const QUEST_DURATION_REDUCTION_PER_AGILITY_MINUTES: i64 = 30;

// Combat
pub const AIM_MULTIPLIER: f64 = 1.5;
pub const MAX_DODGE_REDUCTION: f64 = 0.9;
pub const DODGE_BASE_CHARGE: f64 = 0.3;
pub const DODGE_CHARGE_PER_AGILITY: f64 = 0.01;
pub const DODGE_CHARGE_PENALTY_PER_WEIGHT: f64 = 0.005;
pub const MIN_ATTACK_DAMAGE: u32 = 1;
pub const AUTO_HEAL_HP_FRACTION: f64 = 0.5;
pub const REVIVE_HP_FRACTION: f64 = 0.5;
pub const ATTACK_STAMINA_BASE: f64 = 0.25;
pub const STAMINA_PER_WEIGHT: f64 = 0.01;
pub const STAMINA_REGEN: f64 = 0.2;
pub const STAMINA_WEIGHT_SCALE: f64 = 50.0;
pub const MAX_COMBAT_TURNS: u32 = 1000;
pub const SUDDEN_DEATH_DAMAGE_PER_TURN: u32 = 100;
pub const COMBAT_REWARD_PER_LEVEL: u64 = 40;
pub const COMBAT_REWARD_PER_LEVEL_GAP: u64 = 5;

// Progression
pub const XP_CURVE_QUADRATIC: u64 = 100;
pub const XP_CURVE_LINEAR: u64 = 1000;
pub const GEAR_COST_QUADRATIC: u64 = 50;
pub const GEAR_COST_LINEAR: u64 = 1000;
pub const HOME_COST_QUADRATIC: u64 = 200;
pub const HOME_COST_LINEAR: u64 = 600;
pub const MAX_HOME_LEVEL: u32 = 10;
pub const ARTIFACT_ASSEMBLY_THRESHOLD: u32 = 10;
pub const ASCENSION_MINIMUM_LEVEL: u32 = 30;
pub const ASCENSION_LEVEL_INCREASE: u32 = 10;
pub const ASCENSION_ARTIFACT_THRESHOLD: u32 = 10;
pub const ASCENSION_XP_BONUS: f64 = 0.25;
pub const DEFAULT_MONEY: u64 = 10;
pub const DEFAULT_GEAR_LEVEL: u32 = 1;
pub const DEFAULT_HOME_LEVEL: u32 = 1;

// Guilds
pub const GUILD_MAX_LEVEL: u32 = 10;
pub const GUILD_PLAYERS_PER_LEVEL: u32 = 4;
pub const GUILD_MAX_PLAYERS: u32 = 20;
pub const GUILD_COST_QUADRATIC: u64 = 10_000;
pub const GUILD_COST_LINEAR: u64 = 1_000;
pub const GUILD_MAX_TAX: u32 = 50;
pub const GUILD_DEFAULT_TAX: u32 = 5;
pub const TOURNEY_SCORE_SCALE: u64 = 100;
pub const TOURNEY_DURATION_DAYS: i64 = 14;
pub const TOURNEY_REWARDS: [u64; 3] = [10_000, 5_000, 1_000];

// Raids
pub const RAID_DURATION_HOURS: i64 = 24;
pub const RAID_BOSS_THRESHOLD_HOURS: i64 = 18;
pub const RAID_COOLDOWN_DAYS: i64 = 7;
pub const RAID_BOSS_LEVEL_BONUS: u32 = 5;
pub const RAID_XP_PER_ZONE_LEVEL: u64 = 1_000;
pub const RAID_MONEY_PER_ZONE_LEVEL: u64 = 500;

// Zone events
pub const EVENT_BASE_VALUE: u64 = 2;
pub const EVENT_LEVEL_TOLERANCE: u32 = 3;
pub const EVENT_ROLL_RANGE: (u64, u64) = (1, 10);
