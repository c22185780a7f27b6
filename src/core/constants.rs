// Tick and timing
pub const FRAME_MS: u64 = 25;
pub const BATTLE_TICKS_PER_DAY: u64 = 10;
pub const DAYS_PER_YEAR: u32 = 365;
pub const LONG_TICK_INTERVAL: u64 = 50;

// Speed settings: a tick is due every `divider` frames
pub const TICK_DIVIDERS: [u32; 5] = [40, 20, 10, 5, 1];
pub const DEFAULT_TICK_DIVIDER: u32 = 20;

// Offline catch-up
pub const OFFLINE_EFFICIENCY_DIVIDER: u64 = 10;
pub const MAX_CATCH_UP_TICKS: u64 = 100_000;

// Character lifecycle (ages are in days)
pub const STARTING_AGE_DAYS: u32 = 18 * DAYS_PER_YEAR;
pub const BASE_LIFESPAN_DAYS: u32 = 30 * DAYS_PER_YEAR;
pub const LIFESPAN_DAYS_PER_TOUGHNESS_APTITUDE: f64 = 30.0;
pub const STARTING_ATTRIBUTE_VALUE: f64 = 1.0;
pub const APTITUDE_GAIN_DIVISOR: f64 = 10.0;
pub const BLOODLINE_MONEY_KEPT: f64 = 0.1;
pub const BLOODLINE_ATTRIBUTE_KEPT: f64 = 0.1;

// Status pools
pub const BASE_HEALTH: f64 = 100.0;
pub const BASE_STAMINA: f64 = 100.0;
pub const BASE_NUTRITION: f64 = 30.0;
pub const DAILY_STAMINA_RECOVERY: f64 = 5.0;
pub const DAILY_NUTRITION_DECAY: f64 = 1.0;
pub const STARVATION_DAMAGE: f64 = 5.0;
pub const WELL_FED_THRESHOLD: f64 = 0.8;
pub const YIN_YANG_MAX_BALANCE: f64 = 0.5;
pub const JUSTICE_DIVISOR_SCALE: f64 = 100.0;
pub const TOUGHNESS_PER_DEFENSE: f64 = 10.0;

// Player attack pipeline
pub const WELL_FED_DAMAGE_MULTIPLIER: f64 = 1.2;
pub const ELEMENT_ADVANTAGE_MULTIPLIER: f64 = 2.0;
pub const CORRUPTION_DAMAGE_MULTIPLIER: f64 = 10.0;
pub const PIERCING_DEFENSE_DIVISOR: f64 = 2.0;
pub const LORE_ATTACK_POWER_SCALE: f64 = 100.0;
pub const LORE_MULTIPLIER_MIN: f64 = 1.0;
pub const LORE_MULTIPLIER_MAX: f64 = 4.0;
pub const PITY_DAMAGE: f64 = 1.0;

// Defense curves. Player hits use the gentler exponent, enemy hits the steeper one.
pub const PLAYER_ATTACK_DEFENSE_EXPONENT: f64 = 0.2;
pub const PLAYER_ATTACK_DEFENSE_BASE: f64 = 20_000.0;
pub const ENEMY_ATTACK_DEFENSE_EXPONENT: f64 = 0.5;
pub const ENEMY_ATTACK_DEFENSE_BASE: f64 = 1_000_000.0;

// Status effects applied by techniques
pub const POISON_TICKS: i32 = 10;
pub const POISON_POWER_FRACTION: f64 = 0.1;
pub const LIFE_STEAL_FRACTION: f64 = 0.1;
pub const SHIELD_TICKS: i32 = 10;
pub const SHIELD_POWER: f64 = 0.5;
pub const HASTE_TICKS: i32 = 10;
pub const HASTE_POWER: f64 = 1.0;

// Encounter rules
pub const FLEE_PENALTY_PASSES: u32 = 3;
pub const KILLS_TO_NEXT_QUALITY_RANK: u64 = 10;
pub const ENEMY_DEFENSE_DIVISOR: f64 = 10.0;
pub const ENEMY_ATTACK_TICKS_REQUIRED: u32 = 10;
pub const ENEMY_DAMAGE_FRACTION: f64 = 0.5;

// Family techniques
pub const FAMILY_TECHNIQUE_BASE_THRESHOLD: f64 = 20_000.0;
pub const FAMILY_TECHNIQUE_BONUS_EFFECT_CHANCE: f64 = 0.25;
pub const DEFAULT_MAX_FAMILY_TECHNIQUES: u32 = 3;

// Inventory
pub const POUCH_SLOTS: usize = 3;

// Followers
pub const DEFAULT_MAX_FOLLOWERS: u32 = 5;
pub const FOLLOWER_DAILY_WAGE: f64 = 1.0;
pub const FOLLOWER_MIN_LIFESPAN_YEARS: u32 = 40;
pub const FOLLOWER_MAX_LIFESPAN_YEARS: u32 = 80;
pub const FOLLOWER_HIRE_AGE_YEARS: u32 = 16;

// Farm
pub const DEFAULT_MAX_FIELDS: u32 = 3;

// Home
pub const UPKEEP_HEALTH_PENALTY: f64 = 10.0;

// Log
pub const LOG_CAPACITY: usize = 200;
