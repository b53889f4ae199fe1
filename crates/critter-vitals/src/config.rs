//! Configuration constants and defaults for critter vital mechanics.
//!
//! The [`VitalsConfig`] struct bundles every tunable so that callers (the
//! aggregate, the engine binary, tests) can override defaults. The named
//! constants are the defaults; code outside this module reads the config,
//! never the constants, except where a constant is documented as a caller
//! convention (e.g. [`SLEEP_ENERGY_THRESHOLD`]).

use critter_types::{DecayRates, GrowthStage, Stat};
use serde::Deserialize;

/// Energy below which the critter conventionally falls asleep.
pub const SLEEP_ENERGY_THRESHOLD: f64 = 15.0;

/// Minutes in one day of age.
pub const MINUTES_PER_DAY: f64 = 24.0 * 60.0;

/// Longest stretch of time, in seconds, integrated by one ledger update
/// when the aggregate catches up on a gap.
pub const MAX_STEP_SECS: u64 = 5;

/// Energy recovered per minute of sleep.
pub const SLEEP_RECOVERY_PER_MINUTE: f64 = 12.0;

/// Fraction of sleep energy gain paid back in fullness.
pub const SLEEP_HUNGER_COST_RATIO: f64 = 0.5;

/// Health at or below which the critter is sick.
pub const SICK_HEALTH_THRESHOLD: f64 = 30.0;

/// Any stat at or below this makes the critter sick.
pub const SICK_STAT_THRESHOLD: f64 = 5.0;

/// Seconds per health point lost while sick with some stat at exactly 0.
pub const CRITICAL_PENALTY_INTERVAL_SECS: f64 = 22.5;

/// Seconds per health point lost while sick otherwise.
pub const SICK_PENALTY_INTERVAL_SECS: f64 = 45.0;

/// Energy granted per elapsed second when energy is pinned at 0.
pub const EXHAUSTION_RECOVERY_PER_SEC: f64 = 60.0 / 5.0;

/// Cap on the exhaustion recovery granted in a single tick.
pub const EXHAUSTION_RECOVERY_CAP: f64 = 25.0;

/// Age in days at which a Baby becomes a Child.
pub const CHILD_AGE_DAYS: f64 = 30.0;

/// Age in days at which a Child becomes a Teen.
pub const TEEN_AGE_DAYS: f64 = 60.0;

/// Age in days at which a Teen becomes an Adult.
pub const ADULT_AGE_DAYS: f64 = 90.0;

/// Health and energy granted on every stage transition.
pub const EVOLUTION_HEAL: f64 = 20.0;

/// Pressure added per food unit consumed.
pub const FOOD_PRESSURE_PER_UNIT: f64 = 8.0;

/// Waste chance at zero pressure.
pub const BASE_WASTE_CHANCE: f64 = 0.05;

/// Waste chance at full pressure.
pub const MAX_WASTE_CHANCE: f64 = 0.4;

/// Minimum seconds between two waste events.
pub const MIN_WASTE_INTERVAL_SECS: i64 = 300;

/// Pressure released by each waste event.
pub const WASTE_PRESSURE_RELEASE: f64 = 60.0;

/// Pressure accrued per elapsed minute.
pub const DEFAULT_WASTE_FREQUENCY_RATE: f64 = 0.5;

/// Cleanliness lost when a waste event appears.
pub const WASTE_SPAWN_CLEANLINESS_PENALTY: f64 = 9.0;

/// Seconds after which an uncleaned waste event turns stale.
pub const WASTE_STALE_AFTER_SECS: i64 = 300;

/// Configuration for critter vital mechanics.
///
/// All rates are per minute of elapsed time unless the field says
/// otherwise. Missing keys in a config file fall back to [`Default`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct VitalsConfig {
    /// Base decay rates per stat.
    pub decay_rates: DecayRates,

    /// Decay multiplier while a Baby (default: 1.2).
    pub baby_decay_multiplier: f64,

    /// Decay multiplier while an Adult (default: 0.8).
    pub adult_decay_multiplier: f64,

    /// Minutes of elapsed time per day of age (default: 1440).
    pub minutes_per_day: f64,

    /// Energy per elapsed second granted when energy is pinned at 0
    /// (default: 12).
    pub exhaustion_recovery_per_sec: f64,

    /// Cap on exhaustion recovery per tick (default: 25).
    pub exhaustion_recovery_cap: f64,

    /// Longest gap, in seconds, that one ledger update integrates when
    /// catching up; longer gaps are split into steps of this size so
    /// sleep and growth are checked in between. 0 integrates any gap in
    /// one update (default: 5).
    pub max_step_secs: u64,

    /// Sickness thresholds and health penalty intervals.
    pub sickness: SicknessConfig,

    /// Sleep recovery and hunger coupling.
    pub sleep: SleepConfig,

    /// Growth thresholds and evolution bonus.
    pub growth: GrowthConfig,

    /// Elimination-pressure model.
    pub elimination: EliminationConfig,

    /// Stat changes applied by caller interactions.
    pub interactions: InteractionConfig,
}

impl Default for VitalsConfig {
    fn default() -> Self {
        Self {
            decay_rates: DecayRates::default(),
            baby_decay_multiplier: 1.2,
            adult_decay_multiplier: 0.8,
            minutes_per_day: MINUTES_PER_DAY,
            exhaustion_recovery_per_sec: EXHAUSTION_RECOVERY_PER_SEC,
            exhaustion_recovery_cap: EXHAUSTION_RECOVERY_CAP,
            max_step_secs: MAX_STEP_SECS,
            sickness: SicknessConfig::default(),
            sleep: SleepConfig::default(),
            growth: GrowthConfig::default(),
            elimination: EliminationConfig::default(),
            interactions: InteractionConfig::default(),
        }
    }
}

/// Sickness classification and health penalty settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SicknessConfig {
    /// Health at or below which the critter is sick (default: 30).
    pub health_threshold: f64,
    /// Any stat at or below this makes the critter sick (default: 5).
    pub stat_threshold: f64,
    /// Seconds per health point lost when some stat is exactly 0
    /// (default: 22.5).
    pub critical_interval_secs: f64,
    /// Seconds per health point lost otherwise (default: 45).
    pub interval_secs: f64,
}

impl Default for SicknessConfig {
    fn default() -> Self {
        Self {
            health_threshold: SICK_HEALTH_THRESHOLD,
            stat_threshold: SICK_STAT_THRESHOLD,
            critical_interval_secs: CRITICAL_PENALTY_INTERVAL_SECS,
            interval_secs: SICK_PENALTY_INTERVAL_SECS,
        }
    }
}

/// Sleep cycle settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SleepConfig {
    /// Energy recovered per minute asleep (default: 12).
    pub recovery_per_minute: f64,
    /// Fraction of energy gain paid in fullness (default: 0.5).
    pub hunger_cost_ratio: f64,
    /// Energy below which the aggregate puts the critter to sleep
    /// (default: 15).
    pub energy_threshold: f64,
    /// Whether the aggregate enters sleep on its own when energy drops
    /// below [`energy_threshold`](Self::energy_threshold) (default: true).
    pub auto_sleep: bool,
}

impl Default for SleepConfig {
    fn default() -> Self {
        Self {
            recovery_per_minute: SLEEP_RECOVERY_PER_MINUTE,
            hunger_cost_ratio: SLEEP_HUNGER_COST_RATIO,
            energy_threshold: SLEEP_ENERGY_THRESHOLD,
            auto_sleep: true,
        }
    }
}

/// Growth stage thresholds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GrowthConfig {
    /// Age in days for Baby to Child (default: 30).
    pub child_age: f64,
    /// Age in days for Child to Teen (default: 60).
    pub teen_age: f64,
    /// Age in days for Teen to Adult (default: 90).
    pub adult_age: f64,
    /// Health and energy granted on each transition (default: 20).
    pub evolution_heal: f64,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            child_age: CHILD_AGE_DAYS,
            teen_age: TEEN_AGE_DAYS,
            adult_age: ADULT_AGE_DAYS,
            evolution_heal: EVOLUTION_HEAL,
        }
    }
}

/// Elimination-pressure settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EliminationConfig {
    /// Pressure per elapsed minute (default: 0.5).
    pub frequency_rate: f64,
    /// Pressure per food unit (default: 8).
    pub food_pressure_per_unit: f64,
    /// Chance at zero pressure (default: 0.05).
    pub base_chance: f64,
    /// Chance at full pressure (default: 0.4).
    pub max_chance: f64,
    /// Seconds between events (default: 300).
    pub min_interval_secs: i64,
    /// Pressure released per event (default: 60).
    pub pressure_release: f64,
    /// Cleanliness lost when an event appears (default: 9).
    pub spawn_cleanliness_penalty: f64,
    /// Seconds before an event turns stale (default: 300).
    pub stale_after_secs: i64,
    /// Cleanliness lost per stale event per check (default: 3).
    pub stale_cleanliness_penalty: f64,
    /// Happiness lost per stale event per check (default: 0.5).
    pub stale_happiness_penalty: f64,
    /// Health lost per stale event per check (default: 0.2).
    pub stale_health_penalty: f64,
}

impl Default for EliminationConfig {
    fn default() -> Self {
        Self {
            frequency_rate: DEFAULT_WASTE_FREQUENCY_RATE,
            food_pressure_per_unit: FOOD_PRESSURE_PER_UNIT,
            base_chance: BASE_WASTE_CHANCE,
            max_chance: MAX_WASTE_CHANCE,
            min_interval_secs: MIN_WASTE_INTERVAL_SECS,
            pressure_release: WASTE_PRESSURE_RELEASE,
            spawn_cleanliness_penalty: WASTE_SPAWN_CLEANLINESS_PENALTY,
            stale_after_secs: WASTE_STALE_AFTER_SECS,
            stale_cleanliness_penalty: 3.0,
            stale_happiness_penalty: 0.5,
            stale_health_penalty: 0.2,
        }
    }
}

/// A batch of signed stat changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatDeltas {
    /// Change to fullness.
    pub hunger: f64,
    /// Change to mood.
    pub happiness: f64,
    /// Change to energy.
    pub energy: f64,
    /// Change to health.
    pub health: f64,
    /// Change to hygiene.
    pub cleanliness: f64,
    /// Change to company.
    pub social: f64,
}

impl StatDeltas {
    /// The delta for one stat.
    pub const fn get(&self, stat: Stat) -> f64 {
        match stat {
            Stat::Hunger => self.hunger,
            Stat::Happiness => self.happiness,
            Stat::Energy => self.energy,
            Stat::Health => self.health,
            Stat::Cleanliness => self.cleanliness,
            Stat::Social => self.social,
        }
    }
}

/// Stat changes applied by each caller interaction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Feeding (also adds one food unit of pressure).
    pub feed: StatDeltas,
    /// Playing.
    pub play: StatDeltas,
    /// Cleaning (also removes every active waste event).
    pub clean: StatDeltas,
    /// Giving medicine.
    pub give_medicine: StatDeltas,
    /// Petting.
    pub pet: StatDeltas,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            feed: StatDeltas {
                hunger: 20.0,
                happiness: 5.0,
                ..StatDeltas::default()
            },
            play: StatDeltas {
                hunger: -5.0,
                happiness: 15.0,
                energy: -10.0,
                social: 10.0,
                ..StatDeltas::default()
            },
            clean: StatDeltas {
                happiness: 5.0,
                cleanliness: 30.0,
                ..StatDeltas::default()
            },
            give_medicine: StatDeltas {
                happiness: -5.0,
                health: 25.0,
                ..StatDeltas::default()
            },
            pet: StatDeltas {
                happiness: 8.0,
                social: 12.0,
                ..StatDeltas::default()
            },
        }
    }
}

impl VitalsConfig {
    /// Decay multiplier for a growth stage.
    ///
    /// Babies decay faster, adults slower, every other stage at the base
    /// rate.
    pub const fn stage_multiplier(&self, stage: GrowthStage) -> f64 {
        match stage {
            GrowthStage::Baby => self.baby_decay_multiplier,
            GrowthStage::Adult => self.adult_decay_multiplier,
            GrowthStage::Child | GrowthStage::Teen | GrowthStage::Special => 1.0,
        }
    }
}
