//! Core data structs for the Critter simulation.
//!
//! These are plain data: the stat block, decay rates, and the persisted
//! snapshot shapes. The invariants (clamping, edge-triggered sickness,
//! stage rules) are enforced by `critter-vitals`, which owns the live
//! values and only hands out copies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{BehaviorState, GrowthStage, Stat};
use crate::ids::{CritterId, WasteEventId};

/// Lower bound of every stat.
pub const STAT_MIN: f64 = 0.0;

/// Upper bound of every stat.
pub const STAT_MAX: f64 = 100.0;

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// The six bounded well-being stats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StatBlock {
    /// Fullness (100 = fully fed).
    pub hunger: f64,
    /// Mood.
    pub happiness: f64,
    /// Wakefulness.
    pub energy: f64,
    /// Physical condition.
    pub health: f64,
    /// Hygiene.
    pub cleanliness: f64,
    /// Need for company.
    pub social: f64,
}

impl StatBlock {
    /// A block with every stat at the maximum.
    pub const fn full() -> Self {
        Self {
            hunger: STAT_MAX,
            happiness: STAT_MAX,
            energy: STAT_MAX,
            health: STAT_MAX,
            cleanliness: STAT_MAX,
            social: STAT_MAX,
        }
    }

    /// Read one stat.
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

    /// Mutable access to one stat. Callers are responsible for clamping.
    pub const fn get_mut(&mut self, stat: Stat) -> &mut f64 {
        match stat {
            Stat::Hunger => &mut self.hunger,
            Stat::Happiness => &mut self.happiness,
            Stat::Energy => &mut self.energy,
            Stat::Health => &mut self.health,
            Stat::Cleanliness => &mut self.cleanliness,
            Stat::Social => &mut self.social,
        }
    }

    /// The lowest stat value in the block.
    pub fn min_value(&self) -> f64 {
        Stat::ALL
            .into_iter()
            .map(|stat| self.get(stat))
            .fold(STAT_MAX, f64::min)
    }
}

impl Default for StatBlock {
    fn default() -> Self {
        Self::full()
    }
}

/// Per-minute decay rate of each stat before the stage multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "bindings/")]
pub struct DecayRates {
    /// Fullness lost per minute (default 0.25).
    pub hunger: f64,
    /// Mood lost per minute (default 0.2).
    pub happiness: f64,
    /// Energy lost per minute (default 0.125).
    pub energy: f64,
    /// Health lost per minute (default 0; health only drops through sickness).
    pub health: f64,
    /// Hygiene lost per minute (default 0.175).
    pub cleanliness: f64,
    /// Company need lost per minute (default 0.15).
    pub social: f64,
}

impl DecayRates {
    /// Rate for one stat.
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

    /// Replace the rate for one stat.
    pub const fn set(&mut self, stat: Stat, rate: f64) {
        match stat {
            Stat::Hunger => self.hunger = rate,
            Stat::Happiness => self.happiness = rate,
            Stat::Energy => self.energy = rate,
            Stat::Health => self.health = rate,
            Stat::Cleanliness => self.cleanliness = rate,
            Stat::Social => self.social = rate,
        }
    }
}

impl Default for DecayRates {
    fn default() -> Self {
        Self {
            hunger: 0.25,
            happiness: 0.2,
            energy: 0.125,
            health: 0.0,
            cleanliness: 0.175,
            social: 0.15,
        }
    }
}

// ---------------------------------------------------------------------------
// Component state
// ---------------------------------------------------------------------------

/// Persisted state of the sleep cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SleepState {
    /// Whether the critter is asleep.
    pub is_sleeping: bool,
    /// When the current sleep started. `None` while awake.
    pub sleep_start: Option<DateTime<Utc>>,
    /// Expected sleep length in minutes, computed at onset.
    pub sleep_duration_minutes: Option<f64>,
}

/// Persisted state of the sickness monitor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SicknessState {
    /// Current classification.
    pub is_sick: bool,
    /// Seconds of sickness accumulated since the last health penalty.
    pub penalty_elapsed_secs: f64,
}

/// A waste event produced by elimination pressure.
///
/// Stays active until removed by a cleaning interaction. Placement on
/// screen is a rendering concern and is not recorded here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WasteEvent {
    /// Unique event identifier.
    pub id: WasteEventId,
    /// When the event was generated.
    pub created_at: DateTime<Utc>,
}

/// Persisted state of the elimination-pressure model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EliminationSnapshot {
    /// Accumulated pressure in `[0, 100]`.
    pub pressure: f64,
    /// Food units consumed and not yet "processed" by a waste event.
    pub food_consumed: u32,
    /// When the last waste event was generated.
    pub last_event_at: Option<DateTime<Utc>>,
    /// Whether generation is currently suppressed (e.g. while interacting).
    pub suppressed: bool,
    /// Waste events that have not been cleaned up yet.
    pub active_events: Vec<WasteEvent>,
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Everything needed to resume a critter with identical trajectories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CritterSnapshot {
    /// Identity of the critter.
    pub id: CritterId,
    /// Current stat values.
    pub stats: StatBlock,
    /// Age in days.
    pub age: f64,
    /// Current growth stage.
    pub stage: GrowthStage,
    /// Decay rates, including any overrides.
    pub decay_rates: DecayRates,
    /// Sleep cycle state.
    pub sleep: SleepState,
    /// Sickness monitor state.
    pub sickness: SicknessState,
    /// Elimination-pressure state.
    pub elimination: EliminationSnapshot,
    /// Behavior state at the time of the snapshot.
    pub behavior: BehaviorState,
    /// Timestamp of the last simulation step, if any.
    pub last_seen: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn full_block_is_at_max() {
        let block = StatBlock::full();
        for stat in Stat::ALL {
            assert!(close(block.get(stat), STAT_MAX));
        }
    }

    #[test]
    fn get_mut_targets_the_named_stat() {
        let mut block = StatBlock::full();
        *block.get_mut(Stat::Social) = 42.0;
        assert!(close(block.social, 42.0));
        assert!(close(block.hunger, STAT_MAX));
    }

    #[test]
    fn min_value_finds_lowest() {
        let mut block = StatBlock::full();
        block.cleanliness = 3.0;
        block.energy = 10.0;
        assert!(close(block.min_value(), 3.0));
    }

    #[test]
    fn default_decay_rates() {
        let rates = DecayRates::default();
        assert!(close(rates.get(Stat::Hunger), 0.25));
        assert!(close(rates.get(Stat::Happiness), 0.2));
        assert!(close(rates.get(Stat::Energy), 0.125));
        assert!(close(rates.get(Stat::Health), 0.0));
        assert!(close(rates.get(Stat::Cleanliness), 0.175));
        assert!(close(rates.get(Stat::Social), 0.15));
    }

    #[test]
    fn snapshot_roundtrip_serde() {
        let snapshot = CritterSnapshot {
            id: CritterId::new(),
            stats: StatBlock::full(),
            age: 12.5,
            stage: GrowthStage::Child,
            decay_rates: DecayRates::default(),
            sleep: SleepState::default(),
            sickness: SicknessState::default(),
            elimination: EliminationSnapshot {
                pressure: 33.0,
                food_consumed: 2,
                last_event_at: None,
                suppressed: false,
                active_events: vec![WasteEvent {
                    id: WasteEventId::new(),
                    created_at: Utc::now(),
                }],
            },
            behavior: BehaviorState::Idle,
            last_seen: Some(Utc::now()),
        };
        let json = serde_json::to_string(&snapshot).unwrap_or_default();
        let restored: Result<CritterSnapshot, _> = serde_json::from_str(&json);
        assert_eq!(restored.ok(), Some(snapshot));
    }
}
