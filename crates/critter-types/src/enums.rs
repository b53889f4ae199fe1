//! Enumeration types for the Critter simulation.
//!
//! Stat names, growth stages, and the small closed set of behavior states
//! the aggregate dispatches on each tick.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// One of the six bounded well-being stats.
///
/// Every stat lives in `[0, 100]`. Hunger is a fullness meter: 100 means
/// fully fed, 0 means starving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Stat {
    /// Fullness; decays fastest.
    Hunger,
    /// Mood.
    Happiness,
    /// Wakefulness; sleep restores it.
    Energy,
    /// Physical condition; no base decay, drained by sickness.
    Health,
    /// Hygiene; drained by decay and by waste.
    Cleanliness,
    /// Need for company.
    Social,
}

impl Stat {
    /// All six stats in canonical order.
    pub const ALL: [Self; 6] = [
        Self::Hunger,
        Self::Happiness,
        Self::Energy,
        Self::Health,
        Self::Cleanliness,
        Self::Social,
    ];

    /// The lowercase name used by callers and in persisted snapshots.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Hunger => "hunger",
            Self::Happiness => "happiness",
            Self::Energy => "energy",
            Self::Health => "health",
            Self::Cleanliness => "cleanliness",
            Self::Social => "social",
        }
    }

    /// Look up a stat by its lowercase name.
    ///
    /// Returns `None` for anything that is not one of the six recognized
    /// names. Matching is exact: `"Hunger"` is not recognized.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|stat| stat.name() == name)
    }
}

impl core::fmt::Display for Stat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Growth stages
// ---------------------------------------------------------------------------

/// A discrete step in the growth state machine.
///
/// Baby, Child, Teen, and Adult are reached by age. Special is only
/// reachable through an explicit evolve call.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub enum GrowthStage {
    /// Initial stage; decays 20% faster.
    #[default]
    Baby,
    /// Reached at age 30 days.
    Child,
    /// Reached at age 60 days.
    Teen,
    /// Reached at age 90 days; decays 20% slower.
    Adult,
    /// Terminal stage reached only by explicit evolution.
    Special,
}

impl GrowthStage {
    /// Position in the growth order. Special ranks above Adult.
    pub const fn rank(self) -> u8 {
        match self {
            Self::Baby => 0,
            Self::Child => 1,
            Self::Teen => 2,
            Self::Adult => 3,
            Self::Special => 4,
        }
    }

    /// The stage that follows this one by age, if any.
    ///
    /// Adult and Special have no age-driven successor.
    pub const fn next_by_age(self) -> Option<Self> {
        match self {
            Self::Baby => Some(Self::Child),
            Self::Child => Some(Self::Teen),
            Self::Teen => Some(Self::Adult),
            Self::Adult | Self::Special => None,
        }
    }
}

impl core::fmt::Display for GrowthStage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Baby => write!(f, "baby"),
            Self::Child => write!(f, "child"),
            Self::Teen => write!(f, "teen"),
            Self::Adult => write!(f, "adult"),
            Self::Special => write!(f, "special"),
        }
    }
}

// ---------------------------------------------------------------------------
// Behavior
// ---------------------------------------------------------------------------

/// The behavior state the aggregate dispatches on each tick.
///
/// Rendering layers pick animations from this; the simulation uses it to
/// decide which tick path runs.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub enum BehaviorState {
    /// Awake and healthy.
    #[default]
    Idle,
    /// Asleep; energy recovers at the cost of hunger.
    Sleeping,
    /// Sick; health drains over time.
    Sick,
    /// Just changed stage. Settles on the next tick.
    Evolving,
}

/// Why a sleep period ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum WakeReason {
    /// Energy reached 100.
    Rested,
    /// Woken by an external call regardless of energy.
    Forced,
}

/// A caller-facing interaction that applies a fixed batch of stat changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Interaction {
    /// Give food. Also raises elimination pressure.
    Feed,
    /// Play together. Costs energy and fullness.
    Play,
    /// Clean up. Removes every active waste event.
    Clean,
    /// Give medicine. Restores health.
    GiveMedicine,
    /// Pet gently.
    Pet,
}
