//! Hysteresis sickness classifier and the health drain it drives.
//!
//! The classification is a pure function of the stat block. The monitor
//! remembers the last classification so that callers polling every tick
//! only hear about boundary crossings, never the steady state.
//!
//! While sick, health drains by one point per fixed interval of sick time.
//! Sick time is accumulated as data (seconds since the last penalty), so
//! irregular tick lengths produce the same long-run drain.

use critter_types::{STAT_MIN, SicknessState, Stat, StatBlock};

use crate::config::SicknessConfig;

/// Tracks the sickness flag and the time owed toward the next health
/// penalty.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SicknessMonitor {
    is_sick: bool,
    penalty_elapsed_secs: f64,
}

impl SicknessMonitor {
    /// A healthy monitor with nothing accumulated.
    pub const fn new() -> Self {
        Self {
            is_sick: false,
            penalty_elapsed_secs: 0.0,
        }
    }

    /// Restore from persisted state. A corrupt accumulator restarts at 0.
    pub fn from_state(state: SicknessState) -> Self {
        let penalty_elapsed_secs = if state.penalty_elapsed_secs.is_finite() {
            state.penalty_elapsed_secs.max(0.0)
        } else {
            0.0
        };
        Self {
            is_sick: state.is_sick,
            penalty_elapsed_secs,
        }
    }

    /// Persistable state.
    pub const fn state(&self) -> SicknessState {
        SicknessState {
            is_sick: self.is_sick,
            penalty_elapsed_secs: self.penalty_elapsed_secs,
        }
    }

    /// Current classification.
    pub const fn is_sick(&self) -> bool {
        self.is_sick
    }

    /// Classify a stat block: sick when health is at or below the health
    /// threshold, or when any stat is at or below the stat threshold.
    pub fn evaluate(stats: &StatBlock, config: &SicknessConfig) -> bool {
        stats.health <= config.health_threshold
            || Stat::ALL
                .into_iter()
                .any(|stat| stats.get(stat) <= config.stat_threshold)
    }

    /// Re-evaluate and return the new classification only when it flipped.
    ///
    /// Leaving sickness discards any partially accumulated penalty time.
    pub fn observe(&mut self, stats: &StatBlock, config: &SicknessConfig) -> Option<bool> {
        let now_sick = Self::evaluate(stats, config);
        if now_sick == self.is_sick {
            return None;
        }
        self.is_sick = now_sick;
        if !now_sick {
            self.penalty_elapsed_secs = 0.0;
        }
        Some(now_sick)
    }

    /// Accumulate sick time and return the whole health points now owed.
    ///
    /// Returns 0 while healthy. The interval is the critical one when any
    /// stat sits at exactly 0.
    pub fn accrue_penalty(
        &mut self,
        stats: &StatBlock,
        elapsed_secs: f64,
        config: &SicknessConfig,
    ) -> f64 {
        if !self.is_sick {
            return 0.0;
        }
        let critical = stats.min_value() <= STAT_MIN;
        let interval = if critical {
            config.critical_interval_secs
        } else {
            config.interval_secs
        };
        if interval <= 0.0 || !interval.is_finite() {
            return 0.0;
        }

        self.penalty_elapsed_secs += elapsed_secs.max(0.0);
        let points = (self.penalty_elapsed_secs / interval).floor();
        self.penalty_elapsed_secs -= points * interval;
        points
    }

    /// Back to healthy with nothing accumulated.
    pub const fn reset(&mut self) {
        *self = Self::new();
    }
}
