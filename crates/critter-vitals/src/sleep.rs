//! Sleep cycle: energy recovery coupled to hunger cost.
//!
//! Sleep timing is stored as data (onset timestamp and expected duration),
//! never as a live timer. Recovery is driven by the elapsed time passed to
//! [`SleepCycle::tick`], which the stat ledger calls on every update while
//! asleep, superposed on ordinary decay.
//!
//! Sleep ends by itself once energy reaches 100, or immediately through
//! [`SleepCycle::force_wake`].

use chrono::{DateTime, Utc};
use critter_types::{STAT_MAX, STAT_MIN, SleepState, StatBlock};

use crate::config::SleepConfig;

/// What one sleep tick did to the stats.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SleepTick {
    /// Energy added this tick.
    pub energy_gained: f64,
    /// Fullness paid for the energy.
    pub hunger_spent: f64,
    /// Whether energy reached 100 and sleep ended.
    pub woke: bool,
}

/// Sleep state machine: awake, or asleep since a recorded instant.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SleepCycle {
    is_sleeping: bool,
    sleep_start: Option<DateTime<Utc>>,
    sleep_duration_minutes: Option<f64>,
}

impl SleepCycle {
    /// An awake cycle.
    pub const fn new() -> Self {
        Self {
            is_sleeping: false,
            sleep_start: None,
            sleep_duration_minutes: None,
        }
    }

    /// Restore from persisted state. An awake state never carries an onset.
    pub const fn from_state(state: SleepState) -> Self {
        if state.is_sleeping {
            Self {
                is_sleeping: true,
                sleep_start: state.sleep_start,
                sleep_duration_minutes: state.sleep_duration_minutes,
            }
        } else {
            Self::new()
        }
    }

    /// Persistable state.
    pub const fn state(&self) -> SleepState {
        SleepState {
            is_sleeping: self.is_sleeping,
            sleep_start: self.sleep_start,
            sleep_duration_minutes: self.sleep_duration_minutes,
        }
    }

    /// Whether the critter is asleep.
    pub const fn is_sleeping(&self) -> bool {
        self.is_sleeping
    }

    /// When the current sleep began.
    pub const fn sleep_start(&self) -> Option<DateTime<Utc>> {
        self.sleep_start
    }

    /// Expected length of the current sleep in minutes.
    pub const fn sleep_duration_minutes(&self) -> Option<f64> {
        self.sleep_duration_minutes
    }

    /// Minutes of sleep needed to go from `energy` to full.
    pub fn duration_for(energy: f64, config: &SleepConfig) -> f64 {
        if config.recovery_per_minute <= 0.0 {
            return 0.0;
        }
        (STAT_MAX - energy.clamp(STAT_MIN, STAT_MAX)) / config.recovery_per_minute
    }

    /// Fall asleep at `now`. Returns `false` without changes if already
    /// asleep.
    pub fn enter_sleep(
        &mut self,
        current_energy: f64,
        now: DateTime<Utc>,
        config: &SleepConfig,
    ) -> bool {
        if self.is_sleeping {
            return false;
        }
        self.is_sleeping = true;
        self.sleep_start = Some(now);
        self.sleep_duration_minutes = Some(Self::duration_for(current_energy, config));
        true
    }

    /// Apply `elapsed_minutes` of sleep to the stats.
    ///
    /// Energy rises by `elapsed * recovery_per_minute`, never past 100.
    /// Fullness drops by `hunger_cost_ratio` of the energy actually gained,
    /// never below 0. Reaching 100 energy ends the sleep.
    pub fn tick(
        &mut self,
        stats: &mut StatBlock,
        elapsed_minutes: f64,
        config: &SleepConfig,
    ) -> SleepTick {
        if !self.is_sleeping {
            return SleepTick::default();
        }

        let headroom = (STAT_MAX - stats.energy).max(0.0);
        let energy_gained = (elapsed_minutes.max(0.0) * config.recovery_per_minute)
            .max(0.0)
            .min(headroom);
        stats.energy = (stats.energy + energy_gained).clamp(STAT_MIN, STAT_MAX);

        let mut hunger_spent = 0.0;
        if stats.hunger > STAT_MIN {
            hunger_spent = stats.hunger.min(energy_gained * config.hunger_cost_ratio).max(0.0);
            stats.hunger = (stats.hunger - hunger_spent).clamp(STAT_MIN, STAT_MAX);
        }

        let woke = stats.energy >= STAT_MAX;
        if woke {
            self.end();
        }

        SleepTick {
            energy_gained,
            hunger_spent,
            woke,
        }
    }

    /// Wake up regardless of energy. Returns whether the critter was asleep.
    pub const fn force_wake(&mut self) -> bool {
        let was_sleeping = self.is_sleeping;
        self.end();
        was_sleeping
    }

    /// Minutes left of the expected sleep at `now`, floored at 0.
    ///
    /// `None` while awake. Used by UI layers for progress displays; it does
    /// not influence when sleep actually ends.
    pub fn remaining_minutes(&self, now: DateTime<Utc>) -> Option<f64> {
        let start = self.sleep_start?;
        let duration = self.sleep_duration_minutes?;
        #[allow(clippy::cast_precision_loss)]
        let slept = now.signed_duration_since(start).num_milliseconds().max(0) as f64 / 60_000.0;
        Some((duration - slept).max(0.0))
    }

    const fn end(&mut self) {
        self.is_sleeping = false;
        self.sleep_start = None;
        self.sleep_duration_minutes = None;
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn drained(energy: f64) -> StatBlock {
        let mut stats = StatBlock::full();
        stats.energy = energy;
        stats
    }

    #[test]
    fn duration_from_onset_energy() {
        let config = SleepConfig::default();
        let mut cycle = SleepCycle::new();
        assert!(cycle.enter_sleep(10.0, Utc::now(), &config));
        assert!(close(cycle.sleep_duration_minutes().unwrap_or(0.0), 7.5));
    }

    #[test]
    fn reentry_is_noop() {
        let config = SleepConfig::default();
        let mut cycle = SleepCycle::new();
        let first = Utc::now();
        assert!(cycle.enter_sleep(10.0, first, &config));
        let later = first + TimeDelta::minutes(3);
        assert!(!cycle.enter_sleep(50.0, later, &config));
        assert_eq!(cycle.sleep_start(), Some(first));
        assert!(close(cycle.sleep_duration_minutes().unwrap_or(0.0), 7.5));
    }

    #[test]
    fn tick_recovers_energy_and_costs_hunger() {
        let config = SleepConfig::default();
        let mut cycle = SleepCycle::new();
        let mut stats = drained(10.0);
        let _ = cycle.enter_sleep(stats.energy, Utc::now(), &config);

        let result = cycle.tick(&mut stats, 1.0, &config);
        assert!(close(result.energy_gained, 12.0));
        assert!(close(result.hunger_spent, 6.0));
        assert!(close(stats.energy, 22.0));
        assert!(close(stats.hunger, 94.0));
        assert!(!result.woke);
        assert!(cycle.is_sleeping());
    }

    #[test]
    fn energy_never_exceeds_max_and_sleep_ends() {
        let config = SleepConfig::default();
        let mut cycle = SleepCycle::new();
        let mut stats = drained(95.0);
        let _ = cycle.enter_sleep(stats.energy, Utc::now(), &config);

        let result = cycle.tick(&mut stats, 10.0, &config);
        assert!(close(result.energy_gained, 5.0));
        assert!(close(result.hunger_spent, 2.5));
        assert!(close(stats.energy, 100.0));
        assert!(result.woke);
        assert!(!cycle.is_sleeping());
        assert_eq!(cycle.sleep_start(), None);
    }

    #[test]
    fn hunger_cost_floors_at_zero() {
        let config = SleepConfig::default();
        let mut cycle = SleepCycle::new();
        let mut stats = drained(0.0);
        stats.hunger = 3.0;
        let _ = cycle.enter_sleep(stats.energy, Utc::now(), &config);

        let result = cycle.tick(&mut stats, 2.0, &config);
        assert!(close(result.hunger_spent, 3.0));
        assert!(close(stats.hunger, 0.0));

        let result = cycle.tick(&mut stats, 1.0, &config);
        assert!(close(result.hunger_spent, 0.0));
    }

    #[test]
    fn tick_while_awake_does_nothing() {
        let config = SleepConfig::default();
        let mut cycle = SleepCycle::new();
        let mut stats = drained(10.0);
        let result = cycle.tick(&mut stats, 5.0, &config);
        assert_eq!(result, SleepTick::default());
        assert!(close(stats.energy, 10.0));
    }

    #[test]
    fn force_wake_ends_sleep_at_any_energy() {
        let config = SleepConfig::default();
        let mut cycle = SleepCycle::new();
        let _ = cycle.enter_sleep(3.0, Utc::now(), &config);
        assert!(cycle.force_wake());
        assert!(!cycle.is_sleeping());
        assert!(!cycle.force_wake());
    }

    #[test]
    fn sleep_always_terminates() {
        let config = SleepConfig::default();
        for start in [0.0, 1.0, 14.9, 50.0, 99.99] {
            let mut cycle = SleepCycle::new();
            let mut stats = drained(start);
            let _ = cycle.enter_sleep(stats.energy, Utc::now(), &config);
            let mut steps = 0_u32;
            while cycle.is_sleeping() && steps < 1000 {
                let _ = cycle.tick(&mut stats, 5.0 / 60.0, &config);
                steps += 1;
            }
            assert!(!cycle.is_sleeping(), "sleep from {start} did not end");
            assert!(steps <= 101);
        }
    }

    #[test]
    fn remaining_minutes_counts_down() {
        let config = SleepConfig::default();
        let mut cycle = SleepCycle::new();
        let start = Utc::now();
        let _ = cycle.enter_sleep(10.0, start, &config);
        let remaining = cycle.remaining_minutes(start + TimeDelta::minutes(5));
        assert!(close(remaining.unwrap_or(-1.0), 2.5));
        let remaining = cycle.remaining_minutes(start + TimeDelta::minutes(60));
        assert!(close(remaining.unwrap_or(-1.0), 0.0));
    }

    #[test]
    fn awake_restore_drops_onset() {
        let cycle = SleepCycle::from_state(SleepState {
            is_sleeping: false,
            sleep_start: Some(Utc::now()),
            sleep_duration_minutes: Some(3.0),
        });
        assert_eq!(cycle.state(), SleepState::default());
    }
}
