//! Cadence scheduler for the periodic critter checks.
//!
//! A driver loop calls [`Scheduler::run_due`] as often as it likes; each
//! check runs only when its cadence has elapsed since it last ran. The
//! cadences are bookkeeping for the driver. The critter itself integrates
//! whatever elapsed time it is handed, so a late or skipped check changes
//! nothing but latency.
//!
//! Checks, in the order they run within one call:
//!
//! 1. **Stat tick** -- advance the critter to `now`
//! 2. **Sleep refresh** -- fall asleep if exhausted, report time left
//! 3. **Staleness** -- penalize waste left lying around
//! 4. **Waste check** -- roll for a new waste event

use chrono::{DateTime, TimeDelta, Utc};
use critter_vitals::elimination::{GenerationOutcome, StalePenalty};
use rand::Rng;

use crate::clock;
use crate::config::ScheduleConfig;
use crate::critter::{Critter, TickReport};

/// One periodic check with its own cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    every: TimeDelta,
    last_run: Option<DateTime<Utc>>,
}

impl Cadence {
    /// A cadence of `secs` seconds that is due immediately.
    pub fn from_secs(secs: u64) -> Self {
        let secs = i64::try_from(secs).unwrap_or(i64::MAX);
        Self {
            every: TimeDelta::try_seconds(secs).unwrap_or(TimeDelta::MAX),
            last_run: None,
        }
    }

    /// Whether the check is due at `now`. Marks it as run if so.
    ///
    /// A clock that moved backwards never makes a check due.
    pub fn poll(&mut self, now: DateTime<Utc>) -> bool {
        let due = self
            .last_run
            .is_none_or(|last| clock::elapsed_between(last, now) >= self.every);
        if due {
            self.last_run = Some(now);
        }
        due
    }

    /// When the check last ran.
    pub const fn last_run(&self) -> Option<DateTime<Utc>> {
        self.last_run
    }
}

/// What one [`Scheduler::run_due`] call did. `None` means not due.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    /// Stat tick result.
    pub tick: Option<TickReport>,
    /// Minutes of sleep left, when the sleep refresh ran while asleep.
    pub sleep_remaining_minutes: Option<f64>,
    /// Stale-waste penalty applied.
    pub stale: Option<StalePenalty>,
    /// Waste roll outcome.
    pub waste: Option<GenerationOutcome>,
}

impl CycleReport {
    /// Whether any check ran.
    pub const fn is_empty(&self) -> bool {
        self.tick.is_none()
            && self.sleep_remaining_minutes.is_none()
            && self.stale.is_none()
            && self.waste.is_none()
    }
}

/// The four cadences that drive a critter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduler {
    stat_tick: Cadence,
    sleep_refresh: Cadence,
    staleness: Cadence,
    waste_check: Cadence,
}

impl Scheduler {
    /// A scheduler with every check due immediately.
    pub fn new(config: &ScheduleConfig) -> Self {
        Self {
            stat_tick: Cadence::from_secs(config.stat_tick_secs),
            sleep_refresh: Cadence::from_secs(config.sleep_refresh_secs),
            staleness: Cadence::from_secs(config.staleness_secs),
            waste_check: Cadence::from_secs(config.waste_check_secs),
        }
    }

    /// Run every check that is due at `now`.
    pub fn run_due(
        &mut self,
        critter: &mut Critter,
        now: DateTime<Utc>,
        rng: &mut impl Rng,
    ) -> CycleReport {
        let mut report = CycleReport::default();

        if self.stat_tick.poll(now) {
            report.tick = Some(critter.advance_to(now));
        }
        if self.sleep_refresh.poll(now) {
            let _ = critter.refresh_sleep(now);
            report.sleep_remaining_minutes = critter.sleep_remaining_minutes(now);
        }
        if self.staleness.poll(now) {
            report.stale = Some(critter.check_staleness(now));
        }
        if self.waste_check.poll(now) {
            report.waste = Some(critter.check_waste(now, rng));
        }

        report
    }
}
