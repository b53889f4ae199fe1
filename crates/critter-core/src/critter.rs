//! The critter aggregate: one creature and everything it owns.
//!
//! [`Critter`] ties the vital components together and is the only type
//! callers mutate. Each operation:
//!
//! 1. delegates to the component that owns the rule (ledger, growth,
//!    elimination, interactions),
//! 2. applies the cross-component side effects (waste dirties the
//!    critter, evolution switches behavior, interactions wake it),
//! 3. returns the [`CritterEvent`]s it produced and forwards them to every
//!    registered [`CritterObserver`].
//!
//! The aggregate holds no timers. Time enters only through the elapsed
//! minutes and timestamps passed in, so a driver may call it at any
//! cadence.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use critter_types::{
    BehaviorState, CritterEvent, CritterId, CritterSnapshot, GrowthStage, Interaction, Stat,
    StatBlock, WakeReason, WasteEvent, WasteEventId,
};
use critter_vitals::VitalsConfig;
use critter_vitals::elimination::{EliminationPressure, GenerationOutcome, StalePenalty};
use critter_vitals::growth::{Evolution, Growth};
use critter_vitals::interactions::{self, InteractionOutcome};
use critter_vitals::ledger::{LedgerTick, StatLedger};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::clock;
use crate::error::CritterError;
use crate::observer::CritterObserver;

/// Summary of one stat update, or of every step of a catch-up.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// What the ledger did.
    pub ledger: LedgerTick,
    /// Behavior after the update.
    pub behavior: BehaviorState,
    /// Stat values after the update.
    pub stats: StatBlock,
    /// Age in days after the update.
    pub age: f64,
    /// Events emitted during the update.
    pub events: Vec<CritterEvent>,
}

impl TickReport {
    /// Fold the report of a later step into this one.
    fn absorb(&mut self, later: Self) {
        self.ledger.absorb(&later.ledger);
        self.behavior = later.behavior;
        self.stats = later.stats;
        self.age = later.age;
        self.events.extend(later.events);
    }
}

/// One critter: stats, growth, elimination, behavior, and observers.
pub struct Critter {
    id: CritterId,
    config: VitalsConfig,
    ledger: StatLedger,
    growth: Growth,
    elimination: EliminationPressure,
    behavior: BehaviorState,
    last_seen: Option<DateTime<Utc>>,
    observers: Vec<Box<dyn CritterObserver>>,
}

impl fmt::Debug for Critter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Critter")
            .field("id", &self.id)
            .field("ledger", &self.ledger)
            .field("growth", &self.growth)
            .field("elimination", &self.elimination)
            .field("behavior", &self.behavior)
            .field("last_seen", &self.last_seen)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl Critter {
    /// A newborn critter with full stats.
    pub fn new(config: VitalsConfig) -> Self {
        let ledger = StatLedger::with_decay_rates(config.decay_rates);
        let elimination = EliminationPressure::new(&config.elimination);
        Self {
            id: CritterId::new(),
            config,
            ledger,
            growth: Growth::new(),
            elimination,
            behavior: BehaviorState::Idle,
            last_seen: None,
            observers: Vec::new(),
        }
    }

    /// Resume a critter from a snapshot.
    ///
    /// Corrupt values (NaN stats, negative age, invalid rates) are
    /// sanitized on the way in. Observers are not part of a snapshot.
    pub fn restore(snapshot: CritterSnapshot, config: VitalsConfig) -> Self {
        let ledger = StatLedger::from_parts(
            snapshot.stats,
            snapshot.age,
            snapshot.decay_rates,
            snapshot.sleep,
            snapshot.sickness,
        );
        let elimination =
            EliminationPressure::from_snapshot(snapshot.elimination, &config.elimination);
        info!(
            id = %snapshot.id,
            stage = %snapshot.stage,
            age = ledger.age(),
            "Critter restored"
        );
        Self {
            id: snapshot.id,
            config,
            ledger,
            growth: Growth::from_stage(snapshot.stage),
            elimination,
            behavior: snapshot.behavior,
            last_seen: snapshot.last_seen,
            observers: Vec::new(),
        }
    }

    /// Everything needed to resume this critter later.
    pub fn snapshot(&self) -> CritterSnapshot {
        CritterSnapshot {
            id: self.id,
            stats: self.ledger.stats(),
            age: self.ledger.age(),
            stage: self.growth.stage(),
            decay_rates: self.ledger.decay_rates(),
            sleep: self.ledger.sleep().state(),
            sickness: self.ledger.sickness().state(),
            elimination: self.elimination.snapshot(),
            behavior: self.behavior,
            last_seen: self.last_seen,
        }
    }

    /// Register an observer for every future event.
    pub fn add_observer(&mut self, observer: Box<dyn CritterObserver>) {
        self.observers.push(observer);
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Identity of this critter.
    pub const fn id(&self) -> CritterId {
        self.id
    }

    /// The tunables this critter runs with.
    pub const fn config(&self) -> &VitalsConfig {
        &self.config
    }

    /// Current stat values.
    pub const fn stats(&self) -> StatBlock {
        self.ledger.stats()
    }

    /// Age in days.
    pub const fn age(&self) -> f64 {
        self.ledger.age()
    }

    /// Current growth stage.
    pub const fn stage(&self) -> GrowthStage {
        self.growth.stage()
    }

    /// Current behavior.
    pub const fn behavior(&self) -> BehaviorState {
        self.behavior
    }

    /// Whether the critter is asleep.
    pub const fn is_sleeping(&self) -> bool {
        self.ledger.is_sleeping()
    }

    /// Whether the critter is sick.
    pub const fn is_sick(&self) -> bool {
        self.ledger.is_sick()
    }

    /// When the critter was last advanced.
    pub const fn last_seen(&self) -> Option<DateTime<Utc>> {
        self.last_seen
    }

    /// The stat ledger.
    pub const fn ledger(&self) -> &StatLedger {
        &self.ledger
    }

    /// Elimination state and active waste events.
    pub const fn elimination(&self) -> &EliminationPressure {
        &self.elimination
    }

    /// Minutes left of the current sleep, for progress displays.
    pub fn sleep_remaining_minutes(&self, now: DateTime<Utc>) -> Option<f64> {
        self.ledger.sleep().remaining_minutes(now)
    }

    // -----------------------------------------------------------------------
    // Stats
    // -----------------------------------------------------------------------

    /// Read a stat by name.
    ///
    /// # Errors
    ///
    /// Returns [`CritterError::Vitals`] for an unknown stat name.
    pub fn get_stat(&self, name: &str) -> Result<f64, CritterError> {
        Ok(self.ledger.get_stat(name)?)
    }

    /// Add `amount` to a stat by name, clamped, and re-check sickness.
    ///
    /// # Errors
    ///
    /// Returns [`CritterError::Vitals`] for an unknown stat name; nothing
    /// changes in that case.
    pub fn modify_stat(&mut self, name: &str, amount: f64) -> Result<f64, CritterError> {
        let value = self.ledger.modify_stat(name, amount)?;
        let events: Vec<CritterEvent> = self.refresh_sickness().into_iter().collect();
        self.settle_behavior();
        self.emit(&events);
        Ok(value)
    }

    /// Override one decay rate.
    ///
    /// # Errors
    ///
    /// Returns [`CritterError::Vitals`] for an unknown stat name or a
    /// negative or non-finite rate.
    pub fn set_decay_rate(&mut self, name: &str, rate: f64) -> Result<(), CritterError> {
        Ok(self.ledger.set_decay_rate(name, rate)?)
    }

    // -----------------------------------------------------------------------
    // Time
    // -----------------------------------------------------------------------

    /// Advance the critter by `elapsed_minutes` in one step, stamping it as
    /// seen at `now`.
    ///
    /// Runs the ledger update, accrues elimination pressure, falls asleep
    /// when exhausted (if enabled), applies any age-based evolution, and
    /// settles the behavior state. Use [`advance_to`](Self::advance_to) for
    /// gaps longer than `max_step_secs`.
    pub fn update(&mut self, elapsed_minutes: f64, now: DateTime<Utc>) -> TickReport {
        let report = self.step(elapsed_minutes, now);
        self.publish(&report);
        report
    }

    /// Advance the critter to `now` using the time since it was last seen.
    ///
    /// The first call only stamps `now`. A clock that went backwards
    /// advances nothing. Gaps longer than `max_step_secs` are integrated
    /// in steps of that size, so a critter resumed after a day away falls
    /// asleep, wakes, and ages just as one ticked all along. Observers see
    /// one combined report.
    pub fn advance_to(&mut self, now: DateTime<Utc>) -> TickReport {
        let Some(mut cursor) = self.last_seen else {
            return self.update(0.0, now);
        };
        let max_step = i64::try_from(self.config.max_step_secs)
            .ok()
            .filter(|secs| *secs > 0)
            .and_then(TimeDelta::try_seconds);

        let step_end = |from: DateTime<Utc>| {
            max_step
                .and_then(|step| from.checked_add_signed(step))
                .map_or(now, |end| end.min(now))
        };

        let mut next = step_end(cursor);
        let mut report = self.step(clock::elapsed_minutes(cursor, next), next);
        while next < now {
            cursor = next;
            next = step_end(cursor);
            let later = self.step(clock::elapsed_minutes(cursor, next), next);
            report.absorb(later);
        }
        self.publish(&report);
        report
    }

    fn step(&mut self, elapsed_minutes: f64, now: DateTime<Utc>) -> TickReport {
        let previous = self.behavior;
        let ledger = self.ledger.update(elapsed_minutes, self.growth.stage(), &self.config);
        self.elimination
            .tick_pressure(ledger.elapsed_minutes, &self.config.elimination);

        let mut events = Vec::new();
        if ledger.sleep.woke {
            info!(id = %self.id, "Critter woke up rested");
            events.push(CritterEvent::SleepEnded {
                reason: WakeReason::Rested,
            });
        }
        if let Some(is_sick) = ledger.sickness_changed {
            info!(id = %self.id, is_sick, "Sickness changed");
            events.push(CritterEvent::SicknessChanged { is_sick });
        }
        if let Some(event) = self.auto_sleep(now) {
            events.push(event);
        }

        let mut evolved = false;
        if let Some(next) = self.growth.check_evolution(self.ledger.age(), &self.config.growth) {
            match self.apply_evolution(next) {
                Ok(event) => {
                    evolved = true;
                    events.push(event);
                    events.extend(self.refresh_sickness());
                }
                Err(e) => warn!(id = %self.id, error = %e, "Age-based evolution rejected"),
            }
        }

        self.behavior = self.next_behavior(previous, evolved);
        self.touch(now);

        TickReport {
            ledger,
            behavior: self.behavior,
            stats: self.ledger.stats(),
            age: self.ledger.age(),
            events,
        }
    }

    fn publish(&mut self, report: &TickReport) {
        debug!(
            id = %self.id,
            elapsed_minutes = report.ledger.elapsed_minutes,
            behavior = ?report.behavior,
            hunger = report.stats.hunger,
            energy = report.stats.energy,
            health = report.stats.health,
            age = report.age,
            age_frozen = report.ledger.age_frozen,
            "Critter updated"
        );

        self.emit(&report.events);
        for observer in &mut self.observers {
            observer.on_tick(report);
        }
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.last_seen = Some(self.last_seen.map_or(now, |last| last.max(now)));
    }

    // -----------------------------------------------------------------------
    // Behavior
    // -----------------------------------------------------------------------

    fn next_behavior(&self, previous: BehaviorState, evolved: bool) -> BehaviorState {
        if evolved {
            return BehaviorState::Evolving;
        }
        let next = match previous {
            // Evolving lasts exactly one tick, then falls through to the
            // ordinary classification.
            BehaviorState::Evolving | BehaviorState::Idle | BehaviorState::Sick => self.classify(),
            BehaviorState::Sleeping if self.ledger.is_sleeping() => BehaviorState::Sleeping,
            BehaviorState::Sleeping => self.classify(),
        };
        if next != previous {
            debug!(id = %self.id, from = ?previous, to = ?next, "Behavior changed");
        }
        next
    }

    fn classify(&self) -> BehaviorState {
        if self.ledger.is_sleeping() {
            BehaviorState::Sleeping
        } else if self.ledger.is_sick() {
            BehaviorState::Sick
        } else {
            BehaviorState::Idle
        }
    }

    fn settle_behavior(&mut self) {
        if self.behavior != BehaviorState::Evolving {
            self.behavior = self.classify();
        }
    }

    // -----------------------------------------------------------------------
    // Sleep
    // -----------------------------------------------------------------------

    /// Fall asleep at `now`. Returns the event, or `None` if already
    /// asleep.
    pub fn enter_sleep(&mut self, now: DateTime<Utc>) -> Option<CritterEvent> {
        let event = self.start_sleep(now)?;
        self.settle_behavior();
        self.emit(&[event]);
        Some(event)
    }

    /// Fall asleep if auto-sleep is on and energy is below the threshold.
    ///
    /// Used by the periodic sleep refresh; [`update`](Self::update) does the
    /// same check itself.
    pub fn refresh_sleep(&mut self, now: DateTime<Utc>) -> Option<CritterEvent> {
        let event = self.auto_sleep(now)?;
        self.settle_behavior();
        self.emit(&[event]);
        Some(event)
    }

    fn auto_sleep(&mut self, now: DateTime<Utc>) -> Option<CritterEvent> {
        let sleep = &self.config.sleep;
        if !sleep.auto_sleep || self.ledger.get(Stat::Energy) >= sleep.energy_threshold {
            return None;
        }
        self.start_sleep(now)
    }

    fn start_sleep(&mut self, now: DateTime<Utc>) -> Option<CritterEvent> {
        if !self.ledger.enter_sleep(now, &self.config) {
            return None;
        }
        let duration_minutes = self.ledger.sleep().sleep_duration_minutes().unwrap_or(0.0);
        info!(
            id = %self.id,
            energy = self.ledger.get(Stat::Energy),
            duration_minutes,
            "Critter fell asleep"
        );
        Some(CritterEvent::SleepStarted { duration_minutes })
    }

    /// Wake the critter regardless of energy. Returns the event, or `None`
    /// if it was awake.
    pub fn force_wake(&mut self) -> Option<CritterEvent> {
        if !self.ledger.force_wake() {
            return None;
        }
        info!(id = %self.id, energy = self.ledger.get(Stat::Energy), "Critter woken");
        let event = CritterEvent::SleepEnded {
            reason: WakeReason::Forced,
        };
        self.settle_behavior();
        self.emit(&[event]);
        Some(event)
    }

    // -----------------------------------------------------------------------
    // Growth
    // -----------------------------------------------------------------------

    /// Apply an age-based evolution if the critter is old enough.
    ///
    /// One step per call, so repeated calls at the same age transition at
    /// most once.
    pub fn check_evolution(&mut self) -> Option<Evolution> {
        let next = self.growth.check_evolution(self.ledger.age(), &self.config.growth)?;
        self.evolve_to(next).ok()
    }

    /// Move to `target` (Special via items or events, or any forward
    /// stage).
    ///
    /// # Errors
    ///
    /// Returns [`CritterError::Vitals`] when the growth rules forbid the
    /// transition; nothing changes in that case.
    pub fn evolve_to(&mut self, target: GrowthStage) -> Result<Evolution, CritterError> {
        let from = self.growth.stage();
        let event = self.apply_evolution(target).map_err(|e| {
            warn!(id = %self.id, %from, to = %target, "Stage transition rejected");
            e
        })?;
        let mut events = vec![event];
        events.extend(self.refresh_sickness());
        self.behavior = BehaviorState::Evolving;
        self.emit(&events);
        Ok(Evolution { from, to: target })
    }

    fn apply_evolution(&mut self, target: GrowthStage) -> Result<CritterEvent, CritterError> {
        let evolution = self
            .growth
            .evolve_to(target, &mut self.ledger, &self.config.growth)?;
        info!(
            id = %self.id,
            from = %evolution.from,
            to = %evolution.to,
            age = self.ledger.age(),
            "Critter evolved"
        );
        Ok(CritterEvent::StageChanged {
            from: evolution.from,
            to: evolution.to,
        })
    }

    // -----------------------------------------------------------------------
    // Elimination
    // -----------------------------------------------------------------------

    /// Roll for a waste event at `now`.
    ///
    /// A spawned event costs cleanliness.
    pub fn check_waste(&mut self, now: DateTime<Utc>, rng: &mut impl Rng) -> GenerationOutcome {
        let outcome = self.elimination.check_generation(
            self.ledger.get(Stat::Cleanliness),
            now,
            rng,
            &self.config.elimination,
        );
        self.after_waste_check(outcome);
        outcome
    }

    /// [`check_waste`](Self::check_waste) with a fixed roll in `[0, 1)`.
    pub fn check_waste_with_roll(&mut self, now: DateTime<Utc>, roll: f64) -> GenerationOutcome {
        let outcome = self.elimination.check_generation_with_roll(
            self.ledger.get(Stat::Cleanliness),
            now,
            roll,
            &self.config.elimination,
        );
        self.after_waste_check(outcome);
        outcome
    }

    fn after_waste_check(&mut self, outcome: GenerationOutcome) {
        if let GenerationOutcome::Spawned(waste) = outcome {
            self.ledger.apply(
                Stat::Cleanliness,
                -self.config.elimination.spawn_cleanliness_penalty,
            );
            info!(
                id = %self.id,
                waste = %waste.id,
                active = self.elimination.active_events().len(),
                "Waste created"
            );
            self.emit(&[CritterEvent::WasteCreated {
                id: waste.id,
                at: waste.created_at,
            }]);
        }
    }

    /// Apply the penalty owed by stale waste at `now`.
    pub fn check_staleness(&mut self, now: DateTime<Utc>) -> StalePenalty {
        let penalty = self.elimination.stale_penalty(now, &self.config.elimination);
        if penalty.stale_events > 0 {
            self.ledger.apply(Stat::Cleanliness, -penalty.cleanliness);
            self.ledger.apply(Stat::Happiness, -penalty.happiness);
            self.ledger.apply(Stat::Health, -penalty.health);
            debug!(
                id = %self.id,
                stale_events = penalty.stale_events,
                cleanliness = penalty.cleanliness,
                "Stale waste penalty applied"
            );
        }
        penalty
    }

    /// Remove one waste event. Cleanliness is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CritterError::Vitals`] if no active event has this id.
    pub fn remove_waste(&mut self, id: WasteEventId) -> Result<WasteEvent, CritterError> {
        let waste = self.elimination.remove_event(id)?;
        self.emit(&[CritterEvent::WasteRemoved { id }]);
        Ok(waste)
    }

    /// Remove every waste event. Cleanliness is unchanged.
    pub fn clear_waste(&mut self) -> Vec<WasteEvent> {
        let removed = self.elimination.clear_events();
        let events: Vec<CritterEvent> = removed
            .iter()
            .map(|waste| CritterEvent::WasteRemoved { id: waste.id })
            .collect();
        self.emit(&events);
        removed
    }

    /// Suppress or allow waste generation.
    pub const fn set_waste_suppressed(&mut self, suppressed: bool) {
        self.elimination.set_suppressed(suppressed);
    }

    // -----------------------------------------------------------------------
    // Interactions
    // -----------------------------------------------------------------------

    /// Feed, play with, clean, medicate, or pet the critter.
    pub fn interact(
        &mut self,
        interaction: Interaction,
    ) -> (InteractionOutcome, Vec<CritterEvent>) {
        let outcome = interactions::perform(
            interaction,
            &mut self.ledger,
            &mut self.elimination,
            &self.config,
        );

        let mut events = Vec::new();
        if outcome.woke {
            events.push(CritterEvent::SleepEnded {
                reason: WakeReason::Forced,
            });
        }
        events.extend(
            outcome
                .removed_events
                .iter()
                .map(|waste| CritterEvent::WasteRemoved { id: waste.id }),
        );
        events.extend(self.refresh_sickness());
        self.settle_behavior();

        info!(
            id = %self.id,
            ?interaction,
            woke = outcome.woke,
            removed = outcome.removed_events.len(),
            "Interaction performed"
        );
        self.emit(&events);
        (outcome, events)
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Start over as a newborn at `now`. Identity and decay rate overrides
    /// are kept.
    pub fn reset(&mut self, now: DateTime<Utc>) -> Vec<CritterEvent> {
        let from = self.growth.stage();
        self.ledger.reset();
        self.growth.reset();
        self.elimination.reset(&self.config.elimination);
        self.behavior = BehaviorState::Idle;
        self.last_seen = Some(now);
        info!(id = %self.id, %from, "Critter reset");

        let events = if from == GrowthStage::Baby {
            Vec::new()
        } else {
            vec![CritterEvent::StageChanged {
                from,
                to: GrowthStage::Baby,
            }]
        };
        self.emit(&events);
        events
    }

    fn refresh_sickness(&mut self) -> Option<CritterEvent> {
        let is_sick = self.ledger.refresh_sickness(&self.config)?;
        info!(id = %self.id, is_sick, "Sickness changed");
        Some(CritterEvent::SicknessChanged { is_sick })
    }

    fn emit(&mut self, events: &[CritterEvent]) {
        for event in events {
            for observer in &mut self.observers {
                observer.on_event(event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::EventLog;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default()
    }

    /// A critter whose stats never decay, so only age moves.
    fn ageless() -> Critter {
        let mut critter = Critter::new(VitalsConfig::default());
        for stat in Stat::ALL {
            assert!(critter.set_decay_rate(stat.name(), 0.0).is_ok());
        }
        critter
    }

    fn critter_with_log() -> (Critter, EventLog) {
        let mut critter = Critter::new(VitalsConfig::default());
        let log = EventLog::new();
        critter.add_observer(Box::new(log.clone()));
        (critter, log)
    }

    #[test]
    fn newborn_is_idle_baby() {
        let critter = Critter::new(VitalsConfig::default());
        assert_eq!(critter.stage(), GrowthStage::Baby);
        assert_eq!(critter.behavior(), BehaviorState::Idle);
        assert_eq!(critter.stats(), StatBlock::full());
        assert_eq!(critter.last_seen(), None);
    }

    #[test]
    fn first_advance_only_stamps_time() {
        let mut critter = Critter::new(VitalsConfig::default());
        let report = critter.advance_to(t0());
        assert!(close(report.ledger.elapsed_minutes, 0.0));
        assert_eq!(critter.last_seen(), Some(t0()));
    }

    #[test]
    fn advance_uses_time_since_last_seen() {
        let mut critter = Critter::new(VitalsConfig::default());
        let _ = critter.advance_to(t0());
        let report = critter.advance_to(t0() + TimeDelta::minutes(10));
        assert!(close(report.ledger.elapsed_minutes, 10.0));
        assert!(close(critter.stats().hunger, 97.0));
    }

    #[test]
    fn clock_regression_advances_nothing() {
        let mut critter = Critter::new(VitalsConfig::default());
        let _ = critter.advance_to(t0());
        let report = critter.advance_to(t0() - TimeDelta::hours(1));
        assert!(close(report.ledger.elapsed_minutes, 0.0));
        assert_eq!(critter.last_seen(), Some(t0()));
        assert_eq!(critter.stats(), StatBlock::full());
    }

    #[test]
    fn long_gap_sleeps_and_ages_in_steps() {
        let (mut critter, log) = critter_with_log();
        let _ = critter.advance_to(t0());
        let report = critter.advance_to(t0() + TimeDelta::days(1));

        assert!(!report.ledger.age_frozen);
        assert!((report.ledger.elapsed_minutes - 1440.0).abs() < 1e-6);
        assert!(critter.age() > 0.99);
        assert!(
            report
                .events
                .iter()
                .any(|event| matches!(event, CritterEvent::SleepStarted { .. }))
        );
        assert_eq!(critter.last_seen(), Some(t0() + TimeDelta::days(1)));
        // The whole catch-up reaches observers as one report.
        assert_eq!(log.ticks(), 2);
        assert_eq!(log.events(), report.events);
    }

    #[test]
    fn zero_max_step_integrates_the_gap_at_once() {
        let mut config = VitalsConfig::default();
        config.max_step_secs = 0;
        let mut critter = Critter::new(config);
        let _ = critter.advance_to(t0());
        let report = critter.advance_to(t0() + TimeDelta::days(1));

        assert!(report.ledger.age_frozen);
        assert!(close(critter.age(), 0.0));
    }

    #[test]
    fn partial_last_step_reaches_now() {
        let mut critter = Critter::new(VitalsConfig::default());
        let _ = critter.advance_to(t0());
        let now = t0() + TimeDelta::milliseconds(12_500);
        let report = critter.advance_to(now);
        assert!(close(report.ledger.elapsed_minutes * 60.0, 12.5));
        assert_eq!(critter.last_seen(), Some(now));
    }

    #[test]
    fn exhaustion_triggers_auto_sleep() {
        let (mut critter, log) = critter_with_log();
        let _ = critter.modify_stat("energy", -90.0);
        let report = critter.update(0.1, t0());

        assert!(critter.is_sleeping());
        assert_eq!(report.behavior, BehaviorState::Sleeping);
        assert!(
            log.events()
                .iter()
                .any(|event| matches!(event, CritterEvent::SleepStarted { .. }))
        );
    }

    #[test]
    fn auto_sleep_can_be_disabled() {
        let mut config = VitalsConfig::default();
        config.sleep.auto_sleep = false;
        let mut critter = Critter::new(config);
        let _ = critter.modify_stat("energy", -90.0);
        let _ = critter.update(0.1, t0());
        assert!(!critter.is_sleeping());
    }

    #[test]
    fn sleeping_takes_precedence_over_sick() {
        let mut critter = Critter::new(VitalsConfig::default());
        let _ = critter.modify_stat("energy", -50.0);
        let _ = critter.modify_stat("social", -98.0);
        assert!(critter.is_sick());
        assert_eq!(critter.behavior(), BehaviorState::Sick);

        let _ = critter.enter_sleep(t0());
        assert_eq!(critter.behavior(), BehaviorState::Sleeping);
        let report = critter.update(0.1, t0());
        assert_eq!(report.behavior, BehaviorState::Sleeping);

        let _ = critter.force_wake();
        assert_eq!(critter.behavior(), BehaviorState::Sick);
    }

    #[test]
    fn rested_wake_emits_event() {
        let (mut critter, log) = critter_with_log();
        let _ = critter.modify_stat("energy", -10.0);
        let _ = critter.enter_sleep(t0());
        let report = critter.update(5.0, t0() + TimeDelta::minutes(5));

        assert!(!critter.is_sleeping());
        assert!(report.events.contains(&CritterEvent::SleepEnded {
            reason: WakeReason::Rested
        }));
        assert_eq!(log.events().len(), 2);
    }

    #[test]
    fn age_threshold_evolves_and_settles() {
        let mut critter = ageless();
        let log = EventLog::new();
        critter.add_observer(Box::new(log.clone()));
        let _ = critter.modify_stat("health", -50.0);
        let report = critter.update(30.0 * 1440.0, t0());

        assert_eq!(critter.stage(), GrowthStage::Child);
        assert_eq!(report.behavior, BehaviorState::Evolving);
        assert!(close(critter.stats().health, 70.0));
        assert!(log.events().contains(&CritterEvent::StageChanged {
            from: GrowthStage::Baby,
            to: GrowthStage::Child
        }));

        let report = critter.update(0.0, t0());
        assert_ne!(report.behavior, BehaviorState::Evolving);
    }

    #[test]
    fn special_requires_explicit_evolution() {
        let mut critter = Critter::new(VitalsConfig::default());
        assert!(critter.evolve_to(GrowthStage::Special).is_ok());
        assert_eq!(critter.behavior(), BehaviorState::Evolving);
        assert!(matches!(
            critter.evolve_to(GrowthStage::Adult),
            Err(CritterError::Vitals { .. })
        ));
        assert_eq!(critter.stage(), GrowthStage::Special);
    }

    #[test]
    fn check_evolution_is_idempotent_at_same_age() {
        let mut critter = ageless();
        let _ = critter.update(31.0 * 1440.0, t0());
        assert_eq!(critter.stage(), GrowthStage::Child);
        assert!(critter.check_evolution().is_none());
        assert!(critter.check_evolution().is_none());
    }

    #[test]
    fn waste_spawn_costs_cleanliness() {
        let (mut critter, log) = critter_with_log();
        let outcome = critter.check_waste_with_roll(t0(), 0.0);
        assert!(matches!(outcome, GenerationOutcome::Spawned(_)));
        assert!(close(critter.stats().cleanliness, 91.0));
        assert_eq!(critter.elimination().active_events().len(), 1);
        assert!(matches!(
            log.events().first(),
            Some(CritterEvent::WasteCreated { .. })
        ));
    }

    #[test]
    fn stale_waste_penalizes_every_check() {
        let mut critter = Critter::new(VitalsConfig::default());
        let _ = critter.check_waste_with_roll(t0(), 0.0);
        let later = t0() + TimeDelta::seconds(301);

        let first = critter.check_staleness(later);
        let second = critter.check_staleness(later);
        assert_eq!(first.stale_events, 1);
        assert_eq!(first, second);
        assert!(close(critter.stats().cleanliness, 91.0 - 6.0));
        assert!(close(critter.stats().happiness, 99.0));
        assert!(close(critter.stats().health, 99.6));
    }

    #[test]
    fn removing_waste_leaves_cleanliness() {
        let mut critter = Critter::new(VitalsConfig::default());
        let spawned = critter.check_waste_with_roll(t0(), 0.0).spawned();
        assert!(spawned.is_some());
        let Some(waste) = spawned else { return };
        assert_eq!(critter.remove_waste(waste.id), Ok(waste));
        assert!(close(critter.stats().cleanliness, 91.0));
        assert!(critter.remove_waste(waste.id).is_err());
    }

    #[test]
    fn cleaning_interaction_removes_waste() {
        let (mut critter, log) = critter_with_log();
        let _ = critter.check_waste_with_roll(t0(), 0.0);
        let (outcome, events) = critter.interact(Interaction::Clean);
        assert_eq!(outcome.removed_events.len(), 1);
        assert!(matches!(events.first(), Some(CritterEvent::WasteRemoved { .. })));
        assert_eq!(log.events().len(), 2);
        assert!(critter.elimination().active_events().is_empty());
    }

    #[test]
    fn medicine_cures_sickness() {
        let mut critter = Critter::new(VitalsConfig::default());
        let _ = critter.modify_stat("health", -75.0);
        assert!(critter.is_sick());
        let (_, events) = critter.interact(Interaction::GiveMedicine);
        assert!(events.contains(&CritterEvent::SicknessChanged { is_sick: false }));
        assert_eq!(critter.behavior(), BehaviorState::Idle);
    }

    #[test]
    fn unknown_stat_is_rejected() {
        let mut critter = Critter::new(VitalsConfig::default());
        assert!(critter.modify_stat("mood", 5.0).is_err());
        assert!(critter.get_stat("mood").is_err());
        assert_eq!(critter.stats(), StatBlock::full());
    }

    #[test]
    fn snapshot_roundtrip_is_exact() {
        let mut critter = Critter::new(VitalsConfig::default());
        let _ = critter.advance_to(t0());
        let _ = critter.interact(Interaction::Feed);
        let _ = critter.check_waste_with_roll(t0(), 0.0);
        let _ = critter.modify_stat("energy", -95.0);
        let _ = critter.advance_to(t0() + TimeDelta::minutes(3));
        let _ = critter.set_decay_rate("social", 0.5);

        let snapshot = critter.snapshot();
        let restored = Critter::restore(snapshot.clone(), VitalsConfig::default());
        assert_eq!(restored.snapshot(), snapshot);
        assert_eq!(restored.id(), critter.id());
    }

    #[test]
    fn reset_returns_to_newborn() {
        let mut critter = ageless();
        let _ = critter.update(61.0 * 1440.0, t0());
        let _ = critter.update(1.0, t0());
        let _ = critter.check_waste_with_roll(t0(), 0.0);
        assert_ne!(critter.stage(), GrowthStage::Baby);

        let events = critter.reset(t0());
        assert_eq!(critter.stage(), GrowthStage::Baby);
        assert!(close(critter.age(), 0.0));
        assert!(critter.elimination().active_events().is_empty());
        assert_eq!(events.len(), 1);
    }
}
