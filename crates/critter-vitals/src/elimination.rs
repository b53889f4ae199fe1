//! Elimination pressure: a bounded accumulator that turns feeding and the
//! passage of time into occasional waste events.
//!
//! Pressure rises with elapsed time (`frequency_rate` per minute) and with
//! every food unit eaten. It maps linearly onto a base generation chance
//! between `base_chance` and `max_chance`; a dirty critter is more likely
//! to produce waste still. Each event releases a fixed chunk of pressure
//! and starts a cooldown, so generation stays self-limiting.
//!
//! Timing is data: the last event timestamp and each event's creation
//! time. Nothing here schedules anything; callers poll
//! [`EliminationPressure::check_generation`] and
//! [`EliminationPressure::stale_penalty`] on their own cadence.

use chrono::{DateTime, TimeDelta, Utc};
use critter_types::{EliminationSnapshot, STAT_MAX, STAT_MIN, WasteEvent, WasteEventId};
use rand::Rng;
use tracing::debug;

use crate::config::EliminationConfig;
use crate::error::VitalsError;
use crate::ledger::sanitize_elapsed;

/// Upper bound of pressure.
pub const MAX_PRESSURE: f64 = 100.0;

/// Result of one generation check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GenerationOutcome {
    /// Generation is suppressed (the critter is busy with an interaction).
    Suppressed,
    /// The minimum interval since the last event has not passed.
    Cooldown {
        /// Seconds left until generation is possible again.
        remaining_secs: i64,
    },
    /// The roll did not beat the chance.
    Missed {
        /// The uniform `[0, 1)` roll.
        roll: f64,
        /// The final chance the roll was compared against.
        chance: f64,
    },
    /// A waste event was generated.
    Spawned(WasteEvent),
}

impl GenerationOutcome {
    /// The spawned event, if any.
    pub const fn spawned(self) -> Option<WasteEvent> {
        match self {
            Self::Spawned(event) => Some(event),
            Self::Suppressed | Self::Cooldown { .. } | Self::Missed { .. } => None,
        }
    }
}

/// Summed penalty owed by stale waste events at one staleness check.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StalePenalty {
    /// Number of events older than the stale threshold.
    pub stale_events: u32,
    /// Cleanliness to remove.
    pub cleanliness: f64,
    /// Happiness to remove.
    pub happiness: f64,
    /// Health to remove.
    pub health: f64,
}

/// Pure chance curve: linear in pressure between base and max chance.
pub fn chance_for_pressure(pressure: f64, config: &EliminationConfig) -> f64 {
    let ratio = pressure.clamp(0.0, MAX_PRESSURE) / MAX_PRESSURE;
    config.base_chance + ratio * (config.max_chance - config.base_chance)
}

/// Scale a base chance by dirtiness: up to 1.5x at cleanliness 0.
pub fn scale_for_cleanliness(chance: f64, cleanliness: f64) -> f64 {
    let cleanliness = if cleanliness.is_nan() {
        STAT_MAX
    } else {
        cleanliness.clamp(STAT_MIN, STAT_MAX)
    };
    chance * (1.0 + (STAT_MAX - cleanliness) / 200.0)
}

/// The pressure accumulator and the waste events it has produced.
#[derive(Debug, Clone, PartialEq)]
pub struct EliminationPressure {
    pressure: f64,
    food_consumed: u32,
    last_event_at: Option<DateTime<Utc>>,
    suppressed: bool,
    current_chance: f64,
    events: Vec<WasteEvent>,
}

impl EliminationPressure {
    /// Empty pressure, no events.
    pub fn new(config: &EliminationConfig) -> Self {
        Self {
            pressure: 0.0,
            food_consumed: 0,
            last_event_at: None,
            suppressed: false,
            current_chance: chance_for_pressure(0.0, config),
            events: Vec::new(),
        }
    }

    /// Restore from persisted state. Pressure is clamped back into range.
    pub fn from_snapshot(snapshot: EliminationSnapshot, config: &EliminationConfig) -> Self {
        let pressure = if snapshot.pressure.is_finite() {
            snapshot.pressure.clamp(0.0, MAX_PRESSURE)
        } else {
            0.0
        };
        Self {
            pressure,
            food_consumed: snapshot.food_consumed,
            last_event_at: snapshot.last_event_at,
            suppressed: snapshot.suppressed,
            current_chance: chance_for_pressure(pressure, config),
            events: snapshot.active_events,
        }
    }

    /// Persistable state.
    pub fn snapshot(&self) -> EliminationSnapshot {
        EliminationSnapshot {
            pressure: self.pressure,
            food_consumed: self.food_consumed,
            last_event_at: self.last_event_at,
            suppressed: self.suppressed,
            active_events: self.events.clone(),
        }
    }

    /// Current pressure in `[0, 100]`.
    pub const fn pressure(&self) -> f64 {
        self.pressure
    }

    /// Food units not yet released by a waste event.
    pub const fn food_consumed(&self) -> u32 {
        self.food_consumed
    }

    /// Base generation chance at the current pressure.
    pub const fn current_chance(&self) -> f64 {
        self.current_chance
    }

    /// When the last waste event was generated.
    pub const fn last_event_at(&self) -> Option<DateTime<Utc>> {
        self.last_event_at
    }

    /// Whether generation is suppressed.
    pub const fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    /// Suppress or allow generation (e.g. while the user interacts).
    pub const fn set_suppressed(&mut self, suppressed: bool) {
        self.suppressed = suppressed;
    }

    /// Waste events not yet cleaned up, oldest first.
    pub fn active_events(&self) -> &[WasteEvent] {
        &self.events
    }

    /// Chance after scaling by dirtiness.
    pub fn final_chance(&self, cleanliness: f64) -> f64 {
        scale_for_cleanliness(self.current_chance, cleanliness)
    }

    /// Record `units` of food eaten.
    pub fn add_food_consumed(&mut self, units: u32, config: &EliminationConfig) {
        self.food_consumed = self.food_consumed.saturating_add(units);
        self.add_pressure(f64::from(units) * config.food_pressure_per_unit, config);
    }

    /// Accrue pressure for `elapsed_minutes` of time.
    pub fn tick_pressure(&mut self, elapsed_minutes: f64, config: &EliminationConfig) {
        self.add_pressure(sanitize_elapsed(elapsed_minutes) * config.frequency_rate, config);
    }

    fn add_pressure(&mut self, amount: f64, config: &EliminationConfig) {
        if amount.is_finite() {
            self.pressure = (self.pressure + amount).clamp(0.0, MAX_PRESSURE);
        }
        self.current_chance = chance_for_pressure(self.pressure, config);
    }

    /// Roll for a waste event at `now` using `rng`.
    pub fn check_generation(
        &mut self,
        cleanliness: f64,
        now: DateTime<Utc>,
        rng: &mut impl Rng,
        config: &EliminationConfig,
    ) -> GenerationOutcome {
        // Gates are checked before drawing so a refused check consumes no
        // randomness.
        if let Some(refusal) = self.refusal(now, config) {
            return refusal;
        }
        let roll: f64 = rng.random();
        self.check_generation_with_roll(cleanliness, now, roll, config)
    }

    /// [`check_generation`](Self::check_generation) with a caller-supplied
    /// roll in `[0, 1)`.
    pub fn check_generation_with_roll(
        &mut self,
        cleanliness: f64,
        now: DateTime<Utc>,
        roll: f64,
        config: &EliminationConfig,
    ) -> GenerationOutcome {
        if let Some(refusal) = self.refusal(now, config) {
            return refusal;
        }

        let chance = self.final_chance(cleanliness);
        if roll >= chance {
            return GenerationOutcome::Missed { roll, chance };
        }

        let event = WasteEvent {
            id: WasteEventId::new(),
            created_at: now,
        };
        self.events.push(event);
        self.last_event_at = Some(now);
        self.food_consumed = self.food_consumed.saturating_sub(1);
        self.add_pressure(-config.pressure_release, config);

        debug!(
            id = %event.id,
            roll,
            chance,
            pressure = self.pressure,
            "Waste event generated"
        );
        GenerationOutcome::Spawned(event)
    }

    fn refusal(&self, now: DateTime<Utc>, config: &EliminationConfig) -> Option<GenerationOutcome> {
        if self.suppressed {
            return Some(GenerationOutcome::Suppressed);
        }
        let last = self.last_event_at?;
        let since = now.signed_duration_since(last).num_seconds();
        if since < config.min_interval_secs {
            return Some(GenerationOutcome::Cooldown {
                remaining_secs: config.min_interval_secs.saturating_sub(since),
            });
        }
        None
    }

    /// Penalty owed at `now` by every event older than the stale threshold.
    ///
    /// Nothing is recorded: the same stale events owe the penalty again at
    /// every check until they are removed.
    pub fn stale_penalty(&self, now: DateTime<Utc>, config: &EliminationConfig) -> StalePenalty {
        let threshold = TimeDelta::seconds(config.stale_after_secs);
        let stale_events = self
            .events
            .iter()
            .filter(|event| now.signed_duration_since(event.created_at) > threshold)
            .fold(0_u32, |count, _| count.saturating_add(1));
        let count = f64::from(stale_events);
        StalePenalty {
            stale_events,
            cleanliness: count * config.stale_cleanliness_penalty,
            happiness: count * config.stale_happiness_penalty,
            health: count * config.stale_health_penalty,
        }
    }

    /// Remove one event (it was cleaned up).
    ///
    /// Cleanliness is not touched; the cleaning caller applies its own
    /// bonus.
    ///
    /// # Errors
    ///
    /// Returns [`VitalsError::UnknownWasteEvent`] if no active event has
    /// this identifier.
    pub fn remove_event(&mut self, id: WasteEventId) -> Result<WasteEvent, VitalsError> {
        let index = self
            .events
            .iter()
            .position(|event| event.id == id)
            .ok_or(VitalsError::UnknownWasteEvent(id))?;
        Ok(self.events.remove(index))
    }

    /// Remove every active event and return them.
    pub fn clear_events(&mut self) -> Vec<WasteEvent> {
        std::mem::take(&mut self.events)
    }

    /// Back to empty pressure with no events.
    pub fn reset(&mut self, config: &EliminationConfig) {
        *self = Self::new(config);
    }
}
