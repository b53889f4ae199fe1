//! The stat ledger: single source of truth for stat values and age.
//!
//! Every write goes through [`StatLedger::apply`], which clamps into
//! `[0, 100]`, so no caller can observe a stat out of range. The ledger
//! also owns the sleep cycle and the sickness monitor because both are
//! consulted inside [`StatLedger::update`].
//!
//! # Order of operations in one update
//!
//! 1. Decay every stat at `rate * stage multiplier * elapsed minutes`
//! 2. If asleep, superpose sleep recovery (energy up, fullness down)
//! 3. If energy is pinned at 0, freeze age and grant exhaustion recovery;
//!    otherwise advance age
//! 4. Re-evaluate sickness (edge-triggered)
//! 5. If sick, apply the accumulated health penalty
//!
//! All time effects are rates multiplied by the caller-supplied elapsed
//! time, so irregular tick intervals integrate to the same trajectory.

use chrono::{DateTime, Utc};
use critter_types::{
    DecayRates, GrowthStage, STAT_MAX, STAT_MIN, SicknessState, SleepState, Stat, StatBlock,
};

use crate::config::VitalsConfig;
use crate::error::VitalsError;
use crate::sickness::SicknessMonitor;
use crate::sleep::{SleepCycle, SleepTick};

/// Treat negative, NaN, or infinite elapsed time as no time at all.
pub fn sanitize_elapsed(elapsed: f64) -> f64 {
    if elapsed.is_finite() && elapsed > 0.0 {
        elapsed
    } else {
        0.0
    }
}

/// Clamp a stat value into range. NaN collapses to the minimum.
fn clamp_stat(value: f64) -> f64 {
    if value.is_nan() {
        STAT_MIN
    } else {
        value.clamp(STAT_MIN, STAT_MAX)
    }
}

/// What one [`StatLedger::update`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LedgerTick {
    /// Elapsed minutes actually applied (after sanitizing).
    pub elapsed_minutes: f64,
    /// Sleep recovery applied this tick.
    pub sleep: SleepTick,
    /// Whether age was frozen because energy was pinned at 0.
    pub age_frozen: bool,
    /// Energy granted by exhaustion recovery.
    pub exhaustion_recovery: f64,
    /// New sickness classification, only when it flipped this tick.
    pub sickness_changed: Option<bool>,
    /// Health points removed by the sickness penalty.
    pub health_penalty: f64,
}

impl LedgerTick {
    /// Fold a later update into this one, as if both were a single tick.
    ///
    /// Amounts add up; `sickness_changed` keeps the latest flip.
    pub fn absorb(&mut self, later: &Self) {
        self.elapsed_minutes += later.elapsed_minutes;
        self.sleep.energy_gained += later.sleep.energy_gained;
        self.sleep.hunger_spent += later.sleep.hunger_spent;
        self.sleep.woke |= later.sleep.woke;
        self.age_frozen |= later.age_frozen;
        self.exhaustion_recovery += later.exhaustion_recovery;
        if later.sickness_changed.is_some() {
            self.sickness_changed = later.sickness_changed;
        }
        self.health_penalty += later.health_penalty;
    }
}

/// Six bounded stats, age, decay rates, sleep, and sickness.
#[derive(Debug, Clone, PartialEq)]
pub struct StatLedger {
    stats: StatBlock,
    age: f64,
    decay_rates: DecayRates,
    sleep: SleepCycle,
    sickness: SicknessMonitor,
}

impl Default for StatLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl StatLedger {
    /// A fresh ledger: every stat at 100, age 0, default decay rates.
    pub fn new() -> Self {
        Self::with_decay_rates(DecayRates::default())
    }

    /// A fresh ledger with custom decay rates.
    pub const fn with_decay_rates(decay_rates: DecayRates) -> Self {
        Self {
            stats: StatBlock::full(),
            age: 0.0,
            decay_rates,
            sleep: SleepCycle::new(),
            sickness: SicknessMonitor::new(),
        }
    }

    /// Rebuild a ledger from persisted parts.
    ///
    /// Out-of-range stats are clamped, a negative or non-finite age becomes
    /// 0, and invalid decay rates fall back to the defaults.
    pub fn from_parts(
        stats: StatBlock,
        age: f64,
        decay_rates: DecayRates,
        sleep: SleepState,
        sickness: SicknessState,
    ) -> Self {
        let mut clamped = stats;
        for stat in Stat::ALL {
            let slot = clamped.get_mut(stat);
            *slot = clamp_stat(*slot);
        }

        let defaults = DecayRates::default();
        let mut rates = decay_rates;
        for stat in Stat::ALL {
            let rate = rates.get(stat);
            if !rate.is_finite() || rate < 0.0 {
                rates.set(stat, defaults.get(stat));
            }
        }

        Self {
            stats: clamped,
            age: if age.is_finite() { age.max(0.0) } else { 0.0 },
            decay_rates: rates,
            sleep: SleepCycle::from_state(sleep),
            sickness: SicknessMonitor::from_state(sickness),
        }
    }

    // -----------------------------------------------------------------------
    // Stats
    // -----------------------------------------------------------------------

    /// A copy of all six stats.
    pub const fn stats(&self) -> StatBlock {
        self.stats
    }

    /// Read one stat.
    pub const fn get(&self, stat: Stat) -> f64 {
        self.stats.get(stat)
    }

    /// Read one stat by name.
    ///
    /// # Errors
    ///
    /// Returns [`VitalsError::UnknownStat`] if `name` is not a stat.
    pub fn get_stat(&self, name: &str) -> Result<f64, VitalsError> {
        Stat::from_name(name)
            .map(|stat| self.get(stat))
            .ok_or_else(|| VitalsError::UnknownStat(name.to_owned()))
    }

    /// Add `amount` (possibly negative) to a stat, clamped into `[0, 100]`.
    ///
    /// Non-finite amounts are ignored. Returns the new value.
    pub fn apply(&mut self, stat: Stat, amount: f64) -> f64 {
        let slot = self.stats.get_mut(stat);
        if amount.is_finite() {
            *slot = clamp_stat(*slot + amount);
        }
        *slot
    }

    /// [`apply`](Self::apply) by name.
    ///
    /// # Errors
    ///
    /// Returns [`VitalsError::UnknownStat`] without changing anything if
    /// `name` is not a stat.
    pub fn modify_stat(&mut self, name: &str, amount: f64) -> Result<f64, VitalsError> {
        let stat = Stat::from_name(name).ok_or_else(|| VitalsError::UnknownStat(name.to_owned()))?;
        Ok(self.apply(stat, amount))
    }

    // -----------------------------------------------------------------------
    // Age and rates
    // -----------------------------------------------------------------------

    /// Age in days.
    pub const fn age(&self) -> f64 {
        self.age
    }

    /// Current decay rates.
    pub const fn decay_rates(&self) -> DecayRates {
        self.decay_rates
    }

    /// Override the per-minute decay rate of one stat.
    ///
    /// # Errors
    ///
    /// Returns [`VitalsError::UnknownStat`] for an unknown name and
    /// [`VitalsError::InvalidRate`] for a negative or non-finite rate.
    pub fn set_decay_rate(&mut self, name: &str, rate: f64) -> Result<(), VitalsError> {
        let stat = Stat::from_name(name).ok_or_else(|| VitalsError::UnknownStat(name.to_owned()))?;
        if !rate.is_finite() || rate < 0.0 {
            return Err(VitalsError::InvalidRate {
                stat: name.to_owned(),
                rate,
            });
        }
        self.decay_rates.set(stat, rate);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Sleep and sickness
    // -----------------------------------------------------------------------

    /// The sleep cycle.
    pub const fn sleep(&self) -> &SleepCycle {
        &self.sleep
    }

    /// Whether the critter is asleep.
    pub const fn is_sleeping(&self) -> bool {
        self.sleep.is_sleeping()
    }

    /// Fall asleep at `now` using current energy. `false` if already asleep.
    pub fn enter_sleep(&mut self, now: DateTime<Utc>, config: &VitalsConfig) -> bool {
        self.sleep.enter_sleep(self.stats.energy, now, &config.sleep)
    }

    /// Wake regardless of energy. Returns whether the critter was asleep.
    pub const fn force_wake(&mut self) -> bool {
        self.sleep.force_wake()
    }

    /// The sickness monitor.
    pub const fn sickness(&self) -> &SicknessMonitor {
        &self.sickness
    }

    /// Current sickness classification.
    pub const fn is_sick(&self) -> bool {
        self.sickness.is_sick()
    }

    /// Re-evaluate sickness outside of a tick (e.g. after an interaction).
    ///
    /// Returns the new classification only when it flipped.
    pub fn refresh_sickness(&mut self, config: &VitalsConfig) -> Option<bool> {
        self.sickness.observe(&self.stats, &config.sickness)
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Advance the ledger by `elapsed_minutes` at the decay speed of `stage`.
    ///
    /// See the module docs for the fixed order of operations. Negative or
    /// non-finite elapsed time is treated as zero.
    pub fn update(
        &mut self,
        elapsed_minutes: f64,
        stage: GrowthStage,
        config: &VitalsConfig,
    ) -> LedgerTick {
        let elapsed = sanitize_elapsed(elapsed_minutes);
        let multiplier = config.stage_multiplier(stage);

        // 1. Decay
        for stat in Stat::ALL {
            let loss = self.decay_rates.get(stat) * multiplier * elapsed;
            if loss > 0.0 {
                self.apply(stat, -loss);
            }
        }

        // 2. Sleep recovery, superposed on decay
        let sleep = self.sleep.tick(&mut self.stats, elapsed, &config.sleep);

        // 3. Age, unless exhausted
        let mut age_frozen = false;
        let mut exhaustion_recovery = 0.0;
        if self.stats.energy <= STAT_MIN {
            age_frozen = true;
            exhaustion_recovery = (elapsed * 60.0 * config.exhaustion_recovery_per_sec)
                .min(config.exhaustion_recovery_cap)
                .max(0.0);
            self.apply(Stat::Energy, exhaustion_recovery);
        } else if config.minutes_per_day > 0.0 {
            self.age += elapsed / config.minutes_per_day;
        }

        // 4. Sickness
        let sickness_changed = self.sickness.observe(&self.stats, &config.sickness);

        // 5. Health penalty while sick
        let health_penalty = self
            .sickness
            .accrue_penalty(&self.stats, elapsed * 60.0, &config.sickness);
        if health_penalty > 0.0 {
            self.apply(Stat::Health, -health_penalty);
        }

        LedgerTick {
            elapsed_minutes: elapsed,
            sleep,
            age_frozen,
            exhaustion_recovery,
            sickness_changed,
            health_penalty,
        }
    }

    /// Back to a fresh ledger, keeping the decay rates.
    pub fn reset(&mut self) {
        *self = Self::with_decay_rates(self.decay_rates);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn fresh_ledger_is_full() {
        let ledger = StatLedger::new();
        for stat in Stat::ALL {
            assert!(close(ledger.get(stat), 100.0));
        }
        assert!(close(ledger.age(), 0.0));
        assert!(!ledger.is_sick());
        assert!(!ledger.is_sleeping());
    }

    #[test]
    fn ten_minutes_of_decay_at_base_rate() {
        let mut ledger = StatLedger::new();
        let _ = ledger.update(10.0, GrowthStage::Child, &VitalsConfig::default());
        assert!(close(ledger.get(Stat::Hunger), 97.5));
        assert!(close(ledger.get(Stat::Happiness), 98.0));
        assert!(close(ledger.get(Stat::Energy), 98.75));
        assert!(close(ledger.get(Stat::Cleanliness), 98.25));
        assert!(close(ledger.get(Stat::Social), 98.5));
        assert!(close(ledger.get(Stat::Health), 100.0));
    }

    #[test]
    fn stage_multiplier_scales_decay() {
        let config = VitalsConfig::default();
        let mut baby = StatLedger::new();
        let mut adult = StatLedger::new();
        let _ = baby.update(10.0, GrowthStage::Baby, &config);
        let _ = adult.update(10.0, GrowthStage::Adult, &config);
        assert!(close(baby.get(Stat::Hunger), 97.0));
        assert!(close(adult.get(Stat::Hunger), 98.0));
    }

    #[test]
    fn age_advances_in_days() {
        let mut ledger = StatLedger::new();
        let _ = ledger.update(720.0, GrowthStage::Child, &VitalsConfig::default());
        assert!(close(ledger.age(), 0.5));
    }

    #[test]
    fn negative_elapsed_is_zero() {
        let mut ledger = StatLedger::new();
        let tick = ledger.update(-30.0, GrowthStage::Baby, &VitalsConfig::default());
        assert!(close(tick.elapsed_minutes, 0.0));
        assert_eq!(ledger.stats(), StatBlock::full());
        assert!(close(ledger.age(), 0.0));

        let tick = ledger.update(f64::NAN, GrowthStage::Baby, &VitalsConfig::default());
        assert!(close(tick.elapsed_minutes, 0.0));
        assert_eq!(ledger.stats(), StatBlock::full());
    }

    #[test]
    fn modify_stat_clamps() {
        let mut ledger = StatLedger::new();
        assert_eq!(ledger.modify_stat("hunger", 50.0), Ok(100.0));
        assert_eq!(ledger.modify_stat("hunger", -250.0), Ok(0.0));
        assert_eq!(ledger.modify_stat("hunger", 12.5), Ok(12.5));
    }

    #[test]
    fn unknown_stat_is_rejected_without_changes() {
        let mut ledger = StatLedger::new();
        let before = ledger.stats();
        assert_eq!(
            ledger.modify_stat("mood", 5.0),
            Err(VitalsError::UnknownStat("mood".to_owned()))
        );
        assert_eq!(ledger.stats(), before);
        assert_eq!(
            ledger.get_stat("mood"),
            Err(VitalsError::UnknownStat("mood".to_owned()))
        );
        assert_eq!(ledger.get_stat("energy"), Ok(100.0));
    }

    #[test]
    fn non_finite_amounts_are_ignored() {
        let mut ledger = StatLedger::new();
        ledger.apply(Stat::Social, -40.0);
        assert!(close(ledger.apply(Stat::Social, f64::NAN), 60.0));
        assert!(close(ledger.apply(Stat::Social, f64::INFINITY), 60.0));
    }

    #[test]
    fn stats_stay_in_range_under_arbitrary_deltas() {
        let mut ledger = StatLedger::new();
        let deltas = [
            -1e9, 1e9, -0.5, 250.0, -99.99, 33.3, f64::MIN, f64::MAX, -7.0, 0.0,
        ];
        for (i, delta) in deltas.iter().cycle().take(120).enumerate() {
            let stat = Stat::ALL
                .get(i % Stat::ALL.len())
                .copied()
                .unwrap_or(Stat::Hunger);
            let value = ledger.apply(stat, *delta);
            assert!((0.0..=100.0).contains(&value));
            for s in Stat::ALL {
                assert!((0.0..=100.0).contains(&ledger.get(s)));
            }
        }
    }

    #[test]
    fn sleep_superposes_on_decay() {
        let config = VitalsConfig::default();
        let mut ledger = StatLedger::new();
        ledger.apply(Stat::Energy, -90.0);
        assert!(ledger.enter_sleep(Utc::now(), &config));

        let tick = ledger.update(1.0, GrowthStage::Child, &config);
        // 10 - 0.125 decay + 12 recovery
        assert!(close(ledger.get(Stat::Energy), 21.875));
        // 100 - 0.25 decay - 6 sleep cost
        assert!(close(ledger.get(Stat::Hunger), 93.75));
        assert!(close(tick.sleep.energy_gained, 12.0));
        assert!(ledger.is_sleeping());
    }

    #[test]
    fn pinned_energy_freezes_age_and_recovers() {
        let config = VitalsConfig::default();
        let mut ledger = StatLedger::new();
        ledger.apply(Stat::Energy, -100.0);

        // 5 seconds at 12 energy per second would be 60; capped at 25.
        let tick = ledger.update(5.0 / 60.0, GrowthStage::Child, &config);
        assert!(tick.age_frozen);
        assert!(close(tick.exhaustion_recovery, 25.0));
        assert!(close(ledger.get(Stat::Energy), 25.0));
        assert!(close(ledger.age(), 0.0));
    }

    #[test]
    fn short_exhausted_tick_is_not_capped() {
        let config = VitalsConfig::default();
        let mut ledger = StatLedger::new();
        ledger.apply(Stat::Energy, -100.0);
        let tick = ledger.update(1.0 / 60.0, GrowthStage::Child, &config);
        assert!(close(tick.exhaustion_recovery, 12.0));
    }

    #[test]
    fn sickness_edges_surface_once() {
        let config = VitalsConfig::default();
        let mut ledger = StatLedger::new();
        ledger.apply(Stat::Health, -75.0);

        let first = ledger.update(0.1, GrowthStage::Child, &config);
        assert_eq!(first.sickness_changed, Some(true));
        let second = ledger.update(0.1, GrowthStage::Child, &config);
        assert_eq!(second.sickness_changed, None);

        ledger.apply(Stat::Health, 60.0);
        let third = ledger.update(0.1, GrowthStage::Child, &config);
        assert_eq!(third.sickness_changed, Some(false));
    }

    #[test]
    fn sick_health_drains_by_interval() {
        let config = VitalsConfig::default();
        let mut ledger = StatLedger::new();
        ledger.apply(Stat::Health, -75.0);

        // 45 seconds while sick, no stat at zero: exactly one point.
        let tick = ledger.update(0.75, GrowthStage::Child, &config);
        assert!(close(tick.health_penalty, 1.0));
        assert!(close(ledger.get(Stat::Health), 24.0));
    }

    #[test]
    fn set_decay_rate_validates() {
        let mut ledger = StatLedger::new();
        assert!(ledger.set_decay_rate("social", 1.0).is_ok());
        assert!(close(ledger.decay_rates().social, 1.0));
        assert!(matches!(
            ledger.set_decay_rate("social", -1.0),
            Err(VitalsError::InvalidRate { .. })
        ));
        assert!(matches!(
            ledger.set_decay_rate("vibes", 1.0),
            Err(VitalsError::UnknownStat(_))
        ));
    }

    #[test]
    fn from_parts_sanitizes() {
        let mut stats = StatBlock::full();
        stats.hunger = 150.0;
        stats.energy = f64::NAN;
        let mut rates = DecayRates::default();
        rates.social = -3.0;
        let ledger = StatLedger::from_parts(
            stats,
            -2.0,
            rates,
            SleepState::default(),
            SicknessState::default(),
        );
        assert!(close(ledger.get(Stat::Hunger), 100.0));
        assert!(close(ledger.get(Stat::Energy), 0.0));
        assert!(close(ledger.age(), 0.0));
        assert!(close(ledger.decay_rates().social, 0.15));
    }

    #[test]
    fn reset_keeps_rates() {
        let config = VitalsConfig::default();
        let mut ledger = StatLedger::new();
        let _ = ledger.set_decay_rate("hunger", 2.0);
        let _ = ledger.update(600.0, GrowthStage::Baby, &config);
        ledger.reset();
        assert_eq!(ledger.stats(), StatBlock::full());
        assert!(close(ledger.age(), 0.0));
        assert!(close(ledger.decay_rates().hunger, 2.0));
    }

    #[test]
    fn absorbed_ticks_sum_and_keep_latest_flip() {
        let mut first = LedgerTick {
            elapsed_minutes: 1.0,
            sickness_changed: Some(true),
            health_penalty: 1.0,
            ..LedgerTick::default()
        };
        let second = LedgerTick {
            elapsed_minutes: 0.5,
            age_frozen: true,
            exhaustion_recovery: 25.0,
            sickness_changed: Some(false),
            health_penalty: 2.0,
            ..LedgerTick::default()
        };
        first.absorb(&second);
        assert!(close(first.elapsed_minutes, 1.5));
        assert!(first.age_frozen);
        assert!(close(first.exhaustion_recovery, 25.0));
        assert_eq!(first.sickness_changed, Some(false));
        assert!(close(first.health_penalty, 3.0));

        first.absorb(&LedgerTick::default());
        assert_eq!(first.sickness_changed, Some(false));
    }
}
