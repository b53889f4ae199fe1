//! Growth stage state machine.
//!
//! Baby -> Child -> Teen -> Adult by cumulative age, one step per check.
//! Special is reached only by an explicit [`Growth::evolve_to`] call (an
//! item, an event) from any other stage. Growth never goes backwards; the
//! only way back to Baby is a full reset of the critter.
//!
//! Every successful transition heals health and energy by the configured
//! bonus and reports the `(from, to)` pair for observers.

use critter_types::{GrowthStage, Stat};

use crate::config::GrowthConfig;
use crate::error::VitalsError;
use crate::ledger::StatLedger;

/// A completed stage transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evolution {
    /// Stage before the transition.
    pub from: GrowthStage,
    /// Stage after the transition.
    pub to: GrowthStage,
}

/// Age threshold for leaving `stage` by age, if it has an age successor.
pub const fn age_threshold(stage: GrowthStage, config: &GrowthConfig) -> Option<f64> {
    match stage {
        GrowthStage::Baby => Some(config.child_age),
        GrowthStage::Child => Some(config.teen_age),
        GrowthStage::Teen => Some(config.adult_age),
        GrowthStage::Adult | GrowthStage::Special => None,
    }
}

/// Decide whether `age` carries a critter in `stage` to its next stage.
///
/// Pure: returns the single next stage or `None`. A Baby aged 70 gets
/// `Child` here and `Teen` on the following check.
pub fn check_evolution(age: f64, stage: GrowthStage, config: &GrowthConfig) -> Option<GrowthStage> {
    let threshold = age_threshold(stage, config)?;
    if age >= threshold {
        stage.next_by_age()
    } else {
        None
    }
}

/// Whether the growth rules allow moving from `from` to `to`.
///
/// Forward moves (skipping stages is fine) and moves into Special are
/// allowed. Repeats, backward moves, and anything out of Special are not.
pub const fn can_evolve(from: GrowthStage, to: GrowthStage) -> bool {
    if matches!(from, GrowthStage::Special) {
        return false;
    }
    matches!(to, GrowthStage::Special) || to.rank() > from.rank()
}

/// Current growth stage of a critter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Growth {
    stage: GrowthStage,
}

impl Growth {
    /// A newborn.
    pub const fn new() -> Self {
        Self {
            stage: GrowthStage::Baby,
        }
    }

    /// Resume at a persisted stage.
    pub const fn from_stage(stage: GrowthStage) -> Self {
        Self { stage }
    }

    /// Current stage.
    pub const fn stage(&self) -> GrowthStage {
        self.stage
    }

    /// [`check_evolution`] against the current stage.
    pub fn check_evolution(&self, age: f64, config: &GrowthConfig) -> Option<GrowthStage> {
        check_evolution(age, self.stage, config)
    }

    /// Move to `target`, healing health and energy on success.
    ///
    /// # Errors
    ///
    /// Returns [`VitalsError::InvalidStageTransition`] without touching
    /// anything when [`can_evolve`] rejects the move.
    pub fn evolve_to(
        &mut self,
        target: GrowthStage,
        ledger: &mut StatLedger,
        config: &GrowthConfig,
    ) -> Result<Evolution, VitalsError> {
        let from = self.stage;
        if !can_evolve(from, target) {
            return Err(VitalsError::InvalidStageTransition { from, to: target });
        }

        self.stage = target;
        ledger.apply(Stat::Health, config.evolution_heal);
        ledger.apply(Stat::Energy, config.evolution_heal);

        Ok(Evolution { from, to: target })
    }

    /// Back to Baby.
    pub const fn reset(&mut self) {
        self.stage = GrowthStage::Baby;
    }
}
