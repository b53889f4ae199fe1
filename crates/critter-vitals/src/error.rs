//! Error types for the critter-vitals crate.
//!
//! Every failure in the simulation core is local and recoverable: an
//! unknown stat name, a stage transition the growth rules forbid, a waste
//! event that was already cleaned up, or a rejected rate override. None of
//! them panic; callers decide whether to surface them.

use critter_types::{GrowthStage, WasteEventId};

/// Errors returned by vital operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VitalsError {
    /// The name is not one of the six recognized stats.
    #[error("unknown stat: {0:?}")]
    UnknownStat(String),

    /// The growth rules do not allow this transition.
    #[error("invalid stage transition: {from} -> {to}")]
    InvalidStageTransition {
        /// The current stage.
        from: GrowthStage,
        /// The requested stage.
        to: GrowthStage,
    },

    /// No active waste event has this identifier.
    #[error("unknown waste event: {0}")]
    UnknownWasteEvent(WasteEventId),

    /// A decay rate override was negative or not finite.
    #[error("invalid decay rate for {stat}: {rate}")]
    InvalidRate {
        /// The stat whose rate was being set.
        stat: String,
        /// The rejected rate.
        rate: f64,
    },
}
