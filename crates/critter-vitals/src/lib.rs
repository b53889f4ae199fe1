//! Life-state mechanics for a single critter.
//!
//! This crate is the logic layer of the simulation: everything that
//! operates on critter state without touching I/O, clocks, or schedules.
//! It sits between `critter-types` (the data shapes) and `critter-core`
//! (the aggregate that owns a critter and drives it through time).
//!
//! Every time-dependent operation takes the elapsed time as an argument,
//! so results depend only on the sequence of calls, never on wall time.
//!
//! # Modules
//!
//! - [`config`] -- Tunable constants and their defaults ([`VitalsConfig`])
//! - [`elimination`] -- Pressure accumulator and waste events ([`EliminationPressure`])
//! - [`error`] -- Error types for vital operations ([`VitalsError`])
//! - [`growth`] -- Growth stage state machine ([`Growth`])
//! - [`interactions`] -- Feed, play, clean, medicine, pet
//! - [`ledger`] -- Stat values, decay, and age ([`StatLedger`])
//! - [`sickness`] -- Hysteresis sickness classifier ([`SicknessMonitor`])
//! - [`sleep`] -- Sleep recovery cycle ([`SleepCycle`])

pub mod config;
pub mod elimination;
pub mod error;
pub mod growth;
pub mod interactions;
pub mod ledger;
pub mod sickness;
pub mod sleep;

// Re-export primary types at crate root for convenience.
pub use config::{
    EliminationConfig, GrowthConfig, InteractionConfig, SicknessConfig, SleepConfig, StatDeltas,
    VitalsConfig,
};
pub use elimination::{EliminationPressure, GenerationOutcome, StalePenalty};
pub use error::VitalsError;
pub use growth::{Evolution, Growth};
pub use interactions::InteractionOutcome;
pub use ledger::{LedgerTick, StatLedger};
pub use sickness::SicknessMonitor;
pub use sleep::{SleepCycle, SleepTick};
