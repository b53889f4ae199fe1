//! The critter aggregate and everything around it: time, cadences,
//! configuration, and persistence.
//!
//! `critter-vitals` owns the rules; this crate owns one critter and drives
//! it. Nothing here blocks or spawns. A driver (the engine binary, a GUI
//! event loop, a test) reads a [`TimeSource`], calls the [`Scheduler`] or
//! the [`Critter`] directly, and persists [`CritterSnapshot`]s.
//!
//! # Modules
//!
//! - [`clock`] -- [`TimeSource`] trait, wall, manual, and scaled clocks,
//!   regression-safe elapsed time.
//! - [`config`] -- Configuration loading from `critter-config.yaml` into
//!   strongly-typed structs.
//! - [`critter`] -- The [`Critter`] aggregate.
//! - [`error`] -- [`CritterError`].
//! - [`observer`] -- [`CritterObserver`] trait and stock observers.
//! - [`scheduler`] -- Cadences for the periodic checks.
//! - [`snapshot`] -- JSON save and load.
//!
//! [`CritterSnapshot`]: critter_types::CritterSnapshot

pub mod clock;
pub mod config;
pub mod critter;
pub mod error;
pub mod observer;
pub mod scheduler;
pub mod snapshot;

pub use clock::{ManualClock, ScaledClock, SystemClock, TimeSource};
pub use config::{ConfigError, CritterConfig};
pub use critter::{Critter, TickReport};
pub use error::CritterError;
pub use observer::{CritterObserver, EventLog};
pub use scheduler::{CycleReport, Scheduler};
pub use snapshot::SnapshotError;
