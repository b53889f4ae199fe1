//! Shared type definitions for the Critter simulation.
//!
//! This crate is the single source of truth for all types passed between
//! the simulation core and its callers. Types defined here flow downstream
//! to `TypeScript` via `ts-rs` for UI layers that render the critter.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for entity identifiers
//! - [`enums`] -- Stats, growth stages, behavior states, interactions
//! - [`structs`] -- Stat block, decay rates, persisted snapshot shapes
//! - [`events`] -- Change notifications delivered to observers

pub mod enums;
pub mod events;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{BehaviorState, GrowthStage, Interaction, Stat, WakeReason};
pub use events::CritterEvent;
pub use ids::{CritterId, WasteEventId};
pub use structs::{
    CritterSnapshot, DecayRates, EliminationSnapshot, STAT_MAX, STAT_MIN, SicknessState,
    SleepState, StatBlock, WasteEvent,
};
