//! Error types for critter operations.
//!
//! [`CritterError`] wraps the recoverable failures of the simulation core
//! so callers driving a [`Critter`](crate::critter::Critter) handle a
//! single error type.

use critter_vitals::VitalsError;

/// Errors returned by [`Critter`](crate::critter::Critter) operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CritterError {
    /// A vital operation was rejected.
    #[error("vitals error: {source}")]
    Vitals {
        /// The underlying vitals error.
        #[from]
        source: VitalsError,
    },
}
