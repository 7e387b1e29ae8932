//! # Simulation Error Types
//!
//! Errors surfaced by [`crate::Simulation`]. Everything the kernel reports is
//! wrapped as [`SimError::Core`].

use skirmish_core::{CoreError, EntityKind};
use thiserror::Error;

/// Errors that can occur while building or driving a simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Kernel or configuration error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An entity was submitted with NaN or infinite bounds.
    #[error("{kind:?} has non-finite bounds")]
    NonFiniteBounds {
        /// Kind of the rejected entity.
        kind: EntityKind,
    },

    /// The logging subscriber could not be installed.
    #[error("failed to install log subscriber: {0}")]
    Logging(String),
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
