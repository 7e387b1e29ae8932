//! # Core Error Types
//!
//! Everything that can go wrong while configuring or driving the kernel.
//! Pool exhaustion and empty query results are normal operation, not errors.

use thiserror::Error;

use crate::frame::FramePhase;

/// Errors that can occur in the core kernel.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Grid cell size is zero, negative, or not finite.
    #[error("invalid cell size {0}: must be a positive, finite number")]
    InvalidCellSize(f32),

    /// A fixed-capacity structure was configured with no room at all.
    #[error("{what} capacity must be greater than zero")]
    ZeroCapacity {
        /// Which structure was misconfigured.
        what: &'static str,
    },

    /// The nearest-opposing search would never examine a single ring.
    #[error("nearest-entity ring bound must be greater than zero")]
    ZeroRingBound,

    /// A frame phase was entered out of order.
    #[error("frame phase out of order: expected {expected:?}, got {found:?}")]
    PhaseOrder {
        /// The phase the cycle was waiting for.
        expected: FramePhase,
        /// The phase that was actually entered.
        found: FramePhase,
    },

    /// Configuration text could not be parsed or holds a bad value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be read.
    #[error("failed to read configuration {path}: {reason}")]
    ConfigIo {
        /// Path that was requested.
        path: String,
        /// Underlying I/O failure.
        reason: String,
    },
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
