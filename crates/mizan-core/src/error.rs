//! # Error Types
//!
//! Errors raised while constructing core values. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//! Each variant names the offending input so callers can report it
//! without re-parsing.

use thiserror::Error;

/// Top-level error type for core value construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MizanError {
    /// Domain tag is not one of the fixed enumerated set.
    #[error("unknown domain: {0:?}")]
    UnknownDomain(String),

    /// Identifier failed its shape check.
    #[error("invalid {kind} identifier {value:?}: {reason}")]
    InvalidIdentifier {
        /// Identifier namespace ("framework", "obligation", "control").
        kind: &'static str,
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Maturity value outside the 0..=5 scale.
    #[error("maturity {0} is outside the 0..=5 scale")]
    MaturityOutOfRange(i64),

    /// Size tier not recognised.
    #[error("unknown size tier: {0:?}")]
    UnknownSizeTier(String),

    /// Sector name is blank.
    #[error("sector must not be empty")]
    EmptySector,
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    #[error("float values are not permitted in canonical representations: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
