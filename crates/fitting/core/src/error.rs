//! Common error infrastructure.
//!
//! The concrete operation errors live in [`crate::engine::errors`]; this
//! module provides the classification layer shared by all of them.

/// Severity of an error, used for handling strategy and logging priority.
///
/// The engine never retries on its own behalf: every failure is either bad
/// caller input or a state problem that retrying cannot fix, so there is no
/// "recoverable" tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Invalid caller input (unknown location, unregistered effect);
    /// rejected without side effects.
    Validation,
    /// Unexpected structural inconsistency — indicates a bug in the caller's
    /// mutation sequencing or in the engine, and should be investigated.
    Internal,
    /// Unrecoverable: required collaborator missing or an invariant
    /// violated mid-operation.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// True if this error indicates a bug rather than bad input.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for engine errors.
///
/// Error enums derive `thiserror::Error` for Display and implement this for
/// uniform classification in logs, metrics, and tests.
pub trait EngineError: core::fmt::Display + core::fmt::Debug {
    /// Severity classification of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Static identifier for this error variant, for categorization and
    /// metrics.
    fn error_code(&self) -> &'static str;
}
