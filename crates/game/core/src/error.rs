//! Common error infrastructure for horde-core.
//!
//! Domain errors (`BoardError`, `EngineError`, `SetupError`) live next to the
//! code that raises them; this module holds the pieces they share.
//!
//! # Design Principles
//!
//! - **Type Safety**: each layer owns its error enum
//! - **Severity Classification**: errors are categorized for recovery strategies
//! - **Stable codes**: `error_code()` is suitable for logs and assertions

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: stale input; the phase is re-entered with a fresh catalogue
/// - **Validation**: invalid input that should be rejected without retry
/// - **Internal**: unexpected state inconsistencies that require investigation
/// - **Fatal**: invariant violated, the session must not continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with same or alternative decision.
    ///
    /// Examples: answer index out of range, decision for a popped phase
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: unknown actor id, zone outside the board
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: actor placed but missing from the board index
    Internal,

    /// Fatal error - game state corrupted, cannot continue.
    ///
    /// Examples: disconnected zone, duplicate catalogue entry
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all horde-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_classification() {
        assert!(ErrorSeverity::Recoverable.is_recoverable());
        assert!(!ErrorSeverity::Validation.is_recoverable());
        assert!(ErrorSeverity::Fatal.is_internal());
        assert!(ErrorSeverity::Internal.is_internal());
        assert_eq!(ErrorSeverity::Fatal.as_str(), "fatal");
    }
}
