// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error types for store and lock operations.

use std::fmt;

use recoverable::{Recovery, RecoveryInfo};

/// The category of an [`Error`].
///
/// Validation kinds are raised locally before any backend call is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The key was empty or contained only whitespace.
    KeyRequired,
    /// The lock secret was empty or contained only whitespace.
    SecretRequired,
    /// A lock was requested with a zero time-to-live.
    TtlRequired,
    /// A wait-acquire was requested with a zero wait budget.
    WaitTimeRequired,
    /// The lock key is held with a different secret.
    LockConflict,
    /// The wait budget elapsed before the lock could be acquired.
    LockTimeout,
    /// The caller cancelled the wait before it completed.
    Cancelled,
    /// The entropy source could not produce a lock secret.
    SecretGeneration,
    /// A model could not be encoded or decoded.
    Serialization,
    /// The backend failed to execute the operation.
    Backend,
    /// The client was configured with an engine that is unavailable.
    Configuration,
}

impl ErrorKind {
    /// Returns `true` for kinds raised by input validation.
    #[must_use]
    pub fn is_validation(self) -> bool {
        matches!(
            self,
            Self::KeyRequired | Self::SecretRequired | Self::TtlRequired | Self::WaitTimeRequired
        )
    }

    fn message(self) -> &'static str {
        match self {
            Self::KeyRequired => "missing required key",
            Self::SecretRequired => "missing required lock secret",
            Self::TtlRequired => "lock ttl must be greater than zero",
            Self::WaitTimeRequired => "lock wait time must be greater than zero",
            Self::LockConflict => "key is locked with a different secret",
            Self::LockTimeout => "timed out waiting for lock",
            Self::Cancelled => "lock wait was cancelled",
            Self::SecretGeneration => "failed to generate lock secret",
            Self::Serialization => "failed to serialize model",
            Self::Backend => "store operation failed",
            Self::Configuration => "invalid client configuration",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// An error from a store or lock operation.
///
/// The [`kind`](Error::kind) tells callers which condition occurred. Backend
/// failures keep the underlying cause, reachable through
/// [`std::error::Error::source()`].
///
/// # Example
///
/// ```
/// use cachestore_tier::{Error, ErrorKind};
///
/// let error = Error::backend("connection refused");
/// assert_eq!(error.kind(), ErrorKind::Backend);
/// ```
#[ohno::error]
#[display("{kind}")]
pub struct Error {
    kind: ErrorKind,
}

impl Error {
    /// Returns the category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Creates an error of the given kind wrapping an underlying cause.
    pub fn with_cause(kind: ErrorKind, cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(kind, cause)
    }

    /// Creates a backend error wrapping the given cause.
    ///
    /// Engines use this to surface failures reported by the storage system.
    pub fn backend(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(ErrorKind::Backend, cause)
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl Recovery for Error {
    fn recovery(&self) -> RecoveryInfo {
        match self.kind {
            ErrorKind::LockConflict | ErrorKind::LockTimeout => RecoveryInfo::retry(),
            ErrorKind::Backend => RecoveryInfo::unavailable(),
            _ => RecoveryInfo::never(),
        }
    }
}

/// A specialized [`Result`] type for store operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use recoverable::RecoveryKind;

    use super::*;

    #[test]
    fn display_contains_kind_message() {
        let error = Error::new(ErrorKind::LockConflict);
        assert!(
            error.to_string().contains("key is locked with a different secret"),
            "unexpected display: {error}"
        );
    }

    #[test]
    fn backend_error_keeps_cause() {
        let error = Error::backend("connection reset");
        assert_eq!(error.kind(), ErrorKind::Backend);
        let display_str = format!("{error}");
        assert!(
            display_str.contains("connection reset"),
            "display output should contain the cause message, got: {display_str}"
        );
    }

    #[test]
    fn from_kind_preserves_kind() {
        let error: Error = ErrorKind::WaitTimeRequired.into();
        assert_eq!(error.kind(), ErrorKind::WaitTimeRequired);
    }

    #[test]
    fn validation_kinds() {
        assert!(ErrorKind::KeyRequired.is_validation());
        assert!(ErrorKind::SecretRequired.is_validation());
        assert!(ErrorKind::TtlRequired.is_validation());
        assert!(ErrorKind::WaitTimeRequired.is_validation());
        assert!(!ErrorKind::LockConflict.is_validation());
        assert!(!ErrorKind::Backend.is_validation());
    }

    #[test]
    fn recovery_classification() {
        assert_eq!(Error::new(ErrorKind::LockConflict).recovery().kind(), RecoveryKind::Retry);
        assert_eq!(Error::new(ErrorKind::LockTimeout).recovery().kind(), RecoveryKind::Retry);
        assert_eq!(Error::backend("down").recovery().kind(), RecoveryKind::Unavailable);
        assert_eq!(Error::new(ErrorKind::KeyRequired).recovery().kind(), RecoveryKind::Never);
        assert_eq!(Error::new(ErrorKind::Cancelled).recovery().kind(), RecoveryKind::Never);
    }

    #[test]
    fn result_type_alias_propagates_errors() {
        fn returns_err() -> Result<i32> {
            Err(Error::new(ErrorKind::LockTimeout))
        }

        let err = returns_err().expect_err("should return an error");
        assert_eq!(err.kind(), ErrorKind::LockTimeout);
    }
}
