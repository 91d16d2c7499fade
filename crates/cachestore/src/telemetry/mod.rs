// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Store telemetry integration with OpenTelemetry.
//!
//! With the `logs` feature every client operation emits a structured `tracing`
//! event, and with the `metrics` feature it updates OpenTelemetry instruments.
//! Without either feature recording compiles down to nothing.

use std::time::Duration;

use cachestore_tier::{Error, ErrorKind};

#[cfg(any(feature = "logs", test))]
use opentelemetry::logs::Severity;

pub(crate) mod attributes;
pub(crate) mod config;
pub(crate) mod ext;
#[cfg(any(feature = "metrics", test))]
pub(crate) mod metrics;
#[cfg(any(feature = "logs", feature = "metrics", test))]
pub(crate) mod recorder;
#[cfg(test)]
pub(crate) mod testing;

#[cfg(any(feature = "logs", feature = "metrics", test))]
use recorder::StoreTelemetryInner;
#[cfg(any(feature = "logs", feature = "metrics", test))]
use thread_aware::{Arc, PerCore};

/// Records store operations as logs and metrics.
///
/// The default value records nothing.
#[derive(Clone, Debug, Default)]
pub(crate) struct StoreTelemetry {
    #[cfg(any(feature = "logs", feature = "metrics", test))]
    inner: Option<Arc<StoreTelemetryInner, PerCore>>,
}

impl StoreTelemetry {
    /// Records one finished operation.
    #[allow(unused_variables, reason = "No-op when telemetry is disabled")]
    pub(crate) fn record(&self, operation: Operation, activity: Activity, duration: Duration) {
        #[cfg(any(feature = "logs", feature = "metrics", test))]
        if let Some(inner) = &self.inner {
            inner.record(operation, activity, duration);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operation {
    Get,
    Set,
    Delete,
    Clear,
    Acquire,
    WaitAcquire,
    Release,
    Close,
}

impl Operation {
    #[cfg(any(feature = "logs", feature = "metrics", test))]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "store.get",
            Self::Set => "store.set",
            Self::Delete => "store.delete",
            Self::Clear => "store.clear",
            Self::Acquire => "lock.acquire",
            Self::WaitAcquire => "lock.wait_acquire",
            Self::Release => "lock.release",
            Self::Close => "client.close",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Activity {
    Hit,
    Miss,
    Ok,
    Acquired,
    Conflict,
    Released,
    NotHeld,
    Timeout,
    Cancelled,
    Rejected,
    Error,
    Closed,
}

impl Activity {
    #[cfg(any(feature = "logs", feature = "metrics", test))]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hit => "store.hit",
            Self::Miss => "store.miss",
            Self::Ok => "store.ok",
            Self::Acquired => "lock.acquired",
            Self::Conflict => "lock.conflict",
            Self::Released => "lock.released",
            Self::NotHeld => "lock.not_held",
            Self::Timeout => "lock.timeout",
            Self::Cancelled => "lock.cancelled",
            Self::Rejected => "store.rejected",
            Self::Error => "store.error",
            Self::Closed => "client.closed",
        }
    }

    /// Classifies a failed operation.
    pub fn from_error(error: &Error) -> Self {
        match error.kind() {
            ErrorKind::LockConflict => Self::Conflict,
            ErrorKind::LockTimeout => Self::Timeout,
            ErrorKind::Cancelled => Self::Cancelled,
            kind if kind.is_validation() => Self::Rejected,
            _ => Self::Error,
        }
    }

    #[cfg(any(feature = "logs", test))]
    pub fn severity(self) -> Severity {
        match self {
            Self::Hit | Self::Miss | Self::Ok | Self::NotHeld => Severity::Debug,
            Self::Acquired | Self::Conflict | Self::Released | Self::Closed => Severity::Info,
            Self::Timeout | Self::Cancelled | Self::Rejected => Severity::Warn,
            Self::Error => Severity::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_as_str() {
        assert_eq!(Operation::Get.as_str(), "store.get");
        assert_eq!(Operation::Set.as_str(), "store.set");
        assert_eq!(Operation::Delete.as_str(), "store.delete");
        assert_eq!(Operation::Clear.as_str(), "store.clear");
        assert_eq!(Operation::Acquire.as_str(), "lock.acquire");
        assert_eq!(Operation::WaitAcquire.as_str(), "lock.wait_acquire");
        assert_eq!(Operation::Release.as_str(), "lock.release");
        assert_eq!(Operation::Close.as_str(), "client.close");
    }

    #[test]
    fn activity_as_str() {
        assert_eq!(Activity::Hit.as_str(), "store.hit");
        assert_eq!(Activity::Miss.as_str(), "store.miss");
        assert_eq!(Activity::Ok.as_str(), "store.ok");
        assert_eq!(Activity::Acquired.as_str(), "lock.acquired");
        assert_eq!(Activity::Conflict.as_str(), "lock.conflict");
        assert_eq!(Activity::Released.as_str(), "lock.released");
        assert_eq!(Activity::NotHeld.as_str(), "lock.not_held");
        assert_eq!(Activity::Timeout.as_str(), "lock.timeout");
        assert_eq!(Activity::Cancelled.as_str(), "lock.cancelled");
        assert_eq!(Activity::Rejected.as_str(), "store.rejected");
        assert_eq!(Activity::Error.as_str(), "store.error");
        assert_eq!(Activity::Closed.as_str(), "client.closed");
    }

    #[test]
    fn activity_from_error() {
        assert_eq!(Activity::from_error(&ErrorKind::LockConflict.into()), Activity::Conflict);
        assert_eq!(Activity::from_error(&ErrorKind::LockTimeout.into()), Activity::Timeout);
        assert_eq!(Activity::from_error(&ErrorKind::Cancelled.into()), Activity::Cancelled);
        assert_eq!(Activity::from_error(&ErrorKind::KeyRequired.into()), Activity::Rejected);
        assert_eq!(Activity::from_error(&ErrorKind::WaitTimeRequired.into()), Activity::Rejected);
        assert_eq!(Activity::from_error(&Error::backend("down")), Activity::Error);
        assert_eq!(Activity::from_error(&ErrorKind::Serialization.into()), Activity::Error);
    }

    #[test]
    fn activity_severity() {
        assert_eq!(Activity::Hit.severity(), Severity::Debug);
        assert_eq!(Activity::NotHeld.severity(), Severity::Debug);
        assert_eq!(Activity::Acquired.severity(), Severity::Info);
        assert_eq!(Activity::Conflict.severity(), Severity::Info);
        assert_eq!(Activity::Closed.severity(), Severity::Info);
        assert_eq!(Activity::Timeout.severity(), Severity::Warn);
        assert_eq!(Activity::Rejected.severity(), Severity::Warn);
        assert_eq!(Activity::Error.severity(), Severity::Error);
    }
}
