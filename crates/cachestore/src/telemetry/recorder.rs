// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Telemetry recording.

use std::time::Duration;

#[cfg(any(feature = "metrics", test))]
use opentelemetry::{
    KeyValue,
    metrics::{Counter, Histogram},
};
#[cfg(any(feature = "logs", test))]
use opentelemetry::logs::Severity;

use crate::telemetry::{Activity, Operation};
#[cfg(any(feature = "metrics", test))]
use crate::telemetry::attributes;

#[derive(Clone, Debug)]
pub(crate) struct StoreTelemetryInner {
    pub(crate) engine: &'static str,
    #[cfg(any(feature = "logs", test))]
    pub(crate) logging_enabled: bool,
    #[cfg(any(feature = "logs", test))]
    pub(crate) debug_enabled: bool,
    #[cfg(any(feature = "metrics", test))]
    pub(crate) event_counter: Option<Counter<u64>>,
    #[cfg(any(feature = "metrics", test))]
    pub(crate) operation_duration: Option<Histogram<f64>>,
}

impl StoreTelemetryInner {
    pub(crate) fn record(&self, operation: Operation, activity: Activity, duration: Duration) {
        #[cfg(any(feature = "metrics", test))]
        {
            let attrs = [
                KeyValue::new(attributes::ENGINE_NAME, self.engine),
                KeyValue::new(attributes::OPERATION_NAME, operation.as_str()),
                KeyValue::new(attributes::ACTIVITY_NAME, activity.as_str()),
            ];

            if let Some(c) = &self.event_counter {
                c.add(1, &attrs);
            }

            if let Some(h) = &self.operation_duration {
                h.record(duration.as_secs_f64(), &attrs);
            }
        }

        #[cfg(any(feature = "logs", test))]
        if self.logging_enabled && (self.debug_enabled || activity.severity() != Severity::Debug) {
            Self::emit(self.engine, operation, activity, duration);
        }
    }

    #[cfg(any(feature = "logs", test))]
    fn emit(engine: &'static str, operation: Operation, activity: Activity, duration: Duration) {
        let op = operation.as_str();
        let act = activity.as_str();
        let duration_ns = duration.as_nanos();

        // Field names must match the constants in attributes.rs.
        macro_rules! emit_event {
            ($level:ident) => {
                tracing::$level!(
                    cachestore.engine = engine,
                    cachestore.operation = op,
                    cachestore.activity = act,
                    cachestore.duration_ns = duration_ns,
                    "cachestore.event"
                )
            };
        }

        match activity.severity() {
            Severity::Error => emit_event!(error),
            Severity::Warn => emit_event!(warn),
            Severity::Info => emit_event!(info),
            Severity::Debug => emit_event!(debug),
            _ => {}
        }
    }
}
