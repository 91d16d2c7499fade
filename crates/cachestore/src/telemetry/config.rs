// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Telemetry configuration collected by the client builder.

use cachestore_tier::Engine;
#[cfg(any(feature = "metrics", test))]
use opentelemetry::metrics::{Meter, MeterProvider};

use crate::telemetry::StoreTelemetry;
#[cfg(any(feature = "logs", feature = "metrics", test))]
use crate::telemetry::recorder::StoreTelemetryInner;
#[cfg(any(feature = "logs", feature = "metrics", test))]
use thread_aware::Arc;

#[derive(Clone, Debug, Default)]
pub(crate) struct TelemetryConfig {
    #[cfg(any(feature = "logs", test))]
    logs_enabled: bool,
    #[cfg(any(feature = "metrics", test))]
    meter: Option<Meter>,
}

impl TelemetryConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables structured logging through `tracing`.
    #[cfg(any(feature = "logs", test))]
    #[must_use]
    pub fn with_logs(self) -> Self {
        Self {
            logs_enabled: true,
            ..self
        }
    }

    /// Enables metrics using the provided meter provider.
    #[cfg(any(feature = "metrics", test))]
    #[must_use]
    pub fn with_metrics(mut self, provider: &dyn MeterProvider) -> Self {
        self.meter = Some(crate::telemetry::metrics::create_meter(provider));
        self
    }

    /// Builds the recorder. Debug-severity events are logged only when `debug` is set.
    #[allow(unused_variables, reason = "No-op when telemetry is disabled")]
    #[must_use]
    pub fn build(self, engine: Engine, debug: bool) -> StoreTelemetry {
        #[cfg(not(any(feature = "logs", feature = "metrics", test)))]
        {
            StoreTelemetry::default()
        }

        #[cfg(any(feature = "logs", feature = "metrics", test))]
        {
            #[cfg(any(feature = "metrics", test))]
            let (event_counter, operation_duration) = {
                use crate::telemetry::metrics::{create_event_counter, create_operation_duration_histogram};
                (
                    self.meter.as_ref().map(create_event_counter),
                    self.meter.as_ref().map(create_operation_duration_histogram),
                )
            };

            #[cfg(any(feature = "logs", test))]
            let logging_enabled = self.logs_enabled;
            #[cfg(not(any(feature = "logs", test)))]
            let logging_enabled = false;

            #[cfg(any(feature = "metrics", test))]
            let metrics_enabled = self.meter.is_some();
            #[cfg(not(any(feature = "metrics", test)))]
            let metrics_enabled = false;

            if !logging_enabled && !metrics_enabled {
                return StoreTelemetry::default();
            }

            StoreTelemetry {
                inner: Some(Arc::from_unaware(StoreTelemetryInner {
                    engine: engine.as_str(),
                    #[cfg(any(feature = "logs", test))]
                    logging_enabled,
                    #[cfg(any(feature = "logs", test))]
                    debug_enabled: debug,
                    #[cfg(any(feature = "metrics", test))]
                    event_counter,
                    #[cfg(any(feature = "metrics", test))]
                    operation_duration,
                })),
            }
        }
    }
}
