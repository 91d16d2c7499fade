// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! OpenTelemetry instruments recorded by the client.

use opentelemetry::InstrumentationScope;
use opentelemetry::metrics::{Counter, Histogram, Meter, MeterProvider};

const SCOPE: &str = "cachestore";
const SCHEMA_URL: &str = "https://opentelemetry.io/schemas/1.47.0";

pub(crate) const EVENT_COUNT: &str = "cachestore.event.count";
pub(crate) const OPERATION_DURATION: &str = "cachestore.operation.duration";

pub(crate) fn create_meter(provider: &dyn MeterProvider) -> Meter {
    let scope = InstrumentationScope::builder(SCOPE)
        .with_version(env!("CARGO_PKG_VERSION"))
        .with_schema_url(SCHEMA_URL)
        .build();
    provider.meter_with_scope(scope)
}

/// One increment per finished operation, tagged with its outcome.
pub(crate) fn create_event_counter(meter: &Meter) -> Counter<u64> {
    meter
        .u64_counter(EVENT_COUNT)
        .with_description("Store and lock operations by outcome")
        .with_unit("{event}")
        .build()
}

pub(crate) fn create_operation_duration_histogram(meter: &Meter) -> Histogram<f64> {
    meter
        .f64_histogram(OPERATION_DURATION)
        .with_description("Time spent in store and lock operations, including lock waits")
        .with_unit("s")
        .build()
}
