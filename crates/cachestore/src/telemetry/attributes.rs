// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#[cfg(any(feature = "metrics", test))]
pub(crate) const ENGINE_NAME: &str = "cachestore.engine";

#[cfg(test)]
pub(crate) const EVENT_NAME: &str = "cachestore.event";

#[cfg(any(feature = "metrics", test))]
pub(crate) const OPERATION_NAME: &str = "cachestore.operation";

#[cfg(any(feature = "metrics", test))]
pub(crate) const ACTIVITY_NAME: &str = "cachestore.activity";

#[cfg(test)]
pub(crate) const DURATION_NAME: &str = "cachestore.duration_ns";
