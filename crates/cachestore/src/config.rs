// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Serializable client configuration.
//!
//! [`ClientConfig`] mirrors what an application usually keeps in a settings
//! file. Every field has a default, so a partial document is enough:
//!
//! ```
//! use cachestore::{ClientConfig, Engine};
//!
//! let config: ClientConfig = serde_json::from_str(r#"{ "engine": "memory", "debug": true }"#).unwrap();
//! assert_eq!(config.engine, Engine::Memory);
//! assert_eq!(config.lock_poll_interval().as_millis(), 250);
//! ```

use std::time::Duration;

#[cfg(feature = "redis")]
use cachestore_redis::RedisConfig;
use cachestore_tier::Engine;
use serde::{Deserialize, Serialize};

use crate::lock::{DEFAULT_POLL_INTERVAL, DEFAULT_SECRET_BYTES};

/// Settings for building a [`Client`](crate::Client).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct ClientConfig {
    /// Which engine backs the client.
    pub engine: Engine,
    /// Enables debug-severity log events.
    pub debug: bool,
    /// Enables structured logging. Has no effect without the `logs` feature.
    pub logs: bool,
    /// Milliseconds between attempts while waiting for a lock.
    pub lock_poll_interval_ms: u64,
    /// Random bytes in each generated lock secret.
    pub secret_bytes: usize,
    /// Settings for the memory engine.
    pub memory: MemoryConfig,
    /// Settings for the Redis engine.
    #[cfg(feature = "redis")]
    pub redis: RedisConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            engine: Engine::Memory,
            debug: false,
            logs: false,
            lock_poll_interval_ms: saturating_millis(DEFAULT_POLL_INTERVAL),
            secret_bytes: DEFAULT_SECRET_BYTES,
            memory: MemoryConfig::default(),
            #[cfg(feature = "redis")]
            redis: RedisConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Creates a configuration for the given engine with default settings.
    #[must_use]
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            ..Self::default()
        }
    }

    /// Creates a Redis configuration.
    #[cfg(feature = "redis")]
    #[must_use]
    pub fn redis(redis: RedisConfig) -> Self {
        Self {
            engine: Engine::Redis,
            redis,
            ..Self::default()
        }
    }

    /// Sets the debug flag.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Sets the lock poll interval.
    #[must_use]
    pub fn with_lock_poll_interval(mut self, interval: Duration) -> Self {
        self.lock_poll_interval_ms = saturating_millis(interval);
        self
    }

    /// Returns the lock poll interval as a [`Duration`].
    #[must_use]
    pub fn lock_poll_interval(&self) -> Duration {
        Duration::from_millis(self.lock_poll_interval_ms)
    }
}

/// Settings for the in-process memory engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct MemoryConfig {
    /// Maximum number of entries. Unbounded when unset.
    pub max_capacity: Option<u64>,
    /// Pre-allocation hint.
    pub initial_capacity: Option<usize>,
    /// Name shown in the cache's debugging output.
    pub name: Option<String>,
}

impl MemoryConfig {
    /// Creates an unbounded memory configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of entries.
    #[must_use]
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = Some(capacity);
        self
    }
}

fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
