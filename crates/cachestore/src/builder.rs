// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builder for [`Client`].
//!
//! The builder picks the engine, wires telemetry, and tunes the lock manager.
//! Connecting to Redis is the only step that can fail, so
//! [`build`](ClientBuilder::build) is async and fallible.

use std::time::Duration;

#[cfg(feature = "memory")]
use cachestore_memory::MemoryStore;
#[cfg(feature = "redis")]
use cachestore_redis::{RedisConfig, RedisStore};
use cachestore_tier::{DynamicStore, DynamicStoreExt, Engine, Error, ErrorKind, StoreTier};
#[cfg(feature = "metrics")]
use opentelemetry::metrics::MeterProvider;
use tick::Clock;

use crate::config::ClientConfig;
#[cfg(feature = "memory")]
use crate::config::MemoryConfig;
use crate::lock::{DEFAULT_POLL_INTERVAL, DEFAULT_SECRET_BYTES, LockManager};
use crate::telemetry::config::TelemetryConfig;
use crate::Client;

#[derive(Debug)]
enum Storage {
    Unset,
    #[cfg(feature = "memory")]
    Memory(MemoryConfig),
    #[cfg(feature = "redis")]
    Redis(RedisConfig),
    Ready(DynamicStore),
}

/// Configures and builds a [`Client`].
///
/// Created by [`Client::builder`]. Without an explicit engine the client uses
/// process memory.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use cachestore::{Client, Engine};
/// use tick::Clock;
///
/// # futures::executor::block_on(async {
/// let client = Client::builder(Clock::new_frozen())
///     .memory()
///     .debug(true)
///     .lock_poll_interval(Duration::from_millis(100))
///     .build()
///     .await?;
///
/// assert_eq!(client.engine(), Engine::Memory);
/// assert!(client.is_debug());
/// # Ok::<(), cachestore::Error>(())
/// # });
/// ```
#[derive(Debug)]
#[must_use]
pub struct ClientBuilder {
    clock: Clock,
    storage: Storage,
    debug: bool,
    telemetry: TelemetryConfig,
    poll_interval: Duration,
    secret_bytes: usize,
}

impl ClientBuilder {
    pub(crate) fn new(clock: Clock) -> Self {
        Self {
            clock,
            storage: Storage::Unset,
            debug: false,
            telemetry: TelemetryConfig::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            secret_bytes: DEFAULT_SECRET_BYTES,
        }
    }

    pub(crate) fn from_config(clock: Clock, config: &ClientConfig) -> Result<Self, Error> {
        let builder = Self::new(clock)
            .debug(config.debug)
            .lock_poll_interval(config.lock_poll_interval())
            .secret_bytes(config.secret_bytes);

        #[cfg(feature = "logs")]
        let builder = if config.logs { builder.logs() } else { builder };

        match config.engine {
            #[cfg(feature = "memory")]
            Engine::Memory => Ok(builder.memory_config(config.memory.clone())),
            #[cfg(feature = "redis")]
            Engine::Redis => Ok(builder.redis(config.redis.clone())),
            engine => Err(unavailable(engine)),
        }
    }

    /// Uses an unbounded in-process memory engine.
    #[cfg(feature = "memory")]
    pub fn memory(self) -> Self {
        self.memory_config(MemoryConfig::default())
    }

    /// Uses an in-process memory engine with the given settings.
    #[cfg(feature = "memory")]
    pub fn memory_config(mut self, config: MemoryConfig) -> Self {
        self.storage = Storage::Memory(config);
        self
    }

    /// Uses an existing memory store, sharing its entries with other holders.
    #[cfg(feature = "memory")]
    pub fn memory_store(self, store: MemoryStore) -> Self {
        self.storage(store)
    }

    /// Connects to Redis when the client is built.
    #[cfg(feature = "redis")]
    pub fn redis(mut self, config: RedisConfig) -> Self {
        self.storage = Storage::Redis(config);
        self
    }

    /// Uses an already connected Redis store.
    #[cfg(feature = "redis")]
    pub fn redis_store(self, store: RedisStore) -> Self {
        self.storage(store)
    }

    /// Uses any [`StoreTier`] implementation as the engine.
    ///
    /// # Examples
    ///
    /// ```
    /// # #[cfg(feature = "test-util")]
    /// # futures::executor::block_on(async {
    /// use cachestore::{Client, Engine};
    /// use cachestore::testing::MockStore;
    /// use tick::Clock;
    ///
    /// let client = Client::builder(Clock::new_frozen())
    ///     .storage(MockStore::new())
    ///     .build()
    ///     .await?;
    /// assert_eq!(client.engine(), Engine::Custom);
    /// # Ok::<(), cachestore::Error>(())
    /// # });
    /// ```
    pub fn storage(mut self, store: impl StoreTier + 'static) -> Self {
        self.storage = Storage::Ready(store.into_dynamic());
        self
    }

    /// Enables debug-severity log events such as cache hits and misses.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Emits a `tracing` event for every operation.
    #[cfg(feature = "logs")]
    pub fn logs(mut self) -> Self {
        self.telemetry = self.telemetry.with_logs();
        self
    }

    /// Records OpenTelemetry metrics through `provider`.
    #[cfg(feature = "metrics")]
    pub fn metrics(mut self, provider: &dyn MeterProvider) -> Self {
        self.telemetry = self.telemetry.with_metrics(provider);
        self
    }

    /// Sets the time between attempts while waiting for a lock.
    ///
    /// A zero interval keeps the default of 250 ms.
    pub fn lock_poll_interval(mut self, interval: Duration) -> Self {
        if !interval.is_zero() {
            self.poll_interval = interval;
        }
        self
    }

    /// Sets how many random bytes generated lock secrets contain.
    pub fn secret_bytes(mut self, bytes: usize) -> Self {
        self.secret_bytes = bytes;
        self
    }

    /// Builds the client, connecting to the engine if needed.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::Backend`] when the Redis connection cannot be established.
    /// - [`ErrorKind::Configuration`] when no engine was chosen and the
    ///   `memory` feature is disabled.
    pub async fn build(self) -> Result<Client, Error> {
        let store = match self.storage {
            Storage::Unset => default_store(&self.clock)?,
            #[cfg(feature = "memory")]
            Storage::Memory(config) => memory_store(&self.clock, config).into_dynamic(),
            #[cfg(feature = "redis")]
            Storage::Redis(config) => RedisStore::connect(&config).await?.into_dynamic(),
            Storage::Ready(store) => store,
        };

        let telemetry = self.telemetry.build(store.engine(), self.debug);
        let locks = LockManager::new(store.clone(), self.clock.clone())
            .with_poll_interval(self.poll_interval)
            .with_secret_bytes(self.secret_bytes)
            .with_telemetry(telemetry.clone());

        Ok(Client::new(store, locks, telemetry, self.clock, self.debug))
    }
}

#[cfg(feature = "memory")]
#[expect(clippy::unnecessary_wraps, reason = "fails when the memory engine is not compiled in")]
fn default_store(clock: &Clock) -> Result<DynamicStore, Error> {
    Ok(memory_store(clock, MemoryConfig::default()).into_dynamic())
}

#[cfg(not(feature = "memory"))]
fn default_store(_clock: &Clock) -> Result<DynamicStore, Error> {
    Err(Error::with_cause(
        ErrorKind::Configuration,
        "no engine configured and the memory engine is not compiled in",
    ))
}

#[cfg(feature = "memory")]
fn memory_store(clock: &Clock, config: MemoryConfig) -> MemoryStore {
    let mut builder = MemoryStore::builder(clock.clone());
    if let Some(capacity) = config.max_capacity {
        builder = builder.max_capacity(capacity);
    }
    if let Some(capacity) = config.initial_capacity {
        builder = builder.initial_capacity(capacity);
    }
    if let Some(name) = config.name {
        builder = builder.name(name);
    }
    builder.build()
}

fn unavailable(engine: Engine) -> Error {
    Error::with_cause(
        ErrorKind::Configuration,
        format!("engine '{engine}' cannot be built from configuration in this build"),
    )
}
