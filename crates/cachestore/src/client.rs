// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The engine-independent client.

use std::time::Duration;

use cachestore_tier::{DynamicStore, Engine, Error, ErrorKind, StoreTier};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tick::Clock;

use crate::builder::ClientBuilder;
use crate::config::ClientConfig;
use crate::lock::LockManager;
use crate::telemetry::ext::ClockExt;
use crate::telemetry::{Activity, Operation, StoreTelemetry};
use crate::validate;

/// String storage, model storage, and distributed locks over one engine.
///
/// The same code runs against process memory or Redis; only the builder call
/// changes. Clones share the engine, its telemetry, and its lock manager.
///
/// Keys are trimmed of surrounding whitespace before use, and a blank key is
/// rejected with [`ErrorKind::KeyRequired`] without touching the engine.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use cachestore::Client;
/// use tick::Clock;
///
/// # futures::executor::block_on(async {
/// let client = Client::builder(Clock::new_frozen()).memory().build().await?;
///
/// client.set_with_ttl("greeting", "hello", Duration::from_secs(60)).await?;
/// assert_eq!(client.get("greeting").await?.as_deref(), Some("hello"));
///
/// let secret = client.acquire("greeting:lock", Duration::from_secs(5)).await?;
/// assert!(client.release("greeting:lock", &secret).await?);
/// # Ok::<(), cachestore::Error>(())
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    store: DynamicStore,
    locks: LockManager<DynamicStore>,
    telemetry: StoreTelemetry,
    clock: Clock,
    debug: bool,
}

impl Client {
    /// Starts configuring a client whose time is measured by `clock`.
    pub fn builder(clock: Clock) -> ClientBuilder {
        ClientBuilder::new(clock)
    }

    /// Builds a client from deserialized settings.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::Configuration`] when the configured engine is not
    ///   compiled in, or is [`Engine::Custom`].
    /// - [`ErrorKind::Backend`] when the Redis connection cannot be established.
    pub async fn from_config(clock: Clock, config: &ClientConfig) -> Result<Self, Error> {
        ClientBuilder::from_config(clock, config)?.build().await
    }

    pub(crate) fn new(store: DynamicStore, locks: LockManager<DynamicStore>, telemetry: StoreTelemetry, clock: Clock, debug: bool) -> Self {
        Self {
            store,
            locks,
            telemetry,
            clock,
            debug,
        }
    }

    /// Returns the engine behind this client.
    #[must_use]
    pub fn engine(&self) -> Engine {
        self.store.engine()
    }

    /// Returns whether debug-severity logging was requested.
    #[must_use]
    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Returns the clock used for timing and expiry.
    #[must_use]
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Returns the lock manager shared by this client.
    #[must_use]
    pub fn locks(&self) -> &LockManager<DynamicStore> {
        &self.locks
    }

    /// Returns the number of stored entries, when the engine can tell cheaply.
    #[must_use]
    pub fn entry_count(&self) -> Option<u64> {
        self.store.len()
    }

    /// Stores `value` under `key` without expiry.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::KeyRequired`] for a blank key, [`ErrorKind::Backend`] when the engine fails.
    pub async fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.store_value(key, value, None).await
    }

    /// Stores `value` under `key` for `ttl`. A zero `ttl` stores without expiry.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::KeyRequired`] for a blank key, [`ErrorKind::Backend`] when the engine fails.
    pub async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<(), Error> {
        self.store_value(key, value, Some(ttl)).await
    }

    /// Returns the value under `key`, or `None` when it is absent or expired.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::KeyRequired`] for a blank key, [`ErrorKind::Backend`] when the engine fails.
    pub async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let timed = self
            .clock
            .timed(async {
                let key = validate::key(key)?;
                self.store.get(key).await
            })
            .await;

        let activity = match &timed.result {
            Ok(Some(_)) => Activity::Hit,
            Ok(None) => Activity::Miss,
            Err(e) => Activity::from_error(e),
        };
        self.telemetry.record(Operation::Get, activity, timed.duration);
        timed.result
    }

    /// Removes `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::KeyRequired`] for a blank key, [`ErrorKind::Backend`] when the engine fails.
    pub async fn delete(&self, key: &str) -> Result<(), Error> {
        let timed = self
            .clock
            .timed(async {
                let key = validate::key(key)?;
                self.store.delete(key).await
            })
            .await;

        self.finish(Operation::Delete, timed.result.as_ref(), timed.duration);
        timed.result
    }

    /// Removes every entry, locks included.
    ///
    /// On Redis this flushes the whole selected database, not only the keys
    /// this client wrote.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::Backend`] when the engine fails.
    pub async fn empty_cache(&self) -> Result<(), Error> {
        let timed = self.clock.timed(self.store.clear()).await;

        self.finish(Operation::Clear, timed.result.as_ref(), timed.duration);
        timed.result
    }

    /// Serializes `model` as JSON and stores it under `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde::{Deserialize, Serialize};
    ///
    /// use cachestore::Client;
    /// use tick::Clock;
    ///
    /// #[derive(Debug, PartialEq, Serialize, Deserialize)]
    /// struct Session {
    ///     user: String,
    ///     visits: u32,
    /// }
    ///
    /// # futures::executor::block_on(async {
    /// let client = Client::builder(Clock::new_frozen()).build().await?;
    /// let session = Session { user: "ada".into(), visits: 3 };
    ///
    /// client.set_model("session:1", &session, None).await?;
    /// assert_eq!(client.get_model::<Session>("session:1").await?, Some(session));
    /// # Ok::<(), cachestore::Error>(())
    /// # });
    /// ```
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::KeyRequired`] for a blank key.
    /// - [`ErrorKind::Serialization`] when `model` cannot be encoded.
    /// - [`ErrorKind::Backend`] when the engine fails.
    pub fn set_model<'a, T>(
        &'a self,
        key: &'a str,
        model: &T,
        ttl: Option<Duration>,
    ) -> impl Future<Output = Result<(), Error>> + Send + use<'a, T>
    where
        T: Serialize + ?Sized,
    {
        // Encoded up front so the returned future never holds `model`.
        let encoded = validate::key(key)
            .and_then(|_| serde_json::to_string(model).map_err(|e| Error::with_cause(ErrorKind::Serialization, e)));

        async move {
            let json = encoded?;
            self.store_value(key, &json, ttl).await
        }
    }

    /// Loads and decodes the JSON model stored under `key`.
    ///
    /// Returns `None` when the key is absent or expired.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::KeyRequired`] for a blank key.
    /// - [`ErrorKind::Serialization`] when the stored value is not a valid `T`.
    /// - [`ErrorKind::Backend`] when the engine fails.
    pub async fn get_model<T>(&self, key: &str) -> Result<Option<T>, Error>
    where
        T: DeserializeOwned,
    {
        self.get(key)
            .await?
            .map(|json| serde_json::from_str(&json).map_err(|e| Error::with_cause(ErrorKind::Serialization, e)))
            .transpose()
    }

    /// Takes the lock at `lock_key` with a freshly generated secret.
    ///
    /// See [`LockManager::acquire`].
    ///
    /// # Errors
    ///
    /// As for [`LockManager::acquire`].
    pub async fn acquire(&self, lock_key: &str, ttl: Duration) -> Result<String, Error> {
        self.locks.acquire(lock_key, ttl).await
    }

    /// Takes or refreshes the lock at `lock_key` with `secret`.
    ///
    /// # Errors
    ///
    /// As for [`LockManager::acquire_with_secret`].
    pub async fn acquire_with_secret(&self, lock_key: &str, secret: &str, ttl: Duration) -> Result<String, Error> {
        self.locks.acquire_with_secret(lock_key, secret, ttl).await
    }

    /// Waits up to `max_wait` for the lock at `lock_key`.
    ///
    /// # Errors
    ///
    /// As for [`LockManager::wait_acquire`].
    pub async fn wait_acquire(&self, lock_key: &str, ttl: Duration, max_wait: Duration) -> Result<String, Error> {
        self.locks.wait_acquire(lock_key, ttl, max_wait).await
    }

    /// Waits for the lock at `lock_key` until it is taken, `max_wait`
    /// elapses, or `cancelled` completes.
    ///
    /// # Errors
    ///
    /// As for [`LockManager::wait_acquire_until`].
    pub async fn wait_acquire_until<C>(&self, lock_key: &str, ttl: Duration, max_wait: Duration, cancelled: C) -> Result<String, Error>
    where
        C: Future<Output = ()>,
    {
        self.locks.wait_acquire_until(lock_key, ttl, max_wait, cancelled).await
    }

    /// Releases the lock at `lock_key` if `secret` holds it.
    ///
    /// # Errors
    ///
    /// As for [`LockManager::release`].
    pub async fn release(&self, lock_key: &str, secret: &str) -> Result<bool, Error> {
        self.locks.release(lock_key, secret).await
    }

    /// Shuts the client down.
    ///
    /// Other clones keep working; the engine connection closes when the last
    /// clone is dropped.
    pub fn close(self) {
        self.telemetry.record(Operation::Close, Activity::Closed, Duration::ZERO);
    }

    async fn store_value(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), Error> {
        let timed = self
            .clock
            .timed(async {
                let key = validate::key(key)?;
                self.store.set(key, value, ttl).await
            })
            .await;

        self.finish(Operation::Set, timed.result.as_ref(), timed.duration);
        timed.result
    }

    fn finish(&self, operation: Operation, result: Result<&(), &Error>, duration: Duration) {
        let activity = result.map_or_else(Activity::from_error, |()| Activity::Ok);
        self.telemetry.record(operation, activity, duration);
    }
}
