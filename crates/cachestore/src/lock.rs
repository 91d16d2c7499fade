// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Distributed locks on top of a [`StoreTier`].
//!
//! A lock is an ordinary entry whose value is the owner's secret. The entry
//! expires with its TTL, so a crashed owner never holds a lock forever. All
//! exclusivity comes from the tier's atomic `conditional_insert` and
//! `conditional_delete`; the manager itself keeps no lock state.

use std::pin::pin;
use std::time::Duration;

use cachestore_tier::{Error, ErrorKind, StoreTier};
use futures::future::{Either, select};
use tick::Clock;

use crate::secret::random_hex;
use crate::telemetry::ext::ClockExt;
use crate::telemetry::{Activity, Operation, StoreTelemetry};
use crate::validate;

/// Number of random bytes in a generated secret (64 hex characters).
pub const DEFAULT_SECRET_BYTES: usize = 32;

/// Time between attempts while waiting for a lock.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Acquires and releases locks held in a store.
///
/// The manager is cheap to clone when the store is, and is safe to share
/// across tasks. Every operation except [`wait_acquire`](Self::wait_acquire)
/// makes exactly one backend call, and none is made when validation fails.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use cachestore::{LockManager, MemoryStore};
/// use tick::Clock;
///
/// # futures::executor::block_on(async {
/// let clock = Clock::new_frozen();
/// let locks = LockManager::new(MemoryStore::new(clock.clone()), clock);
///
/// let secret = locks.acquire("reports:daily", Duration::from_secs(30)).await?;
/// assert_eq!(secret.len(), 64);
///
/// assert!(locks.release("reports:daily", &secret).await?);
/// # Ok::<(), cachestore::Error>(())
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct LockManager<S> {
    store: S,
    clock: Clock,
    poll_interval: Duration,
    secret_bytes: usize,
    telemetry: StoreTelemetry,
}

impl<S> LockManager<S> {
    /// Creates a lock manager over `store`, timing waits with `clock`.
    #[must_use]
    pub fn new(store: S, clock: Clock) -> Self {
        Self {
            store,
            clock,
            poll_interval: DEFAULT_POLL_INTERVAL,
            secret_bytes: DEFAULT_SECRET_BYTES,
            telemetry: StoreTelemetry::default(),
        }
    }

    /// Sets the time between attempts in [`wait_acquire`](Self::wait_acquire).
    ///
    /// A zero interval keeps the current setting.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        if !interval.is_zero() {
            self.poll_interval = interval;
        }
        self
    }

    /// Sets how many random bytes generated secrets contain.
    #[must_use]
    pub fn with_secret_bytes(mut self, bytes: usize) -> Self {
        self.secret_bytes = bytes;
        self
    }

    pub(crate) fn with_telemetry(mut self, telemetry: StoreTelemetry) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the poll interval used while waiting.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

impl<S: StoreTier> LockManager<S> {
    /// Takes the lock with a freshly generated secret.
    ///
    /// A new secret is generated on every call, so calling this twice for the
    /// same key conflicts with yourself.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::KeyRequired`] or [`ErrorKind::TtlRequired`] for invalid input.
    /// - [`ErrorKind::LockConflict`] when the key is held by another secret.
    /// - [`ErrorKind::SecretGeneration`] or [`ErrorKind::Backend`] on infrastructure failure.
    pub async fn acquire(&self, lock_key: &str, ttl: Duration) -> Result<String, Error> {
        let timed = self
            .clock
            .timed(async {
                let key = validate::key(lock_key)?;
                validate::ttl(ttl)?;
                let secret = random_hex(self.secret_bytes)?;
                self.insert(key, &secret, ttl).await?;
                Ok::<_, Error>(secret)
            })
            .await;

        self.finish(Operation::Acquire, Activity::Acquired, timed.result.as_ref(), timed.duration);
        timed.result
    }

    /// Takes or refreshes the lock with a caller-chosen secret.
    ///
    /// Repeating the call with the same secret before the lock expires
    /// succeeds and restarts its TTL. On success the secret is returned
    /// unchanged.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::KeyRequired`], [`ErrorKind::SecretRequired`] or
    ///   [`ErrorKind::TtlRequired`] for invalid input.
    /// - [`ErrorKind::LockConflict`] when the key is held by a different secret.
    /// - [`ErrorKind::Backend`] when the store fails.
    pub async fn acquire_with_secret(&self, lock_key: &str, secret: &str, ttl: Duration) -> Result<String, Error> {
        let timed = self
            .clock
            .timed(async {
                let key = validate::lock(lock_key, secret)?;
                validate::ttl(ttl)?;
                self.insert(key, secret, ttl).await?;
                Ok::<_, Error>(secret.to_owned())
            })
            .await;

        self.finish(Operation::Acquire, Activity::Acquired, timed.result.as_ref(), timed.duration);
        timed.result
    }

    /// Polls for the lock until it is taken or `max_wait` elapses.
    ///
    /// One secret is generated per call and reused for every attempt. Only
    /// conflicts are retried; a backend failure ends the wait immediately.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::KeyRequired`], [`ErrorKind::TtlRequired`] or
    ///   [`ErrorKind::WaitTimeRequired`] for invalid input.
    /// - [`ErrorKind::LockTimeout`] when `max_wait` elapses first.
    /// - [`ErrorKind::SecretGeneration`] or [`ErrorKind::Backend`] on infrastructure failure.
    pub async fn wait_acquire(&self, lock_key: &str, ttl: Duration, max_wait: Duration) -> Result<String, Error> {
        self.wait_acquire_until(lock_key, ttl, max_wait, std::future::pending()).await
    }

    /// Like [`wait_acquire`](Self::wait_acquire), but gives up as soon as
    /// `cancelled` completes.
    ///
    /// Pass a delay on the same clock to impose a deadline, or the receiving
    /// end of a channel to cancel from elsewhere. Cancellation is observed
    /// while waiting between attempts. An attempt already sent to the store
    /// always runs to completion, so a lock the store granted is returned to
    /// the caller rather than left held under a secret nobody knows.
    ///
    /// # Errors
    ///
    /// Everything [`wait_acquire`](Self::wait_acquire) returns, plus
    /// [`ErrorKind::Cancelled`] when `cancelled` completes first.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    ///
    /// use cachestore::{ErrorKind, LockManager, MemoryStore};
    /// use tick::ClockControl;
    ///
    /// # futures::executor::block_on(async {
    /// let clock = ClockControl::new().auto_advance_timers(true).to_clock();
    /// let locks = LockManager::new(MemoryStore::new(clock.clone()), clock.clone());
    /// let ttl = Duration::from_secs(60);
    ///
    /// locks.acquire("job", ttl).await?;
    ///
    /// let deadline = clock.delay(Duration::from_secs(1));
    /// let error = locks
    ///     .wait_acquire_until("job", ttl, Duration::from_secs(30), deadline)
    ///     .await
    ///     .unwrap_err();
    /// assert_eq!(error.kind(), ErrorKind::Cancelled);
    /// # Ok::<(), cachestore::Error>(())
    /// # });
    /// ```
    pub async fn wait_acquire_until<C>(&self, lock_key: &str, ttl: Duration, max_wait: Duration, cancelled: C) -> Result<String, Error>
    where
        C: Future<Output = ()>,
    {
        let timed = self
            .clock
            .timed(async {
                let key = validate::key(lock_key)?;
                validate::ttl(ttl)?;
                validate::max_wait(max_wait)?;
                let secret = random_hex(self.secret_bytes)?;

                self.poll_until_acquired(key, &secret, ttl, max_wait, cancelled).await?;
                Ok::<_, Error>(secret)
            })
            .await;

        self.finish(Operation::WaitAcquire, Activity::Acquired, timed.result.as_ref(), timed.duration);
        timed.result
    }

    /// Deletes the lock if it is held by `secret`.
    ///
    /// Returns `false` when the lock is absent, expired, or held by another
    /// secret. Releasing twice is therefore harmless.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::KeyRequired`] or [`ErrorKind::SecretRequired`] for invalid input.
    /// - [`ErrorKind::Backend`] when the store fails.
    pub async fn release(&self, lock_key: &str, secret: &str) -> Result<bool, Error> {
        let timed = self
            .clock
            .timed(async {
                let key = validate::lock(lock_key, secret)?;
                self.store.conditional_delete(key, secret).await
            })
            .await;

        let activity = match &timed.result {
            Ok(true) => Activity::Released,
            Ok(false) => Activity::NotHeld,
            Err(e) => Activity::from_error(e),
        };
        self.telemetry.record(Operation::Release, activity, timed.duration);
        timed.result
    }

    async fn insert(&self, key: &str, secret: &str, ttl: Duration) -> Result<(), Error> {
        if self.store.conditional_insert(key, secret, ttl).await? {
            Ok(())
        } else {
            Err(ErrorKind::LockConflict.into())
        }
    }

    async fn poll_until_acquired<C>(&self, key: &str, secret: &str, ttl: Duration, max_wait: Duration, cancelled: C) -> Result<(), Error>
    where
        C: Future<Output = ()>,
    {
        let stopwatch = self.clock.stopwatch();
        let mut cancelled = pin!(cancelled);
        loop {
            match self.insert(key, secret, ttl).await {
                Err(e) if e.kind() == ErrorKind::LockConflict => {}
                other => return other,
            }

            let elapsed = stopwatch.elapsed();
            if elapsed >= max_wait {
                return Err(ErrorKind::LockTimeout.into());
            }

            // Only the pause races cancellation; an attempt in flight always finishes.
            let pause = pin!(self.clock.delay(self.poll_interval.min(max_wait - elapsed)));
            if let Either::Right(((), _)) = select(pause, cancelled.as_mut()).await {
                return Err(ErrorKind::Cancelled.into());
            }
        }
    }

    fn finish(&self, operation: Operation, success: Activity, result: Result<&String, &Error>, duration: Duration) {
        let activity = result.map_or_else(Activity::from_error, |_| success);
        self.telemetry.record(operation, activity, duration);
    }
}
