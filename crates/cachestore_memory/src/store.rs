// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Memory store implementation using moka.

use std::future::ready;
use std::time::{Duration, Instant};

use cachestore_tier::{Engine, Error, StoreTier};
use moka::Expiry;
use moka::future::Cache;
use moka::ops::compute::{CompResult, Op};
use thread_aware::{Arc, PerProcess, ThreadAware};
use tick::Clock;

use crate::builder::MemoryStoreBuilder;

#[derive(Debug, Clone)]
struct StoredValue {
    value: String,
    ttl: Option<Duration>,
    expires_at: Option<Instant>,
}

impl StoredValue {
    fn new(value: &str, ttl: Option<Duration>, now: Instant) -> Self {
        // A zero TTL means the entry never expires.
        let ttl = ttl.filter(|ttl| !ttl.is_zero());
        Self {
            value: value.to_owned(),
            ttl,
            expires_at: ttl.and_then(|ttl| now.checked_add(ttl)),
        }
    }

    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|expires_at| now < expires_at)
    }
}

/// Hands each entry's own TTL to moka so expired entries are evicted.
struct PerEntryTtl;

impl Expiry<String, StoredValue> for PerEntryTtl {
    fn expire_after_create(&self, _key: &String, value: &StoredValue, _created_at: Instant) -> Option<Duration> {
        value.ttl
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &StoredValue,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        value.ttl
    }
}

/// A store tier that keeps values in process memory.
///
/// Lock primitives run inside moka's per-key compute, which serializes
/// concurrent writers of the same key. Clones share the same cache.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use cachestore_memory::MemoryStore;
/// use cachestore_tier::StoreTier;
/// use tick::Clock;
///
/// # futures::executor::block_on(async {
/// let store = MemoryStore::new(Clock::new_frozen());
/// let ttl = Duration::from_secs(30);
///
/// assert!(store.conditional_insert("lock", "a", ttl).await.unwrap());
/// assert!(!store.conditional_insert("lock", "b", ttl).await.unwrap());
/// assert!(store.conditional_delete("lock", "a").await.unwrap());
/// # });
/// ```
#[derive(Debug, Clone, ThreadAware)]
pub struct MemoryStore {
    inner: Arc<Cache<String, StoredValue>, PerProcess>,
    #[thread_aware(skip)]
    clock: Clock,
}

impl MemoryStore {
    /// Creates a new unbounded memory store.
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self::builder(clock).build()
    }

    /// Creates a new builder for configuring a memory store.
    #[must_use]
    pub fn builder(clock: Clock) -> MemoryStoreBuilder {
        MemoryStoreBuilder::new(clock)
    }

    pub(crate) fn from_builder(builder: MemoryStoreBuilder) -> Self {
        let mut moka_builder = Cache::builder().expire_after(PerEntryTtl);

        if let Some(capacity) = builder.max_capacity {
            moka_builder = moka_builder.max_capacity(capacity);
        }

        if let Some(capacity) = builder.initial_capacity {
            moka_builder = moka_builder.initial_capacity(capacity);
        }

        if let Some(name) = builder.name.as_deref() {
            moka_builder = moka_builder.name(name);
        }

        Self {
            inner: Arc::from_unaware(moka_builder.build()),
            clock: builder.clock,
        }
    }
}

impl StoreTier for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let now = self.clock.instant();
        Ok(self
            .inner
            .get(key)
            .await
            .filter(|stored| stored.is_live(now))
            .map(|stored| stored.value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), Error> {
        let stored = StoredValue::new(value, ttl, self.clock.instant());
        self.inner.insert(key.to_owned(), stored).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), Error> {
        self.inner.invalidate(key).await;
        Ok(())
    }

    async fn clear(&self) -> Result<(), Error> {
        self.inner.invalidate_all();
        Ok(())
    }

    async fn conditional_insert(&self, key: &str, value: &str, ttl: Duration) -> Result<bool, Error> {
        let now = self.clock.instant();
        let candidate = StoredValue::new(value, Some(ttl), now);

        let result = self
            .inner
            .entry_by_ref(key)
            .and_compute_with(|current| {
                let op = match current {
                    Some(entry) if entry.value().is_live(now) && entry.value().value != value => Op::Nop,
                    _ => Op::Put(candidate),
                };
                ready(op)
            })
            .await;

        Ok(matches!(result, CompResult::Inserted(_) | CompResult::ReplacedWith(_)))
    }

    async fn conditional_delete(&self, key: &str, expected: &str) -> Result<bool, Error> {
        let now = self.clock.instant();

        let result = self
            .inner
            .entry_by_ref(key)
            .and_compute_with(|current| {
                let op = match current {
                    Some(entry) if entry.value().is_live(now) && entry.value().value == expected => Op::Remove,
                    _ => Op::Nop,
                };
                ready(op)
            })
            .await;

        Ok(matches!(result, CompResult::Removed(_)))
    }

    fn engine(&self) -> Engine {
        Engine::Memory
    }

    fn len(&self) -> Option<u64> {
        Some(self.inner.entry_count())
    }
}
