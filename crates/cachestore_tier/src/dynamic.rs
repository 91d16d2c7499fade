// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Type-erased store tier.

use std::{fmt::Debug, sync::Arc, time::Duration};

use crate::{Engine, Error, StoreTier, tier::DynStoreTier};

/// Extension trait for converting any `StoreTier` into a `DynamicStore`.
///
/// # Examples
///
/// ```
/// use cachestore_tier::{DynamicStore, DynamicStoreExt, StoreTier};
///
/// fn erase<T>(tier: T) -> DynamicStore
/// where
///     T: StoreTier + 'static,
/// {
///     tier.into_dynamic()
/// }
/// ```
pub trait DynamicStoreExt: Sized {
    /// Converts this tier into a `DynamicStore`.
    fn into_dynamic(self) -> DynamicStore;
}

impl<T> DynamicStoreExt for T
where
    T: StoreTier + 'static,
{
    fn into_dynamic(self) -> DynamicStore {
        DynamicStore::new(self)
    }
}

/// A clonable store tier with type erasure.
///
/// Clones share the same underlying engine.
pub struct DynamicStore(Arc<DynStoreTier<'static>>);

impl DynamicStore {
    /// Creates a new dynamic store from any `StoreTier` implementation.
    pub fn new<T>(tier: T) -> Self
    where
        T: StoreTier + 'static,
    {
        Self(DynStoreTier::new_arc(tier))
    }
}

impl Debug for DynamicStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicStore").field("engine", &self.0.engine()).finish()
    }
}

impl Clone for DynamicStore {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl StoreTier for DynamicStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        self.0.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), Error> {
        self.0.set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> Result<(), Error> {
        self.0.delete(key).await
    }

    async fn clear(&self) -> Result<(), Error> {
        self.0.clear().await
    }

    async fn conditional_insert(&self, key: &str, value: &str, ttl: Duration) -> Result<bool, Error> {
        self.0.conditional_insert(key, value, ttl).await
    }

    async fn conditional_delete(&self, key: &str, expected: &str) -> Result<bool, Error> {
        self.0.conditional_delete(key, expected).await
    }

    fn engine(&self) -> Engine {
        self.0.engine()
    }

    fn len(&self) -> Option<u64> {
        self.0.len()
    }
}
