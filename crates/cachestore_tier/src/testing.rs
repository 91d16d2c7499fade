// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Mock store implementation for testing.
//!
//! This module provides `MockStore`, an in-memory tier that records every
//! operation and supports failure injection for testing error paths.

use std::{collections::HashMap, sync::Arc, time::Duration};

use parking_lot::Mutex;

use crate::{Error, StoreTier};

/// Recorded store operation with full context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    /// A get operation was performed with the given key.
    Get(String),
    /// A set operation was performed.
    Set {
        /// The key that was written.
        key: String,
        /// The value that was written.
        value: String,
        /// The requested time-to-live.
        ttl: Option<Duration>,
    },
    /// A delete operation was performed with the given key.
    Delete(String),
    /// A clear operation was performed.
    Clear,
    /// A conditional insert (lock acquisition) was attempted.
    ConditionalInsert {
        /// The lock key.
        key: String,
        /// The secret offered for the lock.
        value: String,
        /// The requested time-to-live.
        ttl: Duration,
    },
    /// A conditional delete (lock release) was attempted.
    ConditionalDelete {
        /// The lock key.
        key: String,
        /// The secret the caller expects to be stored.
        expected: String,
    },
}

type FailPredicate = Box<dyn Fn(&StoreOp) -> bool + Send + Sync>;

/// A configurable mock store for testing.
///
/// Values never expire on their own; call [`MockStore::expire`] to simulate a
/// TTL running out.
///
/// # Examples
///
/// ```
/// use cachestore_tier::{testing::{MockStore, StoreOp}, StoreTier};
///
/// # futures::executor::block_on(async {
/// let store = MockStore::new();
///
/// store.set("key", "value", None).await.unwrap();
/// assert_eq!(store.get("key").await.unwrap().as_deref(), Some("value"));
///
/// // Fail every lock acquisition
/// store.fail_when(|op| matches!(op, StoreOp::ConditionalInsert { .. }));
/// assert!(store.conditional_insert("lock", "secret", std::time::Duration::from_secs(1)).await.is_err());
/// # });
/// ```
#[derive(Clone, Default)]
pub struct MockStore {
    data: Arc<Mutex<HashMap<String, String>>>,
    operations: Arc<Mutex<Vec<StoreOp>>>,
    fail_when: Arc<Mutex<Option<FailPredicate>>>,
}

impl std::fmt::Debug for MockStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockStore")
            .field("data", &self.data)
            .field("operations", &self.operations)
            .field("fail_when", &self.fail_when.lock().is_some())
            .finish()
    }
}

impl MockStore {
    /// Creates a new empty mock store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock store with pre-populated data.
    #[must_use]
    pub fn with_data(data: HashMap<String, String>) -> Self {
        Self {
            data: Arc::new(Mutex::new(data)),
            ..Self::default()
        }
    }

    /// Returns the number of entries in the store.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.data.lock().len()
    }

    /// Returns the stored value for a key without recording an operation.
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<String> {
        self.data.lock().get(key).cloned()
    }

    /// Removes a key without recording an operation, as if its TTL ran out.
    pub fn expire(&self, key: &str) {
        self.data.lock().remove(key);
    }

    /// Sets a predicate that determines when operations should fail.
    ///
    /// Failed operations are still recorded.
    pub fn fail_when<F>(&self, predicate: F)
    where
        F: Fn(&StoreOp) -> bool + Send + Sync + 'static,
    {
        *self.fail_when.lock() = Some(Box::new(predicate));
    }

    /// Clears the failure predicate, allowing all operations to succeed.
    pub fn clear_failures(&self) {
        *self.fail_when.lock() = None;
    }

    /// Returns a clone of all recorded operations.
    #[must_use]
    pub fn operations(&self) -> Vec<StoreOp> {
        self.operations.lock().clone()
    }

    /// Clears all recorded operations.
    pub fn clear_operations(&self) {
        self.operations.lock().clear();
    }

    fn check(&self, op: StoreOp) -> Result<(), Error> {
        let fail = self.fail_when.lock().as_ref().is_some_and(|predicate| predicate(&op));
        self.operations.lock().push(op);
        if fail {
            return Err(Error::backend("mock: injected failure"));
        }
        Ok(())
    }
}

impl StoreTier for MockStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        self.check(StoreOp::Get(key.to_owned()))?;
        Ok(self.data.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), Error> {
        self.check(StoreOp::Set {
            key: key.to_owned(),
            value: value.to_owned(),
            ttl,
        })?;
        self.data.lock().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), Error> {
        self.check(StoreOp::Delete(key.to_owned()))?;
        self.data.lock().remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<(), Error> {
        self.check(StoreOp::Clear)?;
        self.data.lock().clear();
        Ok(())
    }

    async fn conditional_insert(&self, key: &str, value: &str, ttl: Duration) -> Result<bool, Error> {
        self.check(StoreOp::ConditionalInsert {
            key: key.to_owned(),
            value: value.to_owned(),
            ttl,
        })?;

        let mut data = self.data.lock();
        match data.get(key) {
            Some(current) if current != value => Ok(false),
            _ => {
                data.insert(key.to_owned(), value.to_owned());
                Ok(true)
            }
        }
    }

    async fn conditional_delete(&self, key: &str, expected: &str) -> Result<bool, Error> {
        self.check(StoreOp::ConditionalDelete {
            key: key.to_owned(),
            expected: expected.to_owned(),
        })?;

        let mut data = self.data.lock();
        if data.get(key).is_some_and(|current| current == expected) {
            data.remove(key);
            return Ok(true);
        }
        Ok(false)
    }

    fn len(&self) -> Option<u64> {
        Some(self.data.lock().len() as u64)
    }
}
