// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builder for configuring memory stores.
//!
//! This module wraps the moka configuration so the public API stays stable
//! without exposing moka's types.

use tick::Clock;

use crate::MemoryStore;

/// Builder for configuring a [`MemoryStore`].
///
/// # Examples
///
/// ```
/// use cachestore_memory::MemoryStore;
/// use tick::Clock;
///
/// let store = MemoryStore::builder(Clock::new_frozen())
///     .max_capacity(1000)
///     .initial_capacity(100)
///     .name("sessions")
///     .build();
/// ```
#[derive(Debug)]
pub struct MemoryStoreBuilder {
    pub(crate) clock: Clock,
    pub(crate) max_capacity: Option<u64>,
    pub(crate) initial_capacity: Option<usize>,
    pub(crate) name: Option<String>,
}

impl MemoryStoreBuilder {
    /// Creates a new builder for an unbounded store.
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            max_capacity: None,
            initial_capacity: None,
            name: None,
        }
    }

    /// Sets the maximum number of entries.
    ///
    /// Once the capacity is reached, moka evicts entries using its `TinyLFU`
    /// policy. Live locks can be evicted like any other entry, so size the
    /// store generously when it also backs locks.
    #[must_use]
    pub fn max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = Some(capacity);
        self
    }

    /// Sets the initial capacity (pre-allocation hint).
    #[must_use]
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = Some(capacity);
        self
    }

    /// Sets a name that may appear in moka's debugging output.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builds the configured [`MemoryStore`].
    #[must_use]
    pub fn build(self) -> MemoryStore {
        MemoryStore::from_builder(self)
    }
}
