// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The core trait for storage engines.

use std::time::Duration;

use crate::{Engine, Error};

/// Trait for storage engine implementations.
///
/// Keys passed to a tier have already been validated and trimmed by the caller.
///
/// The two lock primitives carry the whole exclusivity guarantee of the lock
/// protocol, so each must execute as a single atomic step at the backend:
///
/// - `conditional_insert` stores `value` under `key` with `ttl` when the key is
///   absent or already holds `value` (refreshing the TTL), and reports whether
///   `value` is now the stored value.
/// - `conditional_delete` removes `key` only when it currently holds `expected`,
///   and reports whether a removal happened.
///
/// Only `engine` and `len` have default implementations.
#[cfg_attr(
    any(test, feature = "dynamic-store"),
    dynosaur::dynosaur(pub(crate) DynStoreTier = dyn(box) StoreTier, bridge(none))
)]
pub trait StoreTier: Send + Sync {
    /// Gets a value, returning `None` when the key is absent or expired.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, Error>> + Send;

    /// Stores a value, replacing any existing one. `None` means no expiry.
    fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> impl Future<Output = Result<(), Error>> + Send;

    /// Removes a value. Removing an absent key is not an error.
    fn delete(&self, key: &str) -> impl Future<Output = Result<(), Error>> + Send;

    /// Removes every entry.
    fn clear(&self) -> impl Future<Output = Result<(), Error>> + Send;

    /// Atomically inserts `value` if `key` is absent or already holds `value`.
    fn conditional_insert(&self, key: &str, value: &str, ttl: Duration) -> impl Future<Output = Result<bool, Error>> + Send;

    /// Atomically deletes `key` if it holds `expected`.
    fn conditional_delete(&self, key: &str, expected: &str) -> impl Future<Output = Result<bool, Error>> + Send;

    /// Returns the engine backing this tier.
    fn engine(&self) -> Engine {
        Engine::Custom
    }

    /// Returns the number of entries, if supported.
    ///
    /// Returns `None` for implementations that don't track size.
    fn len(&self) -> Option<u64> {
        None
    }
}
