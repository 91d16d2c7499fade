// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Storage tier abstractions for cachestore engines.
//!
//! This crate defines the [`StoreTier`] trait that every storage engine implements,
//! the [`Engine`] identifier reported by each engine, and the [`Error`] type shared
//! by all fallible operations.
//!
//! # Overview
//!
//! A tier provides two kinds of operations:
//!
//! - Plain string storage: `get`, `set`, `delete`, and `clear`.
//! - Atomic lock primitives: `conditional_insert` and `conditional_delete`. These
//!   must be atomic at the backend. A read followed by a separate write is not an
//!   acceptable implementation because two racing callers could both observe an
//!   absent key.
//!
//! # Implementing a Tier
//!
//! ```
//! use std::collections::HashMap;
//! use std::sync::Mutex;
//! use std::time::Duration;
//!
//! use cachestore_tier::{Error, StoreTier};
//!
//! struct SimpleStore(Mutex<HashMap<String, String>>);
//!
//! impl StoreTier for SimpleStore {
//!     async fn get(&self, key: &str) -> Result<Option<String>, Error> {
//!         Ok(self.0.lock().unwrap().get(key).cloned())
//!     }
//!
//!     async fn set(&self, key: &str, value: &str, _ttl: Option<Duration>) -> Result<(), Error> {
//!         self.0.lock().unwrap().insert(key.to_owned(), value.to_owned());
//!         Ok(())
//!     }
//!
//!     async fn delete(&self, key: &str) -> Result<(), Error> {
//!         self.0.lock().unwrap().remove(key);
//!         Ok(())
//!     }
//!
//!     async fn clear(&self) -> Result<(), Error> {
//!         self.0.lock().unwrap().clear();
//!         Ok(())
//!     }
//!
//!     async fn conditional_insert(&self, key: &str, value: &str, _ttl: Duration) -> Result<bool, Error> {
//!         let mut map = self.0.lock().unwrap();
//!         match map.get(key) {
//!             Some(current) if current != value => Ok(false),
//!             _ => {
//!                 map.insert(key.to_owned(), value.to_owned());
//!                 Ok(true)
//!             }
//!         }
//!     }
//!
//!     async fn conditional_delete(&self, key: &str, expected: &str) -> Result<bool, Error> {
//!         let mut map = self.0.lock().unwrap();
//!         if map.get(key).is_some_and(|current| current == expected) {
//!             map.remove(key);
//!             return Ok(true);
//!         }
//!         Ok(false)
//!     }
//! }
//! ```
//!
//! # Dynamic Dispatch
//!
//! The `dynamic-store` feature (enabled by default) provides [`DynamicStore`], which
//! wraps any `StoreTier` in a clonable, type-erased container. The `cachestore`
//! client uses it so application code does not change when the engine does.

mod engine;
pub mod error;
#[cfg(any(feature = "test-util", test))]
pub mod testing;
pub(crate) mod tier;

#[cfg(any(test, feature = "dynamic-store"))]
mod dynamic;

#[cfg(any(test, feature = "dynamic-store"))]
#[doc(inline)]
pub use dynamic::{DynamicStore, DynamicStoreExt};
#[doc(inline)]
pub use engine::Engine;
#[doc(inline)]
pub use error::{Error, ErrorKind, Result};
#[doc(inline)]
pub use tier::StoreTier;
