// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! In-process memory engine backed by moka.
//!
//! This crate provides [`MemoryStore`], a concurrent [`StoreTier`](cachestore_tier::StoreTier)
//! that keeps values in a moka cache. Use [`MemoryStoreBuilder`] to configure capacity
//! without exposing moka types directly.
//!
//! # Quick Start
//!
//! ```
//! use std::time::Duration;
//!
//! use cachestore_memory::MemoryStore;
//! use cachestore_tier::StoreTier;
//! use tick::Clock;
//!
//! # futures::executor::block_on(async {
//! let store = MemoryStore::builder(Clock::new_frozen())
//!     .max_capacity(1000)
//!     .build();
//!
//! store.set("key", "value", Some(Duration::from_secs(60))).await.unwrap();
//! assert_eq!(store.get("key").await.unwrap().as_deref(), Some("value"));
//! # });
//! ```
//!
//! # Expiry
//!
//! Every entry carries its own time-to-live. Expiry is checked against the
//! [`Clock`](tick::Clock) handed to the builder, so an expired entry is never
//! returned and never blocks a lock acquisition, even before moka evicts it.

pub mod builder;
mod store;

#[doc(inline)]
pub use builder::MemoryStoreBuilder;
#[doc(inline)]
pub use store::MemoryStore;
