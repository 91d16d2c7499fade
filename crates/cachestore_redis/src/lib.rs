// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Redis engine for cachestore.
//!
//! [`RedisStore`] implements [`StoreTier`](cachestore_tier::StoreTier) on top of a
//! `redis` connection manager. Plain storage maps onto `GET`, `SET`, `DEL` and
//! `FLUSHDB`. The lock primitives run as Lua scripts so that the ownership check
//! and the write are a single atomic step on the server.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use cachestore_redis::{RedisConfig, RedisStore};
//! use cachestore_tier::StoreTier;
//!
//! # async fn example() -> Result<(), cachestore_tier::Error> {
//! let config = RedisConfig::new("localhost:6379");
//! let store = RedisStore::connect(&config).await?;
//!
//! if store.conditional_insert("jobs:nightly", "secret", Duration::from_secs(30)).await? {
//!     // we own the lock
//!     store.conditional_delete("jobs:nightly", "secret").await?;
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod scripts;
mod store;

#[doc(inline)]
pub use config::{DEFAULT_URL, RedisConfig};
#[doc(inline)]
pub use store::RedisStore;
