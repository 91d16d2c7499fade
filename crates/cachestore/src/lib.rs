// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! String storage, model storage, and distributed locks over Redis or process memory.
//!
//! A [`Client`] wraps one storage engine behind a uniform API:
//!
//! - Plain values: [`set`](Client::set), [`set_with_ttl`](Client::set_with_ttl),
//!   [`get`](Client::get), [`delete`](Client::delete), [`empty_cache`](Client::empty_cache).
//! - JSON models through serde: [`set_model`](Client::set_model), [`get_model`](Client::get_model).
//! - Distributed locks: [`acquire`](Client::acquire), [`acquire_with_secret`](Client::acquire_with_secret),
//!   [`wait_acquire`](Client::wait_acquire), [`wait_acquire_until`](Client::wait_acquire_until),
//!   [`release`](Client::release).
//!
//! # Locks
//!
//! A lock is a key whose value is the owner's secret. Whoever presents the
//! secret may refresh or release the lock; nobody else can. Every lock has a
//! time-to-live, so a crashed owner cannot hold it forever. The client keeps no
//! lock state of its own: exclusivity comes from the engine's atomic
//! primitives, so clients in different processes sharing a Redis server
//! exclude each other.
//!
//! ```
//! use std::time::Duration;
//!
//! use cachestore::{Client, ErrorKind};
//! use tick::Clock;
//!
//! # futures::executor::block_on(async {
//! let client = Client::builder(Clock::new_frozen()).build().await?;
//! let ttl = Duration::from_secs(30);
//!
//! let secret = client.acquire("invoices", ttl).await?;
//!
//! let error = client.acquire("invoices", ttl).await.unwrap_err();
//! assert_eq!(error.kind(), ErrorKind::LockConflict);
//!
//! assert!(client.release("invoices", &secret).await?);
//! assert!(!client.release("invoices", &secret).await?);
//! # Ok::<(), cachestore::Error>(())
//! # });
//! ```
//!
//! # Engines
//!
//! | Feature  | Engine                                      |
//! |----------|---------------------------------------------|
//! | `memory` | [`MemoryStore`], the default                |
//! | `redis`  | `RedisStore`, connected from `RedisConfig`  |
//!
//! Any other [`StoreTier`] can be plugged in with
//! [`ClientBuilder::storage`].
//!
//! # Telemetry
//!
//! With the `logs` feature and [`ClientBuilder::logs`], each operation emits a
//! `tracing` event named `cachestore.event`. Hits, misses, and plain writes are
//! logged at DEBUG only when the client is built with `debug(true)`. With the
//! `metrics` feature, [`ClientBuilder::metrics`] records an event counter and
//! an operation duration histogram. Lock secrets are never logged.
//!
//! # Time
//!
//! All waiting and expiry goes through the [`tick::Clock`] handed to the
//! builder, so tests can drive lock expiry with `tick::ClockControl`.

pub mod builder;
mod client;
pub mod config;
mod lock;
mod secret;
mod telemetry;
mod validate;

#[doc(inline)]
pub use builder::ClientBuilder;
#[cfg(feature = "memory")]
#[doc(inline)]
pub use cachestore_memory::{MemoryStore, MemoryStoreBuilder};
#[cfg(feature = "redis")]
#[doc(inline)]
pub use cachestore_redis::{RedisConfig, RedisStore};
#[cfg(feature = "test-util")]
#[doc(inline)]
pub use cachestore_tier::testing;
#[doc(inline)]
pub use cachestore_tier::{DynamicStore, DynamicStoreExt, Engine, Error, ErrorKind, Result, StoreTier};
#[doc(inline)]
pub use client::Client;
#[doc(inline)]
pub use config::{ClientConfig, MemoryConfig};
#[doc(inline)]
pub use lock::{DEFAULT_POLL_INTERVAL, DEFAULT_SECRET_BYTES, LockManager};
#[doc(inline)]
pub use secret::random_hex;
