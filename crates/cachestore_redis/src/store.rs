// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;
use std::time::Duration;

use cachestore_tier::{Engine, Error, StoreTier};
use redis::AsyncCommands;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};

use crate::config::{RedisConfig, saturating_millis};
use crate::scripts;

/// A store tier backed by a Redis server.
///
/// Clones share one multiplexed connection. The connection manager reconnects
/// on its own after a dropped connection; commands issued while it is down
/// fail with a backend error instead of waiting.
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
    url: Option<String>,
}

impl fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisStore").field("url", &self.url).finish_non_exhaustive()
    }
}

impl RedisStore {
    /// Connects to the server described by `config`.
    ///
    /// # Errors
    ///
    /// Returns a backend error if the URL is invalid or the server cannot be
    /// reached within the connection timeout.
    pub async fn connect(config: &RedisConfig) -> Result<Self, Error> {
        let url = config.connection_url();
        let client = redis::Client::open(url.as_str()).map_err(Error::backend)?;

        let manager_config = ConnectionManagerConfig::new()
            .set_connection_timeout(config.connection_timeout())
            .set_response_timeout(config.response_timeout())
            .set_number_of_retries(config.reconnect_retries);

        let connection = client
            .get_connection_manager_with_config(manager_config)
            .await
            .map_err(Error::backend)?;

        Ok(Self { connection, url: Some(url) })
    }

    /// Wraps an existing connection manager.
    #[must_use]
    pub fn from_connection(connection: ConnectionManager) -> Self {
        Self { connection, url: None }
    }

    /// Returns the URL this store connected to, if it opened the connection itself.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

/// Converts a TTL to Redis milliseconds, rounding sub-millisecond values up.
fn ttl_millis(ttl: Duration) -> u64 {
    saturating_millis(ttl).max(1)
}

impl StoreTier for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let mut connection = self.connection.clone();
        connection.get(key).await.map_err(Error::backend)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), Error> {
        let mut connection = self.connection.clone();
        match ttl.filter(|ttl| !ttl.is_zero()) {
            Some(ttl) => connection.pset_ex::<_, _, ()>(key, value, ttl_millis(ttl)).await,
            None => connection.set::<_, _, ()>(key, value).await,
        }
        .map_err(Error::backend)
    }

    async fn delete(&self, key: &str) -> Result<(), Error> {
        let mut connection = self.connection.clone();
        connection.del::<_, ()>(key).await.map_err(Error::backend)
    }

    async fn clear(&self) -> Result<(), Error> {
        let mut connection = self.connection.clone();
        redis::cmd("FLUSHDB")
            .query_async::<()>(&mut connection)
            .await
            .map_err(Error::backend)
    }

    async fn conditional_insert(&self, key: &str, value: &str, ttl: Duration) -> Result<bool, Error> {
        let mut connection = self.connection.clone();
        let acquired: i64 = scripts::acquire()
            .key(key)
            .arg(value)
            .arg(ttl_millis(ttl))
            .invoke_async(&mut connection)
            .await
            .map_err(Error::backend)?;
        Ok(acquired == 1)
    }

    async fn conditional_delete(&self, key: &str, expected: &str) -> Result<bool, Error> {
        let mut connection = self.connection.clone();
        let deleted: i64 = scripts::release()
            .key(key)
            .arg(expected)
            .invoke_async(&mut connection)
            .await
            .map_err(Error::backend)?;
        Ok(deleted > 0)
    }

    fn engine(&self) -> Engine {
        Engine::Redis
    }
}
