// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The address used when no URL is configured.
pub const DEFAULT_URL: &str = "redis://localhost:6379";

const PLAIN_SCHEME: &str = "redis://";
const TLS_SCHEME: &str = "rediss://";

/// Connection settings for [`RedisStore`](crate::RedisStore).
///
/// The URL may omit its scheme; `redis://` is added, or `rediss://` when
/// `use_tls` is set. Every field has a default so partial configuration
/// files deserialize cleanly.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use cachestore_redis::RedisConfig;
///
/// let config = RedisConfig::new("cache.internal:6380")
///     .with_tls(true)
///     .with_response_timeout(Duration::from_secs(2));
///
/// assert_eq!(config.connection_url(), "rediss://cache.internal:6380");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    /// Server address, with or without a scheme.
    pub url: String,
    /// Connect over TLS.
    pub use_tls: bool,
    /// Time allowed to establish a connection, in milliseconds.
    pub connection_timeout_ms: u64,
    /// Time allowed for a single command, in milliseconds.
    pub response_timeout_ms: u64,
    /// Number of reconnect attempts after the connection drops.
    pub reconnect_retries: usize,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_owned(),
            use_tls: false,
            connection_timeout_ms: 5_000,
            response_timeout_ms: 5_000,
            reconnect_retries: 6,
        }
    }
}

impl RedisConfig {
    /// Creates a configuration for the given address with default timeouts.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Sets whether to connect over TLS.
    #[must_use]
    pub fn with_tls(mut self, use_tls: bool) -> Self {
        self.use_tls = use_tls;
        self
    }

    /// Sets the connection timeout.
    #[must_use]
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout_ms = saturating_millis(timeout);
        self
    }

    /// Sets the per-command response timeout.
    #[must_use]
    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout_ms = saturating_millis(timeout);
        self
    }

    /// Sets the number of reconnect attempts.
    #[must_use]
    pub fn with_reconnect_retries(mut self, retries: usize) -> Self {
        self.reconnect_retries = retries;
        self
    }

    /// Returns the connection timeout.
    #[must_use]
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_millis(self.connection_timeout_ms)
    }

    /// Returns the per-command response timeout.
    #[must_use]
    pub fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms)
    }

    /// Returns the URL with the scheme matching `use_tls`.
    ///
    /// An empty URL resolves to [`DEFAULT_URL`].
    #[must_use]
    pub fn connection_url(&self) -> String {
        let url = self.url.trim();
        let host = if url.is_empty() {
            DEFAULT_URL.trim_start_matches(PLAIN_SCHEME)
        } else {
            url.strip_prefix(TLS_SCHEME)
                .or_else(|| url.strip_prefix(PLAIN_SCHEME))
                .unwrap_or(url)
        };

        let scheme = if self.use_tls || url.starts_with(TLS_SCHEME) {
            TLS_SCHEME
        } else {
            PLAIN_SCHEME
        };
        format!("{scheme}{host}")
    }
}

pub(crate) fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
