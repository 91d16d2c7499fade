// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;

/// Identifies the storage engine behind a tier.
///
/// # Examples
///
/// ```
/// use cachestore_tier::Engine;
///
/// assert_eq!(Engine::Redis.as_str(), "redis");
/// assert_eq!(Engine::default(), Engine::Memory);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[non_exhaustive]
pub enum Engine {
    /// Local in-memory engine.
    #[default]
    Memory,
    /// Remote Redis engine.
    Redis,
    /// Any tier implemented outside the cachestore engine crates.
    Custom,
}

impl Engine {
    /// Returns the lowercase name of the engine.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Redis => "redis",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
