// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Lua scripts backing the lock primitives.

use std::sync::LazyLock;

use redis::Script;

/// `KEYS[1]` lock key, `ARGV[1]` secret, `ARGV[2]` ttl in milliseconds.
///
/// Returns 1 when the secret now owns the key and 0 otherwise.
pub(crate) const ACQUIRE_SOURCE: &str = r"
local current = redis.call('GET', KEYS[1])
if current == false or current == ARGV[1] then
    redis.call('SET', KEYS[1], ARGV[1], 'PX', ARGV[2])
    return 1
end
return 0
";

/// `KEYS[1]` lock key, `ARGV[1]` expected secret.
///
/// Returns the number of deleted keys.
pub(crate) const RELEASE_SOURCE: &str = r"
if redis.call('GET', KEYS[1]) == ARGV[1] then
    return redis.call('DEL', KEYS[1])
end
return 0
";

static ACQUIRE: LazyLock<Script> = LazyLock::new(|| Script::new(ACQUIRE_SOURCE));
static RELEASE: LazyLock<Script> = LazyLock::new(|| Script::new(RELEASE_SOURCE));

pub(crate) fn acquire() -> &'static Script {
    &ACQUIRE
}

pub(crate) fn release() -> &'static Script {
    &RELEASE
}
