// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Input checks that run before any backend call.

use std::time::Duration;

use cachestore_tier::{Error, ErrorKind};

/// Returns the trimmed key, or `KeyRequired` when nothing is left.
pub(crate) fn key(key: &str) -> Result<&str, Error> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Err(ErrorKind::KeyRequired.into());
    }
    Ok(trimmed)
}

/// Checks that the secret is not blank. The secret itself is used as given.
pub(crate) fn secret(secret: &str) -> Result<(), Error> {
    if secret.trim().is_empty() {
        return Err(ErrorKind::SecretRequired.into());
    }
    Ok(())
}

/// Checks the key first, then the secret.
pub(crate) fn lock<'a>(lock_key: &'a str, lock_secret: &str) -> Result<&'a str, Error> {
    let trimmed = key(lock_key)?;
    secret(lock_secret)?;
    Ok(trimmed)
}

pub(crate) fn ttl(ttl: Duration) -> Result<(), Error> {
    if ttl.is_zero() {
        return Err(ErrorKind::TtlRequired.into());
    }
    Ok(())
}

pub(crate) fn max_wait(max_wait: Duration) -> Result<(), Error> {
    if max_wait.is_zero() {
        return Err(ErrorKind::WaitTimeRequired.into());
    }
    Ok(())
}
