// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Lock secret generation.

use cachestore_tier::{Error, ErrorKind};

/// Returns `bytes` random bytes from the operating system, hex encoded.
///
/// The result is lowercase and exactly `2 * bytes` characters long. Zero
/// bytes yields an empty string.
///
/// # Errors
///
/// Returns [`ErrorKind::SecretGeneration`] when the entropy source is
/// unavailable or the buffers for `bytes` cannot be allocated.
///
/// # Examples
///
/// ```
/// let secret = cachestore::random_hex(16)?;
/// assert_eq!(secret.len(), 32);
/// assert!(secret.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
/// # Ok::<(), cachestore::Error>(())
/// ```
pub fn random_hex(bytes: usize) -> Result<String, Error> {
    let encoded_len = bytes
        .checked_mul(2)
        .ok_or_else(|| Error::from(ErrorKind::SecretGeneration))?;

    let mut encoded = zeroed(encoded_len)?;
    let mut raw = zeroed(bytes)?;

    getrandom::getrandom(&mut raw).map_err(|e| Error::with_cause(ErrorKind::SecretGeneration, e))?;
    hex::encode_to_slice(&raw, &mut encoded).map_err(|e| Error::with_cause(ErrorKind::SecretGeneration, e))?;

    String::from_utf8(encoded).map_err(|e| Error::with_cause(ErrorKind::SecretGeneration, e))
}

fn zeroed(len: usize) -> Result<Vec<u8>, Error> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|e| Error::with_cause(ErrorKind::SecretGeneration, e))?;
    buffer.resize(len, 0);
    Ok(buffer)
}
