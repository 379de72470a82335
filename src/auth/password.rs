//! Password hashing with scrypt
//!
//! Stored format is `"{hex(derived_key)}.{hex(salt)}"`: a 64-byte scrypt
//! key and a 16-byte random salt. Verification re-derives with the stored
//! salt and compares in constant time.

use anyhow::{anyhow, Result};
use rand::rngs::OsRng;
use rand::RngCore;
use scrypt::Params;

/// scrypt cost parameter: N = 2^14
const SCRYPT_LOG_N: u8 = 14;
/// scrypt block size
const SCRYPT_R: u32 = 8;
/// scrypt parallelism
const SCRYPT_P: u32 = 1;
/// Derived key length in bytes
const KEY_LEN: usize = 64;
/// Salt length in bytes
const SALT_LEN: usize = 16;

fn params() -> Result<Params> {
    Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, KEY_LEN)
        .map_err(|e| anyhow!("invalid scrypt parameters: {e}"))
}

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> Result<String> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    let mut key = [0u8; KEY_LEN];
    scrypt::scrypt(password.as_bytes(), &salt, &params()?, &mut key)
        .map_err(|e| anyhow!("scrypt failed: {e}"))?;

    Ok(format!("{}.{}", hex::encode(key), hex::encode(salt)))
}

/// Verify a password against a stored `hash.salt` string
///
/// A malformed stored value fails verification rather than erroring:
/// login must not reveal whether the account record is intact.
pub fn verify_password(supplied: &str, stored: &str) -> bool {
    let Some((hash_hex, salt_hex)) = stored.split_once('.') else {
        return false;
    };

    let (Ok(stored_key), Ok(salt)) = (hex::decode(hash_hex), hex::decode(salt_hex)) else {
        return false;
    };

    if stored_key.len() != KEY_LEN {
        return false;
    }

    let Ok(params) = params() else {
        return false;
    };

    let mut derived = [0u8; KEY_LEN];
    if scrypt::scrypt(supplied.as_bytes(), &salt, &params, &mut derived).is_err() {
        return false;
    }

    constant_time_compare(&derived, &stored_key)
}

/// Constant-time byte comparison to prevent timing attacks
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    // XOR all bytes including a length difference indicator
    let mut result = (a.len() ^ b.len()) as u8;

    let min_len = std::cmp::min(a.len(), b.len());
    for i in 0..min_len {
        result |= a[i] ^ b[i];
    }

    result == 0
}
