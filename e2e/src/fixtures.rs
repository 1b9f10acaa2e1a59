//! Shared accounts and random data for the suites.

use rand::{distributions::Alphanumeric, Rng};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use huobi_common::crypto::{CryptoError, KeyPair};

pub use huobi_common::config::NATIVE_ASSET_ID;

/// Genesis admin of every service on the test chain
pub const ADMIN_PRIVATE_KEY: &str = "0x2b672bb959fa7a852d7259b129b65aee9c83b39f427d6f7bded1f58c4c9310c2";

/// Upper bound used when a suite needs "any" amount
pub const DEFAULT_RANDOM_INT_MAX: u64 = 0xf_ffff_ffff;

pub fn admin_account() -> Result<KeyPair, CryptoError> {
    KeyPair::from_private_key_hex(ADMIN_PRIVATE_KEY)
}

/// Orders tests of one binary around a service's admin role.
///
/// Tests signing as the genesis admin hold a `shared` guard. A test that
/// hands the role to another account holds the `exclusive` guard until the
/// role is back, so no admin write runs while it is away.
pub struct AdminLock(RwLock<()>);

impl AdminLock {
    pub const fn new() -> Self {
        Self(RwLock::const_new(()))
    }

    pub async fn shared(&self) -> RwLockReadGuard<'_, ()> {
        self.0.read().await
    }

    pub async fn exclusive(&self) -> RwLockWriteGuard<'_, ()> {
        self.0.write().await
    }
}

impl Default for AdminLock {
    fn default() -> Self {
        Self::new()
    }
}

/// `prefix` followed by random alphanumerics, `len` characters in total.
/// A prefix longer than `len` is returned as is.
pub fn gen_random_string(prefix: &str, len: usize) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len.saturating_sub(prefix.len()))
        .map(char::from)
        .collect();
    format!("{}{}", prefix, suffix)
}

pub fn gen_random_strings(count: usize, prefix: &str, len: usize) -> Vec<String> {
    (0..count).map(|_| gen_random_string(prefix, len)).collect()
}

pub fn gen_random_account() -> KeyPair {
    KeyPair::random(&mut rand::thread_rng())
}

/// Uniform in `[min, max)`, `min` when the range is empty
pub fn gen_random_int(min: u64, max: u64) -> u64 {
    if min >= max {
        return min;
    }
    rand::thread_rng().gen_range(min..max)
}
