use std::fmt::Display;
use std::time::Duration;

use rand::{Rng, thread_rng};
use rand::distributions::Alphanumeric;

use crate::cache::errors::StoreError;
use crate::cache::store::StoreType;

pub(crate) const LOCK_KEY_PREFIX: &str = "lock:";
const HOLDER_TOKEN_LENGTH: usize = 16;

/// DistributedLock coordinates rebuilders across processes through the backing store.
/// A lock is a key whose existence means held: `set_if_absent` with a lease TTL acquires
/// it, and the TTL frees the lock on its own if the holder crashes before releasing.
/// Each acquisition stores a random holder token; release deletes the key only if the
/// token still matches, so a holder whose lease lapsed cannot free a lock that has since
/// been acquired by somebody else.
pub struct DistributedLock {
    store: StoreType,
    lease_ttl: Duration,
}

impl DistributedLock {
    pub fn new(store: StoreType, lease_ttl: Duration) -> Self {
        DistributedLock {
            store,
            lease_ttl,
        }
    }

    /// Attempts a non-blocking acquisition of the lock under `key`.
    /// Returns `Some(guard)` on success; dropping the guard releases the lock.
    pub fn acquire(&self, key: &str) -> Result<Option<LockGuard>, StoreError> {
        let token = holder_token();
        if self.store.set_if_absent(key, token.clone(), self.lease_ttl)? {
            return Ok(Some(LockGuard {
                store: self.store.clone(),
                key: key.to_string(),
                token,
            }));
        }
        Ok(None)
    }

    pub(crate) fn key_for(key_prefix: &str, id: &impl Display) -> String {
        format!("{}{}{}", LOCK_KEY_PREFIX, key_prefix, id)
    }
}

/// LockGuard releases the lock when dropped, which makes release run on every exit path
/// of the scope that acquired it, loader failures included.
/// A release that does not find its own token only logs: the lease had already lapsed and
/// the lock may belong to another holder by now.
pub struct LockGuard {
    store: StoreType,
    key: String,
    token: String,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        match self.store.delete_if_equals(&self.key, &self.token) {
            Ok(true) => {}
            Ok(false) => log::warn!("lock '{}' was not released, its lease lapsed before the holder finished", self.key),
            Err(cause) => log::error!("failed to release lock '{}': {}", self.key, cause),
        }
    }
}

fn holder_token() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(HOLDER_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}
