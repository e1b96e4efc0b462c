use std::sync::Arc;
use std::time::Duration;

use crate::cache::errors::StoreError;
use crate::cache::types::SequenceCount;

pub mod memory;
pub(crate) mod stored_value;

pub type StoreType = Arc<dyn CacheStore>;

/// CacheStore defines the primitives the facade needs from the backing key-value store:
/// plain reads and writes with an optional time to live, an atomic set-if-absent used as
/// a lock, unconditional and conditional deletes, and an atomic increment used for the
/// daily sequence counters.
/// Implementations must not retry or back off, a failure propagates unchanged to the
/// strategy that invoked the store.
pub trait CacheStore: Send + Sync {
    /// Returns the payload under `key`, `None` if the key is absent or its TTL has lapsed
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes `payload` under `key`. `None` for `time_to_live` keeps the entry until it is
    /// overwritten or deleted
    fn set(&self, key: &str, payload: String, time_to_live: Option<Duration>) -> Result<(), StoreError>;

    /// Atomically writes `payload` under `key` only if the key is absent.
    /// Returns true if the write happened
    fn set_if_absent(&self, key: &str, payload: String, time_to_live: Duration) -> Result<bool, StoreError>;

    /// Removes the entry under `key`, absent keys are not an error
    fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Atomically removes the entry under `key` only if its payload equals `expected`.
    /// Returns true if the entry was removed
    fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool, StoreError>;

    /// Atomically increments the integer under `key`, creating it at 1 if absent
    fn increment(&self, key: &str) -> Result<SequenceCount, StoreError>;
}
