use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::cache::clock::{ClockType, SystemClock};
use crate::cache::errors::StoreError;
use crate::cache::store::CacheStore;
use crate::cache::store::stored_value::StoredValue;
use crate::cache::types::SequenceCount;

/// MemoryStore is a process-local implementation of [`CacheStore`] backed by [`dashmap::DashMap`].
/// It keeps the facade runnable without a remote store, in tests and in single node deployments.
/// Entries past their TTL are dropped lazily when they are read, there is no background eviction.
/// The shard lock taken by DashMap's entry API makes `set_if_absent`, `delete_if_equals` and
/// `increment` atomic with respect to each other.
pub struct MemoryStore {
    entries: DashMap<String, StoredValue>,
    clock: ClockType,
}

impl MemoryStore {
    pub fn new() -> Arc<MemoryStore> {
        Self::with_clock(SystemClock::boxed())
    }

    pub fn with_clock(clock: ClockType) -> Arc<MemoryStore> {
        Arc::new(MemoryStore {
            entries: DashMap::new(),
            clock,
        })
    }
}

impl CacheStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let maybe_value = self.entries.get(key);
        Ok(maybe_value
            .filter(|stored_value| stored_value.is_alive(&self.clock))
            .map(|key_value_ref| key_value_ref.value().payload()))
    }

    fn set(&self, key: &str, payload: String, time_to_live: Option<Duration>) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), StoredValue::maybe_expiring(payload, time_to_live, &self.clock));
        Ok(())
    }

    fn set_if_absent(&self, key: &str, payload: String, time_to_live: Duration) -> Result<bool, StoreError> {
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_alive(&self.clock) {
                    return Ok(false);
                }
                occupied.insert(StoredValue::expiring(payload, time_to_live, &self.clock));
                Ok(true)
            }
            Entry::Vacant(vacant) => {
                vacant.insert(StoredValue::expiring(payload, time_to_live, &self.clock));
                Ok(true)
            }
        }
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }

    fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool, StoreError> {
        let removed = self.entries.remove_if(key, |_, stored_value| {
            stored_value.is_alive(&self.clock) && stored_value.payload_ref() == expected
        });
        Ok(removed.is_some())
    }

    fn increment(&self, key: &str) -> Result<SequenceCount, StoreError> {
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) if occupied.get().is_alive(&self.clock) => {
                let current: SequenceCount = occupied
                    .get()
                    .payload_ref()
                    .parse()
                    .map_err(|_| StoreError::NonNumericCounter { key: key.to_string() })?;
                let next = current + 1;
                occupied.insert(StoredValue::never_expiring(next.to_string()));
                Ok(next)
            }
            Entry::Occupied(mut occupied) => {
                occupied.insert(StoredValue::never_expiring(1.to_string()));
                Ok(1)
            }
            Entry::Vacant(vacant) => {
                vacant.insert(StoredValue::never_expiring(1.to_string()));
                Ok(1)
            }
        }
    }
}
