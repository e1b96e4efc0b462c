use std::fmt::Display;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::cache::config::Config;
use crate::cache::envelope::Envelope;
use crate::cache::errors::{CacheError, LoaderError, StoreError};
use crate::cache::lock::{DistributedLock, LockGuard};
use crate::cache::rebuild::pool::RebuildPool;
use crate::cache::stats::{ConcurrentStatsCounter, StatsSummary};
use crate::cache::store::StoreType;
use crate::cache::types::LockAttempts;

const NULL_ENTRY_PAYLOAD: &str = "";

/// Defines the outcome of the caller supplied fallback loader: `Ok(None)` means the
/// source of truth has no record for the id, `Ok(Some(value))` is the loaded record, and
/// an error is surfaced to the caller of the strategy (or logged, for background rebuilds).
pub type LoadResult<Value> = Result<Option<Value>, LoaderError>;

/// CacheClient is a facade over a remote key-value store implementing three cache-aside
/// strategies. Every strategy is keyed by `key_prefix` + the `Display` rendering of `id`,
/// decodes through the `Value` type parameter the caller picks at the call site, and
/// consults the source of truth only through the caller supplied fallback loader.
///
/// - [`CacheClient::query_pass_through`]: no coordination, with a null-entry defense
///   against cache penetration.
/// - [`CacheClient::query_with_mutex`]: at most one loader in flight per key, other
///   callers retry against the cache under a bounded budget.
/// - [`CacheClient::query_with_logical_expiry`]: expired entries are served stale while a
///   single background worker rebuilds them.
pub struct CacheClient {
    config: Config,
    store: StoreType,
    lock: DistributedLock,
    rebuild_pool: RebuildPool,
    stats_counter: Arc<ConcurrentStatsCounter>,
}

impl CacheClient {
    pub fn new(store: StoreType, config: Config) -> Self {
        assert!(config.rebuild_workers > 0);
        assert!(config.lock_retry_limit > 0);

        let stats_counter = Arc::new(ConcurrentStatsCounter::new());
        let lock = DistributedLock::new(store.clone(), config.lock_lease_ttl);
        let rebuild_pool = RebuildPool::new(config.rebuild_workers, stats_counter.clone());

        CacheClient {
            config,
            store,
            lock,
            rebuild_pool,
            stats_counter,
        }
    }

    /// Serializes `value` and writes it under `key_prefix + id` with a store managed TTL.
    pub fn set<Value, Id>(&self, key_prefix: &str, id: &Id, value: &Value, time_to_live: Duration) -> Result<(), CacheError>
        where Value: Serialize,
              Id: Display {
        let payload = serde_json::to_string(value).map_err(CacheError::Encode)?;
        self.store.set(&data_key(key_prefix, id), payload, Some(time_to_live))?;
        Ok(())
    }

    /// Writes `value` wrapped in an envelope whose expiry is application managed.
    /// The store entry itself never expires; [`CacheClient::query_with_logical_expiry`]
    /// serves it stale once the embedded expiry passes and refreshes it in the background.
    /// Entries read by the logical-expiration strategy must be pre-populated this way.
    pub fn set_with_logical_expiry<Value, Id>(&self, key_prefix: &str, id: &Id, value: &Value, time_to_live: Duration) -> Result<(), CacheError>
        where Value: Serialize,
              Id: Display {
        let envelope = Envelope::expiring_after(value, time_to_live, &self.config.clock);
        let payload = serde_json::to_string(&envelope).map_err(CacheError::Encode)?;
        self.store.set(&data_key(key_prefix, id), payload, None)?;
        Ok(())
    }

    /// Plain cache-aside: serve the cached payload, fall back to the loader on a miss and
    /// cache what it returns. A loader that finds no record gets the null entry cached for
    /// a short, fixed TTL, so repeated lookups of an absent id stop hammering the source
    /// of truth. Concurrent misses on the same key may each invoke the loader, the last
    /// write wins in the store.
    pub fn query_pass_through<Value, Id, Loader>(&self, key_prefix: &str, id: &Id, load: Loader, time_to_live: Duration) -> Result<Option<Value>, CacheError>
        where Value: Serialize + DeserializeOwned,
              Id: Display,
              Loader: FnOnce(&Id) -> LoadResult<Value> {
        let key = data_key(key_prefix, id);

        if let Some(payload) = self.store.get(&key)? {
            return self.decode_hit(&key, payload);
        }
        self.stats_counter.found_a_miss();

        self.stats_counter.record_loader_call();
        match load(id).map_err(CacheError::Loader)? {
            Some(value) => {
                let payload = serde_json::to_string(&value).map_err(CacheError::Encode)?;
                self.store.set(&key, payload, Some(time_to_live))?;
                self.stats_counter.add_key();
                Ok(Some(value))
            }
            None => {
                self.cache_null_entry(&key)?;
                Ok(None)
            }
        }
    }

    /// Cache-aside with stampede protection: a true miss races for a lease-based lock in
    /// the backing store and only the winner invokes the loader. Losers sleep for
    /// `lock_retry_delay` and re-read the cache, up to `lock_retry_limit` attempts, after
    /// which [`CacheError::LockRetriesExhausted`] is returned. The winner re-reads the
    /// cache once more after acquiring the lock, so a rebuild that finished in between is
    /// served instead of loading again. The lock is released on every exit path.
    pub fn query_with_mutex<Value, Id, Loader>(&self, key_prefix: &str, id: &Id, load: Loader, time_to_live: Duration) -> Result<Option<Value>, CacheError>
        where Value: Serialize + DeserializeOwned,
              Id: Display,
              Loader: FnOnce(&Id) -> LoadResult<Value> {
        let key = data_key(key_prefix, id);
        let lock_key = DistributedLock::key_for(key_prefix, id);

        let mut attempts: LockAttempts = 0;
        let _guard = loop {
            if let Some(payload) = self.store.get(&key)? {
                return self.decode_hit(&key, payload);
            }
            match self.lock.acquire(&lock_key)? {
                Some(guard) => break guard,
                None => {
                    self.stats_counter.lock_busy();
                    attempts += 1;
                    if attempts >= self.config.lock_retry_limit {
                        return Err(CacheError::LockRetriesExhausted { key: lock_key, attempts });
                    }
                    thread::sleep(self.config.lock_retry_delay);
                }
            }
        };

        // another rebuilder may have filled the entry between the read and the acquisition
        if let Some(payload) = self.store.get(&key)? {
            return self.decode_hit(&key, payload);
        }
        self.stats_counter.found_a_miss();

        self.stats_counter.record_loader_call();
        match load(id).map_err(CacheError::Loader)? {
            Some(value) => {
                let payload = serde_json::to_string(&value).map_err(CacheError::Encode)?;
                self.store.set(&key, payload, Some(time_to_live))?;
                self.stats_counter.add_key();
                Ok(Some(value))
            }
            None => {
                self.cache_null_entry(&key)?;
                Ok(None)
            }
        }
    }

    /// Cache-aside for hot, rarely written keys: entries are pre-populated with
    /// [`CacheClient::set_with_logical_expiry`] and never loaded synchronously. A fresh
    /// envelope is decoded and returned; an expired one is returned as-is (stale) while
    /// the first caller to win the non-blocking lock dispatches a background rebuild.
    /// Callers are never blocked on a rebuild, and a rebuild failure never reaches them:
    /// it is logged, counted, and the lock is released regardless.
    pub fn query_with_logical_expiry<Value, Id, Loader>(&self, key_prefix: &str, id: &Id, load: Loader, time_to_live: Duration) -> Result<Option<Value>, CacheError>
        where Value: Serialize + DeserializeOwned + Send + 'static,
              Id: Display + Clone + Send + 'static,
              Loader: FnOnce(&Id) -> LoadResult<Value> + Send + 'static {
        let key = data_key(key_prefix, id);

        let payload = match self.store.get(&key)? {
            Some(payload) => payload,
            None => {
                self.stats_counter.found_a_miss();
                return Ok(None);
            }
        };
        if payload == NULL_ENTRY_PAYLOAD {
            self.stats_counter.found_a_null_entry();
            return Ok(None);
        }

        let envelope: Envelope<Value> = serde_json::from_str(&payload)
            .map_err(|cause| CacheError::Decode { key: key.clone(), cause })?;
        if envelope.is_fresh(&self.config.clock) {
            self.stats_counter.found_a_hit();
            return Ok(Some(envelope.data));
        }

        self.stats_counter.stale_read();
        let lock_key = DistributedLock::key_for(key_prefix, id);
        if let Some(guard) = self.lock.acquire(&lock_key)? {
            self.dispatch_rebuild(key, id.clone(), load, time_to_live, guard);
        }
        Ok(Some(envelope.data))
    }

    /// Returns the summary of the stats measured so far.
    pub fn stats_summary(&self) -> StatsSummary {
        self.stats_counter.summary()
    }

    /// Shuts the rebuild pool down: pending rebuilds run to completion, rebuilds
    /// dispatched afterwards are dropped as failed. Dropping the client shuts it down too.
    pub fn shutdown(&self) {
        self.rebuild_pool.shutdown();
    }

    fn dispatch_rebuild<Value, Id, Loader>(&self, key: String, id: Id, load: Loader, time_to_live: Duration, guard: LockGuard)
        where Value: Serialize + DeserializeOwned + Send + 'static,
              Id: Display + Send + 'static,
              Loader: FnOnce(&Id) -> LoadResult<Value> + Send + 'static {
        self.stats_counter.rebuild_dispatched();

        let store = self.store.clone();
        let clock = self.config.clock.clone_box();
        let stats_counter = self.stats_counter.clone();
        let null_entry_ttl = self.config.null_entry_ttl;

        self.rebuild_pool.submit(Box::new(move || {
            let _guard = guard;

            // the entry may have been refreshed while this task sat in the queue
            if let Some(payload) = store.get(&key)? {
                if payload != NULL_ENTRY_PAYLOAD {
                    if let Ok(envelope) = serde_json::from_str::<Envelope<Value>>(&payload) {
                        if envelope.is_fresh(&clock) {
                            return Ok(());
                        }
                    }
                }
            }

            stats_counter.record_loader_call();
            match load(&id).map_err(CacheError::Loader)? {
                Some(value) => {
                    let envelope = Envelope::expiring_after(value, time_to_live, &clock);
                    let payload = serde_json::to_string(&envelope).map_err(CacheError::Encode)?;
                    store.set(&key, payload, None)?;
                    stats_counter.add_key();
                }
                None => {
                    stats_counter.add_null_entry();
                    store.set(&key, NULL_ENTRY_PAYLOAD.to_string(), Some(null_entry_ttl))?;
                }
            }
            Ok(())
        }));
    }

    fn decode_hit<Value>(&self, key: &str, payload: String) -> Result<Option<Value>, CacheError>
        where Value: DeserializeOwned {
        if payload == NULL_ENTRY_PAYLOAD {
            self.stats_counter.found_a_null_entry();
            return Ok(None);
        }
        self.stats_counter.found_a_hit();
        let value = serde_json::from_str(&payload)
            .map_err(|cause| CacheError::Decode { key: key.to_string(), cause })?;
        Ok(Some(value))
    }

    fn cache_null_entry(&self, key: &str) -> Result<(), StoreError> {
        self.stats_counter.add_null_entry();
        self.store.set(key, NULL_ENTRY_PAYLOAD.to_string(), Some(self.config.null_entry_ttl))
    }
}

fn data_key(key_prefix: &str, id: &impl Display) -> String {
    format!("{}{}", key_prefix, id)
}
