use std::time::Duration;

use crate::cache::clock::{ClockType, SystemClock};
use crate::cache::types::{LockAttempts, TotalRebuildWorkers};

const NULL_ENTRY_TTL: Duration = Duration::from_secs(2 * 60);
const LOCK_LEASE_TTL: Duration = Duration::from_secs(10);
const LOCK_RETRY_DELAY: Duration = Duration::from_millis(50);
const LOCK_RETRY_LIMIT: LockAttempts = 100;
const REBUILD_WORKERS: TotalRebuildWorkers = 10;

/// Config for [`crate::cache::client::CacheClient`].
/// `clock` is injected everywhere time is read, which is what makes expiry testable.
/// `null_entry_ttl` bounds how long an absent record is remembered; it must stay shorter
/// than any downstream retry interval.
/// `lock_lease_ttl` bounds how long a crashed rebuilder can keep a lock.
/// `lock_retry_delay` and `lock_retry_limit` bound the wait of the mutex strategy.
/// `rebuild_workers` sizes the pool executing logical-expiration rebuilds.
pub struct Config {
    pub clock: ClockType,
    pub null_entry_ttl: Duration,
    pub lock_lease_ttl: Duration,
    pub lock_retry_delay: Duration,
    pub lock_retry_limit: LockAttempts,
    pub rebuild_workers: TotalRebuildWorkers,
}

pub struct ConfigBuilder {
    clock: ClockType,
    null_entry_ttl: Duration,
    lock_lease_ttl: Duration,
    lock_retry_delay: Duration,
    lock_retry_limit: LockAttempts,
    rebuild_workers: TotalRebuildWorkers,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    pub fn new() -> Self {
        ConfigBuilder {
            clock: SystemClock::boxed(),
            null_entry_ttl: NULL_ENTRY_TTL,
            lock_lease_ttl: LOCK_LEASE_TTL,
            lock_retry_delay: LOCK_RETRY_DELAY,
            lock_retry_limit: LOCK_RETRY_LIMIT,
            rebuild_workers: REBUILD_WORKERS,
        }
    }

    pub fn clock(mut self, clock: ClockType) -> ConfigBuilder {
        self.clock = clock;
        self
    }

    pub fn null_entry_ttl(mut self, null_entry_ttl: Duration) -> ConfigBuilder {
        self.null_entry_ttl = null_entry_ttl;
        self
    }

    pub fn lock_lease_ttl(mut self, lock_lease_ttl: Duration) -> ConfigBuilder {
        self.lock_lease_ttl = lock_lease_ttl;
        self
    }

    pub fn lock_retry_delay(mut self, lock_retry_delay: Duration) -> ConfigBuilder {
        self.lock_retry_delay = lock_retry_delay;
        self
    }

    pub fn lock_retry_limit(mut self, lock_retry_limit: LockAttempts) -> ConfigBuilder {
        self.lock_retry_limit = lock_retry_limit;
        self
    }

    pub fn rebuild_workers(mut self, rebuild_workers: TotalRebuildWorkers) -> ConfigBuilder {
        self.rebuild_workers = rebuild_workers;
        self
    }

    pub fn build(self) -> Config {
        Config {
            clock: self.clock,
            null_entry_ttl: self.null_entry_ttl,
            lock_lease_ttl: self.lock_lease_ttl,
            lock_retry_delay: self.lock_retry_delay,
            lock_retry_limit: self.lock_retry_limit,
            rebuild_workers: self.rebuild_workers,
        }
    }
}
