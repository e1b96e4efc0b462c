use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_utils::CachePadded;

const TOTAL_STATS: usize = 10;

/// Defines various stats that are measured in the cache facade.
#[repr(usize)]
#[non_exhaustive]
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum StatsType {
    /// Defines the number of reads served from a cached, non-empty payload
    CacheHits = 0,
    /// Defines the number of reads that found no cache entry at all
    CacheMisses = 1,
    /// Defines the number of reads that hit the cached empty payload for an absent record
    NullEntryHits = 2,
    /// Defines the number of values written into the cache after a load
    KeysAdded = 3,
    /// Defines the number of empty payloads written for records the loader did not find
    NullEntriesAdded = 4,
    /// Defines the number of fallback loader invocations
    LoaderCalls = 5,
    /// Defines the number of lock acquisition attempts that found the lock held
    LocksBusy = 6,
    /// Defines the number of reads that returned an expired payload
    StaleReads = 7,
    /// Defines the number of rebuild tasks handed to the rebuild pool
    RebuildsDispatched = 8,
    /// Defines the number of rebuild tasks that failed or panicked
    RebuildsFailed = 9,
}

impl StatsType {
    const VALUES: [Self; TOTAL_STATS] = [
        Self::CacheHits,
        Self::CacheMisses,
        Self::NullEntryHits,
        Self::KeysAdded,
        Self::NullEntriesAdded,
        Self::LoaderCalls,
        Self::LocksBusy,
        Self::StaleReads,
        Self::RebuildsDispatched,
        Self::RebuildsFailed,
    ];
}

/// StatsSummary is a view representation of the stats represented by [`StatsType`].
#[derive(Debug, PartialEq)]
pub struct StatsSummary {
    pub stats_by_type: HashMap<StatsType, u64>,
    pub hit_ratio: f64,
}

impl StatsSummary {
    pub(crate) fn new(stats_by_type: HashMap<StatsType, u64>, hit_ratio: f64) -> Self {
        StatsSummary {
            stats_by_type,
            hit_ratio,
        }
    }

    /// Returns an Option&lt;u64&gt; counter corresponding to the [`StatsType`].
    pub fn get(&self, stats_type: &StatsType) -> Option<u64> {
        self.stats_by_type.get(stats_type).copied()
    }
}

#[repr(transparent)]
#[derive(Debug)]
struct Counter(CachePadded<AtomicU64>);

/// ConcurrentStatsCounter measures the stats defined by [`StatsType`].
/// It is represented as an array of entries where each entry is an instance of type [`Counter`],
/// a [`crossbeam_utils::CachePadded`] AtomicU64 to avoid false sharing.
/// Rebuild failures are counted here, which together with the log is the observability
/// channel for errors that never reach the original caller.
pub(crate) struct ConcurrentStatsCounter {
    entries: [Counter; TOTAL_STATS],
}

impl ConcurrentStatsCounter {
    pub(crate) fn new() -> Self {
        ConcurrentStatsCounter {
            entries: (0..TOTAL_STATS)
                .map(|_index| Counter(CachePadded::new(AtomicU64::new(0))))
                .collect::<Vec<Counter>>()
                .try_into().unwrap()
        }
    }

    pub(crate) fn found_a_hit(&self) { self.add(StatsType::CacheHits, 1); }

    pub(crate) fn found_a_miss(&self) { self.add(StatsType::CacheMisses, 1); }

    pub(crate) fn found_a_null_entry(&self) { self.add(StatsType::NullEntryHits, 1); }

    pub(crate) fn add_key(&self) { self.add(StatsType::KeysAdded, 1); }

    pub(crate) fn add_null_entry(&self) { self.add(StatsType::NullEntriesAdded, 1); }

    pub(crate) fn record_loader_call(&self) { self.add(StatsType::LoaderCalls, 1); }

    pub(crate) fn lock_busy(&self) { self.add(StatsType::LocksBusy, 1); }

    pub(crate) fn stale_read(&self) { self.add(StatsType::StaleReads, 1); }

    pub(crate) fn rebuild_dispatched(&self) { self.add(StatsType::RebuildsDispatched, 1); }

    pub(crate) fn rebuild_failed(&self) { self.add(StatsType::RebuildsFailed, 1); }

    pub(crate) fn hits(&self) -> u64 { self.get(&StatsType::CacheHits) }

    pub(crate) fn misses(&self) -> u64 { self.get(&StatsType::CacheMisses) }

    pub(crate) fn loader_calls(&self) -> u64 { self.get(&StatsType::LoaderCalls) }

    pub(crate) fn rebuilds_failed(&self) -> u64 { self.get(&StatsType::RebuildsFailed) }

    pub(crate) fn hit_ratio(&self) -> f64 {
        let hits = self.hits();
        let misses = self.misses();
        if hits == 0 && misses == 0 {
            return 0.0;
        }
        (hits as f64) / (hits + misses) as f64
    }

    pub(crate) fn summary(&self) -> StatsSummary {
        let stats_by_type = StatsType::VALUES
            .iter()
            .map(|stats_type| (*stats_type, self.get(stats_type)))
            .collect::<HashMap<_, _>>();

        StatsSummary::new(stats_by_type, self.hit_ratio())
    }

    fn add(&self, stats_type: StatsType, delta: u64) {
        self.entries[stats_type as usize].0.fetch_add(delta, Ordering::AcqRel);
    }

    fn get(&self, stats_type: &StatsType) -> u64 {
        self.entries[*stats_type as usize].0.load(Ordering::Acquire)
    }
}
