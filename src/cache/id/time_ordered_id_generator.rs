use std::time::UNIX_EPOCH;

use chrono::{DateTime, Utc};

use crate::cache::clock::ClockType;
use crate::cache::errors::StoreError;
use crate::cache::store::StoreType;
use crate::cache::types::{SequencedId, UnixSeconds};

/// Seconds since the unix epoch at 2022-01-01T00:00:00Z, the agreed epoch ids count from
pub const ID_EPOCH_SECONDS: UnixSeconds = 1_640_995_200;

pub(crate) const SEQUENCE_KEY_PREFIX: &str = "icr:";
const SEQUENCE_BITS: u8 = 32;
const SEQUENCE_DAY_FORMAT: &str = "%Y:%m:%d";

/// TimeOrderedIdGenerator produces compact, time-ordered 64 bit identifiers without a
/// central sequence authority. An id packs the seconds elapsed since [`ID_EPOCH_SECONDS`]
/// into the high bits and a per-prefix, per-calendar-day sequence into the low
/// 32 bits. The sequence comes from the backing store's atomic increment, so processes
/// sharing the store never collide; the calendar day inside the counter key rolls the
/// sequence back to 1 at midnight while the timestamp component keeps ids increasing.
pub struct TimeOrderedIdGenerator {
    store: StoreType,
    clock: ClockType,
}

impl TimeOrderedIdGenerator {
    pub fn new(store: StoreType, clock: ClockType) -> Self {
        TimeOrderedIdGenerator {
            store,
            clock,
        }
    }

    pub fn next_id(&self, key_prefix: &str) -> Result<SequencedId, StoreError> {
        let now = self.clock.now();
        let now_seconds = now
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_secs())
            .unwrap_or(0);
        let timestamp = now_seconds.saturating_sub(ID_EPOCH_SECONDS);

        let day = DateTime::<Utc>::from(now).format(SEQUENCE_DAY_FORMAT);
        let sequence = self.store.increment(&format!("{}{}:{}", SEQUENCE_KEY_PREFIX, key_prefix, day))?;

        Ok(((timestamp as SequencedId) << SEQUENCE_BITS) | sequence)
    }
}

#[cfg(test)]
mod tests {
    use crate::cache::id::time_ordered_id_generator::TimeOrderedIdGenerator;
    use crate::cache::id::time_ordered_id_generator::tests::setup::FixedClock;
    use crate::cache::store::CacheStore;
    use crate::cache::store::memory::MemoryStore;

    mod setup {
        use std::ops::Add;
        use std::time::{Duration, SystemTime, UNIX_EPOCH};

        use crate::cache::clock::Clock;
        use crate::cache::types::UnixSeconds;

        #[derive(Clone)]
        pub(crate) struct FixedClock(pub(crate) UnixSeconds);

        impl Clock for FixedClock {
            fn now(&self) -> SystemTime {
                UNIX_EPOCH.add(Duration::from_secs(self.0))
            }
        }
    }

    #[test]
    fn first_id_of_the_day() {
        // 1_704_067_200 = 2024-01-01T00:00:00Z, 63_072_000 seconds past the id epoch
        let id_generator = TimeOrderedIdGenerator::new(MemoryStore::new(), Box::new(FixedClock(1_704_067_200)));

        let id = id_generator.next_id("order").unwrap();
        assert_eq!((63_072_000_i64 << 32) | 1, id);
    }

    #[test]
    fn ids_within_a_second_are_strictly_increasing() {
        let id_generator = TimeOrderedIdGenerator::new(MemoryStore::new(), Box::new(FixedClock(1_704_067_200)));

        let first = id_generator.next_id("order").unwrap();
        let second = id_generator.next_id("order").unwrap();
        let third = id_generator.next_id("order").unwrap();

        assert!(second > first);
        assert!(third > second);
    }

    #[test]
    fn sequences_are_scoped_by_prefix() {
        let store = MemoryStore::new();
        let id_generator = TimeOrderedIdGenerator::new(store.clone(), Box::new(FixedClock(1_704_067_200)));

        id_generator.next_id("order").unwrap();
        id_generator.next_id("order").unwrap();

        assert_eq!(Some("2".to_string()), store.get("icr:order:2024:01:01").unwrap());
        assert_eq!(None, store.get("icr:voucher:2024:01:01").unwrap());
    }

    #[test]
    fn ids_keep_increasing_across_a_day_boundary() {
        let store = MemoryStore::new();

        let yesterday = TimeOrderedIdGenerator::new(store.clone(), Box::new(FixedClock(1_704_067_199)));
        let last_of_the_day = yesterday.next_id("order").unwrap();

        let today = TimeOrderedIdGenerator::new(store.clone(), Box::new(FixedClock(1_704_067_200)));
        let first_of_the_day = today.next_id("order").unwrap();

        // the sequence restarted at 1, the timestamp component dominates the ordering
        assert!(first_of_the_day > last_of_the_day);
        assert_eq!(Some("1".to_string()), store.get("icr:order:2024:01:01").unwrap());
        assert_eq!(Some("1".to_string()), store.get("icr:order:2023:12:31").unwrap());
    }
}
