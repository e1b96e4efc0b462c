use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::clock::ClockType;
use crate::cache::types::UnixSeconds;

/// Envelope carries a cached value together with an application level expiry timestamp.
/// The expiry lives inside the payload, the backing store entry itself never expires.
/// An expired envelope stays readable, which is what lets the logical-expiration strategy
/// serve stale values while a rebuild runs.
#[derive(Serialize, Deserialize)]
pub(crate) struct Envelope<Value> {
    pub(crate) data: Value,
    pub(crate) expire_at: UnixSeconds,
}

impl<Value> Envelope<Value> {
    pub(crate) fn expiring_after(data: Value, time_to_live: Duration, clock: &ClockType) -> Self {
        Envelope {
            data,
            expire_at: clock.unix_seconds() + time_to_live.as_secs(),
        }
    }

    pub(crate) fn is_fresh(&self, clock: &ClockType) -> bool {
        self.expire_at > clock.unix_seconds()
    }
}
