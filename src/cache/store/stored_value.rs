use std::ops::Add;
use std::time::{Duration, SystemTime};

use crate::cache::clock::ClockType;

pub(crate) struct StoredValue {
    payload: String,
    expire_after: Option<SystemTime>,
}

impl StoredValue {
    pub(crate) fn never_expiring(payload: String) -> Self {
        StoredValue {
            payload,
            expire_after: None,
        }
    }

    pub(crate) fn expiring(payload: String, time_to_live: Duration, clock: &ClockType) -> Self {
        StoredValue {
            payload,
            expire_after: Some(clock.now().add(time_to_live)),
        }
    }

    pub(crate) fn maybe_expiring(payload: String, time_to_live: Option<Duration>, clock: &ClockType) -> Self {
        match time_to_live {
            Some(time_to_live) => Self::expiring(payload, time_to_live, clock),
            None => Self::never_expiring(payload),
        }
    }

    pub(crate) fn is_alive(&self, clock: &ClockType) -> bool {
        if let Some(expire_after) = self.expire_after {
            return !clock.has_passed(&expire_after);
        }
        true
    }

    pub(crate) fn payload(&self) -> String {
        self.payload.clone()
    }

    pub(crate) fn payload_ref(&self) -> &str {
        &self.payload
    }
}
