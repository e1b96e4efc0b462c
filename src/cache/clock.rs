use std::time::{SystemTime, UNIX_EPOCH};

use crate::cache::types::UnixSeconds;

pub type ClockType = Box<dyn Clock + Send + Sync>;

#[derive(Clone)]
pub struct SystemClock {}

pub trait BoxedClockClone {
    fn clone_box(&self) -> ClockType;
}

pub trait Clock: Send + Sync + BoxedClockClone {
    fn now(&self) -> SystemTime;

    fn has_passed(&self, time: &SystemTime) -> bool {
        self.now().gt(time)
    }

    fn unix_seconds(&self) -> UnixSeconds {
        self.now()
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_secs())
            .unwrap_or(0)
    }
}

impl<T> BoxedClockClone for T
    where
        T: 'static + Clock + Clone {
    fn clone_box(&self) -> ClockType {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn Clock> {
    fn clone(&self) -> Box<dyn Clock> {
        self.clone_box()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

impl SystemClock {
    pub fn new() -> SystemClock {
        SystemClock {}
    }

    pub fn boxed() -> ClockType {
        Box::new(SystemClock::new())
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        SystemClock::new()
    }
}

#[cfg(test)]
mod tests {
    use std::ops::Add;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use crate::cache::clock::{Clock, SystemClock};
    use crate::cache::clock::tests::setup::UnixEpochClock;

    mod setup {
        use std::time::SystemTime;

        use crate::cache::clock::Clock;

        #[derive(Clone)]
        pub(crate) struct UnixEpochClock;

        impl Clock for UnixEpochClock {
            fn now(&self) -> SystemTime {
                SystemTime::UNIX_EPOCH
            }
        }
    }

    #[test]
    fn time_has_passed() {
        let clock = SystemClock::new();
        let past = SystemTime::now() - Duration::from_secs(100);

        assert!(clock.has_passed(&past));
    }

    #[test]
    fn time_has_not_passed() {
        let clock = SystemClock::new();
        let future = SystemTime::now().add(Duration::from_secs(100));

        assert!(!clock.has_passed(&future));
    }

    #[test]
    fn unix_seconds_at_the_epoch() {
        let clock = UnixEpochClock {};
        assert_eq!(0, clock.unix_seconds());
    }

    #[test]
    fn unix_seconds_after_the_epoch() {
        #[derive(Clone)]
        struct FixedClock;
        impl Clock for FixedClock {
            fn now(&self) -> SystemTime {
                UNIX_EPOCH.add(Duration::from_secs(1_640_995_200))
            }
        }

        let clock = FixedClock {};
        assert_eq!(1_640_995_200, clock.unix_seconds());
    }
}
