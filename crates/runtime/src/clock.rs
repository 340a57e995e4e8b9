//! Wall-clock sources.
//!
//! The core never reads time; the orchestrator stamps each round with
//! [`Clock::now`]. Tests drive a [`ManualClock`] instead.

use std::sync::atomic::{AtomicI64, Ordering};

use combat_core::Timestamp;

pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// UTC time from the operating system.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(chrono::Utc::now().timestamp_millis())
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            millis: AtomicI64::new(start.as_millis()),
        }
    }

    pub fn advance(&self, millis: u64) {
        self.millis.fetch_add(millis as i64, Ordering::SeqCst);
    }

    pub fn set(&self, now: Timestamp) {
        self.millis.store(now.as_millis(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(self.millis.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new(Timestamp(1_000));
        clock.advance(250);
        assert_eq!(clock.now(), Timestamp(1_250));
        clock.set(Timestamp(5));
        assert_eq!(clock.now(), Timestamp(5));
    }

    #[test]
    fn system_clock_is_past_2020() {
        assert!(SystemClock.now().as_millis() > 1_577_836_800_000);
    }
}
