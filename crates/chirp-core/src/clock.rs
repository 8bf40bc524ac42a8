use std::sync::atomic::{AtomicU64, Ordering};

use chirp_types::Timestamp;

/// Source of timestamps for [`CallContext`](crate::CallContext)s.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time, never going backwards.
///
/// If the system clock steps back, the last returned value is repeated until
/// the wall clock catches up.
#[derive(Debug, Default)]
pub struct SystemClock {
    high_water: AtomicU64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let wall = Timestamp::now().as_nanos();
        let prev = self.high_water.fetch_max(wall, Ordering::AcqRel);
        Timestamp::from_nanos(prev.max(wall))
    }
}

/// Manually driven clock for tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    nanos: AtomicU64,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            nanos: AtomicU64::new(start.as_nanos()),
        }
    }

    pub fn set(&self, at: Timestamp) {
        self.nanos.store(at.as_nanos(), Ordering::Release);
    }

    /// Move forward by `nanos` and return the new time.
    pub fn advance(&self, nanos: u64) -> Timestamp {
        let prev = self.nanos.fetch_add(nanos, Ordering::AcqRel);
        Timestamp::from_nanos(prev.saturating_add(nanos))
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_nanos(self.nanos.load(Ordering::Acquire))
    }
}
