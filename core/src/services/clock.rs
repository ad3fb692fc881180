//! Injectable time source.
//!
//! All expiry and cooldown arithmetic goes through this trait so that the
//! lifecycle never mixes time sources and tests can move time forward
//! deterministically. Every timestamp in the system is UTC.

use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;

/// Supplies the current instant
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually controlled clock for tests
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    /// Create a clock pinned to the given instant
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Create a clock pinned to the current system time
    pub fn at_now() -> Self {
        Self::new(Utc::now())
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now = *now + by;
    }

    /// Pin the clock to a specific instant
    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap() = to;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
