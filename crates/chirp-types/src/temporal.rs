use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Point in time as nanoseconds since the UNIX epoch.
///
/// Creation and edit times of tweets and comments are `Timestamp`s supplied
/// by the caller's context, never read from a global clock by the records
/// themselves.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    pub const fn from_millis(millis: u64) -> Self {
        Self(millis.saturating_mul(1_000_000))
    }

    /// The epoch itself.
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Current wall-clock time. Not monotonic; hosts that need monotonic
    /// stamps wrap this in a clock.
    pub fn now() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        Self(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    pub const fn as_nanos(&self) -> u64 {
        self.0
    }

    pub fn is_after(&self, other: &Self) -> bool {
        self > other
    }

    /// Saturating addition of a nanosecond offset.
    pub fn add_nanos(&self, nanos: u64) -> Self {
        Self(self.0.saturating_add(nanos))
    }

    /// RFC 3339 rendering in UTC, e.g. `2024-01-01T00:00:00.000000001Z`.
    pub fn to_rfc3339(&self) -> String {
        let secs = (self.0 / NANOS_PER_SEC) as i64;
        let nanos = (self.0 % NANOS_PER_SEC) as u32;
        match chrono::DateTime::from_timestamp(secs, nanos) {
            Some(dt) => dt.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true),
            None => self.0.to_string(),
        }
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({}ns)", self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}
