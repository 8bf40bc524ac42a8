use chirp_types::{Principal, Timestamp};

use crate::clock::Clock;

/// Who is calling, and when.
///
/// Built by the host for every update and passed explicitly; the timeline
/// never looks up identity or time on its own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Principal,
    pub time: Timestamp,
}

impl CallContext {
    pub fn new(caller: Principal, time: Timestamp) -> Self {
        Self { caller, time }
    }

    /// Stamp a call from `caller` with the clock's current time.
    pub fn now(caller: Principal, clock: &dyn Clock) -> Self {
        Self {
            caller,
            time: clock.now(),
        }
    }

    pub fn anonymous(time: Timestamp) -> Self {
        Self::new(Principal::anonymous(), time)
    }
}
