//! Deterministic clocks for service unit tests.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;

/// Fixed instant used across service tests.
pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

/// Clock that advances one second every time it is read, so records created
/// in sequence have distinct, ordered timestamps.
pub(crate) struct SteppingClock {
    next: Mutex<DateTime<Utc>>,
}

impl SteppingClock {
    pub(crate) fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            next: Mutex::new(start),
        }
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let mut next = self.next.lock().expect("clock lock");
        let now = *next;
        *next = now + Duration::seconds(1);
        now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(SteppingClock::starting_at(fixture_timestamp()))
}
