use std::time::Instant;

use chrono::{Local, Timelike};
use sysmute_core::{Clock, TimeOfDay, Timestamp};

/// Local wall clock paired with the monotonic clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let local = Local::now();
        Timestamp {
            time_of_day: TimeOfDay::from_minutes(local.num_seconds_from_midnight() / 60),
            instant: Instant::now(),
        }
    }
}
