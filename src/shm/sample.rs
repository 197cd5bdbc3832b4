use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use libc::time_t;

/// One copy of the fields of an NTP shared memory segment
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ShmTimeSample {
    pub mode: i32,
    pub count: i32,
    pub clock_sec: time_t,
    pub clock_usec: i32,
    pub receive_sec: time_t,
    pub receive_usec: i32,
    pub leap: i32,
    pub precision: i32,
    pub nsamples: i32,
    pub valid: i32,
    pub clock_nsec: u32,
    pub receive_nsec: u32,
}

fn utc(sec: time_t, nsec: u32) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(i64::from(sec), nsec)
}

impl ShmTimeSample {
    /// The reference clock time
    pub fn clock_time(&self) -> Option<DateTime<Utc>> {
        utc(self.clock_sec, self.clock_nsec)
    }

    /// The system time the reference time was received
    pub fn receive_time(&self) -> Option<DateTime<Utc>> {
        utc(self.receive_sec, self.receive_nsec)
    }

    /// How far the system clock was behind the reference clock
    pub fn offset(&self) -> Option<Duration> {
        Some(self.clock_time()?.signed_duration_since(self.receive_time()?))
    }
}
