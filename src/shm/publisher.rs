use crate::configuration::NtpConfig;
use crate::gpsdo::LeapIndicator;
use crate::shm::Key;
use crate::shm::ShmTime;
use crate::shm::ShmTimeSample;

use anyhow::Context;

use chrono::DateTime;
use chrono::Utc;

use libc::time_t;

use std::convert::TryFrom;
use std::time::Duration;

use thiserror::Error;

use tracing::info;
use tracing::warn;

// ntpd ignores this, gpsd reports its median filter depth
const NSAMPLES: i32 = 3;

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum PublishError {
    #[error("NTP shared memory {0:?} is not attached")]
    Unavailable(Key),
    #[error("time {0} cannot be stored in NTP shared memory")]
    OutOfRange(String),
}

/// Writes GPSDO time to the segment ntpd reads.
///
/// If the segment is removed out from under us the next publish attaches a fresh one.
pub struct TimePublisher {
    shm: Option<ShmTime>,
    key: Key,
    mode: i32,
    precision: i32,
}

fn seconds(sec: i64, what: &str) -> Result<time_t, PublishError> {
    if sec < 0 {
        return Err(PublishError::OutOfRange(format!("{} {}", what, sec)));
    }

    time_t::try_from(sec).map_err(|_| PublishError::OutOfRange(format!("{} {}", what, sec)))
}

impl TimePublisher {
    pub fn attach(config: &NtpConfig) -> anyhow::Result<TimePublisher> {
        let shm = ShmTime::new(config.unit)
            .with_context(|| format!("Unable to attach NTP shared memory unit {}", config.unit))?;

        info!("attached NTP shared memory unit {}", config.unit);

        Ok(TimePublisher::with_segment(shm, config))
    }

    /// Publish to an already attached segment
    pub fn with_segment(shm: ShmTime, config: &NtpConfig) -> TimePublisher {
        TimePublisher {
            key: shm.key(),
            shm: Some(shm),
            mode: config.mode,
            precision: config.precision,
        }
    }

    pub fn key(&self) -> Key {
        self.key
    }

    /// Build the sample for `clock` received at `received` since the Unix epoch
    pub fn sample(
        &self,
        clock: DateTime<Utc>,
        received: Duration,
        leap: LeapIndicator,
    ) -> Result<ShmTimeSample, PublishError> {
        let clock_sec = seconds(clock.timestamp(), "clock")?;
        let clock_nsec = clock.timestamp_subsec_nanos().min(999_999_999);

        let receive_sec = i64::try_from(received.as_secs())
            .map_err(|_| PublishError::OutOfRange(format!("receive {:?}", received)))?;
        let receive_sec = seconds(receive_sec, "receive")?;
        let receive_nsec = received.subsec_nanos();

        Ok(ShmTimeSample {
            mode: self.mode,
            count: 0,
            clock_sec,
            clock_usec: (clock_nsec / 1000) as i32,
            receive_sec,
            receive_usec: (receive_nsec / 1000) as i32,
            leap: leap.as_ntp(),
            precision: self.precision,
            nsamples: NSAMPLES,
            valid: 1,
            clock_nsec,
            receive_nsec,
        })
    }

    /// Write one sample and return the segment's new count
    pub fn publish(
        &mut self,
        clock: DateTime<Utc>,
        received: Duration,
        leap: LeapIndicator,
    ) -> Result<i32, PublishError> {
        let sample = self.sample(clock, received, leap)?;

        let shm = self.segment()?;

        Ok(shm.write(&sample))
    }

    fn segment(&mut self) -> Result<&mut ShmTime, PublishError> {
        if self.shm.as_ref().map_or(false, |shm| shm.is_removed()) {
            warn!("NTP shared memory {:?} was removed", self.key);

            self.shm = None;
        }

        if self.shm.is_none() {
            if let Key::Unit(unit) = self.key {
                match ShmTime::new(unit) {
                    Ok(shm) => {
                        info!("reattached NTP shared memory unit {}", unit);
                        self.shm = Some(shm);
                    }
                    Err(e) => warn!("{:#}", e),
                }
            }
        }

        self.shm.as_mut().ok_or(PublishError::Unavailable(self.key))
    }
}
