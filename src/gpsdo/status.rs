use crate::gpsdo::Alarms;
use crate::nmea::GgaData;
use crate::nmea::GsvData;
use crate::nmea::ModeIndicator;
use crate::nmea::RmcData;
use crate::nmea::RmcStatus;
use crate::nmea::Sentence;
use crate::nmea::VendorData;
use crate::nmea::ZdaData;

use chrono::naive::NaiveDate;
use chrono::naive::NaiveTime;
use chrono::DateTime;
use chrono::TimeZone;
use chrono::Timelike;
use chrono::Utc;

use serde::Deserialize;
use serde::Serialize;

use std::collections::BTreeMap;

use tracing::info;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FixQuality {
    NoFix,
    Gps,
    Differential,
    Estimated,
}

impl Default for FixQuality {
    fn default() -> Self {
        FixQuality::NoFix
    }
}

/// Leap second warning, numbered as in the NTP leap indicator
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeapIndicator {
    NoWarning = 0,
    Insert = 1,
    Delete = 2,
    Unknown = 3,
}

impl LeapIndicator {
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(LeapIndicator::NoWarning),
            1 => Some(LeapIndicator::Insert),
            2 => Some(LeapIndicator::Delete),
            3 => Some(LeapIndicator::Unknown),
            _ => None,
        }
    }

    pub fn as_ntp(&self) -> i32 {
        *self as i32
    }
}

impl Default for LeapIndicator {
    fn default() -> Self {
        LeapIndicator::NoWarning
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SatelliteInView {
    pub prn: u32,
    pub elevation: Option<i32>,
    pub azimuth: Option<u32>,
    pub snr: Option<u32>,
    pub last_seen: Option<DateTime<Utc>>,
}

/// Everything known about the GPSDO.
///
/// Each sentence updates only the fields it carries.  `sequence` increases by one for every
/// applied sentence so readers can tell snapshots apart.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GpsdoStatus {
    pub time: Option<DateTime<Utc>>,
    pub fix_quality: FixQuality,
    pub satellites: Option<u32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<f64>,
    pub locked: Option<bool>,
    pub alarms: Alarms,
    pub holdover_seconds: Option<u64>,
    pub leap: LeapIndicator,
    pub satellites_in_view: BTreeMap<u32, SatelliteInView>,
    pub vendor: BTreeMap<String, String>,
    pub sequence: u64,

    #[serde(skip)]
    pub(crate) date: Option<NaiveDate>,
    #[serde(skip)]
    pub(crate) time_of_day: Option<NaiveTime>,
}

impl GpsdoStatus {
    /// The status after `sentence`, or `None` if the sentence carries nothing to apply
    pub fn apply(&self, sentence: &Sentence) -> Option<GpsdoStatus> {
        let mut next = self.clone();

        match sentence {
            Sentence::Zda(zda) => next.zda(zda),
            Sentence::Gga(gga) => next.gga(gga),
            Sentence::Rmc(rmc) => next.rmc(rmc),
            Sentence::Gsv(gsv) => next.gsv(gsv),
            Sentence::Vendor(vendor) => next.vendor(vendor),
            Sentence::Unrecognized => return None,
        }

        next.sequence += 1;

        Some(next)
    }

    /// The status after the device went quiet.
    ///
    /// Lock is unknown until the next vendor status sentence.
    pub fn no_signal(&self) -> GpsdoStatus {
        let mut next = self.clone();

        next.fix_quality = FixQuality::NoFix;
        next.locked = None;
        next.sequence += 1;

        next
    }

    /// The timestamp, if a fix or a disciplined oscillator backs it
    pub fn publishable_time(&self) -> Option<DateTime<Utc>> {
        match self.fix_quality {
            FixQuality::NoFix if !self.is_disciplined() => None,
            _ => self.time,
        }
    }

    /// True when the vendor status reports lock without an oscillator or 1PPS alarm
    pub fn is_disciplined(&self) -> bool {
        self.locked == Some(true) && !self.alarms.intersects(Alarms::OSCILLATOR | Alarms::PPS)
    }

    /// True when the fix, lock, or alarms differ from `previous`
    pub fn is_significant_change(&self, previous: &GpsdoStatus) -> bool {
        self.fix_quality != previous.fix_quality
            || self.locked != previous.locked
            || self.alarms != previous.alarms
    }

    pub fn log_transitions(&self, previous: &GpsdoStatus) {
        if self.fix_quality != previous.fix_quality {
            info!(
                "fix quality {:?} -> {:?}",
                previous.fix_quality, self.fix_quality
            );
        }

        if self.locked != previous.locked {
            match self.locked {
                Some(true) => info!("oscillator locked"),
                Some(false) => info!("oscillator unlocked"),
                None => info!("oscillator lock unknown"),
            }
        }

        let raised = self.alarms - previous.alarms;
        let cleared = previous.alarms - self.alarms;

        if !raised.is_empty() {
            info!("alarms raised: {}", raised.names().join(", "));
        }

        if !cleared.is_empty() {
            info!("alarms cleared: {}", cleared.names().join(", "));
        }
    }

    fn set_date_time(&mut self, date: Option<NaiveDate>, time: Option<NaiveTime>) {
        if date.is_some() {
            self.date = date;
        }

        if let Some(time) = time {
            self.time_of_day = Some(time);

            if let Some(date) = self.date {
                self.time = Some(Utc.from_utc_datetime(&date.and_time(time)));
            }
        }
    }

    // GGA has no date so a time of day after midnight moves to the next day
    fn advance_time_of_day(&mut self, time: NaiveTime) {
        if let (Some(date), Some(previous)) = (self.date, self.time_of_day) {
            if previous.hour() == 23 && time.hour() == 0 {
                if let Some(next) = date.succ_opt() {
                    self.date = Some(next);
                }
            }
        }

        self.set_date_time(None, Some(time));
    }

    fn zda(&mut self, zda: &ZdaData) {
        self.set_date_time(zda.date, zda.time);
    }

    fn gga(&mut self, gga: &GgaData) {
        if let Some(time) = gga.time {
            self.advance_time_of_day(time);
        }

        if let Some(quality) = gga.quality {
            self.fix_quality = quality;
        }

        if gga.satellites.is_some() {
            self.satellites = gga.satellites;
        }

        // a position without a fix is a placeholder
        if gga.quality == Some(FixQuality::NoFix) {
            return;
        }

        if let Some(lat_lon) = &gga.lat_lon {
            self.latitude = Some(lat_lon.latitude);
            self.longitude = Some(lat_lon.longitude);
        }

        if gga.altitude.is_some() {
            self.altitude = gga.altitude;
        }
    }

    fn rmc(&mut self, rmc: &RmcData) {
        self.set_date_time(rmc.date, rmc.time);

        let void = rmc.status == Some(RmcStatus::Void)
            || rmc.mode == Some(ModeIndicator::NotValid);

        // a void position is a placeholder
        if void {
            self.fix_quality = FixQuality::NoFix;

            return;
        }

        match rmc.mode {
            Some(ModeIndicator::Differential) => self.fix_quality = FixQuality::Differential,
            Some(ModeIndicator::Estimated) => self.fix_quality = FixQuality::Estimated,
            Some(ModeIndicator::Autonomous) | None => {
                if rmc.status == Some(RmcStatus::Active)
                    && self.fix_quality != FixQuality::Differential
                {
                    self.fix_quality = FixQuality::Gps;
                }
            }
            _ => (),
        }

        if let Some(lat_lon) = &rmc.lat_lon {
            self.latitude = Some(lat_lon.latitude);
            self.longitude = Some(lat_lon.longitude);
        }
    }

    fn gsv(&mut self, gsv: &GsvData) {
        let seen = self.time;

        for satellite in &gsv.satellites {
            let entry = self
                .satellites_in_view
                .entry(satellite.prn)
                .or_insert(SatelliteInView {
                    prn: satellite.prn,
                    elevation: None,
                    azimuth: None,
                    snr: None,
                    last_seen: None,
                });

            entry.elevation = satellite.elevation.or(entry.elevation);
            entry.azimuth = satellite.azimuth.or(entry.azimuth);
            entry.snr = satellite.snr.or(entry.snr);
            entry.last_seen = seen.or(entry.last_seen);
        }
    }

    fn vendor(&mut self, vendor: &VendorData) {
        if vendor.locked.is_some() {
            self.locked = vendor.locked;
        }

        for (flag, active) in &vendor.alarms {
            self.alarms.set(*flag, *active);
        }

        if vendor.holdover_seconds.is_some() {
            self.holdover_seconds = vendor.holdover_seconds;
        }

        if let Some(leap) = vendor.leap {
            self.leap = leap;
        }

        for (name, value) in &vendor.extra {
            self.vendor.insert(name.clone(), value.clone());
        }
    }
}
