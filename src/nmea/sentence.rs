use crate::configuration::VendorConfig;
use crate::gpsdo::Alarms;
use crate::gpsdo::FixQuality;
use crate::gpsdo::LeapIndicator;
use crate::nmea::parser_util::*;
use crate::nmea::FieldError;
use crate::nmea::SentenceRecord;
use crate::nmea::Talker;

use chrono::naive::NaiveDate;
use chrono::naive::NaiveTime;

use nom::character::complete::one_of;
use nom::character::complete::satisfy;

use std::ops::RangeInclusive;

/// A sentence whose fields have been extracted for the status model.
///
/// Anything the agent does not know how to apply is `Unrecognized`; it still passed checksum
/// validation and is forwarded to raw sinks.
#[derive(Clone, Debug, PartialEq)]
pub enum Sentence {
    Zda(ZdaData),
    Gga(GgaData),
    Rmc(RmcData),
    Gsv(GsvData),
    Vendor(VendorData),
    Unrecognized,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ZdaData {
    pub talker: Talker,
    pub time: Option<NaiveTime>,
    pub date: Option<NaiveDate>,
    pub zone_hours: Option<i32>,
    pub zone_minutes: Option<u32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GgaData {
    pub talker: Talker,
    pub time: Option<NaiveTime>,
    pub lat_lon: Option<LatLon>,
    pub quality: Option<FixQuality>,
    pub satellites: Option<u32>,
    pub hdop: Option<f64>,
    pub altitude: Option<f64>,
    pub geoid_separation: Option<f64>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RmcStatus {
    Active,
    Void,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ModeIndicator {
    Autonomous,
    Differential,
    Estimated,
    NotValid,
    Other(char),
}

#[derive(Clone, Debug, PartialEq)]
pub struct RmcData {
    pub talker: Talker,
    pub time: Option<NaiveTime>,
    pub status: Option<RmcStatus>,
    pub lat_lon: Option<LatLon>,
    pub date: Option<NaiveDate>,
    pub mode: Option<ModeIndicator>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SatelliteView {
    pub prn: u32,
    pub elevation: Option<i32>,
    pub azimuth: Option<u32>,
    pub snr: Option<u32>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GsvData {
    pub talker: Talker,
    pub messages: Option<u32>,
    pub message: Option<u32>,
    pub in_view: Option<u32>,
    pub satellites: Vec<SatelliteView>,
}

/// Status fields pulled from a device specific sentence using a configured schema.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct VendorData {
    pub address: String,
    pub locked: Option<bool>,
    /// Configured alarms present in this sentence and whether each is raised
    pub alarms: Vec<(Alarms, bool)>,
    pub holdover_seconds: Option<u64>,
    pub leap: Option<LeapIndicator>,
    pub extra: Vec<(String, String)>,
}

fn check_count(
    record: &SentenceRecord,
    expected: RangeInclusive<usize>,
) -> Result<(), FieldError> {
    let found = record.field_count();

    if expected.contains(&found) {
        return Ok(());
    }

    let expected = if expected.start() == expected.end() {
        expected.start().to_string()
    } else {
        format!("{} to {}", expected.start(), expected.end())
    };

    Err(FieldError::Count {
        address: record.address().to_string(),
        expected,
        found,
    })
}

impl Sentence {
    /// Extract typed fields from `record`.
    ///
    /// A record whose field count does not fit its type is rejected.  Individual empty or
    /// unparsable fields become `None`.
    pub fn from_record(
        record: &SentenceRecord,
        vendors: &[VendorConfig],
    ) -> Result<Sentence, FieldError> {
        if let Some(vendor) = vendors.iter().find(|v| v.address == record.address()) {
            return vendor_status(record, vendor).map(Sentence::Vendor);
        }

        if record.is_proprietary() {
            return Ok(Sentence::Unrecognized);
        }

        match record.sentence_type.as_str() {
            "GGA" => gga(record).map(Sentence::Gga),
            "GSV" => gsv(record).map(Sentence::Gsv),
            "RMC" => rmc(record).map(Sentence::Rmc),
            "ZDA" => zda(record).map(Sentence::Zda),
            _ => Ok(Sentence::Unrecognized),
        }
    }

    /// True for sentences that report the time of day
    pub fn carries_time(&self) -> bool {
        match self {
            Sentence::Zda(d) => d.time.is_some(),
            Sentence::Gga(d) => d.time.is_some(),
            Sentence::Rmc(d) => d.time.is_some(),
            _ => false,
        }
    }

    pub fn type_label(&self) -> &'static str {
        match self {
            Sentence::Zda(_) => "ZDA",
            Sentence::Gga(_) => "GGA",
            Sentence::Rmc(_) => "RMC",
            Sentence::Gsv(_) => "GSV",
            Sentence::Vendor(_) => "vendor",
            Sentence::Unrecognized => "unrecognized",
        }
    }
}

// $GPZDA,hhmmss.ss,dd,mm,yyyy,zh,zm
pub(crate) fn zda(record: &SentenceRecord) -> Result<ZdaData, FieldError> {
    check_count(record, 7..=7)?;

    let day = field(record.field(2), two_digit);
    let month = field(record.field(3), two_digit);
    let year = field(record.field(4), four_digit_i);

    let date = match (year, month, day) {
        (Some(y), Some(m), Some(d)) => NaiveDate::from_ymd_opt(y, m, d),
        _ => None,
    };

    Ok(ZdaData {
        talker: record.talker.clone(),
        time: field(record.field(1), time),
        date,
        zone_hours: field(record.field(5), int32),
        zone_minutes: field(record.field(6), uint32),
    })
}

// 7 (manual input) and 8 (simulator) are not derived from satellites
fn gga_quality(c: char) -> FixQuality {
    match c {
        '0' | '7' | '8' => FixQuality::NoFix,
        '2' => FixQuality::Differential,
        '6' => FixQuality::Estimated,
        _ => FixQuality::Gps,
    }
}

// $GPGGA,time,lat,N,lon,E,quality,satellites,hdop,alt,M,sep,M,age,station
pub(crate) fn gga(record: &SentenceRecord) -> Result<GgaData, FieldError> {
    check_count(record, 15..=15)?;

    let lat_lon = lat_lon(
        record.field(2),
        record.field(3),
        record.field(4),
        record.field(5),
    );

    Ok(GgaData {
        talker: record.talker.clone(),
        time: field(record.field(1), time),
        lat_lon,
        quality: field(record.field(6), one_of("012345678")).map(gga_quality),
        satellites: field(record.field(7), uint32),
        hdop: field(record.field(8), flt64),
        altitude: field(record.field(9), flt64),
        geoid_separation: field(record.field(11), flt64),
    })
}

fn mode_indicator(c: char) -> ModeIndicator {
    match c {
        'A' => ModeIndicator::Autonomous,
        'D' => ModeIndicator::Differential,
        'E' => ModeIndicator::Estimated,
        'N' => ModeIndicator::NotValid,
        _ => ModeIndicator::Other(c),
    }
}

// $GPRMC,time,status,lat,N,lon,E,speed,course,ddmmyy,magvar,E[,mode[,nav status]]
pub(crate) fn rmc(record: &SentenceRecord) -> Result<RmcData, FieldError> {
    check_count(record, 12..=14)?;

    let status = field(record.field(2), one_of("AV")).map(|c| match c {
        'A' => RmcStatus::Active,
        _ => RmcStatus::Void,
    });

    let lat_lon = lat_lon(
        record.field(3),
        record.field(4),
        record.field(5),
        record.field(6),
    );

    let mode = field(record.field(12), satisfy(|c| c.is_ascii_uppercase())).map(mode_indicator);

    Ok(RmcData {
        talker: record.talker.clone(),
        time: field(record.field(1), time),
        status,
        lat_lon,
        date: field(record.field(9), date),
        mode,
    })
}

// $GPGSV,messages,message,in view{,prn,elevation,azimuth,snr}[,signal]
pub(crate) fn gsv(record: &SentenceRecord) -> Result<GsvData, FieldError> {
    let count = record.field_count();
    let satellite_fields = if count >= 4 && (count - 4) % 4 == 0 {
        count - 4
    } else if count >= 5 && (count - 5) % 4 == 0 {
        count - 5
    } else {
        usize::MAX
    };

    if satellite_fields > 16 {
        return Err(FieldError::Count {
            address: record.address().to_string(),
            expected: "4 plus 4 per satellite".to_string(),
            found: count,
        });
    }

    let satellites = (0..satellite_fields / 4)
        .filter_map(|i| {
            let base = 4 + i * 4;

            let prn = field(record.field(base), uint32)?;

            Some(SatelliteView {
                prn,
                elevation: field(record.field(base + 1), int32),
                azimuth: field(record.field(base + 2), uint32),
                snr: field(record.field(base + 3), uint32),
            })
        })
        .collect();

    Ok(GsvData {
        talker: record.talker.clone(),
        messages: field(record.field(1), uint32),
        message: field(record.field(2), uint32),
        in_view: field(record.field(3), uint32),
        satellites,
    })
}

pub(crate) fn vendor_status(
    record: &SentenceRecord,
    vendor: &VendorConfig,
) -> Result<VendorData, FieldError> {
    check_count(record, vendor.fields..=vendor.fields)?;

    let locked = vendor
        .locked
        .as_ref()
        .and_then(|flag| flag.is_active(record));

    let alarms = vendor
        .alarms
        .iter()
        .filter_map(|alarm| alarm.is_active(record).map(|active| (alarm.flag, active)))
        .collect();

    let holdover_seconds = vendor
        .holdover
        .and_then(|i| field(record.field(i), uint32))
        .map(u64::from);

    let leap = vendor
        .leap
        .and_then(|i| field(record.field(i), uint32))
        .and_then(LeapIndicator::from_code);

    let extra = vendor
        .extra
        .iter()
        .filter_map(|(name, i)| record.field(*i).map(|v| (name.clone(), v.to_string())))
        .collect();

    Ok(VendorData {
        address: vendor.address.clone(),
        locked,
        alarms,
        holdover_seconds,
        leap,
        extra,
    })
}
