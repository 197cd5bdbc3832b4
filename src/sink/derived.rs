use crate::gpsdo::FixQuality;
use crate::gpsdo::GpsdoStatus;
use crate::nmea::ser;

use chrono::Timelike;

use serde::Serialize;

#[allow(clippy::upper_case_acronyms)]
#[derive(Serialize)]
struct GPGGA {
    time: String,
    latitude: Option<String>,
    north_south: Option<char>,
    longitude: Option<String>,
    east_west: Option<char>,
    quality: u8,
    satellites: Option<String>,
    hdop: Option<f64>,
    altitude: Option<String>,
    altitude_units: char,
    geoid_separation: Option<f64>,
    geoid_units: char,
    age: Option<u32>,
    station: Option<u32>,
}

fn quality(fix: FixQuality) -> u8 {
    match fix {
        FixQuality::NoFix => 0,
        FixQuality::Gps => 1,
        FixQuality::Differential => 2,
        FixQuality::Estimated => 6,
    }
}

// ddmm.mmmmm with `width` degree digits
fn degrees_minutes(value: f64, width: usize) -> String {
    let value = value.abs();
    let mut degrees = value.trunc() as u32;
    let mut minutes = (value.fract() * 60.0 * 100_000.0).round() / 100_000.0;

    if minutes >= 60.0 {
        degrees += 1;
        minutes -= 60.0;
    }

    format!("{:0width$}{:08.5}", degrees, minutes, width = width)
}

/// A `$GPGGA` line describing `status`, or `None` before the time is known
pub fn gga(status: &GpsdoStatus) -> Option<String> {
    let time = status.time?;

    let centiseconds = (time.nanosecond() % 1_000_000_000) / 10_000_000;

    let gga = GPGGA {
        time: format!(
            "{:02}{:02}{:02}.{:02}",
            time.hour(),
            time.minute(),
            time.second(),
            centiseconds
        ),
        latitude: status.latitude.map(|l| degrees_minutes(l, 2)),
        north_south: status
            .latitude
            .map(|l| if l < 0.0 { 'S' } else { 'N' }),
        longitude: status.longitude.map(|l| degrees_minutes(l, 3)),
        east_west: status
            .longitude
            .map(|l| if l < 0.0 { 'W' } else { 'E' }),
        quality: quality(status.fix_quality),
        satellites: status.satellites.map(|s| format!("{:02}", s)),
        hdop: None,
        altitude: status.altitude.map(|a| format!("{:.1}", a)),
        altitude_units: 'M',
        geoid_separation: None,
        geoid_units: 'M',
        age: None,
        station: None,
    };

    ser::to_sentence(&gga).ok()
}
