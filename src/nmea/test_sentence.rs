use crate::configuration::AlarmField;
use crate::configuration::FlagField;
use crate::configuration::VendorConfig;
use crate::gpsdo::Alarms;
use crate::gpsdo::FixQuality;
use crate::gpsdo::LeapIndicator;
use crate::nmea::*;

use chrono::naive::NaiveDate;
use chrono::naive::NaiveTime;

use std::collections::BTreeMap;
use std::time::Duration;

fn record(text: &str) -> SentenceRecord {
    parse_line(&Line::new(text, Duration::from_secs(1))).unwrap()
}

fn sentence(text: &str) -> Sentence {
    Sentence::from_record(&record(text), &[]).unwrap()
}

fn tps_status() -> VendorConfig {
    let mut extra = BTreeMap::new();
    extra.insert("survey".to_string(), 6);

    VendorConfig {
        address: "PTPSTS".to_string(),
        fields: 8,
        locked: Some(FlagField {
            field: 1,
            active: "1".to_string(),
        }),
        holdover: Some(5),
        leap: Some(7),
        alarms: vec![AlarmField {
            flag: Alarms::ANTENNA,
            field: 2,
            active: "1".to_string(),
        }],
        extra,
    }
}

#[test]
fn test_zda() {
    let zda = match sentence("$GPZDA,181813.00,14,09,2024,00,00*6C") {
        Sentence::Zda(zda) => zda,
        s => panic!("expected ZDA, got {:?}", s),
    };

    assert_eq!(Talker::GPS, zda.talker);
    assert_eq!(NaiveTime::from_hms_opt(18, 18, 13), zda.time);
    assert_eq!(NaiveDate::from_ymd_opt(2024, 9, 14), zda.date);
    assert_eq!(Some(0), zda.zone_hours);
    assert_eq!(Some(0), zda.zone_minutes);
}

#[test]
fn test_zda_field_count() {
    let error = Sentence::from_record(&record("$GPZDA,181813.00,14,09,2024*6C"), &[]).unwrap_err();

    assert_eq!(
        FieldError::Count {
            address: "GPZDA".to_string(),
            expected: "7".to_string(),
            found: 5,
        },
        error
    );
}

#[test]
fn test_gga() {
    let gga = match sentence(
        "$GPGGA,181813.00,4717.11399,N,00833.91590,E,1,08,1.01,499.6,M,48.0,M,,*52",
    ) {
        Sentence::Gga(gga) => gga,
        s => panic!("expected GGA, got {:?}", s),
    };

    let lat_lon = gga.lat_lon.unwrap();

    assert_eq!(NaiveTime::from_hms_opt(18, 18, 13), gga.time);
    assert_approx_eq!(47.2852331, lat_lon.latitude);
    assert_approx_eq!(8.5652650, lat_lon.longitude);
    assert_eq!(Some(FixQuality::Gps), gga.quality);
    assert_eq!(Some(8), gga.satellites);
    assert_eq!(Some(1.01), gga.hdop);
    assert_eq!(Some(499.6), gga.altitude);
    assert_eq!(Some(48.0), gga.geoid_separation);
}

#[test]
fn test_gga_no_fix() {
    let gga = match sentence("$GPGGA,181814.00,,,,,0,00,99.99,,,,,,*63") {
        Sentence::Gga(gga) => gga,
        s => panic!("expected GGA, got {:?}", s),
    };

    assert_eq!(None, gga.lat_lon);
    assert_eq!(Some(FixQuality::NoFix), gga.quality);
    assert_eq!(Some(0), gga.satellites);
    assert_eq!(None, gga.altitude);
}

#[test]
fn test_gga_manual_and_simulated() {
    for text in [
        "$GPGGA,181813.00,4717.11399,N,00833.91590,E,7,08,1.01,499.6,M,48.0,M,,*54",
        "$GPGGA,181813.00,4717.11399,N,00833.91590,E,8,08,1.01,499.6,M,48.0,M,,*5B",
    ] {
        match sentence(text) {
            Sentence::Gga(gga) => assert_eq!(Some(FixQuality::NoFix), gga.quality),
            s => panic!("expected GGA, got {:?}", s),
        }
    }
}

#[test]
fn test_rmc() {
    let rmc = match sentence(
        "$GPRMC,181813.00,A,4717.11399,N,00833.91590,E,0.004,77.52,140924,,,A*5F",
    ) {
        Sentence::Rmc(rmc) => rmc,
        s => panic!("expected RMC, got {:?}", s),
    };

    assert_eq!(Some(RmcStatus::Active), rmc.status);
    assert_eq!(NaiveDate::from_ymd_opt(2024, 9, 14), rmc.date);
    assert_eq!(Some(ModeIndicator::Autonomous), rmc.mode);
    assert!(rmc.lat_lon.is_some());
}

#[test]
fn test_rmc_void() {
    let rmc = match sentence("$GPRMC,181813.00,V,,,,,,,140924,,,N*75") {
        Sentence::Rmc(rmc) => rmc,
        s => panic!("expected RMC, got {:?}", s),
    };

    assert_eq!(Some(RmcStatus::Void), rmc.status);
    assert_eq!(Some(ModeIndicator::NotValid), rmc.mode);
    assert_eq!(None, rmc.lat_lon);
}

#[test]
fn test_gsv() {
    let gsv = match sentence(
        "$GPGSV,3,1,11,03,45,111,40,04,15,270,35,07,,,,08,62,020,44*46",
    ) {
        Sentence::Gsv(gsv) => gsv,
        s => panic!("expected GSV, got {:?}", s),
    };

    assert_eq!(Some(3), gsv.messages);
    assert_eq!(Some(1), gsv.message);
    assert_eq!(Some(11), gsv.in_view);
    assert_eq!(4, gsv.satellites.len());

    assert_eq!(
        SatelliteView {
            prn: 7,
            elevation: None,
            azimuth: None,
            snr: None,
        },
        gsv.satellites[2]
    );

    assert_eq!(
        SatelliteView {
            prn: 8,
            elevation: Some(62),
            azimuth: Some(20),
            snr: Some(44),
        },
        gsv.satellites[3]
    );
}

#[test]
fn test_vendor() {
    let vendors = vec![tps_status()];

    let vendor = match Sentence::from_record(&record("$PTPSTS,1,0,0,0,8,0,0*15"), &vendors) {
        Ok(Sentence::Vendor(vendor)) => vendor,
        s => panic!("expected vendor status, got {:?}", s),
    };

    assert_eq!("PTPSTS", vendor.address);
    assert_eq!(Some(true), vendor.locked);
    assert_eq!(vec![(Alarms::ANTENNA, false)], vendor.alarms);
    assert_eq!(Some(8), vendor.holdover_seconds);
    assert_eq!(Some(LeapIndicator::NoWarning), vendor.leap);
    assert_eq!(vec![("survey".to_string(), "0".to_string())], vendor.extra);
}

#[test]
fn test_vendor_field_count() {
    let vendors = vec![tps_status()];

    let error = Sentence::from_record(&record("$PTPSTS,1,0,0*1D"), &vendors).unwrap_err();

    assert_eq!(
        FieldError::Count {
            address: "PTPSTS".to_string(),
            expected: "8".to_string(),
            found: 4,
        },
        error
    );
}

#[test]
fn test_unrecognized() {
    assert_eq!(Sentence::Unrecognized, sentence("$PTPSTS,0,0,0,0,8,0,0*14"));
    assert_eq!(Sentence::Unrecognized, sentence("$PGRMT,ok*74"));
    assert_eq!(Sentence::Unrecognized, sentence("$GPTXT,01,01,02,hello*2F"));
}

#[test]
fn test_carries_time() {
    assert!(sentence("$GPZDA,181813.00,14,09,2024,00,00*6C").carries_time());
    assert!(!sentence("$GPTXT,01,01,02,hello*2F").carries_time());
}
