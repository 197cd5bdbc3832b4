use crate::nmea::parser_util::*;

use chrono::naive::NaiveDate;
use chrono::naive::NaiveTime;

use nom::error::VerboseError;

type VE<'a> = VerboseError<&'a str>;

#[test]
fn test_date() {
    assert_eq!(
        NaiveDate::from_ymd_opt(2024, 9, 14).unwrap(),
        date::<VE>("140924").unwrap().1
    );
    assert_eq!(
        NaiveDate::from_ymd_opt(1989, 6, 20).unwrap(),
        date::<VE>("200689").unwrap().1
    );
}

#[test]
fn test_date_invalid() {
    assert!(date::<VE>("890620").is_err());
}

#[test]
fn test_int32() {
    assert_eq!(-5, int32::<VE>("-5").unwrap().1);
    assert_eq!(12, int32::<VE>("+12").unwrap().1);
    assert!(int32::<VE>("-").is_err());
}

#[test]
fn test_lat() {
    assert_approx_eq!(47.28521118, lat::<VE>("4717.112671").unwrap().1);
}

#[test]
fn test_lon() {
    assert_approx_eq!(8.56524738, lon::<VE>("00833.914843").unwrap().1);
}

#[test]
fn test_lat_lon() {
    let lat_lon = lat_lon(
        Some("4717.11399"),
        Some("N"),
        Some("00833.91590"),
        Some("W"),
    )
    .unwrap();

    assert_approx_eq!(47.2852331, lat_lon.latitude);
    assert_approx_eq!(-8.5652650, lat_lon.longitude);
}

#[test]
fn test_lat_lon_partial() {
    assert_eq!(None, lat_lon(Some("4717.11399"), Some("N"), None, None));
    assert_eq!(None, lat_lon(None, None, None, None));
}

#[test]
fn test_time() {
    assert_eq!(
        NaiveTime::from_hms_opt(18, 18, 13).unwrap(),
        time::<VE>("181813").unwrap().1
    );
    assert_eq!(
        NaiveTime::from_hms_milli_opt(18, 18, 13, 250).unwrap(),
        time::<VE>("181813.25").unwrap().1
    );
    assert_eq!(
        NaiveTime::from_hms_nano_opt(18, 18, 13, 123_456_789).unwrap(),
        time::<VE>("181813.1234567891").unwrap().1
    );
}

#[test]
fn test_time_leap_second() {
    assert_eq!(
        NaiveTime::from_hms_nano_opt(23, 59, 59, 1_000_000_000).unwrap(),
        time::<VE>("235960").unwrap().1
    );
    assert_eq!(
        NaiveTime::from_hms_nano_opt(23, 59, 59, 1_500_000_000).unwrap(),
        time::<VE>("235960.50").unwrap().1
    );
}

#[test]
fn test_time_invalid() {
    assert!(time::<VE>("256000.00").is_err());
    assert!(time::<VE>("181861").is_err());
}

#[test]
fn test_field() {
    assert_eq!(Some(8), field(Some("08"), uint32));
    assert_eq!(None, field(Some("08x"), uint32));
    assert_eq!(None, field(None, uint32));
}
