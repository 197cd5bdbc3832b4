use crate::nmea::parse_line;
use crate::nmea::Line;
use crate::nmea::ParseError;
use crate::nmea::Talker;

use std::time::Duration;

const ZDA: &str = "$GPZDA,181813.00,14,09,2024,00,00*6C";

fn line(text: &str) -> Line {
    Line::new(text, Duration::from_secs(1_726_337_893))
}

#[test]
fn test_parse_line() {
    let record = parse_line(&line(ZDA)).unwrap();

    assert_eq!(Talker::GPS, record.talker);
    assert_eq!("ZDA", record.sentence_type);
    assert_eq!("GPZDA", record.address());
    assert_eq!(7, record.field_count());
    assert_eq!(Some("181813.00"), record.field(1));
    assert_eq!(Some("2024"), record.field(4));
    assert_eq!(ZDA, record.raw);
    assert!(record.checksum_valid);
    assert_eq!(Duration::from_secs(1_726_337_893), record.received);
}

#[test]
fn test_parse_line_empty_fields() {
    let record = parse_line(&line("$GPGGA,181814.00,,,,,0,00,99.99,,,,,,*63")).unwrap();

    assert_eq!(15, record.field_count());
    assert_eq!(None, record.field(2));
    assert_eq!(Some("0"), record.field(6));
    assert_eq!(None, record.field(20));
}

#[test]
fn test_parse_line_lowercase_checksum() {
    let record = parse_line(&line("$GPZDA,181813.00,14,09,2024,00,00*6c")).unwrap();

    assert_eq!("ZDA", record.sentence_type);
}

#[test]
fn test_parse_line_bad_checksum() {
    let error = parse_line(&line("$GPZDA,181813.00,14,09,2024,00,00*00")).unwrap_err();

    assert_eq!(
        ParseError::Checksum {
            message: "GPZDA,181813.00,14,09,2024,00,00".to_string(),
            given: 0x00,
            calculated: 0x6C,
        },
        error
    );
    assert_eq!("checksum", error.reason());
}

#[test]
fn test_parse_line_corrupted_byte() {
    let star = ZDA.find('*').unwrap();

    for i in 1..star {
        let mut bytes = ZDA.as_bytes().to_vec();
        bytes[i] ^= 0x01;

        let corrupted = String::from_utf8(bytes).unwrap();

        assert!(
            parse_line(&line(&corrupted)).is_err(),
            "accepted {}",
            corrupted
        );
    }
}

#[test]
fn test_parse_line_malformed() {
    let missing_dollar = parse_line(&line("GPZDA,181813.00,14,09,2024,00,00*6C")).unwrap_err();
    assert_eq!("malformed", missing_dollar.reason());

    let trailing = parse_line(&line("$GPZDA,181813.00,14,09,2024,00,00*6CXX")).unwrap_err();
    assert_eq!("malformed", trailing.reason());

    let no_checksum = parse_line(&line("$GPZDA,181813.00,14,09,2024,00,00")).unwrap_err();
    assert_eq!("malformed", no_checksum.reason());
}

#[test]
fn test_parse_line_proprietary() {
    let record = parse_line(&line("$PTPSTS,0,0,0,0,8,0,0*14")).unwrap();

    assert_eq!(Talker::Proprietary("TPS".to_string()), record.talker);
    assert_eq!("TS", record.sentence_type);
    assert_eq!("PTPSTS", record.address());
    assert!(record.is_proprietary());
}
