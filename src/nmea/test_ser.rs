use crate::nmea::ser;

use serde::Serialize;

#[allow(non_camel_case_types)]
#[derive(Serialize)]
struct GPTXT {
    total: u8,
    number: u8,
    severity: u8,
    text: String,
}

#[allow(non_camel_case_types)]
#[derive(Serialize)]
struct PTEST {
    offset: f64,
    missing: Option<u32>,
    delta: i32,
    flag: bool,
}

#[derive(Serialize)]
struct Nested {
    values: Vec<u32>,
}

#[test]
fn test_to_string() {
    let txt = GPTXT {
        total: 1,
        number: 1,
        severity: 2,
        text: "agent started".to_string(),
    };

    assert_eq!("GPTXT,1,1,2,agent started", ser::to_string(&txt).unwrap());
}

#[test]
fn test_to_sentence() {
    let test = PTEST {
        offset: 1.5,
        missing: None,
        delta: -3,
        flag: false,
    };

    assert_eq!("$PTEST,1.5,,-3,0*42\r\n", ser::to_sentence(&test).unwrap());
}

#[test]
fn test_unsupported() {
    let nested = Nested { values: vec![1] };

    assert_eq!(
        ser::Error::Unsupported("sequence"),
        ser::to_string(&nested).unwrap_err()
    );
}
