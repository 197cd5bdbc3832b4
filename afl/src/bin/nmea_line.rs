#[macro_use]
extern crate afl;

use gpsdo_agent::nmea::parse_line;
use gpsdo_agent::nmea::Line;
use gpsdo_agent::nmea::Sentence;

use std::time::Duration;

fn main() {
    fuzz!(|input: &[u8]| {
        if let Ok(text) = std::str::from_utf8(input) {
            let line = Line::new(text.trim_end(), Duration::ZERO);

            if let Ok(record) = parse_line(&line) {
                let _ = Sentence::from_record(&record, &[]);
            }
        }
    });
}
