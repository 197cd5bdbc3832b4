#![no_main]
use libfuzzer_sys::fuzz_target;

use bytes::BytesMut;

use gpsdo_agent::gpsdo::GpsdoStatus;
use gpsdo_agent::nmea::parse_line;
use gpsdo_agent::nmea::Frame;
use gpsdo_agent::nmea::LineCodec;
use gpsdo_agent::nmea::Sentence;

use tokio_util::codec::Decoder;

fuzz_target!(|input: &[u8]| {
    let mut codec = LineCodec::default();
    let mut buf = BytesMut::from(input);
    let mut status = GpsdoStatus::default();

    while let Ok(Some(frame)) = codec.decode(&mut buf) {
        if let Frame::Line(line) = frame {
            if let Ok(record) = parse_line(&line) {
                if let Ok(sentence) = Sentence::from_record(&record, &[]) {
                    status = status.apply(&sentence).unwrap_or(status);
                }
            }
        }
    }
});
