use crate::nmea::Frame;
use crate::nmea::LineCodec;
use crate::nmea::State;

use bytes::BytesMut;

use tokio_util::codec::Decoder;

fn text(frame: Option<Frame>) -> String {
    match frame {
        Some(Frame::Line(line)) => line.text,
        f => panic!("expected a line, got {:?}", f),
    }
}

#[test]
fn test_same_read() {
    let mut codec = LineCodec::default();

    // these two lines appeared in a single read from the device
    let mut bytes_mut = BytesMut::new();
    bytes_mut.extend_from_slice(b"$GPZDA,181813.00,14,09,2024,00,00*6C\r\n");
    bytes_mut.extend_from_slice(b"$GPGSV,1,1,02,03,45,111,40,04,15,270,35*7F\r\n");

    assert_eq!(
        "$GPZDA,181813.00,14,09,2024,00,00*6C",
        text(codec.decode(&mut bytes_mut).unwrap())
    );
    assert_eq!(
        "$GPGSV,1,1,02,03,45,111,40,04,15,270,35*7F",
        text(codec.decode(&mut bytes_mut).unwrap())
    );
    assert_eq!(None, codec.decode(&mut bytes_mut).unwrap());
    assert_eq!(State::AwaitingData, codec.state());
}

#[test]
fn test_split_read() {
    let mut codec = LineCodec::default();

    let mut bytes_mut = BytesMut::new();
    bytes_mut.extend_from_slice(b"$GPZDA,181813.00,");

    assert_eq!(None, codec.decode(&mut bytes_mut).unwrap());
    assert_eq!(State::LineBuffering, codec.state());

    bytes_mut.extend_from_slice(b"14,09,2024,00,00*6C\r");

    assert_eq!(
        "$GPZDA,181813.00,14,09,2024,00,00*6C",
        text(codec.decode(&mut bytes_mut).unwrap())
    );
}

#[test]
fn test_carriage_return_only() {
    let mut codec = LineCodec::default();

    let mut bytes_mut = BytesMut::from(&b"$CLOCK 1\r$STATUS 0\r"[..]);

    assert_eq!("$CLOCK 1", text(codec.decode(&mut bytes_mut).unwrap()));
    assert_eq!("$STATUS 0", text(codec.decode(&mut bytes_mut).unwrap()));
}

#[test]
fn test_empty_lines_skipped() {
    let mut codec = LineCodec::default();

    let mut bytes_mut = BytesMut::from(&b"\r\n\r\n  \r\n$GPTXT*01\r\n"[..]);

    assert_eq!("$GPTXT*01", text(codec.decode(&mut bytes_mut).unwrap()));
}

#[test]
fn test_overlong() {
    let mut codec = LineCodec::new(16);

    let mut bytes_mut = BytesMut::from(&b"$GPTXT,0123456789"[..]);

    assert_eq!(None, codec.decode(&mut bytes_mut).unwrap());
    assert_eq!(State::Discarding, codec.state());

    bytes_mut.extend_from_slice(b"abcdef*00\r\n$GPTXT*01\r\n");

    assert_eq!(
        Some(Frame::Overlong(26)),
        codec.decode(&mut bytes_mut).unwrap()
    );
    assert_eq!("$GPTXT*01", text(codec.decode(&mut bytes_mut).unwrap()));
}

#[test]
fn test_overlong_single_read() {
    let mut codec = LineCodec::new(8);

    let mut bytes_mut = BytesMut::from(&b"$GPTXT,01*00\r\n"[..]);

    assert_eq!(
        Some(Frame::Overlong(12)),
        codec.decode(&mut bytes_mut).unwrap()
    );
}

#[test]
fn test_invalid_utf8() {
    let mut codec = LineCodec::default();

    let mut bytes_mut = BytesMut::from(&b"$GP\xFF\xFE*00\r\n$GPTXT*01\r\n"[..]);

    match codec.decode(&mut bytes_mut).unwrap() {
        Some(Frame::Malformed(_)) => (),
        f => panic!("expected malformed frame, got {:?}", f),
    }

    assert_eq!("$GPTXT*01", text(codec.decode(&mut bytes_mut).unwrap()));
}

#[test]
fn test_eof_drops_partial_line() {
    let mut codec = LineCodec::default();

    let mut bytes_mut = BytesMut::from(&b"$GPZDA,1818"[..]);

    assert_eq!(None, codec.decode_eof(&mut bytes_mut).unwrap());
    assert!(bytes_mut.is_empty());
    assert_eq!(State::AwaitingData, codec.state());
}
