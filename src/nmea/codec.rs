use bytes::Buf;
use bytes::BytesMut;

use std::io;
use std::time::Duration;
use std::time::SystemTime;

use tokio_util::codec::Decoder;

use tracing::trace;

pub const DEFAULT_MAX_LINE_LENGTH: usize = 256;

/// A line of text from the device with the time its terminator arrived.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Line {
    /// The line without its terminator
    pub text: String,
    /// System clock time since the Unix epoch when the line was completed
    pub received: Duration,
}

impl Line {
    pub fn new(text: &str, received: Duration) -> Self {
        Line {
            text: text.to_string(),
            received,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Frame {
    Line(Line),
    /// A line longer than the maximum, with the number of bytes dropped
    Overlong(usize),
    /// A line that was not valid UTF-8
    Malformed(String),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum State {
    AwaitingData,
    LineBuffering,
    /// Dropping the rest of an overlong line
    Discarding,
}

/// Splits a serial byte stream into lines.
///
/// `\r`, `\n`, and `\r\n` all end a line.  Empty lines are skipped.  Data problems are reported
/// as frames, not errors, so a `FramedRead` over this codec keeps going after bad input.
#[derive(Clone, Debug)]
pub struct LineCodec {
    max_length: usize,
    state: State,
    next_index: usize,
    discarded: usize,
}

impl LineCodec {
    pub fn new(max_length: usize) -> Self {
        LineCodec {
            max_length,
            state: State::AwaitingData,
            next_index: 0,
            discarded: 0,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    fn reset(&mut self) {
        self.state = State::AwaitingData;
        self.next_index = 0;
        self.discarded = 0;
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        LineCodec::new(DEFAULT_MAX_LINE_LENGTH)
    }
}

fn is_terminator(b: &u8) -> bool {
    *b == b'\r' || *b == b'\n'
}

fn received() -> Duration {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
}

impl Decoder for LineCodec {
    type Item = Frame;
    type Error = io::Error;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<Frame>, io::Error> {
        loop {
            if self.state == State::AwaitingData {
                let skip = buf.iter().take_while(|b| is_terminator(b)).count();
                buf.advance(skip);

                if buf.is_empty() {
                    return Ok(None);
                }

                self.state = State::LineBuffering;
                self.next_index = 0;
            }

            let end = buf[self.next_index..]
                .iter()
                .position(is_terminator)
                .map(|i| i + self.next_index);

            match (self.state, end) {
                (State::LineBuffering, Some(end)) => {
                    let line = buf.split_to(end);
                    buf.advance(1);
                    self.reset();

                    if line.len() > self.max_length {
                        return Ok(Some(Frame::Overlong(line.len())));
                    }

                    let text = match std::str::from_utf8(&line) {
                        Ok(t) => t,
                        Err(e) => {
                            let lossy = String::from_utf8_lossy(&line).to_string();
                            trace!("invalid UTF-8 in {:?}: {}", lossy, e);
                            return Ok(Some(Frame::Malformed(lossy)));
                        }
                    };

                    if text.trim().is_empty() {
                        continue;
                    }

                    return Ok(Some(Frame::Line(Line::new(text, received()))));
                }
                (State::LineBuffering, None) => {
                    if buf.len() > self.max_length {
                        self.state = State::Discarding;
                        self.next_index = 0;
                        self.discarded = buf.len();
                        buf.clear();
                    } else {
                        self.next_index = buf.len();
                    }

                    return Ok(None);
                }
                (State::Discarding, Some(end)) => {
                    let dropped = self.discarded + end;
                    buf.advance(end + 1);
                    self.reset();

                    return Ok(Some(Frame::Overlong(dropped)));
                }
                (State::Discarding, None) => {
                    self.discarded += buf.len();
                    buf.clear();

                    return Ok(None);
                }
                (State::AwaitingData, _) => unreachable!("a line is always started above"),
            }
        }
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Frame>, io::Error> {
        match self.decode(buf)? {
            Some(frame) => Ok(Some(frame)),
            None => {
                if !buf.is_empty() {
                    trace!("dropping {} bytes of unterminated line", buf.len());
                }

                buf.clear();
                self.reset();

                Ok(None)
            }
        }
    }
}
