use crate::configuration::Configuration;
use crate::configuration::VendorConfig;
use crate::exporter::Archive;
use crate::exporter::StatusExporter;
use crate::exporter::StatusReader;
use crate::gpsdo::GpsdoStatus;
use crate::metrics;
use crate::nmea::parse_line;
use crate::nmea::Frame;
use crate::nmea::LineCodec;
use crate::nmea::ParseError;
use crate::nmea::Sentence;
use crate::shm::TimePublisher;
use crate::sink::FanOut;

use chrono::Utc;

use futures_util::stream::StreamExt;

use std::io;
use std::time::Duration;
use std::time::Instant;

use tokio::io::AsyncRead;
use tokio::time::Interval;

use tokio_util::codec::FramedRead;

use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::trace;
use tracing::warn;

/// What happened to one frame
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Applied, and the new time went to ntpd
    Published,
    Applied,
    /// Valid but not understood, only forwarded raw
    Unrecognized,
    Rejected(ParseError),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IngestState {
    Running,
    /// No line within the inactivity timeout
    Idle,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct IngestStats {
    pub lines: u64,
    pub sentences: u64,
    pub parse_errors: u64,
    pub published: u64,
    pub publish_errors: u64,
}

/// Owns the status and runs every line through the pipeline
pub struct Ingest {
    status: GpsdoStatus,
    vendors: Vec<VendorConfig>,
    publisher: Option<TimePublisher>,
    fan_out: FanOut,
    exporter: StatusExporter,
    archive: Option<Archive>,
    inactivity_timeout: Duration,
    max_line_length: usize,
    last_line: Instant,
    last_archive: Instant,
    state: IngestState,
    stats: IngestStats,
}

impl Ingest {
    pub fn new(configuration: &Configuration, publisher: Option<TimePublisher>) -> Self {
        let status = GpsdoStatus::default();
        let now = Instant::now();

        Ingest {
            exporter: StatusExporter::new(status.clone()),
            status,
            vendors: configuration.vendors.clone(),
            publisher,
            fan_out: FanOut::new(&configuration.sinks),
            archive: configuration.archive.as_ref().map(Archive::new),
            inactivity_timeout: configuration.gpsdo.inactivity_timeout(),
            max_line_length: configuration.gpsdo.max_line_length(),
            last_line: now,
            last_archive: now,
            state: IngestState::Running,
            stats: IngestStats::default(),
        }
    }

    pub fn status(&self) -> &GpsdoStatus {
        &self.status
    }

    pub fn state(&self) -> IngestState {
        self.state
    }

    pub fn stats(&self) -> IngestStats {
        self.stats
    }

    pub fn fan_out(&self) -> &FanOut {
        &self.fan_out
    }

    pub fn exporter(&self) -> &StatusExporter {
        &self.exporter
    }

    pub fn subscribe(&self) -> StatusReader {
        self.exporter.subscribe()
    }

    /// Run one frame through the whole pipeline
    pub fn handle_frame(&mut self, frame: Frame) -> Outcome {
        self.heard(Instant::now());
        self.stats.lines += 1;

        let line = match frame {
            Frame::Line(line) => line,
            Frame::Overlong(length) => return self.reject(ParseError::Overlong(length)),
            Frame::Malformed(text) => return self.reject(ParseError::Malformed(text)),
        };

        trace!("line {:?}", line.text);

        let record = match parse_line(&line) {
            Ok(record) => record,
            Err(e) => return self.reject(e),
        };

        let sentence = match Sentence::from_record(&record, &self.vendors) {
            Ok(sentence) => sentence,
            Err(e) => return self.reject(e.into()),
        };

        self.stats.sentences += 1;
        metrics::sentence(sentence.type_label());

        let next = match self.status.apply(&sentence) {
            Some(next) => next,
            None => {
                trace!("unrecognized sentence {}", record.address());
                self.fan_out.forward(&line.text);

                return Outcome::Unrecognized;
            }
        };

        let time_updated = sentence.carries_time() && next.time != self.status.time;

        let published = time_updated && self.publish(&next, line.received);

        self.fan_out.forward(&line.text);

        if time_updated {
            self.fan_out.forward_status(&next);
        }

        next.log_transitions(&self.status);
        let significant = next.is_significant_change(&self.status);

        self.replace(next);

        if significant {
            self.archive_snapshot(Instant::now());
        }

        if published {
            Outcome::Published
        } else {
            Outcome::Applied
        }
    }

    /// Check for inactivity and take periodic snapshots
    pub fn tick(&mut self, now: Instant) {
        let quiet = now.saturating_duration_since(self.last_line);

        if self.state == IngestState::Running && quiet >= self.inactivity_timeout {
            warn!(
                "no data from the GPSDO for {}s ({} lines, {} parse errors so far)",
                quiet.as_secs(),
                self.stats.lines,
                self.stats.parse_errors
            );

            self.state = IngestState::Idle;

            let next = self.status.no_signal();
            next.log_transitions(&self.status);
            let significant = next.is_significant_change(&self.status);

            self.replace(next);

            if significant {
                self.archive_snapshot(now);
            }
        }

        let due = match &self.archive {
            Some(archive) => now.saturating_duration_since(self.last_archive) >= archive.interval(),
            None => false,
        };

        if due {
            self.archive_snapshot(now);
        }
    }

    /// Process frames from `source` and ticks from `interval` until `source` ends
    pub async fn run<R>(&mut self, source: R, interval: &mut Interval) -> io::Result<()>
    where
        R: AsyncRead + Unpin,
    {
        let mut frames = FramedRead::new(source, LineCodec::new(self.max_line_length));

        loop {
            tokio::select! {
                frame = frames.next() => match frame {
                    Some(Ok(frame)) => {
                        self.handle_frame(frame);
                    }
                    Some(Err(e)) => return Err(e),
                    None => return Ok(()),
                },
                now = interval.tick() => self.tick(now.into_std()),
            }
        }
    }

    fn heard(&mut self, now: Instant) {
        if self.state == IngestState::Idle {
            info!(
                "GPSDO data resumed after {}s",
                now.saturating_duration_since(self.last_line).as_secs()
            );

            self.state = IngestState::Running;
        }

        self.last_line = now;
    }

    fn reject(&mut self, error: ParseError) -> Outcome {
        self.stats.parse_errors += 1;
        metrics::parse_error(error.reason());

        debug!("dropped line: {}", error);

        Outcome::Rejected(error)
    }

    fn publish(&mut self, status: &GpsdoStatus, received: Duration) -> bool {
        let clock = match status.publishable_time() {
            Some(clock) => clock,
            None => return false,
        };

        let publisher = match self.publisher.as_mut() {
            Some(publisher) => publisher,
            None => return false,
        };

        match publisher.publish(clock, received, status.leap) {
            Ok(count) => {
                trace!("published {} (count {})", clock, count);
                self.stats.published += 1;
                metrics::published();

                true
            }
            Err(e) => {
                error!("Unable to publish {}: {}", clock, e);
                self.stats.publish_errors += 1;
                metrics::publish_error();

                false
            }
        }
    }

    fn replace(&mut self, next: GpsdoStatus) {
        metrics::sequence(next.sequence);

        self.status = next;
        self.exporter.replace(self.status.clone());
    }

    fn archive_snapshot(&mut self, now: Instant) {
        let archive = match self.archive.as_mut() {
            Some(archive) => archive,
            None => return,
        };

        self.last_archive = now;

        if let Err(e) = self.exporter.record_snapshot(archive, Utc::now()) {
            warn!("{}", e);
        }
    }
}
