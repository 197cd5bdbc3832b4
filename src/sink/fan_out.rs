use crate::configuration::SinkConfig;
use crate::configuration::SinkFormat;
use crate::gpsdo::GpsdoStatus;
use crate::metrics;
use crate::sink::derived;
use crate::sink::Sink;

use tracing::trace;

/// Copies lines to every configured sink.
///
/// A failing sink never affects the others and no error leaves `forward`.
#[derive(Debug, Default)]
pub struct FanOut {
    sinks: Vec<Sink>,
}

impl FanOut {
    pub fn new(configs: &[SinkConfig]) -> Self {
        FanOut {
            sinks: configs.iter().cloned().map(Sink::new).collect(),
        }
    }

    pub fn sinks(&self) -> &[Sink] {
        &self.sinks
    }

    /// Write `raw` and a CR LF to each raw sink
    pub fn forward(&mut self, raw: &str) {
        if !self.has(SinkFormat::Raw) {
            return;
        }

        let line = format!("{}\r\n", raw);

        self.broadcast(SinkFormat::Raw, &line);
    }

    /// Write a derived `$GPGGA` for `status` to each GGA sink
    pub fn forward_status(&mut self, status: &GpsdoStatus) {
        if !self.has(SinkFormat::Gga) {
            return;
        }

        match derived::gga(status) {
            Some(line) => self.broadcast(SinkFormat::Gga, &line),
            None => trace!("no time yet, skipping derived GGA"),
        }
    }

    fn has(&self, format: SinkFormat) -> bool {
        self.sinks.iter().any(|s| s.format() == format)
    }

    fn broadcast(&mut self, format: SinkFormat, line: &str) {
        for sink in self.sinks.iter_mut().filter(|s| s.format() == format) {
            if sink.write_line(line).is_err() {
                metrics::sink_error(&sink.path().to_string_lossy());
            }
        }
    }
}
