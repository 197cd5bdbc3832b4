use prometheus::register_int_counter_vec_with_registry;
use prometheus::register_int_counter_with_registry;
use prometheus::register_int_gauge_with_registry;
use prometheus::IntCounter;
use prometheus::IntCounterVec;
use prometheus::IntGauge;
use prometheus::Registry;

use std::convert::TryFrom;

use tracing::error;

/// Agent counters
#[derive(Clone)]
pub struct Metrics {
    /// Sentences applied to the status, by type
    pub sentences: IntCounterVec,
    /// Rejected lines, by reason
    pub parse_errors: IntCounterVec,
    /// Failed sink writes, by sink path
    pub sink_errors: IntCounterVec,
    pub publish_errors: IntCounter,
    pub publishes: IntCounter,
    /// Status sequence number
    pub sequence: IntGauge,
}

impl Metrics {
    pub fn with_registry(registry: &Registry) -> prometheus::Result<Self> {
        let sentences = register_int_counter_vec_with_registry!(
            "gpsdo_sentences_total",
            "Sentences applied to the GPSDO status",
            &["type"],
            registry
        )?;

        let parse_errors = register_int_counter_vec_with_registry!(
            "gpsdo_parse_errors_total",
            "Lines from the GPSDO that were dropped",
            &["reason"],
            registry
        )?;

        let sink_errors = register_int_counter_vec_with_registry!(
            "gpsdo_sink_errors_total",
            "Lines that could not be written to a sink",
            &["sink"],
            registry
        )?;

        let publish_errors = register_int_counter_with_registry!(
            "gpsdo_publish_errors_total",
            "Times that could not be written to NTP shared memory",
            registry
        )?;

        let publishes = register_int_counter_with_registry!(
            "gpsdo_publish_total",
            "Times written to NTP shared memory",
            registry
        )?;

        let sequence = register_int_gauge_with_registry!(
            "gpsdo_sequence",
            "Sequence number of the current GPSDO status",
            registry
        )?;

        Ok(Metrics {
            sentences,
            parse_errors,
            sink_errors,
            publish_errors,
            publishes,
            sequence,
        })
    }
}

lazy_static! {
    static ref METRICS: Option<Metrics> =
        match Metrics::with_registry(prometheus::default_registry()) {
            Ok(m) => Some(m),
            Err(e) => {
                error!("unable to register metrics: {}", e);
                None
            }
        };
}

pub fn sentence(sentence_type: &str) {
    if let Some(m) = METRICS.as_ref() {
        m.sentences.with_label_values(&[sentence_type]).inc();
    }
}

pub fn parse_error(reason: &str) {
    if let Some(m) = METRICS.as_ref() {
        m.parse_errors.with_label_values(&[reason]).inc();
    }
}

pub fn sink_error(sink: &str) {
    if let Some(m) = METRICS.as_ref() {
        m.sink_errors.with_label_values(&[sink]).inc();
    }
}

pub fn publish_error() {
    if let Some(m) = METRICS.as_ref() {
        m.publish_errors.inc();
    }
}

pub fn published() {
    if let Some(m) = METRICS.as_ref() {
        m.publishes.inc();
    }
}

pub fn sequence(sequence: u64) {
    if let Some(m) = METRICS.as_ref() {
        m.sequence.set(i64::try_from(sequence).unwrap_or(i64::MAX));
    }
}
