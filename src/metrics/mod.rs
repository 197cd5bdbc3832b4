mod counters;
mod exporter;

pub use counters::parse_error;
pub use counters::publish_error;
pub use counters::published;
pub use counters::sentence;
pub use counters::sequence;
pub use counters::sink_error;
pub use counters::Metrics;
pub use exporter::Exporter;

#[cfg(test)]
mod test;
