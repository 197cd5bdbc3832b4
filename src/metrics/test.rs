use crate::configuration::PrometheusConfig;
use crate::metrics::*;

use prometheus::Registry;

#[test]
fn test_with_registry() {
    let registry = Registry::new();
    let metrics = Metrics::with_registry(&registry).unwrap();

    metrics.sentences.with_label_values(&["ZDA"]).inc();
    metrics.sentences.with_label_values(&["ZDA"]).inc();
    metrics.parse_errors.with_label_values(&["checksum"]).inc();
    metrics.sequence.set(7);

    assert_eq!(2, metrics.sentences.with_label_values(&["ZDA"]).get());
    assert_eq!(1, metrics.parse_errors.with_label_values(&["checksum"]).get());
    assert_eq!(7, metrics.sequence.get());

    let names: Vec<String> = registry
        .gather()
        .iter()
        .map(|f| f.get_name().to_string())
        .collect();

    assert!(names.contains(&"gpsdo_sentences_total".to_string()));
    assert!(names.contains(&"gpsdo_sequence".to_string()));
}

#[test]
fn test_with_registry_twice() {
    let registry = Registry::new();

    assert!(Metrics::with_registry(&registry).is_ok());
    assert!(Metrics::with_registry(&registry).is_err());
}

#[test]
fn test_exporter_bad_address() {
    let config = PrometheusConfig {
        bind_addresses: vec!["localhost".to_string()],
    };

    assert!(Exporter::new(&config).is_err());
}

#[test]
fn test_exporter() {
    assert!(Exporter::new(&PrometheusConfig::default()).is_ok());
}
