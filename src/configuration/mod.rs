mod archive_config;
mod args;
#[allow(clippy::module_inception)]
mod configuration;
mod configuration_error;
mod gpsdo_config;
mod http_config;
mod ntp_config;
mod prometheus_config;
mod sink_config;
mod vendor_config;

pub use archive_config::ArchiveConfig;
pub use args::Args;
pub use configuration::Configuration;
pub use configuration_error::ConfigurationError;
pub use gpsdo_config::GpsdoConfig;
pub use gpsdo_config::DEFAULT_BAUD_RATE;
pub use http_config::HttpConfig;
pub use http_config::DEFAULT_HTTP_PORT;
pub use ntp_config::NtpConfig;
pub use prometheus_config::PrometheusConfig;
pub use sink_config::SinkConfig;
pub use sink_config::SinkFormat;
pub use vendor_config::AlarmField;
pub use vendor_config::FlagField;
pub use vendor_config::VendorConfig;
