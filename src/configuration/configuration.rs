use crate::configuration::ArchiveConfig;
use crate::configuration::Args;
use crate::configuration::ConfigurationError;
use crate::configuration::GpsdoConfig;
use crate::configuration::HttpConfig;
use crate::configuration::NtpConfig;
use crate::configuration::PrometheusConfig;
use crate::configuration::SinkConfig;
use crate::configuration::VendorConfig;

use serde::Deserialize;

use std::convert::TryFrom;
use std::fs;
use std::path::Path;

use tracing_subscriber::filter::EnvFilter;

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct Configuration {
    pub log_filter: Option<String>,
    #[serde(default)]
    pub gpsdo: GpsdoConfig,
    #[serde(default)]
    pub ntp: NtpConfig,
    #[serde(default, rename = "sink")]
    pub sinks: Vec<SinkConfig>,
    #[serde(default)]
    pub http: HttpConfig,
    pub archive: Option<ArchiveConfig>,
    pub prometheus: Option<PrometheusConfig>,
    #[serde(default, rename = "vendor")]
    pub vendors: Vec<VendorConfig>,
}

impl Configuration {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Configuration, ConfigurationError> {
        let source = fs::read_to_string(path)?;

        parse(source)
    }

    /// Load the `--config` file, if any, then apply the command line over it
    pub fn from_args(args: &Args) -> Result<Configuration, ConfigurationError> {
        let mut configuration = match &args.config {
            Some(path) => Configuration::load(path)?,
            None => Configuration::default(),
        };

        configuration.merge_args(args);
        configuration.validate()?;

        Ok(configuration)
    }

    pub fn merge_args(&mut self, args: &Args) {
        if let Some(uart) = &args.uart {
            self.gpsdo.device = Some(uart.clone());
        }

        if let Some(baud) = args.baud {
            self.gpsdo.baud_rate = Some(baud);
        }

        if let Some(port) = args.port {
            self.http = HttpConfig::localhost(port);
        }

        if let Some(satfile) = &args.satfile {
            self.archive = match self.archive.take() {
                Some(mut archive) => {
                    archive.path = satfile.clone();
                    Some(archive)
                }
                None => Some(ArchiveConfig::new(satfile)),
            };
        }

        if let Some(unit) = args.shm_unit {
            self.ntp.unit = unit;
        }

        if args.verbose {
            self.log_filter = Some("debug".to_string());
        }

        for path in &args.outfifos {
            self.sinks.push(SinkConfig::raw(path));
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.gpsdo.device()?;

        if self.ntp.unit < 0 {
            return Err(ConfigurationError::InvalidUnit(self.ntp.unit));
        }

        for vendor in &self.vendors {
            vendor.validate()?;
        }

        Ok(())
    }
}

fn parse(source: String) -> Result<Configuration, ConfigurationError> {
    match toml::from_str(&source) {
        Err(e) => Err(ConfigurationError::from(e)),
        Ok(c) => Ok(c),
    }
}

impl TryFrom<Configuration> for EnvFilter {
    type Error = ConfigurationError;

    fn try_from(configuration: Configuration) -> Result<EnvFilter, ConfigurationError> {
        match configuration.log_filter {
            Some(f) => match EnvFilter::try_new(f.clone()) {
                Ok(f) => Ok(f),
                Err(e) => Err(ConfigurationError::InvalidLogFilter(f, e)),
            },
            None => Ok(EnvFilter::new("info")),
        }
    }
}
