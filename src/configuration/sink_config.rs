use serde::Deserialize;

use std::path::PathBuf;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SinkFormat {
    /// Every sentence exactly as received
    Raw,
    /// A `$GPGGA` built from the status after each time update
    Gga,
}

impl Default for SinkFormat {
    fn default() -> Self {
        SinkFormat::Raw
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct SinkConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub format: SinkFormat,
}

impl SinkConfig {
    pub fn raw<P: Into<PathBuf>>(path: P) -> Self {
        SinkConfig {
            path: path.into(),
            format: SinkFormat::Raw,
        }
    }
}
