use serde::Deserialize;

use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct ArchiveConfig {
    pub path: PathBuf,
    /// Seconds between periodic snapshots
    #[serde(default = "default_interval")]
    pub interval: u64,
}

fn default_interval() -> u64 {
    60
}

impl ArchiveConfig {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        ArchiveConfig {
            path: path.into(),
            interval: default_interval(),
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval.max(1))
    }
}
