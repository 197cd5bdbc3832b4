use crate::configuration::ArchiveConfig;
use crate::gpsdo::GpsdoStatus;

use chrono::DateTime;
use chrono::Utc;

use serde::Serialize;

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use tracing::debug;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("unable to open archive {0}: {1}")]
    Open(PathBuf, io::Error),
    #[error("unable to write archive {0}: {1}")]
    Write(PathBuf, io::Error),
    #[error("unable to serialize status: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct Record<'a> {
    recorded: DateTime<Utc>,
    status: &'a GpsdoStatus,
}

/// Append-only JSON lines file of status snapshots, satellites included
#[derive(Debug)]
pub struct Archive {
    path: PathBuf,
    interval: Duration,
    file: Option<File>,
}

impl Archive {
    pub fn new(config: &ArchiveConfig) -> Self {
        Archive {
            path: config.path.clone(),
            interval: config.interval(),
            file: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Time between periodic snapshots
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn record_snapshot(
        &mut self,
        status: &GpsdoStatus,
        now: DateTime<Utc>,
    ) -> Result<(), ArchiveError> {
        let mut line = serde_json::to_string(&Record {
            recorded: now,
            status,
        })?;
        line.push('\n');

        if self.file.is_none() {
            let file = OpenOptions::new()
                .append(true)
                .create(true)
                .open(&self.path)
                .map_err(|e| ArchiveError::Open(self.path.clone(), e))?;

            self.file = Some(file);
        }

        let result = match self.file.as_mut() {
            Some(file) => file.write_all(line.as_bytes()),
            None => Ok(()),
        };

        if let Err(e) = result {
            self.file = None;

            return Err(ArchiveError::Write(self.path.clone(), e));
        }

        debug!(
            "archived status {} to {}",
            status.sequence,
            self.path.display()
        );

        Ok(())
    }
}
