use crate::configuration::SinkConfig;
use crate::configuration::SinkFormat;

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;

use tracing::debug;
use tracing::info;
use tracing::trace;
use tracing::warn;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("{0} has no reader")]
    NoReader(PathBuf),
    #[error("{0} is full")]
    Full(PathBuf),
    #[error("unable to open {0}: {1}")]
    Open(PathBuf, io::Error),
    #[error("unable to write {0}: {1}")]
    Write(PathBuf, io::Error),
    #[error("short write to {path}, {written} of {length} bytes")]
    ShortWrite {
        path: PathBuf,
        written: usize,
        length: usize,
    },
}

impl SinkError {
    // a full pipe keeps its handle, everything else reopens next time
    fn closes(&self) -> bool {
        !matches!(self, SinkError::Full(_))
    }
}

/// One file or FIFO that receives a copy of each line.
///
/// Writes never block.  A sink that cannot take a line drops it and is degraded until a later
/// write succeeds.
#[derive(Debug)]
pub struct Sink {
    config: SinkConfig,
    file: Option<File>,
    degraded: bool,
    writes: u64,
    errors: u64,
}

impl Sink {
    pub fn new(config: SinkConfig) -> Self {
        Sink {
            config,
            file: None,
            degraded: false,
            writes: 0,
            errors: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    pub fn format(&self) -> SinkFormat {
        self.config.format
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    pub fn writes(&self) -> u64 {
        self.writes
    }

    pub fn errors(&self) -> u64 {
        self.errors
    }

    /// Write `line`, which must already carry its terminator
    pub fn write_line(&mut self, line: &str) -> Result<(), SinkError> {
        match self.try_write(line.as_bytes()) {
            Ok(()) => {
                if self.degraded {
                    info!("sink {} recovered", self.config.path.display());
                    self.degraded = false;
                }

                self.writes += 1;

                Ok(())
            }
            Err(e) => {
                if self.degraded {
                    debug!("sink still degraded: {}", e);
                } else {
                    warn!("sink degraded: {}", e);
                    self.degraded = true;
                }

                if e.closes() {
                    self.file = None;
                }

                self.errors += 1;

                Err(e)
            }
        }
    }

    fn try_write(&mut self, bytes: &[u8]) -> Result<(), SinkError> {
        if self.file.is_none() {
            self.file = Some(open(&self.config.path)?);
        }

        let file = match self.file.as_mut() {
            Some(f) => f,
            None => return Err(SinkError::NoReader(self.config.path.clone())),
        };

        let written = match file.write(bytes) {
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                return Err(SinkError::Full(self.config.path.clone()))
            }
            Err(e) => return Err(SinkError::Write(self.config.path.clone(), e)),
        };

        if written != bytes.len() {
            return Err(SinkError::ShortWrite {
                path: self.config.path.clone(),
                written,
                length: bytes.len(),
            });
        }

        trace!("wrote {} bytes to {}", written, self.config.path.display());

        Ok(())
    }
}

// A FIFO opened for writing without a reader fails with ENXIO instead of waiting
fn open(path: &Path) -> Result<File, SinkError> {
    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .custom_flags(libc::O_NONBLOCK)
        .open(path);

    match file {
        Ok(f) => {
            debug!("opened sink {}", path.display());
            Ok(f)
        }
        Err(e) if e.raw_os_error() == Some(libc::ENXIO) => {
            Err(SinkError::NoReader(path.to_path_buf()))
        }
        Err(e) => Err(SinkError::Open(path.to_path_buf(), e)),
    }
}
