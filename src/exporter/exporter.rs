use crate::exporter::Archive;
use crate::exporter::ArchiveError;
use crate::gpsdo::GpsdoStatus;

use chrono::DateTime;
use chrono::Utc;

use tokio::sync::watch;

pub type StatusReader = watch::Receiver<GpsdoStatus>;

/// Publishes whole status snapshots to readers on other tasks.
///
/// Only the ingest task writes, readers never wait on it.
#[derive(Debug)]
pub struct StatusExporter {
    sender: watch::Sender<GpsdoStatus>,
}

impl StatusExporter {
    pub fn new(initial: GpsdoStatus) -> Self {
        let (sender, _) = watch::channel(initial);

        StatusExporter { sender }
    }

    pub fn replace(&self, status: GpsdoStatus) {
        self.sender.send_replace(status);
    }

    pub fn current_snapshot(&self) -> GpsdoStatus {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> StatusReader {
        self.sender.subscribe()
    }

    pub fn record_snapshot(
        &self,
        archive: &mut Archive,
        now: DateTime<Utc>,
    ) -> Result<(), ArchiveError> {
        let status = self.current_snapshot();

        archive.record_snapshot(&status, now)
    }
}
