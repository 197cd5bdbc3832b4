mod device;
#[allow(clippy::module_inception)]
mod ingest;

pub use device::run_device;
pub use ingest::Ingest;
pub use ingest::IngestState;
pub use ingest::IngestStats;
pub use ingest::Outcome;
