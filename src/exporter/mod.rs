mod archive;
#[allow(clippy::module_inception)]
mod exporter;
mod http;

pub use archive::Archive;
pub use archive::ArchiveError;
pub use exporter::StatusExporter;
pub use exporter::StatusReader;
pub use http::handle;
pub use http::StatusServer;

#[cfg(test)]
mod test;
