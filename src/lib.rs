pub mod configuration;
pub mod exporter;
pub mod gpsdo;
pub mod ingest;
pub mod metrics;
pub mod nmea;
pub mod shm;
pub mod sink;

#[macro_use]
extern crate bitflags;

#[macro_use]
extern crate lazy_static;

#[cfg(test)]
#[macro_use]
extern crate assert_approx_eq;
