use clap::Parser;

use std::path::PathBuf;

/// Read a GPSDO, feed ntpd, and share its NMEA stream
#[derive(Clone, Debug, Default, Parser)]
#[clap(about, version)]
pub struct Args {
    /// Configuration file, settings below override it
    #[clap(short, long)]
    pub config: Option<PathBuf>,

    /// UART the GPSDO is attached to
    #[clap(short, long)]
    pub uart: Option<String>,

    /// UART baud rate
    #[clap(short, long)]
    pub baud: Option<u32>,

    /// TCP port for the HTTP status server on localhost
    #[clap(short = 'P', long)]
    pub port: Option<u16>,

    /// File to append status and satellite snapshots to
    #[clap(short, long)]
    pub satfile: Option<PathBuf>,

    /// ntpd shared memory unit to update
    #[clap(short = 'S', long)]
    pub shm_unit: Option<i32>,

    /// Log at debug level
    #[clap(short, long)]
    pub verbose: bool,

    /// Files or FIFOs to copy NMEA sentences to
    #[clap(name = "OUTFIFOS")]
    pub outfifos: Vec<PathBuf>,
}
