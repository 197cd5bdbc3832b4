use clap::Parser;

use std::time::Duration;

use tracing::error;
use tracing::info;
use tracing::Level;

use gpsdo_agent::shm::ShmTime;

/// Log each new sample an ntpd shared memory segment receives
#[derive(Parser)]
#[clap(about, version)]
struct Args {
    /// ntpd shared memory unit to watch
    unit: i32,
}

const POLL: Duration = Duration::from_millis(10);

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("unable to install tracing subscriber: {}", e);
    }

    let shm = match ShmTime::new(args.unit) {
        Ok(s) => s,
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    };

    info!("Watching NTP shared memory unit {}", args.unit);

    let zero = chrono::Duration::zero();
    let mut last_count = 0;

    loop {
        if let Some(sample) = shm.read(last_count) {
            last_count = sample.count;

            match (sample.clock_time(), sample.receive_time(), sample.offset()) {
                (Some(clock), Some(received), Some(offset)) => {
                    let offset_text = if offset > zero {
                        format!("{} after ", offset)
                    } else {
                        format!("{} before", -offset)
                    };

                    info!(
                        "unit {} tick {} received {} system at {} (count {}, leap {})",
                        args.unit, clock, offset_text, received, sample.count, sample.leap
                    );
                }
                _ => error!("unit {} has an invalid sample {:?}", args.unit, sample),
            }
        }

        tokio::time::sleep(POLL).await;
    }
}
