use crate::configuration::GpsdoConfig;
use crate::ingest::Ingest;

use anyhow::Context;
use anyhow::Result;

use backoff::ExponentialBackoff;
use backoff::SystemClock;

use std::convert::TryFrom;
use std::time::Duration;
use std::time::Instant;

use tokio::time;
use tokio::time::Interval;
use tokio::time::MissedTickBehavior;

use tokio_serial::SerialPortBuilder;
use tokio_serial::SerialPortBuilderExt;
use tokio_serial::SerialStream;

use tracing::error;
use tracing::info;

const TICK: Duration = Duration::from_secs(1);

/// Feed `ingest` from the serial device forever.
///
/// Failing to open the device the first time is an error.  Later hang-ups reopen it with
/// backoff while inactivity and archive ticks keep running.
pub async fn run_device(ingest: &mut Ingest, config: &GpsdoConfig) -> Result<()> {
    let device = config.device()?.to_string();
    let builder = SerialPortBuilder::try_from(config)?;

    let mut interval = time::interval(TICK);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut serial = builder
        .clone()
        .open_native_async()
        .with_context(|| format!("Failed to open GPSDO device {}", device))?;

    info!("Opened GPSDO device {}", device);

    loop {
        match ingest.run(serial, &mut interval).await {
            Ok(()) => error!("GPSDO device {} hung up", device),
            Err(e) => error!("GPSDO device {} read error: {}", device, e),
        }

        serial = reopen(ingest, &builder, &device, &mut interval).await?;

        info!("Reopened GPSDO device {}", device);
    }
}

async fn reopen(
    ingest: &mut Ingest,
    builder: &SerialPortBuilder,
    device: &str,
    interval: &mut Interval,
) -> Result<SerialStream> {
    let open = backoff::future::retry(default_backoff(), || {
        let builder = builder.clone();

        async move {
            builder
                .open_native_async()
                .map_err(log_error)
                .map_err(backoff::Error::transient)
        }
    });

    tokio::pin!(open);

    loop {
        tokio::select! {
            serial = &mut open => {
                return serial.with_context(|| format!("Failed to reopen GPSDO device {}", device));
            }
            now = interval.tick() => ingest.tick(now.into_std()),
        }
    }
}

fn default_backoff() -> ExponentialBackoff {
    ExponentialBackoff {
        current_interval: Duration::from_millis(50),
        initial_interval: Duration::from_millis(50),
        randomization_factor: 0.25,
        multiplier: 1.5,
        max_interval: Duration::from_millis(60_000),
        max_elapsed_time: None,
        clock: SystemClock::default(),
        start_time: Instant::now(),
    }
}

fn log_error<T: std::fmt::Display>(e: T) -> T {
    error!("Opening failed: {}", e);

    e
}
