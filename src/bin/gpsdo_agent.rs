use anyhow::Context;
use anyhow::Result;

use clap::Parser;

use std::convert::TryFrom;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use tokio::runtime;
use tokio::signal::unix::signal;
use tokio::signal::unix::SignalKind;
use tokio::sync::Notify;

use tracing::error;
use tracing::info;
use tracing::Level;

use tracing_subscriber::filter::EnvFilter;

use gpsdo_agent::configuration::Args;
use gpsdo_agent::configuration::Configuration;
use gpsdo_agent::exporter::StatusServer;
use gpsdo_agent::ingest::run_device;
use gpsdo_agent::ingest::Ingest;
use gpsdo_agent::metrics::Exporter;
use gpsdo_agent::shm::TimePublisher;

fn main() {
    let args = Args::parse();

    let runtime = match runtime::Builder::new_multi_thread()
        .thread_name_fn(|| {
            static ATOMIC_ID: AtomicUsize = AtomicUsize::new(0);
            let id = ATOMIC_ID.fetch_add(1, Ordering::SeqCst);
            format!("gpsdo_agent-{}", id)
        })
        .enable_all()
        .build()
    {
        Ok(r) => r,
        Err(e) => {
            eprintln!("unable to start runtime: {}", e);
            std::process::exit(1);
        }
    };

    let config = load_config(&args);

    if let Err(e) = runtime.block_on(run(config)) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(config: Configuration) -> Result<()> {
    let publisher = TimePublisher::attach(&config.ntp)?;

    let mut ingest = Ingest::new(&config, Some(publisher));

    let http_shutdown = Arc::new(Notify::new());
    let notified = http_shutdown.clone();

    StatusServer::new(&config.http, ingest.subscribe())?
        .start(async move { notified.notified().await })?;

    let metrics_shutdown = match &config.prometheus {
        Some(prometheus) => {
            let exporter = Exporter::new(prometheus)?;
            let shutdown = exporter.shutdown();

            exporter.start();

            Some(shutdown)
        }
        None => None,
    };

    let result = tokio::select! {
        result = run_device(&mut ingest, &config.gpsdo) => result,
        result = shutdown_signal() => result.map(|()| info!("Shutting down")),
    };

    http_shutdown.notify_one();

    if let Some(shutdown) = metrics_shutdown {
        shutdown.notify_waiters();
    }

    // closes the sinks and detaches the segment
    drop(ingest);

    result
}

async fn shutdown_signal() -> Result<()> {
    let mut terminate =
        signal(SignalKind::terminate()).context("Unable to listen for SIGTERM")?;

    tokio::select! {
        result = tokio::signal::ctrl_c() => result.context("Unable to listen for SIGINT")?,
        _ = terminate.recv() => (),
    }

    Ok(())
}

fn load_config(args: &Args) -> Configuration {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .finish();

    let (config, filter) = tracing::subscriber::with_default(subscriber, || {
        let config = match Configuration::from_args(args) {
            Ok(c) => c,
            Err(e) => {
                error!("invalid configuration: {}", e);
                std::process::exit(1);
            }
        };

        let filter = match EnvFilter::try_from(config.clone()) {
            Ok(f) => f,
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        };

        (config, filter)
    });

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("unable to install tracing subscriber: {}", e);
    }

    config
}
