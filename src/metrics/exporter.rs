use crate::configuration::PrometheusConfig;

use anyhow::Context;
use anyhow::Result;

use prometheus_hyper::Server;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::Notify;

use tracing::error;
use tracing::info;

/// Serves the default registry in the Prometheus text format
pub struct Exporter {
    bind_addresses: Vec<SocketAddr>,
    shutdown: Arc<Notify>,
}

impl Exporter {
    pub fn new(config: &PrometheusConfig) -> Result<Self> {
        let bind_addresses = config
            .bind_addresses
            .iter()
            .map(|a| {
                a.parse()
                    .with_context(|| format!("Can't parse prometheus listen address {}", a))
            })
            .collect::<Result<Vec<SocketAddr>>>()?;

        let shutdown = Arc::new(Notify::new());

        Ok(Exporter {
            bind_addresses,
            shutdown,
        })
    }

    pub fn shutdown(&self) -> Arc<Notify> {
        self.shutdown.clone()
    }

    pub fn start(self) {
        for bind_address in self.bind_addresses {
            let shutdown = self.shutdown.clone();

            tokio::spawn(async move {
                info!("Starting prometheus server on {}", bind_address);

                let result = Server::run(
                    Arc::new(prometheus::default_registry().clone()),
                    bind_address,
                    shutdown.notified(),
                )
                .await;

                if let Err(e) = result {
                    error!("prometheus server on {} failed: {}", bind_address, e);
                }
            });
        }
    }
}
