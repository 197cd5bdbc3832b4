use crate::configuration::HttpConfig;
use crate::exporter::StatusReader;

use anyhow::Context;
use anyhow::Result;

use hyper::service::make_service_fn;
use hyper::service::service_fn;
use hyper::Body;
use hyper::Method;
use hyper::Request;
use hyper::Response;
use hyper::Server;
use hyper::StatusCode;

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;

use tracing::error;
use tracing::info;

fn response(status: StatusCode, content_type: &str, body: Body) -> Response<Body> {
    let mut response = Response::new(body);

    *response.status_mut() = status;

    if let Ok(value) = content_type.parse() {
        response.headers_mut().insert(hyper::header::CONTENT_TYPE, value);
    }

    response
}

/// Answer one status request from the latest snapshot
pub async fn handle(
    request: Request<Body>,
    status: StatusReader,
) -> Result<Response<Body>, Infallible> {
    let response = match (request.method(), request.uri().path()) {
        (&Method::GET, "/") => {
            let snapshot = status.borrow().clone();

            match serde_json::to_vec(&snapshot) {
                Ok(json) => response(StatusCode::OK, "application/json", Body::from(json)),
                Err(e) => {
                    error!("Failed to encode status: {}", e);

                    response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "text/plain",
                        Body::from(format!("Failed to encode status: {}", e)),
                    )
                }
            }
        }
        (&Method::GET, "/health") => response(StatusCode::OK, "text/plain", Body::from("OK")),
        _ => response(StatusCode::NOT_FOUND, "text/plain", Body::from("Not Found")),
    };

    Ok(response)
}

/// Read-only JSON status server
pub struct StatusServer {
    bind_address: SocketAddr,
    status: StatusReader,
}

impl StatusServer {
    pub fn new(config: &HttpConfig, status: StatusReader) -> Result<Self> {
        let bind_address: SocketAddr = config.bind_address.parse().with_context(|| {
            format!("Can't parse HTTP listen address {}", config.bind_address)
        })?;

        Ok(StatusServer {
            bind_address,
            status,
        })
    }

    /// Bind the listener, then serve on a new task until `shutdown` completes
    pub fn start<F>(self, shutdown: F) -> Result<SocketAddr>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let status = self.status;

        let make_service = make_service_fn(move |_conn| {
            let status = status.clone();

            async move {
                Ok::<_, Infallible>(service_fn(move |request| handle(request, status.clone())))
            }
        });

        let builder = Server::try_bind(&self.bind_address)
            .with_context(|| format!("Unable to bind HTTP server to {}", self.bind_address))?;

        let server = builder.serve(make_service);
        let local_address = server.local_addr();

        info!("Starting HTTP status server on {}", local_address);

        tokio::spawn(async move {
            if let Err(e) = server.with_graceful_shutdown(shutdown).await {
                error!("HTTP status server error: {}", e);
            }
        });

        Ok(local_address)
    }
}
