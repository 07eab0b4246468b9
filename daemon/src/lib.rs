//! Daemon library for tripwire
//!
//! The daemon exposes a single HTTP trigger: any request to the listener runs
//! the full probe script once and answers with the aggregated result.

#![allow(unused_crate_dependencies)]

pub mod simple_error;

#[cfg(test)]
mod simple_error_tests;

pub use simple_error::{DaemonError, Result};

use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, Server, StatusCode};
use schema::{DaemonConfig, RunResponse};
use std::convert::Infallible;
use std::future::Future;
use std::net::TcpListener;
use std::sync::Arc;
use tracing::{error, info, warn};
use tripwire_core::{ProbeOptions, ProbeSource, Runner, ScriptFile};

/// The trigger daemon
#[derive(Debug, Clone)]
pub struct Daemon {
    config: DaemonConfig,
    runner: Arc<Runner>,
}

impl Daemon {
    /// Create a daemon that reloads `config.script_path` on every trigger
    #[must_use]
    pub fn new(config: DaemonConfig) -> Self {
        let source = Arc::new(ScriptFile::new(&config.script_path));
        let runner = Runner::new(source, ProbeOptions::from(&config));
        Self::with_runner(config, runner)
    }

    /// Create a daemon around an already configured runner
    #[must_use]
    pub fn with_runner(config: DaemonConfig, runner: Runner) -> Self {
        Self {
            config,
            runner: Arc::new(runner),
        }
    }

    /// Daemon configuration
    pub fn config(&self) -> &DaemonConfig {
        &self.config
    }

    /// Check that the script exists and parses before accepting triggers
    ///
    /// # Errors
    /// Returns [`DaemonError::ScriptError`] if the script cannot be loaded.
    pub async fn preflight(&self) -> Result<usize> {
        let source = ScriptFile::new(&self.config.script_path);
        if !source.path().exists() {
            return Err(DaemonError::ConfigError(format!(
                "file does not exist: {}",
                source.path().display()
            )));
        }
        let probes = source.load().await?;
        Ok(probes.len())
    }

    /// Bind the trigger listener on the configured host and port
    ///
    /// # Errors
    /// Returns an error if the address cannot be bound.
    pub fn bind(&self) -> Result<TcpListener> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        TcpListener::bind(&addr)
            .map_err(|e| DaemonError::ServerError(format!("Failed to bind to {addr}: {e}")))
    }

    /// Serve triggers on `listener` until `shutdown` resolves
    ///
    /// Each inbound request runs the script to completion before its response
    /// is written. Overlapping requests run independently.
    ///
    /// # Errors
    /// Returns an error if the listener cannot be adopted or the server fails.
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        listener.set_nonblocking(true)?;
        let addr = listener.local_addr()?;

        let runner = self.runner.clone();
        let make_svc = make_service_fn(move |_conn| {
            let runner = runner.clone();
            async move {
                Ok::<_, Infallible>(service_fn(move |req| {
                    let runner = runner.clone();
                    async move { Ok::<_, Infallible>(handle_trigger(&runner, req).await) }
                }))
            }
        });

        let server = Server::from_tcp(listener)
            .map_err(|e| DaemonError::ServerError(format!("Failed to listen on {addr}: {e}")))?
            .serve(make_svc);

        info!(
            "Start process on {}, for the script path {}",
            addr,
            self.config.script_path.display()
        );

        server
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| DaemonError::ServerError(e.to_string()))
    }

    /// Bind and serve until Ctrl+C
    ///
    /// # Errors
    /// Returns an error if binding or serving fails.
    pub async fn start(&self) -> Result<()> {
        let listener = self.bind()?;
        self.serve(listener, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
            info!("Received Ctrl+C, shutting down...");
        })
        .await
    }
}

/// Run the script once and render the result as the trigger response
pub async fn handle_trigger(runner: &Runner, req: Request<Body>) -> Response<Body> {
    info!("Trigger received: {} {}", req.method(), req.uri());

    let (status, body) = match runner.run().await {
        Ok(report) if report.is_success() => {
            info!("Tests success");
            (StatusCode::OK, report.to_response())
        }
        Ok(report) => {
            let response = report.to_response();
            error!("Tests failure: {}", response.message);
            (StatusCode::INTERNAL_SERVER_ERROR, response)
        }
        Err(e) => {
            error!(code = e.code(), "Probe script failed to load: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                RunResponse::load_error(e.to_string()),
            )
        }
    };

    json_response(status, &body)
}

fn json_response(status: StatusCode, body: &RunResponse) -> Response<Body> {
    match serde_json::to_vec(body) {
        Ok(bytes) => {
            let mut response = Response::new(Body::from(bytes));
            *response.status_mut() = status;
            response
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            response
        }
        Err(e) => {
            error!("Failed to serialize trigger response: {}", e);
            let mut response = Response::new(Body::from(body.message.clone()));
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
        }
    }
}
