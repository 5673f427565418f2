//! HTTP server for the welcome page and Prometheus metrics endpoint.

use std::net::SocketAddr;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tokio::sync::watch;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::collector::SharedCollector;

/// Exporter version reported on the welcome page.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const OPENMETRICS_CONTENT_TYPE: &str = "application/openmetrics-text; version=1.0.0; charset=utf-8";

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    collector: SharedCollector,
    metrics_path: String,
}

/// Body of the /health endpoint.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    sensors: usize,
    scrapes: u64,
}

/// Create the HTTP router.
pub fn create_router(collector: SharedCollector, metrics_path: &str) -> Router {
    let state = AppState {
        collector,
        metrics_path: metrics_path.to_string(),
    };

    Router::new()
        .route("/", get(index_handler))
        .route(metrics_path, get(metrics_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Handler for the welcome page.
async fn index_handler(State(state): State<AppState>) -> Response {
    let body = format!(
        "Welcome to the Prometheus Exporter for RFSoC!\n\
         The values are available at {}.\n\
         Version: {}\n",
        state.metrics_path, VERSION
    );

    (StatusCode::OK, body).into_response()
}

/// Handler for the metrics endpoint.
///
/// Every request re-reads all sensor files before encoding.
async fn metrics_handler(State(state): State<AppState>) -> Response {
    let collector = state.collector.clone();
    let rendered = tokio::task::spawn_blocking(move || {
        collector.refresh();
        collector.render()
    })
    .await;

    match rendered {
        Ok(Ok(body)) => (
            StatusCode::OK,
            [("content-type", OPENMETRICS_CONTENT_TYPE)],
            body,
        )
            .into_response(),
        Ok(Err(e)) => {
            warn!(error = %e, "Failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to encode metrics\n").into_response()
        }
        Err(e) => {
            warn!(error = %e, "Sensor refresh task failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "sensor refresh failed\n").into_response()
        }
    }
}

/// Handler for the /health endpoint.
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let stats = state.collector.stats();

    Json(HealthResponse {
        status: "healthy",
        version: VERSION,
        sensors: stats.sensors,
        scrapes: stats.scrapes,
    })
}

/// HTTP server configuration.
pub struct HttpServer {
    collector: SharedCollector,
    listen_addr: SocketAddr,
    metrics_path: String,
}

impl HttpServer {
    /// Create a new HTTP server.
    pub fn new(collector: SharedCollector, listen_addr: SocketAddr, metrics_path: String) -> Self {
        Self {
            collector,
            listen_addr,
            metrics_path,
        }
    }

    /// Run the HTTP server until the shutdown signal is received.
    pub async fn run(self, shutdown: watch::Receiver<bool>) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_addr)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", self.listen_addr, e))?;

        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener until the shutdown signal is received.
    pub async fn serve(
        self,
        listener: tokio::net::TcpListener,
        mut shutdown: watch::Receiver<bool>,
    ) -> anyhow::Result<()> {
        let router = create_router(self.collector, &self.metrics_path);
        let addr = listener.local_addr().unwrap_or(self.listen_addr);

        info!(
            addr = %addr,
            path = %self.metrics_path,
            "Starting Prometheus server"
        );

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                loop {
                    if shutdown.changed().await.is_err() {
                        break;
                    }
                    if *shutdown.borrow() {
                        break;
                    }
                }
                info!("HTTP server shutting down");
            })
            .await
            .map_err(|e| anyhow::anyhow!("HTTP server error: {}", e))?;

        info!("HTTP server stopped");
        Ok(())
    }
}
