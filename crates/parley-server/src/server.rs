//! `ParleyServer` — axum HTTP server wiring.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::extract::State;
use axum::response::Json;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use parley_a2a::{AgentGateway, TranslateOptions};

use crate::chat::chat_handler;
use crate::config::{ServerConfig, UpstreamConfig};
use crate::health::{self, HealthResponse};
use crate::shutdown::ShutdownCoordinator;

/// Shared state accessible from axum handlers.
///
/// The only process-wide state is immutable configuration; translation
/// sessions own everything else per request.
#[derive(Clone)]
pub struct AppState {
    /// Upstream dispatch client.
    pub gateway: AgentGateway,
    /// Translation options (orchestrator tag).
    pub translate: TranslateOptions,
    /// When the server started.
    pub start_time: Instant,
}

/// The parley gateway server.
pub struct ParleyServer {
    config: ServerConfig,
    state: AppState,
    shutdown: Arc<ShutdownCoordinator>,
}

impl ParleyServer {
    /// Create a new server from injected configuration.
    #[must_use]
    pub fn new(config: ServerConfig, upstream: &UpstreamConfig) -> Self {
        let state = AppState {
            gateway: AgentGateway::new(upstream.url.clone()),
            translate: TranslateOptions {
                orchestrator: upstream.orchestrator.clone(),
            },
            start_time: Instant::now(),
        };

        Self {
            config,
            state,
            shutdown: Arc::new(ShutdownCoordinator::new()),
        }
    }

    /// Build the axum router with all routes and layers.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/chat", post(chat_handler))
            .route("/health", get(health_handler))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Get the shutdown coordinator.
    pub fn shutdown(&self) -> &Arc<ShutdownCoordinator> {
        &self.shutdown
    }

    /// Get the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Bind and serve.
    ///
    /// Returns the bound address and the serve task handle; the task ends
    /// when the shutdown coordinator fires.
    pub async fn listen(&self) -> std::io::Result<(SocketAddr, JoinHandle<()>)> {
        let listener =
            TcpListener::bind((self.config.host.as_str(), self.config.port)).await?;
        let addr = listener.local_addr()?;

        let app = self.router();
        let token = self.shutdown.token();
        let handle = tokio::spawn(async move {
            let serve = axum::serve(listener, app)
                .with_graceful_shutdown(async move { token.cancelled().await });
            if let Err(e) = serve.await {
                error!(error = %e, "server task exited with error");
            }
        });

        info!(%addr, "parley gateway listening");
        Ok((addr, handle))
    }
}

/// `GET /health`.
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(health::health_check(state.start_time))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
