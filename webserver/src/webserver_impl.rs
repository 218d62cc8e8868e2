//! Main webserver implementation

use std::net::SocketAddr;

use axum::routing::{get, post};
use axum::Router;
use generator::IconGenerator;
use shared::{logging, process_info, ProcessId};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::{WebServerError, WebServerResult};
use crate::state::WebServerState;
use crate::web::handlers::{generate_icon, health_check, service_info, GENERATE_PATH, HEALTH_PATH};

/// HTTP adapter around a shared `IconGenerator`
#[derive(Clone)]
pub struct WebServer {
    state: WebServerState,
}

impl WebServer {
    pub fn new(generator: IconGenerator) -> Self {
        Self {
            state: WebServerState::new(generator),
        }
    }

    /// Build the Axum router with all routes
    pub fn build_router(&self) -> Router {
        Router::new()
            .route("/", get(service_info))
            .route(HEALTH_PATH, get(health_check))
            .route(GENERATE_PATH, post(generate_icon))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    // Permissive CORS: the API is called from browser front ends on other origins
                    .layer(CorsLayer::permissive())
                    .into_inner(),
            )
            .with_state(self.state.clone())
    }

    /// Serve until Ctrl+C
    pub async fn run(&self, addr: SocketAddr) -> WebServerResult<()> {
        let router = self.build_router();

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| WebServerError::ServerStartupFailed {
                address: addr.to_string(),
                message: e.to_string(),
            })?;

        process_info!(ProcessId::current(), "🌐 Web server listening on http://{}", addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => logging::log_shutdown(ProcessId::current(), "Received Ctrl+C signal"),
        Err(err) => logging::log_error(ProcessId::current(), "Signal handling", &err),
    }
}
