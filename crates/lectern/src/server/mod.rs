//! HTTP server for the lecture notes backend

pub mod routes;
pub mod state;

use std::net::SocketAddr;

use axum::http::HeaderValue;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::{LecternConfig, ServerConfig, DEFAULT_CORS_ORIGIN};
use crate::error::{Error, Result};

pub use state::AppState;

/// Lecture notes HTTP server
pub struct LecternServer {
    config: LecternConfig,
    state: AppState,
}

impl LecternServer {
    /// Create a server wired to the real providers. Fails when the
    /// provider API keys are missing from the environment.
    pub fn new(config: LecternConfig) -> Result<Self> {
        let state = AppState::new(config.clone())?;
        Ok(Self { config, state })
    }

    /// Create a server around prebuilt state
    pub fn with_state(config: LecternConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Address the server will bind to
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }

    /// Bind and serve until the process is stopped
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid server address: {}", e)))?;

        let router = build_router(&self.config.server, self.state);

        tracing::info!("Starting lecture notes server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind {}: {}", addr, e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| Error::internal(format!("Server error: {}", e)))?;

        Ok(())
    }
}

/// Assemble the router with all routes and middleware
pub fn build_router(config: &ServerConfig, state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/lecture", routes::lecture_routes(config.max_upload_size))
        .merge(routes::chat_routes(config.max_upload_size))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config))
}

/// CORS for the single configured frontend origin, with credentials.
/// Credentialed responses cannot use wildcards, so methods and headers
/// mirror whatever the preflight asks for.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .unwrap_or_else(|_| {
            tracing::warn!(
                "Invalid cors_origin '{}', falling back to {}",
                config.cors_origin,
                DEFAULT_CORS_ORIGIN
            );
            HeaderValue::from_static(DEFAULT_CORS_ORIGIN)
        });

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Liveness endpoint mirroring the response envelope of the API routes
async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": 200,
        "message": "Lecture notes backend is running",
    }))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
