//! API Server
//!
//! REST API for the RevokeScan approval scanner.
//!
//! # Features
//!
//! - **Scan**: reconstruct, verify, and risk-score a wallet's approvals
//! - **Share card**: shareable hygiene summary for a scan
//! - **Validation**: fast address/chain validation endpoints
//! - **OpenAPI**: Swagger documentation at `/docs`
//!
//! # Example
//!
//! ```ignore
//! use api_server::ApiServer;
//! use approval_core::Config;
//!
//! let server = ApiServer::new(Config::from_env());
//! server.run().await?;
//! ```

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;

use std::net::SocketAddr;

use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::{info, Level};

use approval_core::Config;

/// The API server.
pub struct ApiServer {
    config: Config,
    state: AppState,
}

impl ApiServer {
    /// Create a new API server from configuration.
    pub fn new(config: Config) -> Self {
        let state = AppState::new(config.clone());
        Self { config, state }
    }

    /// Run the server until shutdown.
    pub async fn run(self) -> anyhow::Result<()> {
        let cors = if self.config.api.frontend_origins.is_empty() {
            CorsLayer::permissive()
        } else {
            let origins: Vec<HeaderValue> = self
                .config
                .api
                .frontend_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        let router = create_router(self.state.into_arc())
            .layer(TraceLayer::new_for_http().on_response(DefaultOnResponse::new().level(Level::DEBUG)))
            .layer(cors);

        let addr: SocketAddr = format!("{}:{}", self.config.api.host, self.config.api.port).parse()?;
        info!(address = %addr, "Starting API server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}
