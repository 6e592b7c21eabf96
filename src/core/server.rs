//! Server Implementation
//!
//! HTTP 服务器启动和路由装配

use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{require_admin, require_auth};
use crate::core::{Config, ServerState};

/// 装配完整应用路由
///
/// 中间件自外向内：Trace → CORS → require_auth → require_admin → 路由。
pub fn build_app(state: ServerState) -> Router {
    Router::new()
        .merge(crate::api::health::router())
        .merge(crate::api::products::router())
        .merge(crate::api::categories::router())
        .with_state(state.clone())
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state, require_auth))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        // Create application state if not provided
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await?,
        };

        let app = build_app(state);

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!("🪸 Reef Store server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutting down...");
}
