//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, API timeouts)
//! - Serve static assets (UI page, js/css, placeholder image)
//! - Bind server to listener, with graceful shutdown
//!
//! The stream and image routes deliberately sit outside the timeout
//! layer: a relayed video holds its connection for as long as the
//! player keeps reading, and carries its own probe/image timeouts.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::catalog::CatalogClient;
use crate::config::GatewayConfig;
use crate::http::handlers;
use crate::http::request::MakeRequestUuid;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub catalog: CatalogClient,
    /// Client for video mounts and cover images. Carries a connect
    /// timeout but no total timeout; per-request deadlines are applied
    /// where needed (probe, image) and never on the relay itself.
    pub upstream: reqwest::Client,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: Arc<GatewayConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, reqwest::Error> {
        let catalog = CatalogClient::new(&config.upstream, &config.timeouts)?;
        let upstream = reqwest::Client::builder()
            .user_agent(&config.upstream.user_agent)
            .danger_accept_invalid_certs(config.upstream.accept_invalid_certs)
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            // 3xx from a mount is forwarded to the client, not chased.
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        let config = Arc::new(config);
        let state = AppState {
            config: config.clone(),
            catalog,
            upstream,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let api = Router::new()
            .route("/api/search", get(handlers::search))
            .route("/api/info", get(handlers::info_by_query))
            .route("/api/info/{id}", get(handlers::info_by_path))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.api_request_secs,
            )));

        Router::new()
            .route("/stream/{media_id}/{episode}", get(handlers::stream))
            .route("/api/image/{file}", get(handlers::image))
            .route("/favicon.ico", get(handlers::favicon))
            .merge(api)
            .route_service("/", ServeFile::new(&config.assets.index_page))
            .fallback_service(ServeDir::new(&config.assets.public_dir))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}
