//! Anime Catalog & Media Gateway
//!
//! A thin gateway that re-exposes a third-party anime catalog and video
//! host under a local origin, built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                  GATEWAY                     │
//!                      │                                              │
//!   Browser UI         │  ┌─────────┐   ┌──────────┐   ┌──────────┐  │
//!   ──────────────────▶│  │  http   │──▶│ catalog  │──▶│ upstream │  │──▶ catalog API
//!   /api/search, /     │  │ server  │   │ client + │   │  (JSON)  │  │
//!                      │  └────┬────┘   │ rewrite  │   └──────────┘  │
//!                      │       │        └──────────┘                 │
//!                      │       ▼                                     │
//!   <video> element    │  ┌──────────┐  ┌──────────┐  ┌──────────┐   │
//!   ──────────────────▶│  │  media   │─▶│  probe   │─▶│  relay   │   │──▶ video mounts
//!   /stream/{id}/{ep}  │  │candidates│  │HEAD→GET─0│  │ streamed │   │
//!                      │  └──────────┘  └──────────┘  └──────────┘   │
//!                      │                                              │
//!                      │  ┌────────────────────────────────────────┐  │
//!                      │  │  config · observability · lifecycle    │  │
//!                      │  └────────────────────────────────────────┘  │
//!                      └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use tokio::net::TcpListener;

use ani_gateway::config::loader::load_config;
use ani_gateway::config::GatewayConfig;
use ani_gateway::http::HttpServer;
use ani_gateway::lifecycle::{signals, Shutdown};
use ani_gateway::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "ani-gateway")]
#[command(about = "Anime catalog and media gateway", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Override the listener port from config.
    #[arg(long)]
    port: Option<u16>,

    /// Relay the fixed test video for every stream request.
    #[arg(long)]
    test_video: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(port) = cli.port {
        config.listener.bind_address = format!("0.0.0.0:{port}");
    }
    if cli.test_video {
        config.upstream.force_test_video = true;
    }

    logging::init(&config.observability);

    tracing::info!("ani-gateway v0.1.0 starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        catalog = %config.upstream.catalog_base_url,
        mounts = config.upstream.video_mounts.len(),
        test_video = config.upstream.force_test_video,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => {
                tracing::error!(
                    metrics_address = %config.observability.metrics_address,
                    "Failed to parse metrics address"
                );
            }
        }
    }

    let shutdown = Shutdown::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        signals::wait().await;
        trigger.trigger();
    });

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
