//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream catalog and video host locations.
    pub upstream: UpstreamConfig,

    /// Candidate probe settings.
    pub probe: ProbeConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Static asset locations.
    pub assets: AssetsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3002").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3002".to_string(),
        }
    }
}

/// Upstream catalog and video host configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the catalog API (search, info, cover images).
    pub catalog_base_url: String,

    /// Ordered video mount URLs. Candidates are tried in this order;
    /// the first mount whose probe succeeds wins.
    pub video_mounts: Vec<String>,

    /// Fixed known-good video, relayed verbatim in test mode.
    pub test_video_url: String,

    /// Relay the test video for every stream request (explicit opt-in).
    pub force_test_video: bool,

    /// User-Agent presented to the upstream.
    pub user_agent: String,

    /// Referer presented to the upstream for image requests.
    pub referer: String,

    /// Skip TLS certificate verification toward the upstream.
    /// The upstream host serves a certificate browsers reject.
    pub accept_invalid_certs: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            catalog_base_url: "https://app.sanime.net".to_string(),
            video_mounts: vec![
                "https://server.sanime.net/Video".to_string(),
                "https://server.sanime.net/Video2".to_string(),
            ],
            test_video_url: "https://server.sanime.net/Video/11649/1.mp4".to_string(),
            force_test_video: false,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120 Safari/537.36"
                .to_string(),
            referer: "https://app.sanime.net/".to_string(),
            accept_invalid_certs: true,
        }
    }
}

/// Candidate probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Per-attempt probe timeout in seconds (HEAD and ranged-GET each).
    pub timeout_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self { timeout_secs: 5 }
    }
}

/// Timeout configuration for upstream operations.
///
/// The relay phase deliberately carries no overall timeout: a playing
/// video holds its connection for as long as the client keeps reading.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Total request timeout for catalog API calls (search/info) in seconds.
    pub api_request_secs: u64,

    /// Total request timeout for proxied cover images in seconds.
    pub image_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            api_request_secs: 10,
            image_secs: 12,
        }
    }
}

/// Static asset locations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Directory served for static files (css/js/images).
    pub public_dir: String,

    /// Main page served at "/".
    pub index_page: String,

    /// Placeholder image returned when an upstream cover fetch fails.
    pub placeholder_image: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            public_dir: "public".to_string(),
            index_page: "pages/index.html".to_string(),
            placeholder_image: "public/img/noimage.svg".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
