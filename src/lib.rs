//! Anime catalog and media gateway library.

pub mod catalog;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod media;
pub mod observability;

pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
