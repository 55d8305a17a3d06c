//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, routes, middleware)
//!     → handlers.rs (catalog proxying, image proxy, stream orchestration)
//!     → request.rs / response.rs (request IDs, base URL, error bodies)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{public_base_url, MakeRequestUuid, X_REQUEST_ID};
pub use server::HttpServer;
