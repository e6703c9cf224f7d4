#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod auth;
pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod proxy;
pub mod routes;
pub mod session;
pub mod state;

// Re-exports for public API
pub use config::AppConfig;
pub use error::{AppError, ErrorEnvelope};
pub use middleware::cors::cors_middleware;
pub use middleware::request_trace::RequestTrace;
pub use proxy::{Envelope, ProxyResource, RouteConfig, UpstreamClient};
pub use session::{Session, SessionStore, SessionUser};
pub use state::AppState;
