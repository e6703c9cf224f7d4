use crate::config::AppConfig;
use crate::error::AppError;
use crate::proxy::UpstreamClient;
use crate::session::SessionStore;

/// Shared application state. Both members are read-only after startup; all
/// per-request mutation happens on the `Session` value object.
pub struct AppState {
    pub sessions: SessionStore,
    pub upstream: UpstreamClient,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        Ok(Self {
            sessions: SessionStore::new(config),
            upstream: UpstreamClient::new(config.backend_url.clone())?,
        })
    }
}
