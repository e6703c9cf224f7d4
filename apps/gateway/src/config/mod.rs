//! Gateway configuration, read once from the environment at startup.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::error::AppError;

/// Cookie name carrying the sealed session record.
pub const DEFAULT_COOKIE_NAME: &str = "eo_session";

/// Default session lifetime: 7 days.
pub const DEFAULT_SESSION_TTL_SECS: i64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the remote backend, e.g. `https://api.example.com/v1`.
    pub backend_url: String,
    /// 32-byte AES-256-GCM key for sealing the session cookie.
    pub session_key: [u8; 32],
    pub cookie_name: String,
    pub cookie_secure: bool,
    pub session_ttl_secs: i64,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    /// Environment variables must be set by the runtime environment:
    /// - GATEWAY_BACKEND_URL (required)
    /// - GATEWAY_SESSION_KEY (required, base64 of 32 bytes)
    /// - GATEWAY_HOST / GATEWAY_PORT
    /// - GATEWAY_COOKIE_NAME / GATEWAY_COOKIE_SECURE / GATEWAY_SESSION_TTL_SECS
    pub fn from_env() -> Result<Self, AppError> {
        let backend_url = std::env::var("GATEWAY_BACKEND_URL")
            .map_err(|_| AppError::config("GATEWAY_BACKEND_URL must be set".to_string()))?;
        let backend_url = backend_url.trim_end_matches('/').to_string();

        let key_raw = std::env::var("GATEWAY_SESSION_KEY")
            .map_err(|_| AppError::config("GATEWAY_SESSION_KEY must be set".to_string()))?;
        let session_key = decode_session_key(&key_raw)?;

        let host = std::env::var("GATEWAY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("GATEWAY_PORT")
            .unwrap_or_else(|_| "3001".to_string())
            .parse::<u16>()
            .map_err(|_| AppError::config("GATEWAY_PORT must be a valid port number".to_string()))?;

        let cookie_name = std::env::var("GATEWAY_COOKIE_NAME")
            .unwrap_or_else(|_| DEFAULT_COOKIE_NAME.to_string());
        let cookie_secure = std::env::var("GATEWAY_COOKIE_SECURE")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);
        let session_ttl_secs = std::env::var("GATEWAY_SESSION_TTL_SECS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(DEFAULT_SESSION_TTL_SECS);

        Ok(Self {
            backend_url,
            session_key,
            cookie_name,
            cookie_secure,
            session_ttl_secs,
            host,
            port,
        })
    }
}

fn decode_session_key(raw: &str) -> Result<[u8; 32], AppError> {
    let bytes = BASE64
        .decode(raw.trim())
        .map_err(|_| AppError::config("GATEWAY_SESSION_KEY must be valid base64".to_string()))?;
    bytes
        .try_into()
        .map_err(|_| AppError::config("GATEWAY_SESSION_KEY must decode to 32 bytes".to_string()))
}
