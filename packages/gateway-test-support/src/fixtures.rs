//! Ready-made gateway fixtures: configuration, application state, and
//! sealed session cookies built with a fixed key. Only ever linked into
//! test binaries; the key never reaches the production build.

use gateway::config::AppConfig;
use gateway::error::AppError;
use gateway::session::{Session, SessionStore, SessionUser};
use gateway::state::AppState;

pub const TEST_SESSION_KEY: [u8; 32] = [42u8; 32];

pub fn test_config(backend_url: &str) -> AppConfig {
    AppConfig {
        backend_url: backend_url.to_string(),
        session_key: TEST_SESSION_KEY,
        cookie_name: "eo_session".to_string(),
        cookie_secure: false,
        session_ttl_secs: 3600,
        host: "127.0.0.1".to_string(),
        port: 0,
    }
}

pub fn test_state(backend_url: &str) -> AppState {
    AppState::new(&test_config(backend_url)).expect("build test state")
}

pub fn test_user() -> SessionUser {
    SessionUser {
        id: "u1".to_string(),
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        role: "organizer".to_string(),
    }
}

/// Sealed cookie for an authenticated session with the given token pair.
pub fn session_cookie(
    backend_url: &str,
    access_token: &str,
    refresh_token: &str,
) -> Result<actix_web::cookie::Cookie<'static>, AppError> {
    let store = SessionStore::new(&test_config(backend_url));
    let session = Session::authenticated(
        test_user(),
        access_token.to_string(),
        refresh_token.to_string(),
    );
    store.issue(&session)
}
