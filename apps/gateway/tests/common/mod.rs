#![allow(dead_code)]

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::test::TestRequest;
use gateway::session::{Session, SessionStore};
use gateway_test_support::fixtures::test_config;

// Logging is auto-installed for test binaries
#[ctor::ctor]
fn init_logging() {
    gateway_test_support::logging::init();
}

/// Pull the session cookie off a response, if one was set.
pub fn session_cookie_from(resp: &ServiceResponse) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == "eo_session")
        .map(|c| c.into_owned())
}

/// Decode a sealed session cookie back into a `Session` using the shared
/// test key.
pub fn decode_session(backend_url: &str, cookie: Cookie<'static>) -> Session {
    let store = SessionStore::new(&test_config(backend_url));
    let req = TestRequest::default().cookie(cookie).to_http_request();
    store.load(&req)
}
