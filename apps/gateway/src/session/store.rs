use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::HttpRequest;

use super::sealed::SealedCodec;
use super::Session;
use crate::config::AppConfig;
use crate::error::AppError;

/// Reads and writes the sealed session cookie for one request/response pair.
///
/// `load` never fails: an absent or corrupt cookie yields an anonymous
/// session. `issue`/`removal` produce the `Set-Cookie` value the handler
/// attaches to the response; a later cookie overwrites an earlier one.
pub struct SessionStore {
    codec: SealedCodec,
    cookie_name: String,
    ttl: Duration,
    secure: bool,
}

impl SessionStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            codec: SealedCodec::new(config.session_key),
            cookie_name: config.cookie_name.clone(),
            ttl: Duration::seconds(config.session_ttl_secs),
            secure: config.cookie_secure,
        }
    }

    pub fn load(&self, req: &HttpRequest) -> Session {
        let cookie = match req.cookie(&self.cookie_name) {
            Some(cookie) => cookie,
            None => return Session::anonymous(),
        };

        let plaintext = match self.codec.open(cookie.value()) {
            Ok(plaintext) => plaintext,
            Err(err) => {
                // Corrupt cookie is equivalent to no session; the request
                // proceeds anonymously.
                tracing::warn!(error = %err, "discarding unreadable session cookie");
                return Session::anonymous();
            }
        };

        match serde_json::from_slice(&plaintext) {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!(error = %err, "discarding undecodable session record");
                Session::anonymous()
            }
        }
    }

    /// Seal a session into a cookie. Refuses partial records: the session
    /// invariant is fully authenticated or nothing.
    pub fn issue(&self, session: &Session) -> Result<Cookie<'static>, AppError> {
        if !session.is_authenticated() {
            return Err(AppError::internal(
                "refusing to persist a partially-populated session".to_string(),
            ));
        }

        let plaintext = serde_json::to_vec(session)
            .map_err(|e| AppError::internal(format!("failed to serialize session: {e}")))?;
        let sealed = self
            .codec
            .seal(&plaintext)
            .map_err(|e| AppError::internal(format!("failed to seal session: {e}")))?;

        Ok(self.base_cookie(sealed).max_age(self.ttl).finish())
    }

    /// Expired empty cookie that clears the session in the browser.
    pub fn removal(&self) -> Cookie<'static> {
        let mut cookie = self.base_cookie(String::new()).finish();
        cookie.make_removal();
        cookie
    }

    fn base_cookie(&self, value: String) -> actix_web::cookie::CookieBuilder<'static> {
        Cookie::build(self.cookie_name.clone(), value)
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;
    use crate::session::SessionUser;

    fn test_config() -> AppConfig {
        AppConfig {
            backend_url: "http://backend.test".into(),
            session_key: [9u8; 32],
            cookie_name: "eo_session".into(),
            cookie_secure: false,
            session_ttl_secs: 3600,
            host: "127.0.0.1".into(),
            port: 0,
        }
    }

    fn full_session() -> Session {
        Session::authenticated(
            SessionUser {
                id: "u1".into(),
                name: "Ada".into(),
                email: "ada@example.com".into(),
                role: "organizer".into(),
            },
            "access".into(),
            "refresh".into(),
        )
    }

    #[test]
    fn issue_then_load_roundtrip() {
        let store = SessionStore::new(&test_config());
        let cookie = store.issue(&full_session()).unwrap();

        let req = TestRequest::default()
            .cookie(cookie)
            .to_http_request();
        let loaded = store.load(&req);

        assert!(loaded.is_authenticated());
        assert_eq!(loaded.access_token.as_deref(), Some("access"));
        assert_eq!(loaded.user.unwrap().email, "ada@example.com");
    }

    #[test]
    fn missing_cookie_loads_anonymous() {
        let store = SessionStore::new(&test_config());
        let req = TestRequest::default().to_http_request();
        assert!(!store.load(&req).is_authenticated());
    }

    #[test]
    fn corrupt_cookie_loads_anonymous() {
        let store = SessionStore::new(&test_config());
        let req = TestRequest::default()
            .cookie(Cookie::new("eo_session", "complete-garbage"))
            .to_http_request();
        assert!(!store.load(&req).is_authenticated());
    }

    #[test]
    fn cookie_sealed_with_other_key_loads_anonymous() {
        let store = SessionStore::new(&test_config());
        let mut other = test_config();
        other.session_key = [1u8; 32];
        let foreign = SessionStore::new(&other).issue(&full_session()).unwrap();

        let req = TestRequest::default().cookie(foreign).to_http_request();
        assert!(!store.load(&req).is_authenticated());
    }

    #[test]
    fn issue_refuses_partial_session() {
        let store = SessionStore::new(&test_config());
        let mut partial = full_session();
        partial.refresh_token = None;
        assert!(store.issue(&partial).is_err());
    }

    #[test]
    fn cookie_attributes_are_locked_down() {
        let store = SessionStore::new(&test_config());
        let cookie = store.issue(&full_session()).unwrap();
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    }
}
