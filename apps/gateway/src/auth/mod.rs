//! Token lifecycle: the single refresh primitive shared by the generic
//! handler and the specialized auth routes. There is exactly one refresh
//! policy in the gateway; a failed refresh always clears the session.

use actix_web::http::Method;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::proxy::route::READ_TIMEOUT;
use crate::session::{Session, SessionUser};
use crate::state::AppState;

pub const LOGIN_ENDPOINT: &str = "/auth/login";
pub const LOGOUT_ENDPOINT: &str = "/auth/logout";
pub const REFRESH_ENDPOINT: &str = "/auth/refresh";

/// Exchange the stored refresh token for a new token pair and rotate the
/// session in place. On a backend rejection the session is cleared and the
/// caller gets `Unauthorized`; transport failures propagate as 500 without
/// touching the session.
pub async fn refresh_session(state: &AppState, session: &mut Session) -> Result<(), AppError> {
    let refresh_token = session
        .refresh_token
        .clone()
        .ok_or_else(AppError::unauthorized)?;

    let envelope = state
        .upstream
        .dispatch(
            &Method::POST,
            REFRESH_ENDPOINT,
            &[],
            None,
            Some(&json!({ "refreshToken": refresh_token })),
            READ_TIMEOUT,
        )
        .await?;

    if !envelope.is_success() {
        session.clear();
        return Err(AppError::unauthorized());
    }

    match token_pair(&envelope.body) {
        Some((access_token, refresh_token)) => {
            session.rotate_tokens(access_token, refresh_token);
            Ok(())
        }
        None => {
            session.clear();
            Err(AppError::internal(
                "refresh response is missing the token pair".to_string(),
            ))
        }
    }
}

/// Extract `accessToken`/`refreshToken` from a backend auth payload,
/// accepting both top-level and `data`-wrapped shapes.
pub fn token_pair(body: &Value) -> Option<(String, String)> {
    let scope = body.get("data").unwrap_or(body);
    let access = scope.get("accessToken")?.as_str()?.to_string();
    let refresh = scope.get("refreshToken")?.as_str()?.to_string();
    Some((access, refresh))
}

/// Extract the user object from a backend auth payload.
pub fn user_profile(body: &Value) -> Option<SessionUser> {
    let scope = body.get("data").unwrap_or(body);
    let user = scope.get("user")?;
    serde_json::from_value(user.clone()).ok()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn token_pair_from_top_level() {
        let body = json!({"accessToken": "at", "refreshToken": "rt"});
        assert_eq!(token_pair(&body), Some(("at".into(), "rt".into())));
    }

    #[test]
    fn token_pair_from_data_wrapper() {
        let body = json!({"data": {"accessToken": "at", "refreshToken": "rt"}});
        assert_eq!(token_pair(&body), Some(("at".into(), "rt".into())));
    }

    #[test]
    fn token_pair_requires_both_tokens() {
        assert!(token_pair(&json!({"accessToken": "at"})).is_none());
        assert!(token_pair(&json!({})).is_none());
        assert!(token_pair(&json!({"accessToken": 1, "refreshToken": "rt"})).is_none());
    }

    #[test]
    fn user_profile_tolerates_missing_fields() {
        let body = json!({"user": {"id": "u1", "email": "ada@example.com"}});
        let user = user_profile(&body).unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.role, "");
    }

    #[test]
    fn user_profile_requires_user_object() {
        assert!(user_profile(&json!({"data": {}})).is_none());
    }
}
