//! Session-lifecycle routes. These are the only handlers that create or
//! destroy sessions; everything else goes through the generic proxy
//! handler. The refresh token leaves the gateway only via `/api/auth/token`,
//! which is gated on an authenticated session.

use actix_web::http::Method;
use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::{json, Value};

use crate::auth;
use crate::error::{AppError, ErrorEnvelope};
use crate::proxy::route::{READ_TIMEOUT, WRITE_TIMEOUT};
use crate::session::Session;
use crate::state::AppState;

/// Forward credentials to the backend, then seal the returned token pair
/// and user into a fresh session cookie. Tokens are never included in the
/// login response body.
async fn login(
    body: web::Json<Value>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let envelope = state
        .upstream
        .dispatch(
            &Method::POST,
            auth::LOGIN_ENDPOINT,
            &[],
            None,
            Some(&body),
            WRITE_TIMEOUT,
        )
        .await?;

    if !envelope.is_success() {
        return Err(AppError::upstream(envelope.status, envelope.body));
    }

    let (access_token, refresh_token) = auth::token_pair(&envelope.body)
        .ok_or_else(|| AppError::internal("login response is missing the token pair".to_string()))?;
    let user = auth::user_profile(&envelope.body)
        .ok_or_else(|| AppError::internal("login response is missing the user".to_string()))?;

    let session = Session::authenticated(user.clone(), access_token, refresh_token);
    let cookie = state.sessions.issue(&session)?;

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(json!({ "user": user, "isAuthenticated": true })))
}

/// Destroy the local session unconditionally; the upstream notify is
/// best-effort and never blocks the logout.
async fn logout(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let session = state.sessions.load(&req);

    if let Some(token) = session.access_token.as_deref() {
        let result = state
            .upstream
            .dispatch(
                &Method::POST,
                auth::LOGOUT_ENDPOINT,
                &[],
                Some(token),
                None,
                READ_TIMEOUT,
            )
            .await;
        if let Err(err) = result {
            tracing::warn!(error = %err, "upstream logout notify failed");
        }
    }

    Ok(HttpResponse::Ok()
        .cookie(state.sessions.removal())
        .json(json!({ "message": "Logged out" })))
}

/// Force a token refresh outside the usual 401-triggered path.
async fn refresh(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let mut session = state.sessions.load(&req);
    if !session.is_authenticated() {
        return Err(AppError::unauthorized());
    }

    match auth::refresh_session(&state, &mut session).await {
        Ok(()) => {
            let cookie = state.sessions.issue(&session)?;
            Ok(HttpResponse::Ok()
                .cookie(cookie)
                .json(json!({ "user": session.user, "isAuthenticated": true })))
        }
        Err(err @ AppError::UpstreamUnavailable { .. }) => Err(err),
        Err(_) => Ok(HttpResponse::Unauthorized()
            .cookie(state.sessions.removal())
            .json(ErrorEnvelope::new("Authentication required"))),
    }
}

/// Dedicated token-retrieval route: the one place the refresh token is
/// exposed to the browser, and only behind an authenticated session.
async fn token(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let session = state.sessions.load(&req);
    if !session.is_authenticated() {
        return Err(AppError::unauthorized());
    }

    Ok(HttpResponse::Ok().json(json!({
        "accessToken": session.access_token,
        "refreshToken": session.refresh_token,
    })))
}

/// Identity straight from the sealed session; no upstream call.
async fn me(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let session = state.sessions.load(&req);
    if !session.is_authenticated() {
        return Err(AppError::unauthorized());
    }

    Ok(HttpResponse::Ok().json(json!({ "user": session.user, "isAuthenticated": true })))
}

async fn post_only() -> Result<HttpResponse, AppError> {
    Err(AppError::method_not_allowed("POST"))
}

async fn get_only() -> Result<HttpResponse, AppError> {
    Err(AppError::method_not_allowed("GET"))
}

/// Login body parsing failures also answer with the JSON envelope, never
/// actix's plain-text default.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::bad_request(format!("Invalid JSON body: {err}")).into())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/auth/login")
            .app_data(json_config())
            .route(web::post().to(login))
            .default_service(web::to(post_only)),
    );
    cfg.service(
        web::resource("/api/auth/logout")
            .route(web::post().to(logout))
            .default_service(web::to(post_only)),
    );
    cfg.service(
        web::resource("/api/auth/refresh")
            .route(web::post().to(refresh))
            .default_service(web::to(post_only)),
    );
    cfg.service(
        web::resource("/api/auth/token")
            .route(web::get().to(token))
            .default_service(web::to(get_only)),
    );
    cfg.service(
        web::resource("/api/auth/me")
            .route(web::get().to(me))
            .default_service(web::to(get_only)),
    );
}
