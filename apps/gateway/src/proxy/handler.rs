//! The generic request handler every proxied route runs through.
//!
//! Per-request sequence: method matching happens at registration time
//! (wrong verbs land in the 405 default service), then session load, auth
//! gate, query/body transforms, dispatch, one bounded refresh retry, and
//! response shaping. Nothing here is shared across requests.

use std::collections::HashMap;

use actix_web::cookie::Cookie;
use actix_web::http::header;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use futures_util::StreamExt;
use serde_json::Value;

use super::route::{resolve_endpoint, RouteConfig};
use crate::auth;
use crate::error::{AppError, ErrorEnvelope};
use crate::session::Session;
use crate::state::AppState;

pub async fn handle(
    route: &RouteConfig,
    req: &HttpRequest,
    mut payload: web::Payload,
    state: &AppState,
) -> Result<HttpResponse, AppError> {
    let endpoint = resolve_endpoint(route.endpoint, req)?;
    let query = transformed_query(route, req)?;
    let body = parse_json_body(&read_body(&mut payload, route.body_limit).await?)?;

    let mut session = state.sessions.load(req);
    if route.require_auth && !session.is_authenticated() {
        // Resolved locally; the dispatcher is never reached.
        return Err(AppError::unauthorized());
    }

    if route.passthrough {
        return passthrough(route, state, &endpoint, &query, &mut session).await;
    }

    let mut envelope = state
        .upstream
        .dispatch(
            &route.method,
            &endpoint,
            &query,
            session.access_token.as_deref(),
            body.as_ref(),
            route.timeout,
        )
        .await?;

    // At most one refresh per inbound request: attempt 1 above, attempt 2
    // below, nothing recursive.
    let mut session_cookie = None;
    if envelope.status == StatusCode::UNAUTHORIZED && route.require_auth {
        match auth::refresh_session(state, &mut session).await {
            Ok(()) => {}
            // Transport failure during the refresh call is a 500, not a
            // reason to destroy the session.
            Err(err @ AppError::UpstreamUnavailable { .. }) => return Err(err),
            Err(_) => return Ok(fail_closed(state)),
        }
        // The backend consumed the old refresh token: the rotated pair must
        // reach the browser on every retry outcome, errors included.
        let rotated = state.sessions.issue(&session)?;

        envelope = match state
            .upstream
            .dispatch(
                &route.method,
                &endpoint,
                &query,
                session.access_token.as_deref(),
                body.as_ref(),
                route.timeout,
            )
            .await
        {
            Ok(envelope) => envelope,
            Err(err) => return Ok(with_cookie(err.error_response(), &rotated)),
        };
        if envelope.status == StatusCode::UNAUTHORIZED {
            // Fresh tokens were still rejected; destroy and fail closed.
            return Ok(fail_closed(state));
        }
        session_cookie = Some(rotated);
    }

    let shaped = if envelope.is_success() {
        match route.transform_response {
            Some(transform) => transform(envelope.body),
            None => envelope.body,
        }
    } else {
        // Error payloads pass through 1:1.
        envelope.body
    };

    let mut builder = HttpResponse::build(envelope.status);
    if let Some(cookie) = session_cookie {
        builder.cookie(cookie);
    }
    if shaped.is_null() {
        Ok(builder.finish())
    } else {
        Ok(builder.json(shaped))
    }
}

/// Byte-for-byte forwarding for export routes, with the same bounded
/// refresh retry as the JSON path.
async fn passthrough(
    route: &RouteConfig,
    state: &AppState,
    endpoint: &str,
    query: &[(String, String)],
    session: &mut Session,
) -> Result<HttpResponse, AppError> {
    let mut raw = state
        .upstream
        .dispatch_raw(
            &route.method,
            endpoint,
            query,
            session.access_token.as_deref(),
            route.timeout,
        )
        .await?;

    let mut session_cookie = None;
    if raw.status == StatusCode::UNAUTHORIZED && route.require_auth {
        match auth::refresh_session(state, session).await {
            Ok(()) => {}
            Err(err @ AppError::UpstreamUnavailable { .. }) => return Err(err),
            Err(_) => return Ok(fail_closed(state)),
        }
        let rotated = state.sessions.issue(session)?;

        raw = match state
            .upstream
            .dispatch_raw(
                &route.method,
                endpoint,
                query,
                session.access_token.as_deref(),
                route.timeout,
            )
            .await
        {
            Ok(raw) => raw,
            Err(err) => return Ok(with_cookie(err.error_response(), &rotated)),
        };
        if raw.status == StatusCode::UNAUTHORIZED {
            return Ok(fail_closed(state));
        }
        session_cookie = Some(rotated);
    }

    let mut builder = HttpResponse::build(raw.status);
    if let Some(content_type) = raw.content_type {
        builder.insert_header((header::CONTENT_TYPE, content_type));
    }
    if let Some(cookie) = session_cookie {
        builder.cookie(cookie);
    }
    Ok(builder.body(raw.body))
}

/// 401 that also clears the browser's session cookie.
fn fail_closed(state: &AppState) -> HttpResponse {
    HttpResponse::Unauthorized()
        .cookie(state.sessions.removal())
        .json(ErrorEnvelope::new("Authentication required"))
}

fn with_cookie(mut response: HttpResponse, cookie: &Cookie<'static>) -> HttpResponse {
    if let Err(err) = response.add_cookie(cookie) {
        tracing::warn!(error = %err, "failed to attach session cookie");
    }
    response
}

fn transformed_query(
    route: &RouteConfig,
    req: &HttpRequest,
) -> Result<Vec<(String, String)>, AppError> {
    let query = web::Query::<HashMap<String, String>>::from_query(req.query_string())
        .map_err(|_| AppError::bad_request("Malformed query string".to_string()))?
        .into_inner();

    match route.transform_query {
        Some(transform) => transform(&query),
        None => Ok(query.into_iter().collect()),
    }
}

/// Drain the request payload, enforcing the route's body limit. Writes past
/// the limit get the JSON error envelope, never actix's plain-text 413.
async fn read_body(payload: &mut web::Payload, limit: usize) -> Result<web::Bytes, AppError> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk =
            chunk.map_err(|e| AppError::bad_request(format!("Failed to read request body: {e}")))?;
        if body.len() + chunk.len() > limit {
            return Err(AppError::payload_too_large(limit));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body.freeze())
}

fn parse_json_body(body: &web::Bytes) -> Result<Option<Value>, AppError> {
    if body.is_empty() {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|_| AppError::bad_request("Request body must be valid JSON".to_string()))
}
