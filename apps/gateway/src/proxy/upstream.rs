//! The backend dispatcher: one bounded HTTP call per attempt.

use std::time::Duration;

use actix_web::http::{Method, StatusCode};
use serde_json::Value;

use crate::error::AppError;

/// Normalized upstream result. The status is always the upstream's own when
/// a response was received; transport failures never produce an `Envelope`,
/// they surface as [`AppError::UpstreamUnavailable`].
#[derive(Debug, Clone)]
pub struct Envelope {
    pub status: StatusCode,
    pub body: Value,
}

impl Envelope {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Byte-passthrough variant for export routes.
#[derive(Debug, Clone)]
pub struct RawEnvelope {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::config(format!("failed to build upstream client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Dispatch one attempt and capture the upstream's status and JSON body.
    pub async fn dispatch(
        &self,
        method: &Method,
        endpoint: &str,
        query: &[(String, String)],
        bearer: Option<&str>,
        body: Option<&Value>,
        timeout: Duration,
    ) -> Result<Envelope, AppError> {
        let response = self
            .send(method, endpoint, query, bearer, body, timeout)
            .await?;
        let status = convert_status(response.status())?;

        let text = response
            .text()
            .await
            .map_err(|e| AppError::upstream_unavailable(format!("failed to read body: {e}")))?;
        let body = parse_body(&text, status);

        Ok(Envelope { status, body })
    }

    /// Dispatch and keep the upstream body byte-for-byte (CSV exports).
    pub async fn dispatch_raw(
        &self,
        method: &Method,
        endpoint: &str,
        query: &[(String, String)],
        bearer: Option<&str>,
        timeout: Duration,
    ) -> Result<RawEnvelope, AppError> {
        let response = self
            .send(method, endpoint, query, bearer, None, timeout)
            .await?;
        let status = convert_status(response.status())?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::upstream_unavailable(format!("failed to read body: {e}")))?
            .to_vec();

        Ok(RawEnvelope {
            status,
            content_type,
            body,
        })
    }

    async fn send(
        &self,
        method: &Method,
        endpoint: &str,
        query: &[(String, String)],
        bearer: Option<&str>,
        body: Option<&Value>,
        timeout: Duration,
    ) -> Result<reqwest::Response, AppError> {
        let method = reqwest::Method::from_bytes(method.as_str().as_bytes())
            .map_err(|_| AppError::internal(format!("unsupported method: {method}")))?;
        let url = format!("{}{}", self.base_url, endpoint);

        let mut request = self.http.request(method, &url).timeout(timeout);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        request.send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::upstream_unavailable(format!("upstream timed out after {timeout:?}"))
            } else {
                AppError::upstream_unavailable(format!("upstream unreachable: {e}"))
            }
        })
    }
}

fn convert_status(status: reqwest::StatusCode) -> Result<StatusCode, AppError> {
    StatusCode::from_u16(status.as_u16())
        .map_err(|_| AppError::internal(format!("unmappable upstream status: {status}")))
}

/// The browser always receives JSON: non-JSON upstream bodies are wrapped,
/// empty bodies become null.
fn parse_body(text: &str, status: StatusCode) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| {
        let message = if text.len() > 512 {
            status
                .canonical_reason()
                .unwrap_or("Upstream error")
                .to_string()
        } else {
            text.to_string()
        };
        serde_json::json!({ "message": message })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_parses_to_null() {
        assert_eq!(parse_body("", StatusCode::NO_CONTENT), Value::Null);
        assert_eq!(parse_body("  \n", StatusCode::OK), Value::Null);
    }

    #[test]
    fn json_body_is_kept_verbatim() {
        let body = parse_body(r#"{"message":"nope","code":42}"#, StatusCode::BAD_GATEWAY);
        assert_eq!(body["message"], "nope");
        assert_eq!(body["code"], 42);
    }

    #[test]
    fn non_json_body_is_wrapped() {
        let body = parse_body("Bad Gateway", StatusCode::BAD_GATEWAY);
        assert_eq!(body["message"], "Bad Gateway");
    }

    #[test]
    fn oversized_text_body_falls_back_to_reason() {
        let long = "x".repeat(1024);
        let body = parse_body(&long, StatusCode::BAD_GATEWAY);
        assert_eq!(body["message"], "Bad Gateway");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = UpstreamClient::new("http://backend.test/").unwrap();
        assert_eq!(client.base_url(), "http://backend.test");
    }
}
