use actix_web::error::ResponseError;
use actix_web::http::header;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// JSON body returned to the browser for every locally-resolved error.
///
/// Upstream errors bypass this shape: their status and JSON body are
/// forwarded verbatim.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<Value>>,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            details: None,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {detail}")]
    BadRequest { detail: String },
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Method not allowed")]
    MethodNotAllowed { allow: String },
    #[error("Payload exceeds the {limit}-byte limit")]
    PayloadTooLarge { limit: usize },
    #[error("Upstream returned {status}")]
    Upstream { status: StatusCode, body: Value },
    #[error("Upstream unavailable: {detail}")]
    UpstreamUnavailable { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Upstream { status, .. } => *status,
            AppError::UpstreamUnavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::BadRequest {
            detail: detail.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::Unauthorized
    }

    pub fn method_not_allowed(allow: impl Into<String>) -> Self {
        Self::MethodNotAllowed {
            allow: allow.into(),
        }
    }

    pub fn payload_too_large(limit: usize) -> Self {
        Self::PayloadTooLarge { limit }
    }

    pub fn upstream(status: StatusCode, body: Value) -> Self {
        Self::Upstream { status, body }
    }

    pub fn upstream_unavailable(detail: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    /// Browser-facing message; internal detail is logged, not leaked.
    fn message(&self) -> String {
        match self {
            AppError::BadRequest { detail } => detail.clone(),
            AppError::Unauthorized => "Authentication required".to_string(),
            AppError::MethodNotAllowed { .. } => "Method not allowed".to_string(),
            AppError::PayloadTooLarge { .. } => "Request body too large".to_string(),
            AppError::Upstream { .. } => "Upstream error".to_string(),
            AppError::UpstreamUnavailable { .. } => "Upstream service unavailable".to_string(),
            AppError::Internal { .. } => "Internal server error".to_string(),
            AppError::Config { .. } => "Internal server error".to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();

        match self {
            // Forward the upstream payload unchanged; the status was taken
            // from the upstream response when one was received.
            AppError::Upstream { body, .. } => HttpResponse::build(status).json(body),
            AppError::MethodNotAllowed { allow } => HttpResponse::build(status)
                .insert_header((header::ALLOW, allow.clone()))
                .json(ErrorEnvelope::new(self.message())),
            AppError::UpstreamUnavailable { detail }
            | AppError::Internal { detail }
            | AppError::Config { detail } => {
                tracing::error!(error = %detail, "request failed");
                HttpResponse::build(status).json(ErrorEnvelope::new(self.message()))
            }
            _ => HttpResponse::build(status).json(ErrorEnvelope::new(self.message())),
        }
    }
}
