//! Declarative route configuration for the proxy.
//!
//! Each browser-facing path is a [`ProxyResource`] holding one
//! [`RouteConfig`] per supported verb. A configuration is immutable once
//! registered; concrete routes are data, not bespoke handler code.

use std::sync::Arc;
use std::time::Duration;

use actix_web::http::Method;
use actix_web::{web, HttpRequest, HttpResponse};

use super::handler;
use super::transform::{QueryTransform, ResponseTransform};
use crate::error::AppError;
use crate::state::AppState;

/// 10s for reads, 30s for writes, 60s for large uploads.
pub const READ_TIMEOUT: Duration = Duration::from_secs(10);
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(30);
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Per-route body limit, enforced while draining the payload; upload
/// routes raise it to 5 MB.
pub const DEFAULT_BODY_LIMIT: usize = 256 * 1024;
pub const UPLOAD_BODY_LIMIT: usize = 5 * 1024 * 1024;

#[derive(Clone)]
pub struct RouteConfig {
    pub method: Method,
    /// Upstream path template; `{segment}` placeholders are resolved from
    /// the inbound request's route parameters.
    pub endpoint: &'static str,
    pub timeout: Duration,
    pub require_auth: bool,
    pub body_limit: usize,
    pub transform_query: Option<QueryTransform>,
    pub transform_response: Option<ResponseTransform>,
    /// Forward the upstream body byte-for-byte (CSV exports) instead of
    /// treating it as JSON.
    pub passthrough: bool,
}

impl RouteConfig {
    fn new(method: Method, endpoint: &'static str, timeout: Duration) -> Self {
        Self {
            method,
            endpoint,
            timeout,
            require_auth: true,
            body_limit: DEFAULT_BODY_LIMIT,
            transform_query: None,
            transform_response: None,
            passthrough: false,
        }
    }

    pub fn get(endpoint: &'static str) -> Self {
        Self::new(Method::GET, endpoint, READ_TIMEOUT)
    }

    pub fn post(endpoint: &'static str) -> Self {
        Self::new(Method::POST, endpoint, WRITE_TIMEOUT)
    }

    pub fn put(endpoint: &'static str) -> Self {
        Self::new(Method::PUT, endpoint, WRITE_TIMEOUT)
    }

    pub fn patch(endpoint: &'static str) -> Self {
        Self::new(Method::PATCH, endpoint, WRITE_TIMEOUT)
    }

    pub fn delete(endpoint: &'static str) -> Self {
        Self::new(Method::DELETE, endpoint, WRITE_TIMEOUT)
    }

    /// POST with the raised body limit and upload timeout.
    pub fn upload(endpoint: &'static str) -> Self {
        let mut cfg = Self::new(Method::POST, endpoint, UPLOAD_TIMEOUT);
        cfg.body_limit = UPLOAD_BODY_LIMIT;
        cfg
    }

    /// GET returning the upstream body unmodified (e.g. CSV export).
    pub fn export(endpoint: &'static str) -> Self {
        let mut cfg = Self::new(Method::GET, endpoint, WRITE_TIMEOUT);
        cfg.passthrough = true;
        cfg
    }

    /// Skip the session/auth gate for this route.
    pub fn public(mut self) -> Self {
        self.require_auth = false;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn query(mut self, transform: QueryTransform) -> Self {
        self.transform_query = Some(transform);
        self
    }

    pub fn shape(mut self, transform: ResponseTransform) -> Self {
        self.transform_response = Some(transform);
        self
    }
}

/// One browser-facing path plus its verb handlers.
pub struct ProxyResource {
    path: &'static str,
    routes: Vec<RouteConfig>,
}

impl ProxyResource {
    pub fn new(path: &'static str) -> Self {
        Self {
            path,
            routes: Vec::new(),
        }
    }

    pub fn route(mut self, config: RouteConfig) -> Self {
        self.routes.push(config);
        self
    }

    /// Compile the configuration into an actix resource. Unsupported verbs
    /// fall through to a 405 carrying an `Allow` header that enumerates
    /// exactly the configured verbs.
    pub fn register(self, cfg: &mut web::ServiceConfig) {
        let allow = self
            .routes
            .iter()
            .map(|r| r.method.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let mut resource = web::resource(self.path);

        for route in self.routes {
            let method = route.method.clone();
            let route = Arc::new(route);
            resource = resource.route(web::method(method).to(
                move |req: HttpRequest, payload: web::Payload, state: web::Data<AppState>| {
                    let route = route.clone();
                    async move { handler::handle(&route, &req, payload, &state).await }
                },
            ));
        }

        resource = resource.default_service(web::to(move || {
            let allow = allow.clone();
            async move { Err::<HttpResponse, AppError>(AppError::method_not_allowed(allow)) }
        }));

        cfg.service(resource);
    }
}

/// Substitute `{segment}` placeholders from the matched route parameters.
/// Dynamic segments must be non-empty strings.
pub fn resolve_endpoint(template: &str, req: &HttpRequest) -> Result<String, AppError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let close = rest[open..]
            .find('}')
            .ok_or_else(|| AppError::internal(format!("unclosed placeholder in {template}")))?;
        let name = &rest[open + 1..open + close];

        let value = req.match_info().get(name).unwrap_or("");
        if value.trim().is_empty() {
            return Err(AppError::bad_request(format!(
                "Missing path parameter: {name}"
            )));
        }
        out.push_str(value);

        rest = &rest[open + close + 1..];
    }
    out.push_str(rest);

    Ok(out)
}
