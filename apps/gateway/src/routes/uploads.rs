use actix_web::web;

use crate::proxy::{ProxyResource, RouteConfig};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // Thumbnails and assets arrive as JSON payloads with embedded file
    // data; the limit is raised to 5 MB and the timeout to 60 s.
    ProxyResource::new("/api/uploads/thumbnail")
        .route(RouteConfig::upload("/uploads/thumbnail"))
        .register(cfg);

    ProxyResource::new("/api/uploads/asset")
        .route(RouteConfig::upload("/uploads/asset"))
        .register(cfg);
}
