use actix_web::web;

use crate::proxy::{transform, ProxyResource, RouteConfig};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    ProxyResource::new("/api/partners")
        .route(RouteConfig::get("/partners").query(transform::paged_query))
        .route(RouteConfig::post("/partners"))
        .register(cfg);

    ProxyResource::new("/api/partners/{id}")
        .route(RouteConfig::get("/partners/{id}"))
        .route(RouteConfig::put("/partners/{id}"))
        .route(RouteConfig::delete("/partners/{id}"))
        .register(cfg);
}
