use actix_web::web;

use crate::proxy::{transform, ProxyResource, RouteConfig};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    ProxyResource::new("/api/events")
        .route(RouteConfig::get("/events").query(transform::paged_query))
        .route(RouteConfig::post("/events"))
        .register(cfg);

    ProxyResource::new("/api/events/{id}")
        .route(RouteConfig::get("/events/{id}"))
        .route(RouteConfig::put("/events/{id}"))
        .route(RouteConfig::delete("/events/{id}"))
        .register(cfg);

    ProxyResource::new("/api/events/{id}/summary")
        .route(RouteConfig::get("/events/{id}/summary"))
        .register(cfg);

    ProxyResource::new("/api/events/{id}/publish")
        .route(RouteConfig::post("/events/{id}/publish"))
        .register(cfg);

    ProxyResource::new("/api/events/{id}/unpublish")
        .route(RouteConfig::post("/events/{id}/unpublish"))
        .register(cfg);

    ProxyResource::new("/api/events/{id}/attendees")
        .route(RouteConfig::get("/events/{id}/attendees").query(transform::paged_query))
        .register(cfg);

    // CSV download: forwarded byte-for-byte with the upstream content type.
    ProxyResource::new("/api/events/{id}/attendees/export")
        .route(RouteConfig::export("/events/{id}/attendees/export"))
        .register(cfg);

    ProxyResource::new("/api/events/{id}/sales")
        .route(RouteConfig::get("/events/{id}/sales"))
        .register(cfg);

    // Public landing-page lookup by meta URL; no session required.
    ProxyResource::new("/api/meta/{metaUrl}")
        .route(RouteConfig::get("/events/meta/{metaUrl}").public())
        .register(cfg);
}
