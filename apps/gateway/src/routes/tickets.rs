use actix_web::web;

use crate::proxy::{transform, ProxyResource, RouteConfig};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // Listing is always scoped to one event; `event_id` is validated before
    // any upstream call.
    ProxyResource::new("/api/tickets")
        .route(RouteConfig::get("/tickets").query(transform::ticket_query))
        .route(RouteConfig::post("/tickets"))
        .register(cfg);

    ProxyResource::new("/api/tickets/{id}")
        .route(RouteConfig::get("/tickets/{id}"))
        .route(RouteConfig::put("/tickets/{id}"))
        .route(RouteConfig::delete("/tickets/{id}"))
        .register(cfg);

    ProxyResource::new("/api/tickets/{id}/attendees")
        .route(RouteConfig::get("/tickets/{id}/attendees").query(transform::paged_query))
        .register(cfg);

    ProxyResource::new("/api/tickets/{id}/quota")
        .route(RouteConfig::patch("/tickets/{id}/quota"))
        .register(cfg);
}
