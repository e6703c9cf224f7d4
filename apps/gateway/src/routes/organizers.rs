use actix_web::web;

use crate::proxy::{transform, ProxyResource, RouteConfig};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // Organizer listings carry contact emails; they are masked before the
    // body leaves the gateway.
    ProxyResource::new("/api/organizers")
        .route(
            RouteConfig::get("/organizers")
                .query(transform::paged_query)
                .shape(transform::mask_organizer_emails),
        )
        .register(cfg);

    ProxyResource::new("/api/organizers/{eo_id}")
        .route(RouteConfig::get("/organizers/{eo_id}").shape(transform::mask_organizer_emails))
        .route(RouteConfig::put("/organizers/{eo_id}"))
        .register(cfg);

    ProxyResource::new("/api/organizers/{eo_id}/settings")
        .route(RouteConfig::get("/organizers/{eo_id}/settings"))
        .route(RouteConfig::put("/organizers/{eo_id}/settings"))
        .register(cfg);

    ProxyResource::new("/api/organizers/{eo_id}/banks")
        .route(RouteConfig::get("/organizers/{eo_id}/banks"))
        .register(cfg);
}
