use actix_web::web;

use crate::proxy::{transform, ProxyResource, RouteConfig};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // Both list and balance are scoped to one organizer; the browser sends
    // `eventOrganizerId`, the backend expects `eo_id`.
    ProxyResource::new("/api/withdrawals")
        .route(RouteConfig::get("/withdrawals").query(transform::withdrawal_query))
        .route(RouteConfig::post("/withdrawals"))
        .register(cfg);

    ProxyResource::new("/api/withdrawals/balance")
        .route(RouteConfig::get("/withdrawals/balance").query(transform::balance_query))
        .register(cfg);

    ProxyResource::new("/api/withdrawals/{id}")
        .route(RouteConfig::get("/withdrawals/{id}"))
        .register(cfg);

    ProxyResource::new("/api/withdrawals/{id}/approve")
        .route(RouteConfig::post("/withdrawals/{id}/approve"))
        .register(cfg);

    ProxyResource::new("/api/withdrawals/{id}/reject")
        .route(RouteConfig::post("/withdrawals/{id}/reject"))
        .register(cfg);
}
