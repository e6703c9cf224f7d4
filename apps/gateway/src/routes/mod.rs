use actix_web::web;

pub mod auth;
pub mod events;
pub mod organizers;
pub mod partners;
pub mod tickets;
pub mod uploads;
pub mod withdrawals;

/// Register every route. `main.rs` and the test harness both call this so
/// endpoint behavior is identical in both contexts.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(crate::health::health));

    auth::configure_routes(cfg);
    events::configure_routes(cfg);
    tickets::configure_routes(cfg);
    partners::configure_routes(cfg);
    withdrawals::configure_routes(cfg);
    organizers::configure_routes(cfg);
    uploads::configure_routes(cfg);
}
