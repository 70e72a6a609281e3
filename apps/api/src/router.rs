use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use booking_cell::router::booking_routes;
use scheduling_cell::router::scheduling_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Solace Clinic API is running!" }))
        .nest("/doctors", scheduling_routes(state.clone()))
        .nest("/bookings", booking_routes(state.clone()))
}
