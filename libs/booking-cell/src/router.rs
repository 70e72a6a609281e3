use std::sync::Arc;

use axum::{
    routing::post,
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn booking_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(handlers::create_booking).get(handlers::list_active_bookings))
        .route("/{booking_id}/cancel", post(handlers::cancel_booking))
        .with_state(state)
}
