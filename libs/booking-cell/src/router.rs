use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::admin_guard;

use crate::handlers;

pub fn booking_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_bookings).post(handlers::create_booking))
        .route("/stats", get(handlers::get_booking_stats))
        .route("/doctor/{doctor_id}", get(handlers::get_doctor_bookings))
        .route("/patient/{patient_id}", get(handlers::get_patient_bookings))
        .route(
            "/{id}",
            get(handlers::get_booking)
                .put(handlers::update_booking)
                .delete(handlers::delete_booking),
        )
        .route("/{id}/status", patch(handlers::update_booking_status))
        .layer(middleware::from_fn_with_state(state.clone(), admin_guard))
        .with_state(state)
}
