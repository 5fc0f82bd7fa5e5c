use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use shared_config::AppConfig;
use shared_utils::extractor::admin_guard;

use crate::handlers;

pub fn review_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_reviews).post(handlers::create_review))
        .route("/stats", get(handlers::get_review_stats))
        .route("/booking/{booking_id}", get(handlers::get_booking_reviews))
        .route("/doctor/{doctor_id}", get(handlers::get_doctor_reviews))
        .route("/patient/{patient_id}", get(handlers::get_patient_reviews))
        .route(
            "/{id}",
            get(handlers::get_review)
                .put(handlers::update_review)
                .delete(handlers::delete_review),
        )
        .layer(middleware::from_fn_with_state(state.clone(), admin_guard))
        .with_state(state)
}
