use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use shared_config::AppConfig;
use shared_utils::extractor::admin_guard;

use crate::handlers;

pub fn doctor_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_doctors).post(handlers::create_doctor))
        .route("/stats", get(handlers::get_doctor_stats))
        .route(
            "/{doctor_id}",
            get(handlers::get_doctor)
                .put(handlers::update_doctor)
                .delete(handlers::delete_doctor),
        )
        .layer(middleware::from_fn_with_state(state.clone(), admin_guard))
        .with_state(state)
}

pub fn availability_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::list_availabilities).post(handlers::create_availability),
        )
        .route("/doctor/{doctor_id}", get(handlers::get_doctor_availabilities))
        .route(
            "/{id}",
            get(handlers::get_availability)
                .put(handlers::update_availability)
                .delete(handlers::delete_availability),
        )
        .layer(middleware::from_fn_with_state(state.clone(), admin_guard))
        .with_state(state)
}
