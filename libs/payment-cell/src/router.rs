use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use shared_config::AppConfig;
use shared_utils::extractor::admin_guard;

use crate::handlers;

pub fn withdrawal_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::list_withdrawals).post(handlers::create_withdrawal),
        )
        .route("/stats", get(handlers::get_withdrawal_stats))
        .route("/doctor/{doctor_id}", get(handlers::get_doctor_withdrawals))
        .route(
            "/{id}",
            get(handlers::get_withdrawal)
                .put(handlers::update_withdrawal)
                .delete(handlers::delete_withdrawal),
        )
        .layer(middleware::from_fn_with_state(state.clone(), admin_guard))
        .with_state(state)
}

pub fn transaction_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_transactions))
        .route("/stats", get(handlers::get_transaction_stats))
        .route("/history", get(handlers::get_transactions_history))
        .route("/payments", get(handlers::get_payment_history))
        .route("/doctor/{doctor_id}", get(handlers::get_doctor_transactions))
        .route("/patient/{patient_id}", get(handlers::get_patient_transactions))
        .route("/{id}", get(handlers::get_transaction))
        .layer(middleware::from_fn_with_state(state.clone(), admin_guard))
        .with_state(state)
}
