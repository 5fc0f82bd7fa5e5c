use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use shared_config::AppConfig;
use shared_utils::extractor::admin_guard;

use crate::handlers;

pub fn payment_plan_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_plans).post(handlers::create_plan))
        .route("/stats", get(handlers::get_plan_stats))
        .route(
            "/{id}",
            get(handlers::get_plan)
                .put(handlers::update_plan)
                .delete(handlers::delete_plan),
        )
        .layer(middleware::from_fn_with_state(state.clone(), admin_guard))
        .with_state(state)
}

pub fn subscription_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::list_subscriptions).post(handlers::create_subscription),
        )
        .route("/stats", get(handlers::get_subscription_stats))
        .route("/patient/{patient_id}", get(handlers::get_patient_subscriptions))
        .route("/plan/{plan_id}", get(handlers::get_plan_subscriptions))
        .route(
            "/{id}",
            get(handlers::get_subscription)
                .put(handlers::update_subscription)
                .delete(handlers::delete_subscription),
        )
        .layer(middleware::from_fn_with_state(state.clone(), admin_guard))
        .with_state(state)
}
