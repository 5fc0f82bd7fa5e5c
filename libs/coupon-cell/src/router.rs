use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::admin_guard;

use crate::handlers;

pub fn coupon_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_coupons).post(handlers::create_coupon))
        .route("/stats", get(handlers::get_coupon_stats))
        .route("/code/{code}", get(handlers::get_coupon_by_code))
        .route("/validate/{code}", post(handlers::validate_coupon))
        .route("/{id}/use", post(handlers::use_coupon))
        .route(
            "/{id}",
            get(handlers::get_coupon)
                .put(handlers::update_coupon)
                .delete(handlers::delete_coupon),
        )
        .layer(middleware::from_fn_with_state(state.clone(), admin_guard))
        .with_state(state)
}
