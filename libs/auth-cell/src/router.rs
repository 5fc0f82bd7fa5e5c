use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::admin_guard;

use crate::handlers;

/// Login and password reset. These stay reachable without a session.
pub fn auth_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/login", post(handlers::login))
        .route("/request-reset", post(handlers::request_password_reset))
        .route("/reset-password", post(handlers::reset_password))
        .route("/verify", get(handlers::verify_session))
        .with_state(state)
}

pub fn user_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_users).post(handlers::create_user))
        .route("/stats", get(handlers::get_user_stats))
        .route(
            "/{id}",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .layer(middleware::from_fn_with_state(state.clone(), admin_guard))
        .with_state(state)
}
