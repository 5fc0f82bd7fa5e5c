use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use auth_cell::{auth_routes, user_routes};
use booking_cell::booking_routes;
use coupon_cell::coupon_routes;
use doctor_cell::router::{availability_routes, doctor_routes};
use patient_cell::patient_routes;
use payment_cell::{transaction_routes, withdrawal_routes};
use review_cell::review_routes;
use shared_config::AppConfig;
use shared_models::error::AppError;
use subscription_cell::{payment_plan_routes, subscription_routes};

pub fn create_router(state: Arc<AppConfig>) -> Router {
    let api = Router::new()
        .route("/test", get(api_test))
        .nest("/auth", auth_routes(state.clone()))
        .nest("/users", user_routes(state.clone()))
        .nest("/doctors", doctor_routes(state.clone()))
        .nest("/availabilities", availability_routes(state.clone()))
        .nest("/patients", patient_routes(state.clone()))
        .nest("/bookings", booking_routes(state.clone()))
        .nest("/reviews", review_routes(state.clone()))
        .nest("/coupons", coupon_routes(state.clone()))
        .nest("/payment-plans", payment_plan_routes(state.clone()))
        .nest("/patient-plan-subscriptions", subscription_routes(state.clone()))
        .nest("/withdrawals", withdrawal_routes(state.clone()))
        .nest("/transactions", transaction_routes(state));

    Router::new()
        .route("/", get(|| async { "Estaraht admin API is running" }))
        .nest("/api", api)
        .fallback(route_not_found)
}

async fn api_test() -> Json<Value> {
    Json(json!({ "success": true, "message": "API is working" }))
}

async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use shared_utils::test_utils::TestConfig;

    async fn call(app: Router, method: &str, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn liveness_and_test_routes_respond() {
        let app = create_router(TestConfig::default().to_arc());

        let (status, _) = call(app.clone(), "GET", "/").await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = call(app, "GET", "/api/test").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true, "message": "API is working"}));
    }

    #[tokio::test]
    async fn unknown_route_gets_failure_envelope() {
        let app = create_router(TestConfig::default().to_arc());

        let (status, body) = call(app, "GET", "/api/nope").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"success": false, "message": "Route not found"}));
    }

    #[tokio::test]
    async fn dashboard_routes_are_guarded_when_auth_is_required() {
        let app = create_router(TestConfig::default().with_admin_auth().to_arc());

        let (status, _) = call(app.clone(), "GET", "/api/doctors").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = call(app.clone(), "GET", "/api/transactions/stats").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = call(app, "GET", "/api/auth/verify").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    async fn post_json(app: Router, uri: &str, body: &'static str) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn malformed_json_gets_failure_envelope() {
        let app = create_router(TestConfig::default().to_arc());

        let (status, body) = post_json(app.clone(), "/api/auth/login", "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["message"].is_string());

        let (status, body) = post_json(app.clone(), "/api/auth/login", r#"{"email": 5}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["message"].is_string());

        let (status, body) = post_json(app, "/api/doctors", "[1, 2]").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn login_stays_public_when_auth_is_required() {
        let app = create_router(TestConfig::default().with_admin_auth().to_arc());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth/login")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"email": ""}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
