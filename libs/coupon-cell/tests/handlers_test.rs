use axum::extract::{Path, State};
use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use coupon_cell::handlers::*;
use coupon_cell::CouponUserRequest;
use shared_models::error::AppError;
use shared_models::extract::JsonBody;
use shared_utils::test_utils::{MockSupabaseResponses, TestConfig};

fn user(id: &str) -> Option<JsonBody<CouponUserRequest>> {
    Some(JsonBody(CouponUserRequest {
        user_id: Some(id.to_string()),
    }))
}

async fn mount_code(server: &MockServer, code: &str, row: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/coupon"))
        .and(query_param("coupon_code", format!("eq.{}", code)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn valid_coupon_is_accepted() {
    let server = MockServer::start().await;
    mount_code(
        &server,
        "SAVE20",
        MockSupabaseResponses::coupon_row("1", "SAVE20", false, "2999-01-01"),
    )
    .await;

    let config = TestConfig::default().with_supabase(server.uri()).to_arc();
    let body = validate_coupon(State(config), Path("SAVE20".to_string()), None)
        .await
        .unwrap()
        .0;

    assert_eq!(body.message.as_deref(), Some("Coupon is valid"));
    assert_eq!(body.data.unwrap().coupon_code.as_deref(), Some("SAVE20"));
}

#[tokio::test]
async fn used_coupon_fails_validation() {
    let server = MockServer::start().await;
    mount_code(
        &server,
        "USED",
        MockSupabaseResponses::coupon_row("1", "USED", true, "2999-01-01"),
    )
    .await;

    let config = TestConfig::default().with_supabase(server.uri()).to_arc();
    let result = validate_coupon(State(config), Path("USED".to_string()), user("u1")).await;

    assert_matches!(result, Err(AppError::BadRequest(msg)) if msg == "Coupon has already been used");
}

#[tokio::test]
async fn expired_coupon_fails_validation() {
    let server = MockServer::start().await;
    mount_code(
        &server,
        "OLD",
        MockSupabaseResponses::coupon_row("1", "OLD", false, "2020-01-01"),
    )
    .await;

    let config = TestConfig::default().with_supabase(server.uri()).to_arc();
    let result = validate_coupon(State(config), Path("OLD".to_string()), None).await;

    assert_matches!(result, Err(AppError::BadRequest(msg)) if msg == "Coupon has expired");
}

#[tokio::test]
async fn personal_coupon_rejects_other_users() {
    let server = MockServer::start().await;
    let mut row = MockSupabaseResponses::coupon_row("1", "MINE", false, "2999-01-01");
    row["for_user"] = json!("owner-1");
    mount_code(&server, "MINE", row).await;

    let config = TestConfig::default().with_supabase(server.uri()).to_arc();
    let result = validate_coupon(State(config.clone()), Path("MINE".to_string()), user("u2")).await;
    assert_matches!(
        result,
        Err(AppError::BadRequest(msg)) if msg == "This coupon is not valid for this user"
    );

    let result = validate_coupon(State(config), Path("MINE".to_string()), user("owner-1")).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn unknown_code_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/coupon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let config = TestConfig::default().with_supabase(server.uri()).to_arc();
    let result = validate_coupon(State(config), Path("NOPE".to_string()), None).await;

    assert_matches!(result, Err(AppError::NotFound(msg)) if msg == "Coupon not found");
}

#[tokio::test]
async fn use_coupon_marks_used_and_records_usage() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/coupon"))
        .and(query_param("id", "eq.5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 5, "coupon_code": "ONCE", "is_used": false, "valid_until": "2999-01-01"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/coupon"))
        .and(query_param("id", "eq.5"))
        .and(body_json(json!({"is_used": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 5, "coupon_code": "ONCE", "is_used": true, "valid_until": "2999-01-01"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/coupon_usage"))
        .and(body_json(json!({"coupon_id": 5, "user_id": "u1"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{"id": 1}])))
        .expect(1)
        .mount(&server)
        .await;

    let config = TestConfig::default().with_supabase(server.uri()).to_arc();
    let body = use_coupon(State(config), Path("5".to_string()), user("u1"))
        .await
        .unwrap()
        .0;

    assert_eq!(body.message.as_deref(), Some("Coupon marked as used"));
    assert_eq!(body.data.unwrap().is_used, Some(true));
}

#[tokio::test]
async fn usage_record_failure_does_not_fail_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/coupon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 5, "is_used": false}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/coupon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 5, "is_used": true}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/coupon_usage"))
        .respond_with(ResponseTemplate::new(409).set_body_string("conflict"))
        .mount(&server)
        .await;

    let config = TestConfig::default().with_supabase(server.uri()).to_arc();
    let result = use_coupon(State(config), Path("5".to_string()), None).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn used_coupon_cannot_be_used_again() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/coupon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 5, "is_used": true}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let config = TestConfig::default().with_supabase(server.uri()).to_arc();
    let result = use_coupon(State(config), Path("5".to_string()), None).await;

    assert_matches!(result, Err(AppError::BadRequest(_)));
}

#[tokio::test]
async fn duplicate_code_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/coupon"))
        .and(query_param("coupon_code", "eq.SAVE20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let config = TestConfig::default().with_supabase(server.uri()).to_arc();
    let result = create_coupon(
        State(config),
        JsonBody(json!({"coupon_code": "SAVE20", "coupon_value": 20}).as_object().cloned().unwrap()),
    )
    .await;

    assert_matches!(result, Err(AppError::BadRequest(msg)) if msg == "Coupon code already exists");
}

#[tokio::test]
async fn create_rejects_non_percentage_value() {
    let config = TestConfig::default().to_arc();
    let result = create_coupon(
        State(config),
        JsonBody(json!({"coupon_code": "BIG", "coupon_value": "150"}).as_object().cloned().unwrap()),
    )
    .await;

    assert_matches!(
        result,
        Err(AppError::BadRequest(msg)) if msg == "Coupon value must be a percentage between 0 and 100"
    );
}

#[tokio::test]
async fn create_coupon_with_new_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/coupon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/coupon"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseResponses::coupon_row("9", "NEW10", false, "2999-01-01")
        ])))
        .mount(&server)
        .await;

    let config = TestConfig::default().with_supabase(server.uri()).to_arc();
    let (status, body) = create_coupon(
        State(config),
        JsonBody(json!({"coupon_code": "NEW10", "coupon_value": 10}).as_object().cloned().unwrap()),
    )
    .await
    .unwrap();

    assert_eq!(status, axum::http::StatusCode::CREATED);
    assert_eq!(body.0.message.as_deref(), Some("Coupon created successfully"));
}
