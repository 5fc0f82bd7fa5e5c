use axum::extract::{Path, State};
use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_models::error::AppError;
use shared_models::extract::JsonBody;
use shared_utils::test_utils::TestConfig;
use subscription_cell::handlers::*;

#[tokio::test]
async fn plans_are_sorted_by_sort_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/payment_plans"))
        .and(query_param("order", "sort_order.asc,created_at.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "plan_name": "Basic", "plan_name_ar": "أساسي", "price": 100, "sessions": 2, "is_active": true, "sort_order": 1},
            {"id": 2, "plan_name": "Gold", "plan_name_ar": "ذهبي", "price": "450.00", "sessions": 10, "is_active": false, "sort_order": 2}
        ])))
        .mount(&server)
        .await;

    let config = TestConfig::default().with_supabase(server.uri()).to_arc();
    let body = list_plans(State(config)).await.unwrap().0;

    assert_eq!(body.count, Some(2));
    let plans = body.data.unwrap();
    assert_eq!(plans[0].plan_name.as_deref(), Some("Basic"));
    assert_eq!(plans[1].extra["price"], "450.00");
}

#[tokio::test]
async fn plan_stats_count_active() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/payment_plans"))
        .and(query_param("select", "id,is_active"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "is_active": true}, {"id": 2, "is_active": false}, {"id": 3, "is_active": true}
        ])))
        .mount(&server)
        .await;

    let config = TestConfig::default().with_supabase(server.uri()).to_arc();
    let stats = get_plan_stats(State(config)).await.unwrap().0.data.unwrap();

    assert_eq!(stats.total_plans, 3);
    assert_eq!(stats.active_plans, 2);
}

#[tokio::test]
async fn missing_plan_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/payment_plans"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let config = TestConfig::default().with_supabase(server.uri()).to_arc();
    let result = get_plan(State(config), Path("77".to_string())).await;

    assert_matches!(result, Err(AppError::NotFound(msg)) if msg == "Payment plan not found");
}

#[tokio::test]
async fn subscription_list_embeds_patient_and_plan() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/patient_plan_subscriptions"))
        .and(query_param(
            "select",
            "*,patients(id,name,email,phone),payment_plans(id,plan_name,plan_name_ar,price,sessions,is_active)",
        ))
        .and(query_param("order", "created_at.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "s-1",
            "patient_id": "pat-1",
            "plan_id": 2,
            "status": "active",
            "patients": {"id": "pat-1", "name": "Patient One", "email": null, "phone": null},
            "payment_plans": {"id": 2, "plan_name": "Gold"}
        }])))
        .mount(&server)
        .await;

    let config = TestConfig::default().with_supabase(server.uri()).to_arc();
    let subscriptions = list_subscriptions(State(config)).await.unwrap().0.data.unwrap();

    assert_eq!(subscriptions[0].extra["patients"]["name"], "Patient One");
    assert_eq!(subscriptions[0].extra["payment_plans"]["plan_name"], "Gold");
}

#[tokio::test]
async fn patient_subscriptions_embed_plan_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/patient_plan_subscriptions"))
        .and(query_param(
            "select",
            "*,payment_plans(id,plan_name,plan_name_ar,price,sessions)",
        ))
        .and(query_param("patient_id", "eq.pat-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "s-1", "patient_id": "pat-1", "status": "trialing", "payment_plans": {"id": 2}}
        ])))
        .mount(&server)
        .await;

    let config = TestConfig::default().with_supabase(server.uri()).to_arc();
    let body = get_patient_subscriptions(State(config), Path("pat-1".to_string()))
        .await
        .unwrap()
        .0;

    assert_eq!(body.count, Some(1));
}

#[tokio::test]
async fn subscription_stats_treat_trialing_as_active() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/patient_plan_subscriptions"))
        .and(query_param("select", "id,status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "status": "active"},
            {"id": 2, "status": "trialing"},
            {"id": 3, "status": "expired"}
        ])))
        .mount(&server)
        .await;

    let config = TestConfig::default().with_supabase(server.uri()).to_arc();
    let stats = get_subscription_stats(State(config)).await.unwrap().0.data.unwrap();

    assert_eq!(
        serde_json::to_value(stats).unwrap(),
        json!({"totalSubscriptions": 3, "activeSubscriptions": 2, "expiredSubscriptions": 1})
    );
}

#[tokio::test]
async fn update_missing_subscription_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/patient_plan_subscriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let config = TestConfig::default().with_supabase(server.uri()).to_arc();
    let result = update_subscription(
        State(config),
        Path("s-404".to_string()),
        JsonBody(json!({"status": "expired"}).as_object().cloned().unwrap()),
    )
    .await;

    assert_matches!(result, Err(AppError::NotFound(msg)) if msg == "Subscription not found");
}
