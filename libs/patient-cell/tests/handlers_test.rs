use axum::extract::{Path, State};
use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use patient_cell::handlers::*;
use shared_models::error::AppError;
use shared_models::extract::JsonBody;
use shared_utils::test_utils::{MockSupabaseResponses, TestConfig, TEST_IDENTITY_ACCOUNTS_PATH};

#[tokio::test]
async fn list_patients_newest_first() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("order", "created_at.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::patient_row("p-2"),
            MockSupabaseResponses::patient_row("p-1")
        ])))
        .mount(&server)
        .await;

    let config = TestConfig::default().with_supabase(server.uri()).to_arc();
    let body = list_patients(State(config)).await.unwrap().0;

    assert_eq!(body.count, Some(2));
    assert_eq!(body.data.unwrap()[0].id, "p-2");
}

#[tokio::test]
async fn patient_stats_count_genders() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("select", "gender"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"gender": "Male"}, {"gender": "female"}, {"gender": "Female"}, {"gender": null}
        ])))
        .mount(&server)
        .await;

    let config = TestConfig::default().with_supabase(server.uri()).to_arc();
    let stats = get_patient_stats(State(config)).await.unwrap().0.data.unwrap();

    assert_eq!(stats.total_patients, 4);
    assert_eq!(stats.male_count, 1);
    assert_eq!(stats.female_count, 2);
}

#[tokio::test]
async fn get_patient_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("id", "eq.nobody"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let config = TestConfig::default().with_supabase(server.uri()).to_arc();
    let result = get_patient(State(config), Path("nobody".to_string())).await;

    assert_matches!(result, Err(AppError::NotFound(msg)) if msg == "Patient not found");
}

#[tokio::test]
async fn update_patient_returns_updated_row() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/patients"))
        .and(query_param("id", "eq.p-1"))
        .and(body_json(json!({"phone": "+966511111111"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "p-1", "name": "Test Patient", "phone": "+966511111111"}
        ])))
        .mount(&server)
        .await;

    let config = TestConfig::default().with_supabase(server.uri()).to_arc();
    let body = update_patient(
        State(config),
        Path("p-1".to_string()),
        JsonBody(json!({"phone": "+966511111111"}).as_object().cloned().unwrap()),
    )
    .await
    .unwrap()
    .0;

    assert_eq!(body.message.as_deref(), Some("Patient updated successfully"));
    assert_eq!(body.data.unwrap().phone.as_deref(), Some("+966511111111"));
}

#[tokio::test]
async fn delete_patient_reports_login_already_gone() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([MockSupabaseResponses::patient_row("p-1")])),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/patients"))
        .and(query_param("id", "eq.p-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{}:delete", TEST_IDENTITY_ACCOUNTS_PATH)))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": 400, "message": "USER_NOT_FOUND"}
        })))
        .mount(&server)
        .await;

    let config = TestConfig::default()
        .with_supabase(server.uri())
        .with_identity_emulator(server.uri())
        .to_arc();
    let body = delete_patient(State(config), Path("p-1".to_string()))
        .await
        .unwrap()
        .0;

    assert_eq!(body.message, "Patient deleted successfully");
    assert!(body.firebase_deleted);
    assert_eq!(
        body.firebase_message,
        "User not found in Firebase (may already be deleted)"
    );
}

#[tokio::test]
async fn delete_unknown_patient_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let config = TestConfig::default().with_supabase(server.uri()).to_arc();
    let result = delete_patient(State(config), Path("ghost".to_string())).await;

    assert_matches!(result, Err(AppError::NotFound(_)));
}
