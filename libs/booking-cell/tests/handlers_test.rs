use axum::extract::{Path, State};
use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use booking_cell::handlers::*;
use booking_cell::UpdateStatusRequest;
use shared_models::error::AppError;
use shared_models::extract::JsonBody;
use shared_utils::test_utils::{MockSupabaseResponses, TestConfig};

async fn mount_people(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param(
            "select",
            "doctor_id,full_name,email,specialization,profile_img_url",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"doctor_id": "doc-1", "full_name": "Dr. One", "email": "one@estaraht.com",
             "specialization": "Cardiology", "profile_img_url": null}
        ])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("select", "id,name,email,phone,profile_img_url"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "pat-1", "name": "Patient One", "email": "p1@example.com",
             "phone": "+966500000001", "profile_img_url": null}
        ])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn list_bookings_attaches_doctor_and_patient() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/bookings"))
        .and(query_param("order", "created_at.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::booking_row("b-2", "doc-1", "pat-1", "pending"),
            MockSupabaseResponses::booking_row("b-1", "doc-unknown", "pat-1", "confirmed")
        ])))
        .mount(&server)
        .await;
    mount_people(&server).await;

    let config = TestConfig::default().with_supabase(server.uri()).to_arc();
    let body = list_bookings(State(config)).await.unwrap().0;

    assert_eq!(body.count, Some(2));
    let rendered = serde_json::to_value(body.data.unwrap()).unwrap();
    assert_eq!(rendered[0]["id"], "b-2");
    assert_eq!(rendered[0]["doctor"]["full_name"], "Dr. One");
    assert_eq!(rendered[0]["patient"]["name"], "Patient One");
    assert_eq!(rendered[1]["doctor"], serde_json::Value::Null);
    assert_eq!(rendered[1]["patient"]["id"], "pat-1");
    assert_eq!(rendered[1]["total_amount"], 150);
}

#[tokio::test]
async fn empty_booking_list_skips_lookups() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/bookings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let config = TestConfig::default().with_supabase(server.uri()).to_arc();
    let body = list_bookings(State(config)).await.unwrap().0;

    assert_eq!(body.count, Some(0));
}

#[tokio::test]
async fn failed_lookup_leaves_fields_null() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/bookings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::booking_row("b-1", "doc-1", "pat-1", "pending")
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(500).set_body_string("db down"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::patient_row("pat-1")
        ])))
        .mount(&server)
        .await;

    let config = TestConfig::default().with_supabase(server.uri()).to_arc();
    let bookings = get_doctor_bookings(State(config), Path("doc-1".to_string()))
        .await
        .unwrap()
        .0
        .data
        .unwrap();

    assert!(bookings[0].doctor.is_none());
    assert_eq!(bookings[0].patient.as_ref().unwrap().id, "pat-1");
}

#[tokio::test]
async fn get_booking_is_enriched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/bookings"))
        .and(query_param("id", "eq.b-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::booking_row("b-1", "doc-1", "pat-1", "completed")
        ])))
        .mount(&server)
        .await;
    mount_people(&server).await;

    let config = TestConfig::default().with_supabase(server.uri()).to_arc();
    let booking = get_booking(State(config), Path("b-1".to_string()))
        .await
        .unwrap()
        .0
        .data
        .unwrap();

    assert_eq!(booking.booking.status.as_deref(), Some("completed"));
    assert_eq!(booking.doctor.unwrap().doctor_id, "doc-1");
}

#[tokio::test]
async fn get_missing_booking_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/bookings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let config = TestConfig::default().with_supabase(server.uri()).to_arc();
    let result = get_booking(State(config), Path("nope".to_string())).await;

    assert_matches!(result, Err(AppError::NotFound(msg)) if msg == "Booking not found");
}

#[tokio::test]
async fn status_update_writes_status() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/bookings"))
        .and(query_param("id", "eq.b-1"))
        .and(body_json(json!({"status": "confirmed"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::booking_row("b-1", "doc-1", "pat-1", "confirmed")
        ])))
        .mount(&server)
        .await;

    let config = TestConfig::default().with_supabase(server.uri()).to_arc();
    let body = update_booking_status(
        State(config),
        Path("b-1".to_string()),
        JsonBody(UpdateStatusRequest {
            status: Some("confirmed".to_string()),
        }),
    )
    .await
    .unwrap()
    .0;

    assert_eq!(body.message.as_deref(), Some("Booking status updated successfully"));
    assert_eq!(body.data.unwrap().status.as_deref(), Some("confirmed"));
}

#[tokio::test]
async fn invalid_status_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let config = TestConfig::default().with_supabase(server.uri()).to_arc();
    for status in [Some("archived".to_string()), None] {
        let result = update_booking_status(
            State(config.clone()),
            Path("b-1".to_string()),
            JsonBody(UpdateStatusRequest { status }),
        )
        .await;

        assert_matches!(
            result,
            Err(AppError::BadRequest(msg))
                if msg == "Invalid status. Must be: pending, confirmed, cancelled, or completed"
        );
    }
}

#[tokio::test]
async fn booking_stats_sum_revenue() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/bookings"))
        .and(query_param("select", "status,booking_date,total_amount"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"status": "pending", "booking_date": "2020-01-01", "total_amount": 100},
            {"status": "completed", "booking_date": "2020-01-02", "total_amount": "49.5"},
            {"status": "completed", "booking_date": null, "total_amount": null}
        ])))
        .mount(&server)
        .await;

    let config = TestConfig::default().with_supabase(server.uri()).to_arc();
    let stats = get_booking_stats(State(config)).await.unwrap().0.data.unwrap();

    assert_eq!(stats.total_bookings, 3);
    assert_eq!(stats.pending_bookings, 1);
    assert_eq!(stats.completed_bookings, 2);
    assert_eq!(stats.today_bookings, 0);
    assert_eq!(stats.total_revenue, 149.5);
}
