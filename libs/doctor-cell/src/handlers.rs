use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{Map, Value};
use tracing::{error, info, warn};

use shared_config::AppConfig;
use shared_identity::{delete_user_outcome, AccountDeletionResponse};
use shared_models::error::AppError;
use shared_models::extract::JsonBody;
use shared_models::response::{created, ok, ok_deleted, ok_list, ok_message, ApiResult, CreatedResult};

use crate::models::{validate_availability_payload, Availability, Doctor, DoctorError, DoctorStats};
use crate::services::{AvailabilityService, DoctorService};

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::NotFound => AppError::NotFound(err.to_string()),
            DoctorError::InvalidDayNumber => AppError::BadRequest(err.to_string()),
        }
    }
}

// ==============================================================================
// DOCTOR HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_doctors(State(state): State<Arc<AppConfig>>) -> ApiResult<Vec<Doctor>> {
    let doctors = DoctorService::new(&state)
        .list_doctors()
        .await
        .map_err(|e| AppError::database("Error fetching doctors", e))?;

    ok_list(doctors)
}

#[axum::debug_handler]
pub async fn get_doctor_stats(State(state): State<Arc<AppConfig>>) -> ApiResult<DoctorStats> {
    let stats = DoctorService::new(&state)
        .doctor_stats()
        .await
        .map_err(|e| AppError::database("Error fetching doctor statistics", e))?;

    ok(stats)
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
) -> ApiResult<Doctor> {
    let doctor = DoctorService::new(&state)
        .get_doctor(&doctor_id)
        .await
        .map_err(|e| AppError::database("Error fetching doctor", e))?
        .ok_or(DoctorError::NotFound)?;

    ok(doctor)
}

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<Arc<AppConfig>>,
    JsonBody(payload): JsonBody<Map<String, Value>>,
) -> CreatedResult<Doctor> {
    let doctor = DoctorService::new(&state)
        .create_doctor(payload)
        .await
        .map_err(|e| AppError::database("Error creating doctor", e))?;

    info!("Created doctor: {}", doctor.doctor_id);
    created("Doctor created successfully", doctor)
}

#[axum::debug_handler]
pub async fn update_doctor(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
    JsonBody(payload): JsonBody<Map<String, Value>>,
) -> ApiResult<Doctor> {
    let doctor = DoctorService::new(&state)
        .update_doctor(&doctor_id, payload)
        .await
        .map_err(|e| AppError::database("Error updating doctor", e))?
        .ok_or(DoctorError::NotFound)?;

    ok_message("Doctor updated successfully", doctor)
}

/// Deletes the doctor with their withdrawals, then removes their login.
#[axum::debug_handler]
pub async fn delete_doctor(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<AccountDeletionResponse>, AppError> {
    let service = DoctorService::new(&state);

    service
        .get_doctor(&doctor_id)
        .await
        .map_err(|e| AppError::database("Error deleting doctor", e))?
        .ok_or(DoctorError::NotFound)?;

    service.delete_doctor(&doctor_id).await.map_err(|e| {
        error!("Failed to delete doctor {}: {}", doctor_id, e);
        AppError::database("Error deleting doctor", e)
    })?;

    let outcome = delete_user_outcome(&state, &doctor_id).await;
    if !outcome.success {
        warn!("Doctor {} deleted but login removal failed: {}", doctor_id, outcome.message);
    }

    Ok(Json(AccountDeletionResponse::new("Doctor deleted successfully", outcome)))
}

// ==============================================================================
// AVAILABILITY HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_availabilities(
    State(state): State<Arc<AppConfig>>,
) -> ApiResult<Vec<Availability>> {
    let availabilities = AvailabilityService::new(&state)
        .list_availabilities()
        .await
        .map_err(|e| AppError::database("Error fetching availabilities", e))?;

    ok_list(availabilities)
}

#[axum::debug_handler]
pub async fn get_doctor_availabilities(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
) -> ApiResult<Vec<Availability>> {
    let availabilities = AvailabilityService::new(&state)
        .doctor_availabilities(&doctor_id)
        .await
        .map_err(|e| AppError::database("Error fetching availabilities", e))?;

    ok_list(availabilities)
}

#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<String>,
) -> ApiResult<Availability> {
    let availability = AvailabilityService::new(&state)
        .get_availability(&id)
        .await
        .map_err(|e| AppError::database("Error fetching availability", e))?
        .ok_or_else(|| AppError::NotFound("Availability not found".to_string()))?;

    ok(availability)
}

#[axum::debug_handler]
pub async fn create_availability(
    State(state): State<Arc<AppConfig>>,
    JsonBody(payload): JsonBody<Map<String, Value>>,
) -> CreatedResult<Availability> {
    validate_availability_payload(&payload)?;

    let availability = AvailabilityService::new(&state)
        .create_availability(payload)
        .await
        .map_err(|e| AppError::database("Error creating availability", e))?;

    created("Availability created successfully", availability)
}

#[axum::debug_handler]
pub async fn update_availability(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<Map<String, Value>>,
) -> ApiResult<Availability> {
    validate_availability_payload(&payload)?;

    let availability = AvailabilityService::new(&state)
        .update_availability(&id, payload)
        .await
        .map_err(|e| AppError::database("Error updating availability", e))?
        .ok_or_else(|| AppError::NotFound("Availability not found".to_string()))?;

    ok_message("Availability updated successfully", availability)
}

#[axum::debug_handler]
pub async fn delete_availability(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    AvailabilityService::new(&state)
        .delete_availability(&id)
        .await
        .map_err(|e| AppError::database("Error deleting availability", e))?;

    ok_deleted("Availability deleted successfully")
}
