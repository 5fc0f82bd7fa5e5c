use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{Map, Value};
use tracing::{error, warn};

use shared_config::AppConfig;
use shared_identity::{delete_user_outcome, AccountDeletionResponse};
use shared_models::error::AppError;
use shared_models::extract::JsonBody;
use shared_models::response::{created, ok, ok_list, ok_message, ApiResult, CreatedResult};

use crate::models::{Patient, PatientError, PatientStats};
use crate::services::patient::PatientService;

impl From<PatientError> for AppError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::NotFound => AppError::NotFound(err.to_string()),
        }
    }
}

#[axum::debug_handler]
pub async fn list_patients(State(config): State<Arc<AppConfig>>) -> ApiResult<Vec<Patient>> {
    let patients = PatientService::new(&config)
        .list_patients()
        .await
        .map_err(|e| AppError::database("Error fetching patients", e))?;

    ok_list(patients)
}

#[axum::debug_handler]
pub async fn get_patient_stats(State(config): State<Arc<AppConfig>>) -> ApiResult<PatientStats> {
    let stats = PatientService::new(&config)
        .patient_stats()
        .await
        .map_err(|e| AppError::database("Error fetching patient statistics", e))?;

    ok(stats)
}

#[axum::debug_handler]
pub async fn get_patient(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<String>,
) -> ApiResult<Patient> {
    let patient = PatientService::new(&config)
        .get_patient(&id)
        .await
        .map_err(|e| AppError::database("Error fetching patient", e))?
        .ok_or(PatientError::NotFound)?;

    ok(patient)
}

#[axum::debug_handler]
pub async fn create_patient(
    State(config): State<Arc<AppConfig>>,
    JsonBody(payload): JsonBody<Map<String, Value>>,
) -> CreatedResult<Patient> {
    let patient = PatientService::new(&config)
        .create_patient(payload)
        .await
        .map_err(|e| AppError::database("Error creating patient", e))?;

    created("Patient created successfully", patient)
}

#[axum::debug_handler]
pub async fn update_patient(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<Map<String, Value>>,
) -> ApiResult<Patient> {
    let patient = PatientService::new(&config)
        .update_patient(&id, payload)
        .await
        .map_err(|e| AppError::database("Error updating patient", e))?
        .ok_or(PatientError::NotFound)?;

    ok_message("Patient updated successfully", patient)
}

#[axum::debug_handler]
pub async fn delete_patient(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<String>,
) -> Result<Json<AccountDeletionResponse>, AppError> {
    let service = PatientService::new(&config);

    service
        .get_patient(&id)
        .await
        .map_err(|e| AppError::database("Error deleting patient", e))?
        .ok_or(PatientError::NotFound)?;

    service.delete_patient(&id).await.map_err(|e| {
        error!("Failed to delete patient {}: {}", id, e);
        AppError::database("Error deleting patient", e)
    })?;

    let outcome = delete_user_outcome(&config, &id).await;
    if !outcome.success {
        warn!("Patient {} deleted but login removal failed: {}", id, outcome.message);
    }

    Ok(Json(AccountDeletionResponse::new("Patient deleted successfully", outcome)))
}
