use std::sync::Arc;

use axum::extract::{Path, State};
use serde_json::{Map, Value};
use tracing::info;

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_models::extract::JsonBody;
use shared_models::response::{
    created, ok, ok_deleted, ok_list, ok_message, ApiResult, CreatedResult,
};

use crate::models::{
    Booking, BookingError, BookingStats, BookingStatus, EnrichedBooking, UpdateStatusRequest,
};
use crate::services::{enrich_bookings, BookingService};

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::NotFound => AppError::NotFound(err.to_string()),
            BookingError::InvalidStatus => AppError::BadRequest(err.to_string()),
        }
    }
}

// ==============================================================================
// READS (ENRICHED WITH DOCTOR AND PATIENT)
// ==============================================================================

#[axum::debug_handler]
pub async fn list_bookings(
    State(config): State<Arc<AppConfig>>,
) -> ApiResult<Vec<EnrichedBooking>> {
    let bookings = BookingService::new(&config)
        .list_bookings()
        .await
        .map_err(|e| AppError::database("Error fetching bookings", e))?;

    ok_list(enrich_bookings(&config, bookings).await)
}

#[axum::debug_handler]
pub async fn get_booking_stats(State(config): State<Arc<AppConfig>>) -> ApiResult<BookingStats> {
    let stats = BookingService::new(&config)
        .booking_stats()
        .await
        .map_err(|e| AppError::database("Error fetching booking statistics", e))?;

    ok(stats)
}

#[axum::debug_handler]
pub async fn get_doctor_bookings(
    State(config): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
) -> ApiResult<Vec<EnrichedBooking>> {
    let bookings = BookingService::new(&config)
        .doctor_bookings(&doctor_id)
        .await
        .map_err(|e| AppError::database("Error fetching doctor bookings", e))?;

    ok_list(enrich_bookings(&config, bookings).await)
}

#[axum::debug_handler]
pub async fn get_patient_bookings(
    State(config): State<Arc<AppConfig>>,
    Path(patient_id): Path<String>,
) -> ApiResult<Vec<EnrichedBooking>> {
    let bookings = BookingService::new(&config)
        .patient_bookings(&patient_id)
        .await
        .map_err(|e| AppError::database("Error fetching patient bookings", e))?;

    ok_list(enrich_bookings(&config, bookings).await)
}

#[axum::debug_handler]
pub async fn get_booking(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<String>,
) -> ApiResult<EnrichedBooking> {
    let booking = BookingService::new(&config)
        .get_booking(&id)
        .await
        .map_err(|e| AppError::database("Error fetching booking", e))?
        .ok_or(BookingError::NotFound)?;

    let enriched = enrich_bookings(&config, vec![booking])
        .await
        .into_iter()
        .next()
        .ok_or(BookingError::NotFound)?;

    ok(enriched)
}

// ==============================================================================
// WRITES
// ==============================================================================

#[axum::debug_handler]
pub async fn create_booking(
    State(config): State<Arc<AppConfig>>,
    JsonBody(payload): JsonBody<Map<String, Value>>,
) -> CreatedResult<Booking> {
    let booking = BookingService::new(&config)
        .create_booking(payload)
        .await
        .map_err(|e| AppError::database("Error creating booking", e))?;

    info!("Created booking: {}", booking.id);
    created("Booking created successfully", booking)
}

#[axum::debug_handler]
pub async fn update_booking(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<Map<String, Value>>,
) -> ApiResult<Booking> {
    let booking = BookingService::new(&config)
        .update_booking(&id, payload)
        .await
        .map_err(|e| AppError::database("Error updating booking", e))?
        .ok_or(BookingError::NotFound)?;

    ok_message("Booking updated successfully", booking)
}

#[axum::debug_handler]
pub async fn update_booking_status(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<UpdateStatusRequest>,
) -> ApiResult<Booking> {
    let status: BookingStatus = request
        .status
        .as_deref()
        .ok_or(BookingError::InvalidStatus)?
        .parse()?;

    let booking = BookingService::new(&config)
        .update_status(&id, status)
        .await
        .map_err(|e| AppError::database("Error updating booking status", e))?
        .ok_or(BookingError::NotFound)?;

    info!("Booking {} is now {}", id, status);
    ok_message("Booking status updated successfully", booking)
}

#[axum::debug_handler]
pub async fn delete_booking(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    BookingService::new(&config)
        .delete_booking(&id)
        .await
        .map_err(|e| AppError::database("Error deleting booking", e))?;

    ok_deleted("Booking deleted successfully")
}
