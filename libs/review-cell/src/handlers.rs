use std::sync::Arc;

use axum::extract::{Path, State};
use serde_json::{Map, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_models::extract::JsonBody;
use shared_models::response::{
    created, ok, ok_deleted, ok_list, ok_message, ApiResult, CreatedResult,
};

use crate::models::{validate_review_payload, Review, ReviewError, ReviewStats};
use crate::services::ReviewService;

impl From<ReviewError> for AppError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::NotFound => AppError::NotFound(err.to_string()),
            ReviewError::InvalidRating => AppError::BadRequest(err.to_string()),
        }
    }
}

#[axum::debug_handler]
pub async fn list_reviews(State(state): State<Arc<AppConfig>>) -> ApiResult<Vec<Review>> {
    let reviews = ReviewService::new(&state)
        .list_reviews()
        .await
        .map_err(|e| AppError::database("Error fetching reviews", e))?;

    ok_list(reviews)
}

#[axum::debug_handler]
pub async fn get_review_stats(State(state): State<Arc<AppConfig>>) -> ApiResult<ReviewStats> {
    let stats = ReviewService::new(&state)
        .review_stats()
        .await
        .map_err(|e| AppError::database("Error fetching review statistics", e))?;

    ok(stats)
}

#[axum::debug_handler]
pub async fn get_booking_reviews(
    State(state): State<Arc<AppConfig>>,
    Path(booking_id): Path<String>,
) -> ApiResult<Vec<Review>> {
    let reviews = ReviewService::new(&state)
        .reviews_by("booking_id", &booking_id)
        .await
        .map_err(|e| AppError::database("Error fetching reviews by booking", e))?;

    ok_list(reviews)
}

#[axum::debug_handler]
pub async fn get_doctor_reviews(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
) -> ApiResult<Vec<Review>> {
    let reviews = ReviewService::new(&state)
        .reviews_by("doctor_id", &doctor_id)
        .await
        .map_err(|e| AppError::database("Error fetching reviews by doctor", e))?;

    ok_list(reviews)
}

#[axum::debug_handler]
pub async fn get_patient_reviews(
    State(state): State<Arc<AppConfig>>,
    Path(patient_id): Path<String>,
) -> ApiResult<Vec<Review>> {
    let reviews = ReviewService::new(&state)
        .reviews_by("patient_id", &patient_id)
        .await
        .map_err(|e| AppError::database("Error fetching reviews by patient", e))?;

    ok_list(reviews)
}

#[axum::debug_handler]
pub async fn get_review(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<String>,
) -> ApiResult<Review> {
    let review = ReviewService::new(&state)
        .get_review(&id)
        .await
        .map_err(|e| AppError::database("Error fetching review", e))?
        .ok_or(ReviewError::NotFound)?;

    ok(review)
}

#[axum::debug_handler]
pub async fn create_review(
    State(state): State<Arc<AppConfig>>,
    JsonBody(payload): JsonBody<Map<String, Value>>,
) -> CreatedResult<Review> {
    validate_review_payload(&payload)?;

    let review = ReviewService::new(&state)
        .create_review(payload)
        .await
        .map_err(|e| AppError::database("Error creating review", e))?;

    created("Review created successfully", review)
}

#[axum::debug_handler]
pub async fn update_review(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<Map<String, Value>>,
) -> ApiResult<Review> {
    validate_review_payload(&payload)?;

    let review = ReviewService::new(&state)
        .update_review(&id, payload)
        .await
        .map_err(|e| AppError::database("Error updating review", e))?
        .ok_or(ReviewError::NotFound)?;

    ok_message("Review updated successfully", review)
}

#[axum::debug_handler]
pub async fn delete_review(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    ReviewService::new(&state)
        .delete_review(&id)
        .await
        .map_err(|e| AppError::database("Error deleting review", e))?;

    ok_deleted("Review deleted successfully")
}
