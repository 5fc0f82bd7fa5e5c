use std::sync::Arc;

use axum::extract::{Path, State};
use chrono::Utc;
use serde_json::{Map, Value};
use tracing::info;

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_models::extract::JsonBody;
use shared_models::response::{
    created, ok, ok_deleted, ok_list, ok_message, ApiResult, CreatedResult,
};

use crate::models::{validate_coupon_value, Coupon, CouponError, CouponStats, CouponUserRequest};
use crate::services::CouponService;

impl From<CouponError> for AppError {
    fn from(err: CouponError) -> Self {
        match err {
            CouponError::NotFound => AppError::NotFound(err.to_string()),
            CouponError::AlreadyUsed
            | CouponError::Expired
            | CouponError::NotForUser
            | CouponError::InvalidValue
            | CouponError::DuplicateCode => AppError::BadRequest(err.to_string()),
        }
    }
}

#[axum::debug_handler]
pub async fn list_coupons(State(state): State<Arc<AppConfig>>) -> ApiResult<Vec<Coupon>> {
    let coupons = CouponService::new(&state)
        .list_coupons()
        .await
        .map_err(|e| AppError::database("Error fetching coupons", e))?;

    ok_list(coupons)
}

#[axum::debug_handler]
pub async fn get_coupon_stats(State(state): State<Arc<AppConfig>>) -> ApiResult<CouponStats> {
    let stats = CouponService::new(&state)
        .coupon_stats()
        .await
        .map_err(|e| AppError::database("Error fetching coupon statistics", e))?;

    ok(stats)
}

#[axum::debug_handler]
pub async fn get_coupon(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<String>,
) -> ApiResult<Coupon> {
    let coupon = CouponService::new(&state)
        .get_coupon(&id)
        .await
        .map_err(|e| AppError::database("Error fetching coupon", e))?
        .ok_or(CouponError::NotFound)?;

    ok(coupon)
}

#[axum::debug_handler]
pub async fn get_coupon_by_code(
    State(state): State<Arc<AppConfig>>,
    Path(code): Path<String>,
) -> ApiResult<Coupon> {
    let coupon = CouponService::new(&state)
        .get_coupon_by_code(&code)
        .await
        .map_err(|e| AppError::database("Error fetching coupon", e))?
        .ok_or(CouponError::NotFound)?;

    ok(coupon)
}

/// Checks whether `code` can be redeemed by the optional `userId`.
#[axum::debug_handler]
pub async fn validate_coupon(
    State(state): State<Arc<AppConfig>>,
    Path(code): Path<String>,
    body: Option<JsonBody<CouponUserRequest>>,
) -> ApiResult<Coupon> {
    let request = body.map(|JsonBody(r)| r).unwrap_or_default();

    let coupon = CouponService::new(&state)
        .get_coupon_by_code(&code)
        .await
        .map_err(|e| AppError::database("Error validating coupon", e))?
        .ok_or(CouponError::NotFound)?;

    coupon.check_redeemable(request.user_id.as_deref(), Utc::now())?;

    ok_message("Coupon is valid", coupon)
}

/// Marks the coupon used, then records who used it.
#[axum::debug_handler]
pub async fn use_coupon(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<String>,
    body: Option<JsonBody<CouponUserRequest>>,
) -> ApiResult<Coupon> {
    let request = body.map(|JsonBody(r)| r).unwrap_or_default();
    let service = CouponService::new(&state);

    let coupon = service
        .get_coupon(&id)
        .await
        .map_err(|e| AppError::database("Error using coupon", e))?
        .ok_or(CouponError::NotFound)?;

    if coupon.used() {
        return Err(CouponError::AlreadyUsed.into());
    }

    let updated = service
        .mark_used(&id)
        .await
        .map_err(|e| AppError::database("Error using coupon", e))?
        .ok_or(CouponError::NotFound)?;

    service
        .record_usage(&updated, request.user_id.as_deref())
        .await;

    ok_message("Coupon marked as used", updated)
}

#[axum::debug_handler]
pub async fn create_coupon(
    State(state): State<Arc<AppConfig>>,
    JsonBody(payload): JsonBody<Map<String, Value>>,
) -> CreatedResult<Coupon> {
    validate_coupon_value(&payload)?;

    let service = CouponService::new(&state);

    if let Some(code) = payload.get("coupon_code").and_then(Value::as_str) {
        let exists = service
            .code_exists(code)
            .await
            .map_err(|e| AppError::database("Error creating coupon", e))?;
        if exists {
            return Err(CouponError::DuplicateCode.into());
        }
    }

    let coupon = service
        .create_coupon(payload)
        .await
        .map_err(|e| AppError::database("Error creating coupon", e))?;

    info!("Created coupon: {}", coupon.id);
    created("Coupon created successfully", coupon)
}

#[axum::debug_handler]
pub async fn update_coupon(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<Map<String, Value>>,
) -> ApiResult<Coupon> {
    validate_coupon_value(&payload)?;

    let coupon = CouponService::new(&state)
        .update_coupon(&id, payload)
        .await
        .map_err(|e| AppError::database("Error updating coupon", e))?
        .ok_or(CouponError::NotFound)?;

    ok_message("Coupon updated successfully", coupon)
}

#[axum::debug_handler]
pub async fn delete_coupon(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    CouponService::new(&state)
        .delete_coupon(&id)
        .await
        .map_err(|e| AppError::database("Error deleting coupon", e))?;

    ok_deleted("Coupon deleted successfully")
}
