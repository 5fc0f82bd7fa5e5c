use std::sync::Arc;

use axum::extract::{Path, State};
use serde_json::{Map, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_models::extract::JsonBody;
use shared_models::response::{
    created, ok, ok_deleted, ok_list, ok_message, ApiResult, CreatedResult,
};

use crate::models::{PaymentPlan, PlanStats, Subscription, SubscriptionError, SubscriptionStats};
use crate::services::{PaymentPlanService, SubscriptionService};

impl From<SubscriptionError> for AppError {
    fn from(err: SubscriptionError) -> Self {
        AppError::NotFound(err.to_string())
    }
}

// ==============================================================================
// PAYMENT PLANS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_plans(State(state): State<Arc<AppConfig>>) -> ApiResult<Vec<PaymentPlan>> {
    let plans = PaymentPlanService::new(&state)
        .list_plans()
        .await
        .map_err(|e| AppError::database("Error fetching payment plans", e))?;

    ok_list(plans)
}

#[axum::debug_handler]
pub async fn get_plan_stats(State(state): State<Arc<AppConfig>>) -> ApiResult<PlanStats> {
    let stats = PaymentPlanService::new(&state)
        .plan_stats()
        .await
        .map_err(|e| AppError::database("Error fetching payment plan stats", e))?;

    ok(stats)
}

#[axum::debug_handler]
pub async fn get_plan(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<String>,
) -> ApiResult<PaymentPlan> {
    let plan = PaymentPlanService::new(&state)
        .get_plan(&id)
        .await
        .map_err(|e| AppError::database("Error fetching payment plan", e))?
        .ok_or(SubscriptionError::PlanNotFound)?;

    ok(plan)
}

#[axum::debug_handler]
pub async fn create_plan(
    State(state): State<Arc<AppConfig>>,
    JsonBody(payload): JsonBody<Map<String, Value>>,
) -> CreatedResult<PaymentPlan> {
    let plan = PaymentPlanService::new(&state)
        .create_plan(payload)
        .await
        .map_err(|e| AppError::database("Error creating payment plan", e))?;

    created("Payment plan created successfully", plan)
}

#[axum::debug_handler]
pub async fn update_plan(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<Map<String, Value>>,
) -> ApiResult<PaymentPlan> {
    let plan = PaymentPlanService::new(&state)
        .update_plan(&id, payload)
        .await
        .map_err(|e| AppError::database("Error updating payment plan", e))?
        .ok_or(SubscriptionError::PlanNotFound)?;

    ok_message("Payment plan updated successfully", plan)
}

#[axum::debug_handler]
pub async fn delete_plan(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    PaymentPlanService::new(&state)
        .delete_plan(&id)
        .await
        .map_err(|e| AppError::database("Error deleting payment plan", e))?;

    ok_deleted("Payment plan deleted successfully")
}

// ==============================================================================
// PATIENT PLAN SUBSCRIPTIONS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_subscriptions(
    State(state): State<Arc<AppConfig>>,
) -> ApiResult<Vec<Subscription>> {
    let subscriptions = SubscriptionService::new(&state)
        .list_subscriptions()
        .await
        .map_err(|e| AppError::database("Error fetching patient plan subscriptions", e))?;

    ok_list(subscriptions)
}

#[axum::debug_handler]
pub async fn get_subscription_stats(
    State(state): State<Arc<AppConfig>>,
) -> ApiResult<SubscriptionStats> {
    let stats = SubscriptionService::new(&state)
        .subscription_stats()
        .await
        .map_err(|e| AppError::database("Error fetching subscription stats", e))?;

    ok(stats)
}

#[axum::debug_handler]
pub async fn get_patient_subscriptions(
    State(state): State<Arc<AppConfig>>,
    Path(patient_id): Path<String>,
) -> ApiResult<Vec<Subscription>> {
    let subscriptions = SubscriptionService::new(&state)
        .patient_subscriptions(&patient_id)
        .await
        .map_err(|e| AppError::database("Error fetching subscriptions", e))?;

    ok_list(subscriptions)
}

#[axum::debug_handler]
pub async fn get_plan_subscriptions(
    State(state): State<Arc<AppConfig>>,
    Path(plan_id): Path<String>,
) -> ApiResult<Vec<Subscription>> {
    let subscriptions = SubscriptionService::new(&state)
        .plan_subscriptions(&plan_id)
        .await
        .map_err(|e| AppError::database("Error fetching subscriptions", e))?;

    ok_list(subscriptions)
}

#[axum::debug_handler]
pub async fn get_subscription(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<String>,
) -> ApiResult<Subscription> {
    let subscription = SubscriptionService::new(&state)
        .get_subscription(&id)
        .await
        .map_err(|e| AppError::database("Error fetching subscription", e))?
        .ok_or(SubscriptionError::SubscriptionNotFound)?;

    ok(subscription)
}

#[axum::debug_handler]
pub async fn create_subscription(
    State(state): State<Arc<AppConfig>>,
    JsonBody(payload): JsonBody<Map<String, Value>>,
) -> CreatedResult<Subscription> {
    let subscription = SubscriptionService::new(&state)
        .create_subscription(payload)
        .await
        .map_err(|e| AppError::database("Error creating subscription", e))?;

    created("Subscription created successfully", subscription)
}

#[axum::debug_handler]
pub async fn update_subscription(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<Map<String, Value>>,
) -> ApiResult<Subscription> {
    let subscription = SubscriptionService::new(&state)
        .update_subscription(&id, payload)
        .await
        .map_err(|e| AppError::database("Error updating subscription", e))?
        .ok_or(SubscriptionError::SubscriptionNotFound)?;

    ok_message("Subscription updated successfully", subscription)
}

#[axum::debug_handler]
pub async fn delete_subscription(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    SubscriptionService::new(&state)
        .delete_subscription(&id)
        .await
        .map_err(|e| AppError::database("Error deleting subscription", e))?;

    ok_deleted("Subscription deleted successfully")
}
