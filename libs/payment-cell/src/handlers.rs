use std::sync::Arc;

use axum::extract::{Path, State};
use tracing::info;

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_models::extract::JsonBody;
use shared_models::response::{
    created, ok, ok_deleted, ok_list, ok_message, ApiResult, CreatedResult,
};

use crate::models::{
    PaymentError, PaymentRecord, Transaction, TransactionStats, Withdrawal, WithdrawalRequest,
    WithdrawalStats,
};
use crate::services::{TransactionService, WithdrawalService};

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        AppError::NotFound(err.to_string())
    }
}

// ==============================================================================
// WITHDRAWALS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_withdrawals(State(state): State<Arc<AppConfig>>) -> ApiResult<Vec<Withdrawal>> {
    let withdrawals = WithdrawalService::new(&state)
        .list_withdrawals()
        .await
        .map_err(|e| AppError::database("Error fetching withdrawals", e))?;

    ok_list(withdrawals)
}

#[axum::debug_handler]
pub async fn get_withdrawal_stats(
    State(state): State<Arc<AppConfig>>,
) -> ApiResult<WithdrawalStats> {
    let stats = WithdrawalService::new(&state)
        .withdrawal_stats()
        .await
        .map_err(|e| AppError::database("Error fetching withdrawal statistics", e))?;

    ok(stats)
}

#[axum::debug_handler]
pub async fn get_doctor_withdrawals(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
) -> ApiResult<Vec<Withdrawal>> {
    let withdrawals = WithdrawalService::new(&state)
        .doctor_withdrawals(&doctor_id)
        .await
        .map_err(|e| AppError::database("Error fetching doctor withdrawals", e))?;

    ok_list(withdrawals)
}

#[axum::debug_handler]
pub async fn get_withdrawal(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<String>,
) -> ApiResult<Withdrawal> {
    let withdrawal = WithdrawalService::new(&state)
        .get_withdrawal(&id)
        .await
        .map_err(|e| AppError::database("Error fetching withdrawal", e))?
        .ok_or(PaymentError::WithdrawalNotFound)?;

    ok(withdrawal)
}

#[axum::debug_handler]
pub async fn create_withdrawal(
    State(state): State<Arc<AppConfig>>,
    JsonBody(request): JsonBody<WithdrawalRequest>,
) -> CreatedResult<Withdrawal> {
    let withdrawal = WithdrawalService::new(&state)
        .create_withdrawal(request)
        .await
        .map_err(|e| AppError::database("Error creating withdrawal", e))?;

    info!("Created withdrawal: {}", withdrawal.id);
    created("Withdrawal created successfully", withdrawal)
}

#[axum::debug_handler]
pub async fn update_withdrawal(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<WithdrawalRequest>,
) -> ApiResult<Withdrawal> {
    let withdrawal = WithdrawalService::new(&state)
        .update_withdrawal(&id, request)
        .await
        .map_err(|e| AppError::database("Error updating withdrawal", e))?
        .ok_or(PaymentError::WithdrawalNotFound)?;

    ok_message("Withdrawal updated successfully", withdrawal)
}

#[axum::debug_handler]
pub async fn delete_withdrawal(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    WithdrawalService::new(&state)
        .delete_withdrawal(&id)
        .await
        .map_err(|e| AppError::database("Error deleting withdrawal", e))?;

    ok_deleted("Withdrawal deleted successfully")
}

// ==============================================================================
// TRANSACTIONS (READ-ONLY)
// ==============================================================================

#[axum::debug_handler]
pub async fn list_transactions(State(state): State<Arc<AppConfig>>) -> ApiResult<Vec<Transaction>> {
    let transactions = TransactionService::new(&state)
        .transactions()
        .await
        .map_err(|e| AppError::database("Error fetching transactions", e))?;

    ok_list(transactions)
}

#[axum::debug_handler]
pub async fn get_transaction_stats(
    State(state): State<Arc<AppConfig>>,
) -> ApiResult<TransactionStats> {
    let stats = TransactionService::new(&state)
        .transaction_stats()
        .await
        .map_err(|e| AppError::database("Error fetching transaction statistics", e))?;

    ok(stats)
}

#[axum::debug_handler]
pub async fn get_transactions_history(
    State(state): State<Arc<AppConfig>>,
) -> ApiResult<Vec<PaymentRecord>> {
    let records = TransactionService::new(&state)
        .payment_history()
        .await
        .map_err(|e| AppError::database("Error fetching transactions history", e))?;

    ok_list(records)
}

#[axum::debug_handler]
pub async fn get_payment_history(
    State(state): State<Arc<AppConfig>>,
) -> ApiResult<Vec<PaymentRecord>> {
    let records = TransactionService::new(&state)
        .payment_history()
        .await
        .map_err(|e| AppError::database("Error fetching payment history", e))?;

    ok_list(records)
}

#[axum::debug_handler]
pub async fn get_doctor_transactions(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
) -> ApiResult<Vec<PaymentRecord>> {
    let records = TransactionService::new(&state)
        .payments_by("doctor_id", &doctor_id)
        .await
        .map_err(|e| AppError::database("Error fetching doctor transactions", e))?;

    ok_list(records)
}

#[axum::debug_handler]
pub async fn get_patient_transactions(
    State(state): State<Arc<AppConfig>>,
    Path(patient_id): Path<String>,
) -> ApiResult<Vec<PaymentRecord>> {
    let records = TransactionService::new(&state)
        .payments_by("patient_id", &patient_id)
        .await
        .map_err(|e| AppError::database("Error fetching patient transactions", e))?;

    ok_list(records)
}

#[axum::debug_handler]
pub async fn get_transaction(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<String>,
) -> ApiResult<PaymentRecord> {
    let record = TransactionService::new(&state)
        .get_payment(&id)
        .await
        .map_err(|e| AppError::database("Error fetching transaction", e))?
        .ok_or(PaymentError::TransactionNotFound)?;

    ok(record)
}
