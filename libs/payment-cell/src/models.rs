use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use shared_models::numeric::{lenient_f64, sum};
use shared_models::record::RecordId;

pub const WITHDRAWS_TABLE: &str = "withdraws";
pub const PAYMENT_HISTORY_TABLE: &str = "payment_history";

// ==============================================================================
// WITHDRAWALS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Withdrawal {
    pub id: RecordId,
    #[serde(default)]
    pub doctor_id: Option<String>,
    #[serde(default)]
    pub operation_status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The only columns a client may write on `withdraws`. Absent fields are
/// not sent, so an update leaves them untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_actual_amount: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub withrowl_history: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub income_history: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<String>,
}

impl WithdrawalRequest {
    /// New withdrawals are dated now unless the client supplied a date.
    pub fn with_default_payment_date(mut self, now: DateTime<Utc>) -> Self {
        if self.payment_date.as_deref().map_or(true, str::is_empty) {
            self.payment_date = Some(now.to_rfc3339());
        }
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WithdrawalStatRow {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_actual_amount: Option<f64>,
    #[serde(default)]
    pub operation_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalStats {
    pub total_withdrawals: usize,
    pub total_amount: f64,
    pub total_actual_amount: f64,
    pub successful_withdrawals: usize,
    pub pending_withdrawals: usize,
    pub failed_withdrawals: usize,
}

impl WithdrawalStats {
    pub fn from_rows(rows: &[WithdrawalStatRow]) -> Self {
        let with_status = |accepted: &[&str]| {
            rows.iter()
                .filter(|w| w.operation_status.as_deref().is_some_and(|s| accepted.contains(&s)))
                .count()
        };

        Self {
            total_withdrawals: rows.len(),
            total_amount: sum(rows.iter().map(|w| w.total_amount)),
            total_actual_amount: sum(rows.iter().map(|w| w.total_actual_amount)),
            successful_withdrawals: with_status(&["success"]),
            pending_withdrawals: with_status(&["waiting", "pending"]),
            failed_withdrawals: with_status(&["failed"]),
        }
    }
}

// ==============================================================================
// PAYMENT HISTORY / TRANSACTIONS
// ==============================================================================

/// A raw `payment_history` row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: RecordId,
    #[serde(default)]
    pub doctor_id: Option<Value>,
    #[serde(default)]
    pub patient_id: Option<Value>,
    #[serde(default)]
    pub booking_id: Option<Value>,
    #[serde(default)]
    pub total_amount: Option<Value>,
    #[serde(default)]
    pub operation_status: Option<Value>,
    #[serde(default)]
    pub payment_date: Option<Value>,
    #[serde(default)]
    pub action_type: Option<Value>,
    #[serde(default)]
    pub payment_gateway: Option<Value>,
    #[serde(default)]
    pub payment_currency: Option<Value>,
    #[serde(default)]
    pub operation_id: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Dashboard view of a payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: RecordId,
    #[serde(rename = "type")]
    pub kind: String,
    pub doctor_id: Option<Value>,
    pub patient_id: Option<Value>,
    pub amount: Option<Value>,
    pub status: Option<Value>,
    pub created_at: Option<Value>,
    pub booking_id: Option<Value>,
    pub action_type: Option<Value>,
    pub payment_gateway: Option<Value>,
    pub payment_currency: Option<Value>,
    pub operation_id: Option<Value>,
}

impl From<PaymentRecord> for Transaction {
    fn from(p: PaymentRecord) -> Self {
        Self {
            id: p.id,
            kind: "payment".to_string(),
            doctor_id: p.doctor_id,
            patient_id: p.patient_id,
            amount: p.total_amount,
            status: p.operation_status,
            created_at: p.payment_date,
            booking_id: p.booking_id,
            action_type: p.action_type,
            payment_gateway: non_empty(p.payment_gateway),
            payment_currency: non_empty(p.payment_currency),
            operation_id: non_empty(p.operation_id),
        }
    }
}

fn non_empty(value: Option<Value>) -> Option<Value> {
    value.filter(|v| !matches!(v, Value::String(s) if s.is_empty()))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionStatRow {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub operation_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStats {
    pub total_transactions: usize,
    pub total_amount: f64,
    pub successful_transactions: usize,
    pub pending_transactions: usize,
    pub failed_transactions: usize,
}

impl TransactionStats {
    pub fn from_rows(rows: &[TransactionStatRow]) -> Self {
        let with_status = |wanted: &str| {
            rows.iter()
                .filter(|t| t.operation_status.as_deref() == Some(wanted))
                .count()
        };

        Self {
            total_transactions: rows.len(),
            total_amount: sum(rows.iter().map(|t| t.total_amount)),
            successful_transactions: with_status("success"),
            pending_transactions: with_status("waiting"),
            failed_transactions: with_status("failed"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Withdrawal not found")]
    WithdrawalNotFound,

    #[error("Transaction not found")]
    TransactionNotFound,
}
