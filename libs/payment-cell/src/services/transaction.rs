use anyhow::Result;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::{eq, SupabaseClient};

use crate::models::{
    PaymentRecord, Transaction, TransactionStatRow, TransactionStats, PAYMENT_HISTORY_TABLE,
};

/// Read-only access to `payment_history`.
pub struct TransactionService {
    supabase: SupabaseClient,
}

impl TransactionService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn payment_history(&self) -> Result<Vec<PaymentRecord>> {
        self.supabase
            .select_as(PAYMENT_HISTORY_TABLE, "select=*&order=payment_date.desc")
            .await
    }

    pub async fn transactions(&self) -> Result<Vec<Transaction>> {
        let records = self.payment_history().await?;
        Ok(records.into_iter().map(Transaction::from).collect())
    }

    pub async fn transaction_stats(&self) -> Result<TransactionStats> {
        let rows: Vec<TransactionStatRow> = self
            .supabase
            .select_as(PAYMENT_HISTORY_TABLE, "select=total_amount,operation_status")
            .await?;

        Ok(TransactionStats::from_rows(&rows))
    }

    /// Payments whose `column` equals `value`, newest first.
    pub async fn payments_by(&self, column: &str, value: &str) -> Result<Vec<PaymentRecord>> {
        debug!("Fetching payments where {} = {}", column, value);
        let query = format!("select=*&{}&order=payment_date.desc", eq(column, value));
        self.supabase.select_as(PAYMENT_HISTORY_TABLE, &query).await
    }

    pub async fn get_payment(&self, id: &str) -> Result<Option<PaymentRecord>> {
        let row = self
            .supabase
            .select_one(PAYMENT_HISTORY_TABLE, &format!("select=*&{}", eq("id", id)))
            .await?;

        row.map(serde_json::from_value).transpose().map_err(Into::into)
    }
}
