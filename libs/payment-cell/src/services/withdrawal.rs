use anyhow::{anyhow, Result};
use chrono::Utc;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::{eq, SupabaseClient};

use crate::models::{
    Withdrawal, WithdrawalRequest, WithdrawalStatRow, WithdrawalStats, WITHDRAWS_TABLE,
};

pub struct WithdrawalService {
    supabase: SupabaseClient,
}

impl WithdrawalService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn list_withdrawals(&self) -> Result<Vec<Withdrawal>> {
        self.supabase
            .select_as(WITHDRAWS_TABLE, "select=*&order=created_at.desc")
            .await
    }

    pub async fn withdrawal_stats(&self) -> Result<WithdrawalStats> {
        let rows: Vec<WithdrawalStatRow> = self
            .supabase
            .select_as(
                WITHDRAWS_TABLE,
                "select=total_amount,total_actual_amount,operation_status",
            )
            .await?;

        Ok(WithdrawalStats::from_rows(&rows))
    }

    pub async fn doctor_withdrawals(&self, doctor_id: &str) -> Result<Vec<Withdrawal>> {
        debug!("Fetching withdrawals for doctor: {}", doctor_id);
        let query = format!("select=*&{}&order=created_at.desc", eq("doctor_id", doctor_id));
        self.supabase.select_as(WITHDRAWS_TABLE, &query).await
    }

    pub async fn get_withdrawal(&self, id: &str) -> Result<Option<Withdrawal>> {
        let row = self
            .supabase
            .select_one(WITHDRAWS_TABLE, &format!("select=*&{}", eq("id", id)))
            .await?;

        row.map(serde_json::from_value).transpose().map_err(Into::into)
    }

    pub async fn create_withdrawal(&self, request: WithdrawalRequest) -> Result<Withdrawal> {
        let body = serde_json::to_value(request.with_default_payment_date(Utc::now()))?;
        let rows = self.supabase.insert(WITHDRAWS_TABLE, body).await?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Insert returned no rows"))?;
        Ok(serde_json::from_value(row)?)
    }

    pub async fn update_withdrawal(
        &self,
        id: &str,
        request: WithdrawalRequest,
    ) -> Result<Option<Withdrawal>> {
        let body = serde_json::to_value(request)?;
        let rows = self
            .supabase
            .update(WITHDRAWS_TABLE, &eq("id", id), body)
            .await?;

        rows.into_iter()
            .next()
            .map(serde_json::from_value)
            .transpose()
            .map_err(Into::into)
    }

    pub async fn delete_withdrawal(&self, id: &str) -> Result<()> {
        self.supabase.delete(WITHDRAWS_TABLE, &eq("id", id)).await
    }
}
