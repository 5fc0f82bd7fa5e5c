use anyhow::{anyhow, Result};
use serde_json::{Map, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::{eq, in_list, SupabaseClient};

use crate::models::{
    Doctor, DoctorStatRow, DoctorStats, DoctorSummary, DOCTORS_TABLE, DOCTOR_SUMMARY_COLUMNS,
    WITHDRAWS_TABLE,
};

pub struct DoctorService {
    supabase: SupabaseClient,
}

impl DoctorService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn list_doctors(&self) -> Result<Vec<Doctor>> {
        debug!("Fetching all doctors");
        self.supabase
            .select_as(DOCTORS_TABLE, "select=*&order=updated_at.desc")
            .await
    }

    pub async fn doctor_stats(&self) -> Result<DoctorStats> {
        let rows: Vec<DoctorStatRow> = self
            .supabase
            .select_as(DOCTORS_TABLE, "select=avg_rating,numb_session,numb_patients")
            .await?;

        Ok(DoctorStats::from_rows(&rows))
    }

    pub async fn get_doctor(&self, doctor_id: &str) -> Result<Option<Doctor>> {
        debug!("Fetching doctor: {}", doctor_id);
        let row = self
            .supabase
            .select_one(DOCTORS_TABLE, &format!("select=*&{}", eq("doctor_id", doctor_id)))
            .await?;

        row.map(serde_json::from_value).transpose().map_err(Into::into)
    }

    pub async fn create_doctor(&self, payload: Map<String, Value>) -> Result<Doctor> {
        let rows = self
            .supabase
            .insert(DOCTORS_TABLE, Value::Object(payload))
            .await?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Insert returned no rows"))?;
        Ok(serde_json::from_value(row)?)
    }

    /// `None` when no doctor has this id.
    pub async fn update_doctor(
        &self,
        doctor_id: &str,
        payload: Map<String, Value>,
    ) -> Result<Option<Doctor>> {
        let rows = self
            .supabase
            .update(DOCTORS_TABLE, &eq("doctor_id", doctor_id), Value::Object(payload))
            .await?;

        rows.into_iter()
            .next()
            .map(serde_json::from_value)
            .transpose()
            .map_err(Into::into)
    }

    /// Removes the doctor's withdrawal requests, then the doctor row.
    pub async fn delete_doctor(&self, doctor_id: &str) -> Result<()> {
        let filter = eq("doctor_id", doctor_id);

        debug!("Deleting withdrawals of doctor: {}", doctor_id);
        self.supabase.delete(WITHDRAWS_TABLE, &filter).await?;

        debug!("Deleting doctor: {}", doctor_id);
        self.supabase.delete(DOCTORS_TABLE, &filter).await
    }

    /// Display summaries for a set of doctor ids, used by cells that embed
    /// the doctor next to their own rows.
    pub async fn summaries(&self, doctor_ids: &[String]) -> Result<Vec<DoctorSummary>> {
        if doctor_ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!(
            "select={}&{}",
            DOCTOR_SUMMARY_COLUMNS,
            in_list("doctor_id", doctor_ids)
        );
        self.supabase.select_as(DOCTORS_TABLE, &query).await
    }
}
