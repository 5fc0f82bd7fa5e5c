use anyhow::{anyhow, Result};
use serde_json::{Map, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::{eq, in_list, SupabaseClient};

use crate::models::{
    Patient, PatientGenderRow, PatientStats, PatientSummary, PATIENTS_TABLE,
    PATIENT_SUMMARY_COLUMNS,
};

pub struct PatientService {
    supabase: SupabaseClient,
}

impl PatientService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn list_patients(&self) -> Result<Vec<Patient>> {
        debug!("Fetching all patients");
        self.supabase
            .select_as(PATIENTS_TABLE, "select=*&order=created_at.desc")
            .await
    }

    pub async fn patient_stats(&self) -> Result<PatientStats> {
        let rows: Vec<PatientGenderRow> = self
            .supabase
            .select_as(PATIENTS_TABLE, "select=gender")
            .await?;

        Ok(PatientStats::from_rows(&rows))
    }

    pub async fn get_patient(&self, patient_id: &str) -> Result<Option<Patient>> {
        debug!("Fetching patient: {}", patient_id);
        let row = self
            .supabase
            .select_one(PATIENTS_TABLE, &format!("select=*&{}", eq("id", patient_id)))
            .await?;

        row.map(serde_json::from_value).transpose().map_err(Into::into)
    }

    pub async fn create_patient(&self, payload: Map<String, Value>) -> Result<Patient> {
        let rows = self
            .supabase
            .insert(PATIENTS_TABLE, Value::Object(payload))
            .await?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Insert returned no rows"))?;
        Ok(serde_json::from_value(row)?)
    }

    pub async fn update_patient(
        &self,
        patient_id: &str,
        payload: Map<String, Value>,
    ) -> Result<Option<Patient>> {
        let rows = self
            .supabase
            .update(PATIENTS_TABLE, &eq("id", patient_id), Value::Object(payload))
            .await?;

        rows.into_iter()
            .next()
            .map(serde_json::from_value)
            .transpose()
            .map_err(Into::into)
    }

    pub async fn delete_patient(&self, patient_id: &str) -> Result<()> {
        debug!("Deleting patient: {}", patient_id);
        self.supabase.delete(PATIENTS_TABLE, &eq("id", patient_id)).await
    }

    pub async fn summaries(&self, patient_ids: &[String]) -> Result<Vec<PatientSummary>> {
        if patient_ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!(
            "select={}&{}",
            PATIENT_SUMMARY_COLUMNS,
            in_list("id", patient_ids)
        );
        self.supabase.select_as(PATIENTS_TABLE, &query).await
    }
}
