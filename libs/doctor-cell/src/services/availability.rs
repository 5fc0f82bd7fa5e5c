use anyhow::{anyhow, Result};
use serde_json::{Map, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::{eq, SupabaseClient};

use crate::models::{Availability, AVAILABILITIES_TABLE};

pub struct AvailabilityService {
    supabase: SupabaseClient,
}

impl AvailabilityService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn list_availabilities(&self) -> Result<Vec<Availability>> {
        self.supabase
            .select_as(
                AVAILABILITIES_TABLE,
                "select=*&order=doctor_id.asc,day_number.asc",
            )
            .await
    }

    pub async fn doctor_availabilities(&self, doctor_id: &str) -> Result<Vec<Availability>> {
        debug!("Fetching availabilities for doctor: {}", doctor_id);
        let query = format!("select=*&{}&order=day_number.asc", eq("doctor_id", doctor_id));
        self.supabase.select_as(AVAILABILITIES_TABLE, &query).await
    }

    pub async fn get_availability(&self, id: &str) -> Result<Option<Availability>> {
        let row = self
            .supabase
            .select_one(AVAILABILITIES_TABLE, &format!("select=*&{}", eq("id", id)))
            .await?;

        row.map(serde_json::from_value).transpose().map_err(Into::into)
    }

    pub async fn create_availability(&self, payload: Map<String, Value>) -> Result<Availability> {
        let rows = self
            .supabase
            .insert(AVAILABILITIES_TABLE, Value::Object(payload))
            .await?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Insert returned no rows"))?;
        Ok(serde_json::from_value(row)?)
    }

    pub async fn update_availability(
        &self,
        id: &str,
        payload: Map<String, Value>,
    ) -> Result<Option<Availability>> {
        let rows = self
            .supabase
            .update(AVAILABILITIES_TABLE, &eq("id", id), Value::Object(payload))
            .await?;

        rows.into_iter()
            .next()
            .map(serde_json::from_value)
            .transpose()
            .map_err(Into::into)
    }

    pub async fn delete_availability(&self, id: &str) -> Result<()> {
        self.supabase.delete(AVAILABILITIES_TABLE, &eq("id", id)).await
    }
}
