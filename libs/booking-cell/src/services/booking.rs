use anyhow::{anyhow, Result};
use chrono::Utc;
use serde_json::{json, Map, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::{eq, SupabaseClient};

use crate::models::{Booking, BookingStatRow, BookingStats, BookingStatus, BOOKINGS_TABLE};

pub struct BookingService {
    supabase: SupabaseClient,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn list_bookings(&self) -> Result<Vec<Booking>> {
        debug!("Fetching all bookings");
        self.supabase
            .select_as(BOOKINGS_TABLE, "select=*&order=created_at.desc")
            .await
    }

    pub async fn booking_stats(&self) -> Result<BookingStats> {
        let rows: Vec<BookingStatRow> = self
            .supabase
            .select_as(BOOKINGS_TABLE, "select=status,booking_date,total_amount")
            .await?;

        Ok(BookingStats::from_rows(&rows, Utc::now().date_naive()))
    }

    pub async fn doctor_bookings(&self, doctor_id: &str) -> Result<Vec<Booking>> {
        debug!("Fetching bookings for doctor: {}", doctor_id);
        let query = format!("select=*&{}&order=booking_date.desc", eq("doctor_id", doctor_id));
        self.supabase.select_as(BOOKINGS_TABLE, &query).await
    }

    pub async fn patient_bookings(&self, patient_id: &str) -> Result<Vec<Booking>> {
        debug!("Fetching bookings for patient: {}", patient_id);
        let query = format!("select=*&{}&order=booking_date.desc", eq("patient_id", patient_id));
        self.supabase.select_as(BOOKINGS_TABLE, &query).await
    }

    pub async fn get_booking(&self, id: &str) -> Result<Option<Booking>> {
        let row = self
            .supabase
            .select_one(BOOKINGS_TABLE, &format!("select=*&{}", eq("id", id)))
            .await?;

        row.map(serde_json::from_value).transpose().map_err(Into::into)
    }

    pub async fn create_booking(&self, payload: Map<String, Value>) -> Result<Booking> {
        let rows = self
            .supabase
            .insert(BOOKINGS_TABLE, Value::Object(payload))
            .await?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Insert returned no rows"))?;
        Ok(serde_json::from_value(row)?)
    }

    pub async fn update_booking(
        &self,
        id: &str,
        payload: Map<String, Value>,
    ) -> Result<Option<Booking>> {
        let rows = self
            .supabase
            .update(BOOKINGS_TABLE, &eq("id", id), Value::Object(payload))
            .await?;

        rows.into_iter()
            .next()
            .map(serde_json::from_value)
            .transpose()
            .map_err(Into::into)
    }

    pub async fn update_status(&self, id: &str, status: BookingStatus) -> Result<Option<Booking>> {
        debug!("Setting booking {} status to {}", id, status);
        let mut payload = Map::new();
        payload.insert("status".to_string(), json!(status));
        self.update_booking(id, payload).await
    }

    pub async fn delete_booking(&self, id: &str) -> Result<()> {
        self.supabase.delete(BOOKINGS_TABLE, &eq("id", id)).await
    }
}
