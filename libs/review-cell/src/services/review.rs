use anyhow::{anyhow, Result};
use serde_json::{Map, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::{eq, SupabaseClient};

use crate::models::{Review, ReviewRatingRow, ReviewStats, REVIEWS_TABLE};

pub struct ReviewService {
    supabase: SupabaseClient,
}

impl ReviewService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn list_reviews(&self) -> Result<Vec<Review>> {
        self.supabase
            .select_as(REVIEWS_TABLE, "select=*&order=created_at.desc")
            .await
    }

    pub async fn review_stats(&self) -> Result<ReviewStats> {
        let rows: Vec<ReviewRatingRow> = self
            .supabase
            .select_as(REVIEWS_TABLE, "select=rating")
            .await?;

        Ok(ReviewStats::from_rows(&rows))
    }

    /// Reviews whose `column` equals `value`, newest first.
    pub async fn reviews_by(&self, column: &str, value: &str) -> Result<Vec<Review>> {
        debug!("Fetching reviews where {} = {}", column, value);
        let query = format!("select=*&{}&order=created_at.desc", eq(column, value));
        self.supabase.select_as(REVIEWS_TABLE, &query).await
    }

    pub async fn get_review(&self, id: &str) -> Result<Option<Review>> {
        let row = self
            .supabase
            .select_one(REVIEWS_TABLE, &format!("select=*&{}", eq("id", id)))
            .await?;

        row.map(serde_json::from_value).transpose().map_err(Into::into)
    }

    pub async fn create_review(&self, payload: Map<String, Value>) -> Result<Review> {
        let rows = self
            .supabase
            .insert(REVIEWS_TABLE, Value::Object(payload))
            .await?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Insert returned no rows"))?;
        Ok(serde_json::from_value(row)?)
    }

    pub async fn update_review(
        &self,
        id: &str,
        payload: Map<String, Value>,
    ) -> Result<Option<Review>> {
        let rows = self
            .supabase
            .update(REVIEWS_TABLE, &eq("id", id), Value::Object(payload))
            .await?;

        rows.into_iter()
            .next()
            .map(serde_json::from_value)
            .transpose()
            .map_err(Into::into)
    }

    pub async fn delete_review(&self, id: &str) -> Result<()> {
        self.supabase.delete(REVIEWS_TABLE, &eq("id", id)).await
    }
}
