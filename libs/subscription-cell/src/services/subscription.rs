use anyhow::{anyhow, Result};
use serde_json::{Map, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::{eq, SupabaseClient};

use crate::models::{
    Subscription, SubscriptionStatRow, SubscriptionStats, EMBED_ALL, EMBED_DETAIL,
    EMBED_PATIENT, EMBED_PLAN, SUBSCRIPTIONS_TABLE,
};

pub struct SubscriptionService {
    supabase: SupabaseClient,
}

impl SubscriptionService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn list_subscriptions(&self) -> Result<Vec<Subscription>> {
        let query = format!("select={}&order=created_at.desc", EMBED_ALL);
        self.supabase.select_as(SUBSCRIPTIONS_TABLE, &query).await
    }

    pub async fn subscription_stats(&self) -> Result<SubscriptionStats> {
        let rows: Vec<SubscriptionStatRow> = self
            .supabase
            .select_as(SUBSCRIPTIONS_TABLE, "select=id,status")
            .await?;

        Ok(SubscriptionStats::from_rows(&rows))
    }

    pub async fn patient_subscriptions(&self, patient_id: &str) -> Result<Vec<Subscription>> {
        debug!("Fetching subscriptions for patient: {}", patient_id);
        let query = format!(
            "select={}&{}&order=created_at.desc",
            EMBED_PLAN,
            eq("patient_id", patient_id)
        );
        self.supabase.select_as(SUBSCRIPTIONS_TABLE, &query).await
    }

    pub async fn plan_subscriptions(&self, plan_id: &str) -> Result<Vec<Subscription>> {
        debug!("Fetching subscriptions for plan: {}", plan_id);
        let query = format!(
            "select={}&{}&order=created_at.desc",
            EMBED_PATIENT,
            eq("plan_id", plan_id)
        );
        self.supabase.select_as(SUBSCRIPTIONS_TABLE, &query).await
    }

    pub async fn get_subscription(&self, id: &str) -> Result<Option<Subscription>> {
        let query = format!("select={}&{}", EMBED_DETAIL, eq("id", id));
        let row = self.supabase.select_one(SUBSCRIPTIONS_TABLE, &query).await?;

        row.map(serde_json::from_value).transpose().map_err(Into::into)
    }

    pub async fn create_subscription(&self, payload: Map<String, Value>) -> Result<Subscription> {
        let rows = self
            .supabase
            .insert(SUBSCRIPTIONS_TABLE, Value::Object(payload))
            .await?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Insert returned no rows"))?;
        Ok(serde_json::from_value(row)?)
    }

    pub async fn update_subscription(
        &self,
        id: &str,
        payload: Map<String, Value>,
    ) -> Result<Option<Subscription>> {
        let rows = self
            .supabase
            .update(SUBSCRIPTIONS_TABLE, &eq("id", id), Value::Object(payload))
            .await?;

        rows.into_iter()
            .next()
            .map(serde_json::from_value)
            .transpose()
            .map_err(Into::into)
    }

    pub async fn delete_subscription(&self, id: &str) -> Result<()> {
        self.supabase.delete(SUBSCRIPTIONS_TABLE, &eq("id", id)).await
    }
}
