use anyhow::{anyhow, Result};
use serde_json::{Map, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::{eq, SupabaseClient};

use crate::models::{PaymentPlan, PlanStatRow, PlanStats, PAYMENT_PLANS_TABLE};

pub struct PaymentPlanService {
    supabase: SupabaseClient,
}

impl PaymentPlanService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn list_plans(&self) -> Result<Vec<PaymentPlan>> {
        debug!("Fetching payment plans");
        self.supabase
            .select_as(
                PAYMENT_PLANS_TABLE,
                "select=*&order=sort_order.asc,created_at.desc",
            )
            .await
    }

    pub async fn plan_stats(&self) -> Result<PlanStats> {
        let rows: Vec<PlanStatRow> = self
            .supabase
            .select_as(PAYMENT_PLANS_TABLE, "select=id,is_active")
            .await?;

        Ok(PlanStats::from_rows(&rows))
    }

    pub async fn get_plan(&self, id: &str) -> Result<Option<PaymentPlan>> {
        let row = self
            .supabase
            .select_one(PAYMENT_PLANS_TABLE, &format!("select=*&{}", eq("id", id)))
            .await?;

        row.map(serde_json::from_value).transpose().map_err(Into::into)
    }

    pub async fn create_plan(&self, payload: Map<String, Value>) -> Result<PaymentPlan> {
        let rows = self
            .supabase
            .insert(PAYMENT_PLANS_TABLE, Value::Object(payload))
            .await?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Insert returned no rows"))?;
        Ok(serde_json::from_value(row)?)
    }

    pub async fn update_plan(
        &self,
        id: &str,
        payload: Map<String, Value>,
    ) -> Result<Option<PaymentPlan>> {
        let rows = self
            .supabase
            .update(PAYMENT_PLANS_TABLE, &eq("id", id), Value::Object(payload))
            .await?;

        rows.into_iter()
            .next()
            .map(serde_json::from_value)
            .transpose()
            .map_err(Into::into)
    }

    pub async fn delete_plan(&self, id: &str) -> Result<()> {
        self.supabase.delete(PAYMENT_PLANS_TABLE, &eq("id", id)).await
    }
}
