use anyhow::{anyhow, Result};
use chrono::Utc;
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_database::{eq, SupabaseClient};

use crate::models::{Coupon, CouponStatRow, CouponStats, COUPON_TABLE, COUPON_USAGE_TABLE};

pub struct CouponService {
    supabase: SupabaseClient,
}

impl CouponService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn list_coupons(&self) -> Result<Vec<Coupon>> {
        self.supabase
            .select_as(COUPON_TABLE, "select=*&order=created_at.desc")
            .await
    }

    pub async fn coupon_stats(&self) -> Result<CouponStats> {
        let rows: Vec<CouponStatRow> = self
            .supabase
            .select_as(COUPON_TABLE, "select=is_used,valid_until")
            .await?;

        Ok(CouponStats::from_rows(&rows, Utc::now()))
    }

    pub async fn get_coupon(&self, id: &str) -> Result<Option<Coupon>> {
        self.find_one(&eq("id", id)).await
    }

    pub async fn get_coupon_by_code(&self, code: &str) -> Result<Option<Coupon>> {
        debug!("Looking up coupon code: {}", code);
        self.find_one(&eq("coupon_code", code)).await
    }

    async fn find_one(&self, filter: &str) -> Result<Option<Coupon>> {
        let row = self
            .supabase
            .select_one(COUPON_TABLE, &format!("select=*&{}", filter))
            .await?;

        row.map(serde_json::from_value).transpose().map_err(Into::into)
    }

    pub async fn code_exists(&self, code: &str) -> Result<bool> {
        let rows = self
            .supabase
            .select(COUPON_TABLE, &format!("select=id&{}&limit=1", eq("coupon_code", code)))
            .await?;

        Ok(!rows.is_empty())
    }

    pub async fn create_coupon(&self, payload: Map<String, Value>) -> Result<Coupon> {
        let rows = self
            .supabase
            .insert(COUPON_TABLE, Value::Object(payload))
            .await?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Insert returned no rows"))?;
        Ok(serde_json::from_value(row)?)
    }

    pub async fn update_coupon(
        &self,
        id: &str,
        payload: Map<String, Value>,
    ) -> Result<Option<Coupon>> {
        let rows = self
            .supabase
            .update(COUPON_TABLE, &eq("id", id), Value::Object(payload))
            .await?;

        rows.into_iter()
            .next()
            .map(serde_json::from_value)
            .transpose()
            .map_err(Into::into)
    }

    pub async fn mark_used(&self, id: &str) -> Result<Option<Coupon>> {
        let mut payload = Map::new();
        payload.insert("is_used".to_string(), Value::Bool(true));
        self.update_coupon(id, payload).await
    }

    /// Best effort: the coupon is already marked used when this runs.
    pub async fn record_usage(&self, coupon: &Coupon, user_id: Option<&str>) {
        let usage = json!({
            "coupon_id": coupon.id,
            "user_id": user_id,
        });

        match self.supabase.insert(COUPON_USAGE_TABLE, usage).await {
            Ok(_) => info!("Recorded usage of coupon {}", coupon.id),
            Err(e) => warn!("Failed to record usage of coupon {}: {}", coupon.id, e),
        }
    }

    pub async fn delete_coupon(&self, id: &str) -> Result<()> {
        self.supabase.delete(COUPON_TABLE, &eq("id", id)).await
    }
}
