use anyhow::{anyhow, Result};
use chrono::Utc;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use shared_config::AppConfig;
use shared_database::{eq, SupabaseClient};

use crate::models::{AdminUser, UserStatRow, UserStats, ADMIN_USERS_TABLE};

pub struct AdminUserService {
    supabase: SupabaseClient,
}

impl AdminUserService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// The admin-role account registered under `email`, if any.
    pub async fn find_admin_by_email(&self, email: &str) -> Result<Option<AdminUser>> {
        debug!("Looking up admin user: {}", email);
        let query = format!("select=*&{}&{}", eq("email", email), eq("role", "admin"));
        let row = self.supabase.select_one(ADMIN_USERS_TABLE, &query).await?;

        row.map(serde_json::from_value).transpose().map_err(Into::into)
    }

    /// Stamps `last_login`. Failures are logged, never returned.
    pub async fn touch_last_login(&self, user_id: &str) {
        let body = json!({ "last_login": Utc::now().to_rfc3339() });
        if let Err(e) = self
            .supabase
            .update(ADMIN_USERS_TABLE, &eq("user_id", user_id), body)
            .await
        {
            warn!("Failed to update last_login for {}: {}", user_id, e);
        }
    }

    pub async fn list_users(&self) -> Result<Vec<AdminUser>> {
        self.supabase
            .select_as(ADMIN_USERS_TABLE, "select=*&order=created_at.desc")
            .await
    }

    pub async fn user_stats(&self) -> Result<UserStats> {
        let rows: Vec<UserStatRow> = self
            .supabase
            .select_as(ADMIN_USERS_TABLE, "select=status")
            .await?;

        Ok(UserStats::from_rows(&rows))
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<AdminUser>> {
        let row = self
            .supabase
            .select_one(ADMIN_USERS_TABLE, &format!("select=*&{}", eq("user_id", user_id)))
            .await?;

        row.map(serde_json::from_value).transpose().map_err(Into::into)
    }

    pub async fn create_user(&self, payload: Map<String, Value>) -> Result<AdminUser> {
        let rows = self
            .supabase
            .insert(ADMIN_USERS_TABLE, Value::Object(payload))
            .await?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Insert returned no rows"))?;
        Ok(serde_json::from_value(row)?)
    }

    pub async fn update_user(
        &self,
        user_id: &str,
        payload: Map<String, Value>,
    ) -> Result<Option<AdminUser>> {
        let rows = self
            .supabase
            .update(ADMIN_USERS_TABLE, &eq("user_id", user_id), Value::Object(payload))
            .await?;

        rows.into_iter()
            .next()
            .map(serde_json::from_value)
            .transpose()
            .map_err(Into::into)
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<()> {
        self.supabase
            .delete(ADMIN_USERS_TABLE, &eq("user_id", user_id))
            .await
    }
}
