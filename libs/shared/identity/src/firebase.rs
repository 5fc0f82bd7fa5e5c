use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use shared_config::AppConfig;

use crate::error::IdentityError;
use crate::token::{
    AccessTokenProvider, ServiceAccountKey, ServiceAccountTokenProvider, StaticTokenProvider,
};

const EMULATOR_PROJECT_ID: &str = "demo-estaraht";

/// Account record as returned by `accounts:lookup`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityUser {
    pub local_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub disabled: Option<bool>,
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<IdentityUser>,
}

/// Identity Toolkit admin client (Firebase Authentication).
pub struct IdentityClient {
    client: Client,
    base_url: String,
    project_id: String,
    tokens: Box<dyn AccessTokenProvider>,
}

impl IdentityClient {
    pub fn new(config: &AppConfig) -> Result<Self, IdentityError> {
        if let Some(host) = &config.firebase_auth_emulator_host {
            let base_url = if host.starts_with("http://") || host.starts_with("https://") {
                format!("{}/identitytoolkit.googleapis.com", host.trim_end_matches('/'))
            } else {
                format!("http://{}/identitytoolkit.googleapis.com", host)
            };
            let project_id = config
                .firebase_project_id
                .clone()
                .unwrap_or_else(|| EMULATOR_PROJECT_ID.to_string());

            debug!("Using Firebase Auth emulator at {}", base_url);
            return Ok(Self::with_provider(
                base_url,
                project_id,
                Box::new(StaticTokenProvider("owner".to_string())),
            ));
        }

        let path = config
            .firebase_service_account_path
            .as_ref()
            .ok_or(IdentityError::NotConfigured)?;
        let key = ServiceAccountKey::from_file(path)?;
        let project_id = config
            .firebase_project_id
            .clone()
            .unwrap_or_else(|| key.project_id.clone());

        Ok(Self::with_provider(
            config.identity_base_url.trim_end_matches('/').to_string(),
            project_id,
            Box::new(ServiceAccountTokenProvider::new(key)),
        ))
    }

    pub fn with_provider(
        base_url: String,
        project_id: String,
        tokens: Box<dyn AccessTokenProvider>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url,
            project_id,
            tokens,
        }
    }

    async fn call(&self, operation: &str, body: Value) -> Result<Value, IdentityError> {
        let url = format!(
            "{}/v1/projects/{}/accounts:{}",
            self.base_url, self.project_id, operation
        );
        let token = self.tokens.access_token(&self.client).await?;

        debug!("Identity Toolkit request: {}", url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
                .unwrap_or_else(|| format!("HTTP {}: {}", status, text));
            error!("Identity Toolkit {} failed: {}", operation, message);
            return Err(IdentityError::from_provider_message(&message));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| IdentityError::Provider(format!("Unexpected response: {}", e)))
    }

    pub async fn delete_user(&self, uid: &str) -> Result<(), IdentityError> {
        self.call("delete", json!({ "localId": uid })).await?;
        info!("Deleted identity user: {}", uid);
        Ok(())
    }

    pub async fn lookup_by_email(&self, email: &str) -> Result<Option<IdentityUser>, IdentityError> {
        let response = self.call("lookup", json!({ "email": [email] })).await;
        let value = match response {
            Ok(value) => value,
            Err(IdentityError::UserNotFound) => return Ok(None),
            Err(e) => return Err(e),
        };

        let lookup: LookupResponse = serde_json::from_value(value)
            .map_err(|e| IdentityError::Provider(format!("Unexpected lookup response: {}", e)))?;
        Ok(lookup.users.into_iter().next())
    }

    pub async fn update_password(&self, uid: &str, password: &str) -> Result<(), IdentityError> {
        self.call("update", json!({ "localId": uid, "password": password }))
            .await?;
        info!("Updated password for identity user: {}", uid);
        Ok(())
    }
}

/// Result of removing a login alongside its database row. Never an error:
/// the database delete has already happened when this runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeletionOutcome {
    pub success: bool,
    pub message: String,
}

impl DeletionOutcome {
    fn new(success: bool, message: impl Into<String>) -> Self {
        Self {
            success,
            message: message.into(),
        }
    }
}

/// Body of a doctor or patient delete: the database delete plus the login
/// removal outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDeletionResponse {
    pub success: bool,
    pub message: String,
    pub firebase_deleted: bool,
    pub firebase_message: String,
}

impl AccountDeletionResponse {
    pub fn new(message: impl Into<String>, outcome: DeletionOutcome) -> Self {
        Self {
            success: true,
            message: message.into(),
            firebase_deleted: outcome.success,
            firebase_message: outcome.message,
        }
    }
}

pub async fn delete_user_outcome(config: &AppConfig, uid: &str) -> DeletionOutcome {
    let client = match IdentityClient::new(config) {
        Ok(client) => client,
        Err(IdentityError::NotConfigured) => {
            warn!("Firebase not initialized. Skipping Firebase user deletion.");
            return DeletionOutcome::new(false, "Firebase not configured");
        }
        Err(e) => return credential_outcome(uid, e),
    };

    match client.delete_user(uid).await {
        Ok(()) => DeletionOutcome::new(true, "Firebase user deleted successfully"),
        Err(IdentityError::UserNotFound) => DeletionOutcome::new(
            true,
            "User not found in Firebase (may already be deleted)",
        ),
        Err(e @ IdentityError::Credentials(_)) => credential_outcome(uid, e),
        Err(e) => {
            error!("Error deleting Firebase user {}: {}", uid, e);
            DeletionOutcome::new(false, e.to_string())
        }
    }
}

fn credential_outcome(uid: &str, err: IdentityError) -> DeletionOutcome {
    warn!("Firebase credentials unavailable while deleting {}: {}", uid, err);
    DeletionOutcome::new(
        false,
        "Firebase credentials not loaded. Check FIREBASE_SERVICE_ACCOUNT_PATH",
    )
}
