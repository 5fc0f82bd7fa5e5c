use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use shared_models::record::RecordId;

pub const ADMIN_USERS_TABLE: &str = "admin_users";

pub const MIN_PASSWORD_LENGTH: usize = 6;

// ==============================================================================
// ADMIN USERS
// ==============================================================================

/// An `admin_users` row. The stored password is read for login checks and is
/// never serialized back out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUser {
    pub user_id: RecordId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AdminUser {
    pub fn is_active(&self) -> bool {
        self.status.as_deref() == Some("active")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserStatRow {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_users: usize,
    pub active_users: usize,
    pub inactive_users: usize,
}

impl UserStats {
    pub fn from_rows(rows: &[UserStatRow]) -> Self {
        let active = rows
            .iter()
            .filter(|u| u.status.as_deref() == Some("active"))
            .count();

        Self {
            total_users: rows.len(),
            active_users: active,
            inactive_users: rows.len() - active,
        }
    }
}

// ==============================================================================
// LOGIN
// ==============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginRequest {
    /// Both credentials, or `MissingCredentials` when either is absent or empty.
    pub fn credentials(&self) -> Result<(&str, &str), AuthError> {
        match (non_blank(&self.email), non_blank(&self.password)) {
            (Some(email), Some(password)) => Ok((email, password)),
            _ => Err(AuthError::MissingCredentials),
        }
    }
}

/// Login payload: the user (without password) plus the session token. The
/// token fields are omitted when no signing secret is configured.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginSession {
    #[serde(flatten)]
    pub user: AdminUser,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Email and password are required")]
    MissingCredentials,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account is not active")]
    Inactive,

    #[error("User not found")]
    UserNotFound,

    #[error("Failed to hash password: {0}")]
    Hashing(String),
}

// ==============================================================================
// PASSWORD RESET
// ==============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestResetRequest {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetLink {
    pub uid: String,
    pub reset_link: String,
}

impl ResetLink {
    pub fn new(base_url: &str, uid: &str) -> Self {
        Self {
            uid: uid.to_string(),
            reset_link: format!("{}?uid={}", base_url, urlencoding::encode(uid)),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub new_password: Option<String>,
    #[serde(default)]
    pub confirm_password: Option<String>,
}

impl ResetPasswordRequest {
    /// Returns `(uid, new_password)` once the form passes every check.
    pub fn validate(&self) -> Result<(&str, &str), ResetError> {
        let (Some(uid), Some(password), Some(confirm)) = (
            non_blank(&self.uid),
            non_blank(&self.new_password),
            non_blank(&self.confirm_password),
        ) else {
            return Err(ResetError::MissingFields);
        };

        if password != confirm {
            return Err(ResetError::PasswordMismatch);
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ResetError::PasswordTooShort);
        }

        Ok((uid, password))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ResetError {
    #[error("Email is required")]
    MissingEmail,

    #[error("uid, newPassword and confirmPassword are required")]
    MissingFields,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least 6 characters long")]
    PasswordTooShort,

    #[error("No account found for this email")]
    NoAccount,

    #[error("User not found")]
    UserNotFound,

    #[error("Firebase not configured")]
    NotConfigured,

    #[error("Identity provider error: {0}")]
    Provider(String),
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
