use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde_json::{Map, Value};
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_models::auth::SessionInfo;
use shared_models::error::AppError;
use shared_models::extract::JsonBody;
use shared_models::response::{
    created, ok, ok_deleted, ok_list, ok_message, ApiResult, CreatedResult, Envelope,
};
use shared_utils::extractor::extract_bearer_token;
use shared_utils::jwt::{issue_token, validate_token};

use crate::models::{
    AdminUser, AuthError, LoginRequest, LoginSession, RequestResetRequest, ResetError,
    ResetLink, ResetPasswordRequest, UserStats,
};
use crate::services::password::{hash_password_field, verify_password};
use crate::services::{reset, AdminUserService};

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => AppError::BadRequest(err.to_string()),
            AuthError::InvalidCredentials => AppError::Auth(err.to_string()),
            AuthError::Inactive => AppError::Forbidden(err.to_string()),
            AuthError::UserNotFound => AppError::NotFound(err.to_string()),
            AuthError::Hashing(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl From<ResetError> for AppError {
    fn from(err: ResetError) -> Self {
        match err {
            ResetError::MissingEmail
            | ResetError::MissingFields
            | ResetError::PasswordMismatch
            | ResetError::PasswordTooShort => AppError::BadRequest(err.to_string()),
            ResetError::NoAccount | ResetError::UserNotFound => AppError::NotFound(err.to_string()),
            ResetError::NotConfigured => AppError::ServiceUnavailable(err.to_string()),
            ResetError::Provider(msg) => AppError::ExternalService(msg),
        }
    }
}

// ==============================================================================
// SESSION
// ==============================================================================

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<AppConfig>>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> ApiResult<LoginSession> {
    let (email, password) = request.credentials()?;

    let users = AdminUserService::new(&state);
    let user = users
        .find_admin_by_email(email)
        .await
        .map_err(|e| AppError::database("Error during login", e))?
        .ok_or(AuthError::InvalidCredentials)?;

    let stored = user.password.as_deref().unwrap_or_default();
    if !verify_password(password, stored) {
        debug!("Password mismatch for {}", email);
        return Err(AuthError::InvalidCredentials.into());
    }

    if !user.is_active() {
        return Err(AuthError::Inactive.into());
    }

    let user_id = user.user_id.to_string();

    // Signing happens before last_login is stamped.
    let issued = if state.admin_jwt_secret.is_empty() {
        debug!("No session secret configured, login for {} returns no token", user_id);
        None
    } else {
        let issued = issue_token(
            &user_id,
            user.email.as_deref(),
            user.role.as_deref().unwrap_or("admin"),
            &state.admin_jwt_secret,
            state.admin_token_ttl_hours,
        )
        .map_err(|e| AppError::Internal(format!("Failed to issue session token: {}", e)))?;
        Some(issued)
    };

    users.touch_last_login(&user_id).await;

    info!("Admin user logged in: {}", user_id);
    let (token, expires_at) = issued.map(|i| (i.token, i.expires_at)).unzip();
    ok_message(
        "Login successful",
        LoginSession {
            user,
            token,
            expires_at,
        },
    )
}

#[axum::debug_handler]
pub async fn verify_session(
    State(state): State<Arc<AppConfig>>,
    headers: HeaderMap,
) -> ApiResult<SessionInfo> {
    let token = extract_bearer_token(&headers)?;
    let user = validate_token(&token, &state.admin_jwt_secret).map_err(AppError::Auth)?;

    ok_message(
        "Token is valid",
        SessionInfo {
            user_id: user.id,
            email: user.email,
            role: user.role,
        },
    )
}

// ==============================================================================
// PASSWORD RESET
// ==============================================================================

#[axum::debug_handler]
pub async fn request_password_reset(
    State(state): State<Arc<AppConfig>>,
    JsonBody(request): JsonBody<RequestResetRequest>,
) -> ApiResult<ResetLink> {
    let email = request
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or(ResetError::MissingEmail)?;

    let link = reset::request_reset(&state, email).await?;

    ok_message("Password reset link generated", link)
}

#[axum::debug_handler]
pub async fn reset_password(
    State(state): State<Arc<AppConfig>>,
    JsonBody(request): JsonBody<ResetPasswordRequest>,
) -> ApiResult<()> {
    let (uid, password) = request.validate()?;

    reset::reset_password(&state, uid, password).await?;

    info!("Password reset for identity user: {}", uid);
    Ok(Json(Envelope::message("Password has been reset successfully")))
}

// ==============================================================================
// ADMIN USERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_users(State(state): State<Arc<AppConfig>>) -> ApiResult<Vec<AdminUser>> {
    let users = AdminUserService::new(&state)
        .list_users()
        .await
        .map_err(|e| AppError::database("Error fetching users", e))?;

    ok_list(users)
}

#[axum::debug_handler]
pub async fn get_user_stats(State(state): State<Arc<AppConfig>>) -> ApiResult<UserStats> {
    let stats = AdminUserService::new(&state)
        .user_stats()
        .await
        .map_err(|e| AppError::database("Error fetching user statistics", e))?;

    ok(stats)
}

#[axum::debug_handler]
pub async fn get_user(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<String>,
) -> ApiResult<AdminUser> {
    let user = AdminUserService::new(&state)
        .get_user(&id)
        .await
        .map_err(|e| AppError::database("Error fetching user", e))?
        .ok_or(AuthError::UserNotFound)?;

    ok(user)
}

#[axum::debug_handler]
pub async fn create_user(
    State(state): State<Arc<AppConfig>>,
    JsonBody(mut payload): JsonBody<Map<String, Value>>,
) -> CreatedResult<AdminUser> {
    hash_password_field(&mut payload)?;

    let user = AdminUserService::new(&state)
        .create_user(payload)
        .await
        .map_err(|e| AppError::database("Error creating user", e))?;

    info!("Created admin user: {}", user.user_id);
    created("User created successfully", user)
}

#[axum::debug_handler]
pub async fn update_user(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<String>,
    JsonBody(mut payload): JsonBody<Map<String, Value>>,
) -> ApiResult<AdminUser> {
    hash_password_field(&mut payload)?;

    let user = AdminUserService::new(&state)
        .update_user(&id, payload)
        .await
        .map_err(|e| AppError::database("Error updating user", e))?
        .ok_or(AuthError::UserNotFound)?;

    ok_message("User updated successfully", user)
}

#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    AdminUserService::new(&state)
        .delete_user(&id)
        .await
        .map_err(|e| AppError::database("Error deleting user", e))?;

    info!("Deleted admin user: {}", id);
    ok_deleted("User deleted successfully")
}
