use tracing::{info, warn};

use shared_config::AppConfig;
use shared_identity::{IdentityClient, IdentityError};

use crate::models::{ResetError, ResetLink};

impl From<IdentityError> for ResetError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::NotConfigured | IdentityError::Credentials(_) => {
                warn!("Identity provider unavailable: {}", err);
                ResetError::NotConfigured
            }
            IdentityError::UserNotFound => ResetError::UserNotFound,
            other => ResetError::Provider(other.to_string()),
        }
    }
}

/// Resolves `email` to an identity account and builds the web reset link for it.
pub async fn request_reset(config: &AppConfig, email: &str) -> Result<ResetLink, ResetError> {
    let client = IdentityClient::new(config)?;

    let user = client
        .lookup_by_email(email)
        .await?
        .ok_or(ResetError::NoAccount)?;

    info!("Password reset requested for identity user: {}", user.local_id);
    Ok(ResetLink::new(&config.password_reset_url, &user.local_id))
}

pub async fn reset_password(config: &AppConfig, uid: &str, password: &str) -> Result<(), ResetError> {
    let client = IdentityClient::new(config)?;
    client.update_password(uid, password).await?;
    Ok(())
}
