use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Firebase not configured")]
    NotConfigured,

    #[error("User not found")]
    UserNotFound,

    #[error("Firebase credentials not loaded: {0}")]
    Credentials(String),

    #[error("Identity provider error: {0}")]
    Provider(String),

    #[error("Identity request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl IdentityError {
    /// Maps an Identity Toolkit error message (`USER_NOT_FOUND`,
    /// `EMAIL_NOT_FOUND : ...`) to a typed error.
    pub fn from_provider_message(message: &str) -> Self {
        let code = message.split(':').next().unwrap_or("").trim();
        match code {
            "USER_NOT_FOUND" | "EMAIL_NOT_FOUND" => IdentityError::UserNotFound,
            "INVALID_ID_TOKEN" | "CREDENTIAL_TOO_OLD_LOGIN_AGAIN" | "PERMISSION_DENIED" => {
                IdentityError::Credentials(message.to_string())
            }
            _ => IdentityError::Provider(message.to_string()),
        }
    }
}
