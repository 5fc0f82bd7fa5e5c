use std::env;

use regex::Regex;
use tracing::{info, warn};

pub const DEFAULT_ALLOWED_ORIGINS: &str = "https://estaraht.com, https://www.estaraht.com";
pub const DEFAULT_IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com";
pub const DEFAULT_PASSWORD_RESET_URL: &str = "https://estaraht.com/reset-password";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub allowed_origins: Vec<String>,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_service_key: Option<String>,
    pub firebase_service_account_path: Option<String>,
    pub firebase_project_id: Option<String>,
    pub firebase_auth_emulator_host: Option<String>,
    pub identity_base_url: String,
    pub password_reset_url: String,
    pub admin_jwt_secret: String,
    pub admin_token_ttl_hours: i64,
    pub require_admin_auth: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5051,
            environment: "development".to_string(),
            allowed_origins: parse_origins(DEFAULT_ALLOWED_ORIGINS),
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
            supabase_service_key: None,
            firebase_service_account_path: None,
            firebase_project_id: None,
            firebase_auth_emulator_host: None,
            identity_base_url: DEFAULT_IDENTITY_BASE_URL.to_string(),
            password_reset_url: DEFAULT_PASSWORD_RESET_URL.to_string(),
            admin_jwt_secret: String::new(),
            admin_token_ttl_hours: 12,
            require_admin_auth: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let supabase_url = env::var("SUPABASE_URL")
            .map(|url| normalize_supabase_url(&url))
            .unwrap_or_else(|_| {
                warn!("SUPABASE_URL not set, using empty value");
                String::new()
            });

        let config = Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            environment: env::var("APP_ENV")
                .or_else(|_| env::var("NODE_ENV"))
                .unwrap_or(defaults.environment),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|o| parse_origins(&o))
                .unwrap_or(defaults.allowed_origins),
            supabase_url,
            supabase_anon_key: env::var("SUPABASE_ANON_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_KEY not set, using empty value");
                    String::new()
                }),
            supabase_service_key: non_empty_var("SUPABASE_SERVICE_ROLE_KEY"),
            firebase_service_account_path: non_empty_var("FIREBASE_SERVICE_ACCOUNT_PATH"),
            firebase_project_id: non_empty_var("FIREBASE_PROJECT_ID"),
            firebase_auth_emulator_host: non_empty_var("FIREBASE_AUTH_EMULATOR_HOST"),
            identity_base_url: env::var("IDENTITY_TOOLKIT_URL")
                .unwrap_or(defaults.identity_base_url),
            password_reset_url: env::var("PASSWORD_RESET_URL")
                .unwrap_or(defaults.password_reset_url),
            admin_jwt_secret: env::var("ADMIN_JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("ADMIN_JWT_SECRET not set, login will not issue session tokens");
                    String::new()
                }),
            admin_token_ttl_hours: env::var("ADMIN_TOKEN_TTL_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(defaults.admin_token_ttl_hours),
            require_admin_auth: env::var("REQUIRE_ADMIN_AUTH")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        if !config.is_identity_configured() {
            warn!("Firebase credentials not found. Set FIREBASE_SERVICE_ACCOUNT_PATH in .env");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty() && !self.supabase_anon_key.is_empty()
    }

    /// Names of the required variables that are still missing.
    pub fn missing_variables(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.supabase_url.is_empty() {
            missing.push("SUPABASE_URL");
        }
        if self.supabase_anon_key.is_empty() {
            missing.push("SUPABASE_ANON_KEY");
        }
        missing
    }

    pub fn is_identity_configured(&self) -> bool {
        self.firebase_service_account_path.is_some() || self.firebase_auth_emulator_host.is_some()
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Key sent to the database: the service role key when present, else the anon key.
    pub fn database_key(&self) -> &str {
        self.supabase_service_key
            .as_deref()
            .unwrap_or(&self.supabase_anon_key)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect()
}

/// Accepts either the REST endpoint or a Postgres connection string pointing at
/// `db.<ref>.supabase.co`, which is rewritten to `https://<ref>.supabase.co`.
pub fn normalize_supabase_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if !trimmed.starts_with("postgresql://") && !trimmed.starts_with("postgres://") {
        return trimmed.to_string();
    }

    let pattern = Regex::new(r"db\.([^.]+)\.supabase\.co").expect("static regex");
    match pattern.captures(trimmed) {
        Some(caps) => {
            let api_url = format!("https://{}.supabase.co", &caps[1]);
            info!("Converted PostgreSQL URL to API URL: {}", api_url);
            api_url
        }
        None => {
            warn!("SUPABASE_URL looks like a connection string but has no project ref");
            trimmed.to_string()
        }
    }
}
