use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub identity_emulator: Option<String>,
    pub password_reset_url: String,
    pub require_admin_auth: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
            identity_emulator: None,
            password_reset_url: "https://estaraht.test/reset-password".to_string(),
            require_admin_auth: false,
        }
    }
}

impl TestConfig {
    /// Points the database at a mock server.
    pub fn with_supabase(mut self, url: impl Into<String>) -> Self {
        self.supabase_url = url.into();
        self
    }

    /// Points the identity provider at a mock server speaking the emulator API.
    pub fn with_identity_emulator(mut self, url: impl Into<String>) -> Self {
        self.identity_emulator = Some(url.into());
        self
    }

    pub fn with_admin_auth(mut self) -> Self {
        self.require_admin_auth = true;
        self
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            admin_jwt_secret: self.jwt_secret.clone(),
            firebase_auth_emulator_host: self.identity_emulator.clone(),
            firebase_project_id: self.identity_emulator.as_ref().map(|_| "demo-test".to_string()),
            password_reset_url: self.password_reset_url.clone(),
            require_admin_auth: self.require_admin_auth,
            ..AppConfig::default()
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

/// Path prefix of Identity Toolkit account calls in emulator mode for `TestConfig`.
pub const TEST_IDENTITY_ACCOUNTS_PATH: &str =
    "/identitytoolkit.googleapis.com/v1/projects/demo-test/accounts";

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub role: String,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: "test@example.com".to_string(),
            role: "admin".to_string(),
        }
    }
}

impl TestUser {
    pub fn new(email: &str, role: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role: role.to_string(),
        }
    }

    pub fn doctor(email: &str) -> Self {
        Self::new(email, "doctor")
    }

    pub fn admin(email: &str) -> Self {
        Self::new(email, "admin")
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            email: Some(self.email.clone()),
            role: Some(self.role.clone()),
            created_at: Some(Utc::now()),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let payload = json!({
            "sub": user.id,
            "email": user.email,
            "role": user.role,
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }
}

/// Canned PostgREST rows shaped like the production tables.
pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn doctor_row(doctor_id: &str) -> serde_json::Value {
        json!({
            "doctor_id": doctor_id,
            "full_name": "Dr. Test",
            "email": "doctor@example.com",
            "specialization": "Cardiology",
            "profile_img_url": null,
            "avg_rating": 4.5,
            "numb_session": 10,
            "numb_patients": 4,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn patient_row(patient_id: &str) -> serde_json::Value {
        json!({
            "id": patient_id,
            "name": "Test Patient",
            "email": "patient@example.com",
            "phone": "+966500000000",
            "gender": "Female",
            "profile_img_url": null,
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn booking_row(id: &str, doctor_id: &str, patient_id: &str, status: &str) -> serde_json::Value {
        json!({
            "id": id,
            "doctor_id": doctor_id,
            "patient_id": patient_id,
            "status": status,
            "booking_date": "2024-12-25",
            "total_amount": 150,
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn coupon_row(id: &str, code: &str, is_used: bool, valid_until: &str) -> serde_json::Value {
        json!({
            "id": id,
            "coupon_code": code,
            "coupon_value": 20,
            "is_used": is_used,
            "valid_until": valid_until,
            "for_user": null,
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn admin_user_row(user_id: &str, email: &str, password: &str, status: &str) -> serde_json::Value {
        json!({
            "user_id": user_id,
            "email": email,
            "password": password,
            "role": "admin",
            "status": status,
            "last_login": null,
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn error_response(message: &str, code: &str) -> serde_json::Value {
        json!({
            "message": message,
            "code": code
        })
    }
}
