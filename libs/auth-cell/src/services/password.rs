use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use crate::models::AuthError;

const ARGON2_PREFIX: &str = "$argon2";

#[instrument(skip(password))]
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Checks `password` against a stored value. PHC argon2 strings are verified
/// with argon2; anything else is a legacy plaintext password.
#[instrument(skip(password, stored))]
pub fn verify_password(password: &str, stored: &str) -> bool {
    if !stored.starts_with(ARGON2_PREFIX) {
        debug!("Stored password is not hashed, using plaintext comparison");
        return constant_time_eq(password.as_bytes(), stored.as_bytes());
    }

    let parsed = match PasswordHash::new(stored) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Stored password hash is malformed: {}", e);
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Replaces a plaintext `password` field in a write payload with its hash.
pub fn hash_password_field(payload: &mut Map<String, Value>) -> Result<(), AuthError> {
    if let Some(Value::String(password)) = payload.get_mut("password") {
        *password = hash_password(password).map_err(|e| AuthError::Hashing(e.to_string()))?;
    }
    Ok(())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hashed_passwords_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with(ARGON2_PREFIX));
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
    }

    #[test]
    fn legacy_plaintext_still_verifies() {
        assert!(verify_password("admin123", "admin123"));
        assert!(!verify_password("admin124", "admin123"));
        assert!(!verify_password("admin", "admin123"));
    }

    #[test]
    fn malformed_hash_never_matches() {
        assert!(!verify_password("$argon2id$broken", "$argon2id$broken"));
    }

    #[test]
    fn payload_password_is_replaced_by_hash() {
        let mut payload = json!({"email": "ops@estaraht.com", "password": "s3cret!"})
            .as_object()
            .cloned()
            .unwrap();

        hash_password_field(&mut payload).unwrap();

        let stored = payload["password"].as_str().unwrap();
        assert_ne!(stored, "s3cret!");
        assert!(verify_password("s3cret!", stored));
        assert_eq!(payload["email"], "ops@estaraht.com");
    }

    #[test]
    fn payload_without_password_is_untouched() {
        let mut payload = json!({"status": "inactive"}).as_object().cloned().unwrap();
        hash_password_field(&mut payload).unwrap();
        assert_eq!(Value::Object(payload), json!({"status": "inactive"}));
    }
}
