use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: Uuid,
    pub company_id: Uuid,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, company_id: Uuid) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            user_id,
            company_id,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("Invalid token: {0}")]
    InvalidToken(String),
    #[error("JWT secret not configured")]
    MissingSecret,
    #[error("Password hash error: {0}")]
    Crypto(String),
}

pub fn generate_token(claims: Claims) -> Result<String, AuthError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, &claims, &encoding_key).map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

pub fn verify_token(token: &str) -> Result<Claims, AuthError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))
}

/// Hash a password with Argon2id into PHC string format.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Crypto(format!("hash error: {e}")))
}

/// Verify a plaintext password against a stored PHC-format hash.
///
/// Returns `Ok(false)` on mismatch; `Err` only when the stored hash is
/// malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed_hash = argon2::PasswordHash::new(hash)
        .map_err(|e| AuthError::Crypto(format!("invalid hash format: {e}")))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::Crypto(format!("verify error: {e}"))),
    }
}

/// `Set-Cookie` value for a fresh session token. HttpOnly always; the
/// Secure/SameSite combination depends on whether the deployment serves
/// the frontend from another HTTPS origin.
pub fn session_cookie(token: &str) -> String {
    let security = &config::config().security;
    let max_age = security.jwt_expiry_hours * 3600;

    if security.secure_cookies {
        format!(
            "{}={}; Path=/; Max-Age={}; HttpOnly; Secure; SameSite=None",
            security.session_cookie_name, token, max_age
        )
    } else {
        format!(
            "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
            security.session_cookie_name, token, max_age
        )
    }
}

/// `Set-Cookie` value that expires the session cookie immediately.
pub fn clear_session_cookie() -> String {
    let security = &config::config().security;

    if security.secure_cookies {
        format!(
            "{}=; Path=/; Max-Age=0; HttpOnly; Secure; SameSite=None",
            security.session_cookie_name
        )
    } else {
        format!(
            "{}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax",
            security.session_cookie_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip() {
        let user_id = Uuid::new_v4();
        let company_id = Uuid::new_v4();

        let token = generate_token(Claims::new(user_id, company_id)).unwrap();
        let claims = verify_token(&token).unwrap();

        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.company_id, company_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token = generate_token(Claims::new(Uuid::new_v4(), Uuid::new_v4())).unwrap();
        let mut tampered = token.clone();
        tampered.push('x');

        assert!(matches!(
            verify_token(&tampered),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn correct_password_matches() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter2", &hash).unwrap());
    }

    #[test]
    fn wrong_password_does_not_match() {
        let hash = hash_password("hunter2").unwrap();
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn malformed_hash_returns_error() {
        assert!(verify_password("pw", "not-a-hash").is_err());
    }

    #[test]
    fn session_cookie_is_http_only_and_scoped() {
        let cookie = session_cookie("abc123");
        assert!(cookie.starts_with("token=abc123;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Path=/"));

        let cleared = clear_session_cookie();
        assert!(cleared.starts_with("token=;"));
        assert!(cleared.contains("Max-Age=0"));
    }
}
