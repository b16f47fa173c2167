use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::Lazy;

use crate::db::user_store::UserStore;
use crate::error::{AppError, Result};
use crate::models::user::{AccountStatus, AuthResponse, Claims, Credentials};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Verified against when the username is unknown, so both failure paths
/// cost the same.
static DUMMY_HASH: Lazy<Option<String>> = Lazy::new(|| hash_password("lincheng-dummy").ok());

pub fn hash_password(password: &str) -> std::result::Result<String, argon2::password_hash::Error> {
    use argon2::password_hash::rand_core::OsRng;
    use argon2::password_hash::SaltString;
    use argon2::{Argon2, PasswordHasher};
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Single-account registration, login and token checks
#[derive(Clone)]
pub struct AuthService {
    user_store: UserStore,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_hours: i64,
}

impl AuthService {
    pub fn new(user_store: UserStore, jwt_secret: &str, expiration_hours: i64) -> Self {
        Self {
            user_store,
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            expiration_hours,
        }
    }

    pub async fn status(&self) -> Result<AccountStatus> {
        let user = self.user_store.get_user().await?;
        Ok(AccountStatus::from(user))
    }

    /// Create the account; fails with `AccountExists` once one is set up.
    pub async fn register(&self, credentials: &Credentials) -> Result<AccountStatus> {
        credentials.validate_registration()?;
        if self.user_store.get_user().await?.is_some() {
            return Err(AppError::AccountExists);
        }

        let hash = hash_password(&credentials.password)
            .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))?;
        let user = self
            .user_store
            .create_user(credentials.username.trim(), &hash)
            .await?;

        tracing::info!(username = %user.username, "account registered");
        Ok(AccountStatus::from(Some(user)))
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        let user = self
            .user_store
            .get_user_by_username(credentials.username.trim())
            .await?;

        let Some(user) = user else {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                verify_password(&credentials.password, dummy);
            }
            tracing::warn!("login with unknown username");
            return Err(AppError::Auth(INVALID_CREDENTIALS.into()));
        };
        if !verify_password(&credentials.password, &user.password_hash) {
            tracing::warn!(username = %user.username, "login with wrong password");
            return Err(AppError::Auth(INVALID_CREDENTIALS.into()));
        }

        let now = Utc::now();
        let expires_at = now + Duration::hours(self.expiration_hours);
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("token generation failed: {e}")))?;

        tracing::info!(username = %user.username, "logged in");
        Ok(AuthResponse {
            token,
            token_type: "Bearer".into(),
            expires_at,
            username: user.username,
        })
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::Auth(format!("Invalid token: {e}")))?;
        Ok(data.claims)
    }
}
