use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{AppError, Result};

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 4;

/// The single dashboard account
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Registration and login request body
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn validate_registration(&self) -> Result<()> {
        if self.username.trim().chars().count() < MIN_USERNAME_LEN {
            return Err(AppError::validation(format!(
                "Username must be at least {MIN_USERNAME_LEN} characters"
            )));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(())
    }
}

/// Whether the account has been set up yet
#[derive(Debug, Serialize, Deserialize)]
pub struct AccountStatus {
    pub exists: bool,
    pub username: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<Option<User>> for AccountStatus {
    fn from(user: Option<User>) -> Self {
        match user {
            Some(user) => AccountStatus {
                exists: true,
                username: Some(user.username),
                created_at: Some(user.created_at),
            },
            None => AccountStatus {
                exists: false,
                username: None,
                created_at: None,
            },
        }
    }
}

/// Login response to the dashboard
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub username: String,
}

/// JWT claims carried by the bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}
