//! User database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Public columns of the users table
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Id and password hash, read only for credential checks
#[derive(Debug, Clone, FromRow)]
pub struct CredentialsModel {
    pub id: i64,
    pub password_hash: String,
}
