//! User entity - a registered forum account

use chrono::{DateTime, Utc};

use crate::value_objects::ActorId;

/// Registered forum account
///
/// The password hash is kept out of the entity and only surfaces through
/// [`Credentials`] for verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: ActorId,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Account fields supplied at registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl NewUser {
    /// Build a registration record, normalizing the email to lowercase
    pub fn new(username: impl Into<String>, email: &str, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: normalize_email(email),
            password_hash: password_hash.into(),
        }
    }
}

/// Stored credentials for one account
#[derive(Debug, Clone)]
pub struct Credentials {
    pub actor_id: ActorId,
    pub password_hash: String,
}

/// Emails are compared case-insensitively
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
