use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered account.
///
/// Accounts are created unconfirmed and flip to `confirmed` exactly once, via
/// a valid confirmation code. Emails are lowercased before every write so
/// uniqueness is case-insensitive. The password hash never serializes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub confirmed: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new unconfirmed user. The caller supplies an already-hashed
    /// password; plaintext never reaches this type.
    pub fn new(email: &str, name: &str, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.to_lowercase(),
            name: name.to_string(),
            password_hash,
            confirmed: false,
            created_at: Utc::now(),
        }
    }
}

/// Public view of a user, safe to return from the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}
