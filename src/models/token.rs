use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// How long a confirmation or reset code stays valid.
pub const TOKEN_TTL_MINUTES: i64 = 10;

/// A single-use code authorizing one identity-state transition: account
/// confirmation or a password reset.
///
/// Tokens are never updated in place; they are created, looked up by code,
/// and deleted together with the state change they authorize. Expiry is
/// enforced at lookup time via [`Token::is_expired`].
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Token {
    pub code: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Token {
    pub fn new(code: String, user_id: Uuid) -> Self {
        Self {
            code,
            user_id,
            created_at: Utc::now(),
        }
    }

    /// True once the code is older than [`TOKEN_TTL_MINUTES`]. Expired codes
    /// behave exactly like absent ones.
    pub fn is_expired(&self) -> bool {
        Utc::now() - self.created_at > Duration::minutes(TOKEN_TTL_MINUTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_token_is_not_expired() {
        let token = Token::new("123456".to_string(), Uuid::new_v4());
        assert!(!token.is_expired());
    }

    #[test]
    fn test_old_token_is_expired() {
        let mut token = Token::new("123456".to_string(), Uuid::new_v4());
        token.created_at = Utc::now() - Duration::minutes(TOKEN_TTL_MINUTES + 1);
        assert!(token.is_expired());
    }

    #[test]
    fn test_token_at_ttl_boundary_is_still_valid() {
        let mut token = Token::new("123456".to_string(), Uuid::new_v4());
        token.created_at = Utc::now() - Duration::minutes(TOKEN_TTL_MINUTES) + Duration::seconds(5);
        assert!(!token.is_expired());
    }
}
