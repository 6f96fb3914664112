use crate::error::AppError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims encoded within a session JWT.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the user's id.
    pub sub: Uuid,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

/// Mints and validates session credentials.
///
/// Constructed once at startup with the process-wide signing secret and shared
/// read-only from then on; nothing reads the secret from the environment at
/// the point of use.
#[derive(Clone)]
pub struct SessionIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

/// Session lifetime, matching the original 24h expiry.
const SESSION_HOURS: i64 = 24;

impl SessionIssuer {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Signs a credential asserting "this caller is `user_id`".
    pub fn issue(&self, user_id: Uuid) -> Result<String, AppError> {
        let expiration = chrono::Utc::now()
            .checked_add_signed(chrono::Duration::hours(SESSION_HOURS))
            .expect("valid timestamp")
            .timestamp() as usize;

        let claims = Claims {
            sub: user_id,
            exp: expiration,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign session token: {}", e)))
    }

    /// Validates a credential and recovers its claims.
    ///
    /// Malformed, expired, and bad-signature tokens all fail with the same
    /// generic `Unauthorized` error; which check failed is never revealed.
    pub fn validate(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(AppError::from)
    }
}
