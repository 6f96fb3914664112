pub mod code;
pub mod extractors;
pub mod middleware;
pub mod password;
pub mod service;
pub mod session;

use serde::{Deserialize, Serialize};
use validator::Validate;

// Re-export necessary items
pub use code::generate_code;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use service::AuthService;
pub use session::{Claims, SessionIssuer};

/// Payload for `POST /auth/create-account`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name for the new account.
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    /// Must be at least 8 characters long.
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Payload for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Payload carrying a six-digit confirmation or reset code.
#[derive(Debug, Deserialize, Validate)]
pub struct TokenRequest {
    #[validate(length(equal = 6, message = "Invalid token"))]
    pub token: String,
}

/// Payload carrying only an email (resend confirmation, forgot password).
#[derive(Debug, Deserialize, Validate)]
pub struct EmailRequest {
    #[validate(email)]
    pub email: String,
}

/// Payload for `POST /auth/update-password/{token}`.
#[derive(Debug, Deserialize, Validate)]
pub struct NewPasswordRequest {
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Payload for the authenticated password change.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Payload for the step-up password check.
#[derive(Debug, Deserialize, Validate)]
pub struct CheckPasswordRequest {
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Payload for `PUT /auth/profile`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email)]
    pub email: String,
}

/// Response for a successful login: the session JWT.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}
