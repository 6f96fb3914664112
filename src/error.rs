//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! It centralizes the error taxonomy of the account lifecycle and authorization code:
//! missing resources (including authorization denials deliberately disguised as
//! not-found), duplicate emails, unconfirmed accounts, bad credentials, and failed
//! session validation all have dedicated variants with a fixed HTTP mapping.
//!
//! `AppError` implements `actix_web::error::ResponseError` so handlers can return
//! `Result<_, AppError>` and have failures rendered as `{"error": message}` JSON.
//! `From` implementations for `sqlx::Error`, `validator::ValidationErrors`,
//! `jsonwebtoken::errors::Error`, and `bcrypt::BcryptError` allow conversion with `?`.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// A requested user, token, or project was not found (HTTP 404).
    /// Also produced when an authorization check fails, so callers cannot
    /// distinguish a missing resource from one they may not touch.
    NotFound(String),
    /// A uniqueness constraint was violated, e.g. a duplicate email (HTTP 409).
    Conflict(String),
    /// Login was attempted on an account pending confirmation (HTTP 401).
    /// Producing this error also re-issues a confirmation token.
    Unconfirmed(String),
    /// Password verification failed (HTTP 401).
    InvalidCredentials(String),
    /// The session credential is missing, malformed, expired, or forged (HTTP 401).
    /// The message is always generic so the failing check is never revealed.
    Unauthorized(String),
    /// Input validation failed (HTTP 422 Unprocessable Entity).
    Validation(String),
    /// A storage operation failed (HTTP 500). The detail is logged, never sent.
    Database(String),
    /// Any other unexpected server-side failure (HTTP 500).
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Unconfirmed(msg) => write!(f, "Unconfirmed: {}", msg),
            AppError::InvalidCredentials(msg) => write!(f, "Invalid Credentials: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Validation(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Database(msg) => write!(f, "Database Error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// Domain errors carry their intentional message; storage and internal errors
/// are collapsed to a generic body so no internal detail leaks to the client.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unconfirmed(_)
            | AppError::InvalidCredentials(_)
            | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Database(msg) | AppError::Internal(msg) => {
                log::error!("internal error: {}", msg);
                HttpResponse::build(self.status_code()).json(json!({
                    "error": "There was an error"
                }))
            }
            AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::Unconfirmed(msg)
            | AppError::InvalidCredentials(msg)
            | AppError::Unauthorized(msg)
            | AppError::Validation(msg) => HttpResponse::build(self.status_code()).json(json!({
                "error": msg
            })),
        }
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `sqlx::Error::RowNotFound` maps to `AppError::NotFound`; everything else
/// becomes a `Database` error rendered as a generic 500.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::Database(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::Validation(error.to_string())
    }
}

/// Converts `jsonwebtoken::errors::Error` into `AppError::Unauthorized`.
///
/// Malformed, expired, and bad-signature credentials all produce the same
/// generic message so the failure mode is never revealed to the caller.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(_error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized("Not authorized".into())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(error.to_string())
    }
}
