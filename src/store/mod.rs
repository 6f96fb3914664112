//!
//! # Persistence boundaries
//!
//! The lifecycle engine never talks to Postgres directly; it goes through the
//! `UserStore` and `TokenStore` traits so the flows can be exercised against
//! in-memory doubles. `postgres.rs` provides the production implementations
//! over a `sqlx::PgPool`.
//!
//! Both stores promise single-document atomicity per call and nothing more;
//! the engine's paired writes are explicitly best-effort (see
//! `auth::service`).

pub mod postgres;

pub use postgres::{PgTokenStore, PgUserStore};

use crate::error::AppError;
use crate::models::{Token, User};
use uuid::Uuid;

/// Persists `User` records. `save` is an upsert keyed by id.
#[allow(async_fn_in_trait)]
pub trait UserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;
    async fn save(&self, user: &User) -> Result<(), AppError>;
}

/// Persists single-use confirmation/reset tokens, keyed by code.
#[allow(async_fn_in_trait)]
pub trait TokenStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<Token>, AppError>;
    async fn save(&self, token: &Token) -> Result<(), AppError>;
    async fn delete(&self, token: &Token) -> Result<(), AppError>;
}
