use crate::error::AppError;
use crate::models::{Token, User};
use crate::store::{TokenStore, UserStore};
use sqlx::PgPool;
use uuid::Uuid;

/// `UserStore` over Postgres.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, name, password_hash, confirmed, created_at \
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, name, password_hash, confirmed, created_at \
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn save(&self, user: &User) -> Result<(), AppError> {
        // Upsert keyed by id; the unique index on email backstops the
        // engine's duplicate check.
        sqlx::query(
            "INSERT INTO users (id, email, name, password_hash, confirmed, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (id) DO UPDATE SET \
                 email = EXCLUDED.email, \
                 name = EXCLUDED.name, \
                 password_hash = EXCLUDED.password_hash, \
                 confirmed = EXCLUDED.confirmed",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.confirmed)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// `TokenStore` over Postgres.
#[derive(Clone)]
pub struct PgTokenStore {
    pool: PgPool,
}

impl PgTokenStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl TokenStore for PgTokenStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<Token>, AppError> {
        let token = sqlx::query_as::<_, Token>(
            "SELECT code, user_id, created_at FROM tokens WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(token)
    }

    async fn save(&self, token: &Token) -> Result<(), AppError> {
        sqlx::query("INSERT INTO tokens (code, user_id, created_at) VALUES ($1, $2, $3)")
            .bind(&token.code)
            .bind(token.user_id)
            .bind(token.created_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete(&self, token: &Token) -> Result<(), AppError> {
        sqlx::query("DELETE FROM tokens WHERE code = $1")
            .bind(&token.code)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
