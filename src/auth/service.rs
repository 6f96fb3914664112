use crate::{
    auth::{code::generate_code, hash_password, verify_password, SessionIssuer},
    error::AppError,
    models::{Token, User, UserProfile},
    notify::Notifier,
    store::{TokenStore, UserStore},
};
use uuid::Uuid;

/// Orchestrates the account lifecycle: registration, confirmation,
/// login-gating, password reset, and authenticated self-service.
///
/// Per user the states are `Unregistered -> PendingConfirmation -> Confirmed`;
/// the password-reset sub-flow is keyed by a token and usable in any state.
///
/// The paired writes ("save user + save token", "save user + delete token")
/// run concurrently and are individually best-effort: a failure of one does
/// not roll back the other and is logged rather than surfaced. This mirrors
/// the store contract of per-document atomicity with no transactions across
/// documents.
pub struct AuthService<U, T, N> {
    users: U,
    tokens: T,
    notifier: N,
    sessions: SessionIssuer,
}

impl<U: UserStore, T: TokenStore, N: Notifier> AuthService<U, T, N> {
    pub fn new(users: U, tokens: T, notifier: N, sessions: SessionIssuer) -> Self {
        Self {
            users,
            tokens,
            notifier,
            sessions,
        }
    }

    /// Registers a new account in `PendingConfirmation` and dispatches a
    /// confirmation code. Fails `Conflict` if the email is already taken.
    ///
    /// The response never carries the code; it reaches the user only through
    /// the notifier.
    pub async fn register(&self, email: &str, name: &str, password: &str) -> Result<(), AppError> {
        let email = email.to_lowercase();

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".into()));
        }

        let password_hash = hash_password(password)?;
        let user = User::new(&email, name, password_hash);
        let token = Token::new(generate_code(), user.id);

        // Dispatch before the writes are awaited; delivery is not part of the
        // success criteria.
        self.notifier
            .send_confirmation(&user.email, &user.name, &token.code);

        let (saved_user, saved_token) =
            futures::join!(self.users.save(&user), self.tokens.save(&token));
        log_best_effort("register", saved_user, saved_token);

        Ok(())
    }

    /// Confirms the account that owns `code`. Fails `NotFound` for unknown,
    /// expired, or already-consumed codes.
    pub async fn confirm_account(&self, code: &str) -> Result<(), AppError> {
        let token = self.lookup_token(code).await?;

        let mut user = self
            .users
            .find_by_id(token.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;
        user.confirmed = true;

        let (saved_user, deleted_token) =
            futures::join!(self.users.save(&user), self.tokens.delete(&token));
        log_best_effort("confirm_account", saved_user, deleted_token);

        Ok(())
    }

    /// Authenticates a user and mints a session credential.
    ///
    /// Failing `Unconfirmed` is side-effecting: a fresh confirmation code is
    /// persisted and dispatched before the rejection. The confirmation check
    /// runs strictly before the password check.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .users
            .find_by_email(&email.to_lowercase())
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        if !user.confirmed {
            let token = Token::new(generate_code(), user.id);
            self.tokens.save(&token).await?;
            self.notifier
                .send_confirmation(&user.email, &user.name, &token.code);

            return Err(AppError::Unconfirmed(
                "Account not confirmed, we have sent a confirmation email".into(),
            ));
        }

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials("Incorrect password".into()));
        }

        self.sessions.issue(user.id)
    }

    /// Re-issues a confirmation code for a pending account.
    pub async fn request_confirmation_code(&self, email: &str) -> Result<(), AppError> {
        let user = self
            .users
            .find_by_email(&email.to_lowercase())
            .await?
            .ok_or_else(|| AppError::NotFound("User is not registered".into()))?;

        if user.confirmed {
            return Err(AppError::Conflict("User is already confirmed".into()));
        }

        let token = Token::new(generate_code(), user.id);
        self.notifier
            .send_confirmation(&user.email, &user.name, &token.code);

        let (saved_user, saved_token) =
            futures::join!(self.users.save(&user), self.tokens.save(&token));
        log_best_effort("request_confirmation_code", saved_user, saved_token);

        Ok(())
    }

    /// Starts the password-reset sub-flow. Works for unconfirmed accounts too.
    /// Unlike the confirmation flows, the token is durably stored before the
    /// notification goes out and the user record is untouched.
    pub async fn forgot_password(&self, email: &str) -> Result<(), AppError> {
        let user = self
            .users
            .find_by_email(&email.to_lowercase())
            .await?
            .ok_or_else(|| AppError::NotFound("User is not registered".into()))?;

        let token = Token::new(generate_code(), user.id);
        self.tokens.save(&token).await?;

        self.notifier
            .send_password_reset(&user.email, &user.name, &token.code);

        Ok(())
    }

    /// Pure existence check for a reset code; does not consume it. Kept
    /// separate from `reset_password` so a client can verify the code before
    /// prompting for the new password.
    pub async fn validate_reset_token(&self, code: &str) -> Result<(), AppError> {
        self.lookup_token(code).await?;
        Ok(())
    }

    /// Consumes a reset code and sets the owner's new password.
    pub async fn reset_password(&self, code: &str, new_password: &str) -> Result<(), AppError> {
        let token = self.lookup_token(code).await?;

        let mut user = self
            .users
            .find_by_id(token.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;
        user.password_hash = hash_password(new_password)?;

        let (saved_user, deleted_token) =
            futures::join!(self.users.save(&user), self.tokens.delete(&token));
        log_best_effort("reset_password", saved_user, deleted_token);

        Ok(())
    }

    /// Returns the acting user's public profile.
    pub async fn current_user(&self, user_id: Uuid) -> Result<UserProfile, AppError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        Ok(UserProfile::from(&user))
    }

    /// Updates name/email of the acting user. Fails `Conflict` when the email
    /// belongs to a different account.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        name: &str,
        email: &str,
    ) -> Result<(), AppError> {
        let email = email.to_lowercase();

        if let Some(existing) = self.users.find_by_email(&email).await? {
            if existing.id != user_id {
                return Err(AppError::Conflict("Email already registered".into()));
            }
        }

        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;
        user.name = name.to_string();
        user.email = email;

        self.users.save(&user).await
    }

    /// Changes the password of the acting user after re-verifying the current
    /// one. The user is reloaded from the store; the session payload is never
    /// trusted for the current hash.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        if !verify_password(current_password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials(
                "Current password is incorrect".into(),
            ));
        }

        user.password_hash = hash_password(new_password)?;
        self.users.save(&user).await
    }

    /// Step-up re-auth: verifies the acting user's password without mutating
    /// anything.
    pub async fn check_password(&self, user_id: Uuid, password: &str) -> Result<(), AppError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials("Incorrect password".into()));
        }

        Ok(())
    }

    /// Resolves a code to its token, treating expired codes exactly like
    /// absent ones. Stale rows are swept opportunistically.
    async fn lookup_token(&self, code: &str) -> Result<Token, AppError> {
        let token = self
            .tokens
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::NotFound("Invalid token".into()))?;

        if token.is_expired() {
            if let Err(e) = self.tokens.delete(&token).await {
                log::debug!("failed to sweep expired token: {}", e);
            }
            return Err(AppError::NotFound("Invalid token".into()));
        }

        Ok(token)
    }
}

/// Records the outcome of a best-effort write pair. Neither failure aborts
/// the flow or reaches the caller.
fn log_best_effort(flow: &str, first: Result<(), AppError>, second: Result<(), AppError>) {
    if let Err(e) = first {
        log::error!("{}: user write failed: {}", flow, e);
    }
    if let Err(e) = second {
        log::error!("{}: token write failed: {}", flow, e);
    }
}
