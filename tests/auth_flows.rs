//! End-to-end exercises of the account lifecycle engine against in-memory
//! stores, covering the state machine (pending -> confirmed), the reset
//! sub-flow, and the side effects each transition must or must not have.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use taskcrew::auth::{AuthService, SessionIssuer};
use taskcrew::error::AppError;
use taskcrew::models::{Token, User};
use taskcrew::notify::Notifier;
use taskcrew::store::{TokenStore, UserStore};
use uuid::Uuid;

#[derive(Clone, Default)]
struct MemUsers {
    users: Arc<Mutex<HashMap<Uuid, User>>>,
}

impl MemUsers {
    fn get(&self, id: Uuid) -> Option<User> {
        self.users.lock().unwrap().get(&id).cloned()
    }

    fn count(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

impl UserStore for MemUsers {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn save(&self, user: &User) -> Result<(), AppError> {
        self.users.lock().unwrap().insert(user.id, user.clone());
        Ok(())
    }
}

#[derive(Clone, Default)]
struct MemTokens {
    tokens: Arc<Mutex<HashMap<String, Token>>>,
}

impl MemTokens {
    fn count(&self) -> usize {
        self.tokens.lock().unwrap().len()
    }

    fn for_user(&self, user_id: Uuid) -> Vec<Token> {
        self.tokens
            .lock()
            .unwrap()
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect()
    }

    fn backdate(&self, code: &str, minutes: i64) {
        let mut tokens = self.tokens.lock().unwrap();
        let token = tokens.get_mut(code).unwrap();
        token.created_at = Utc::now() - Duration::minutes(minutes);
    }
}

impl TokenStore for MemTokens {
    async fn find_by_code(&self, code: &str) -> Result<Option<Token>, AppError> {
        Ok(self.tokens.lock().unwrap().get(code).cloned())
    }

    async fn save(&self, token: &Token) -> Result<(), AppError> {
        self.tokens
            .lock()
            .unwrap()
            .insert(token.code.clone(), token.clone());
        Ok(())
    }

    async fn delete(&self, token: &Token) -> Result<(), AppError> {
        self.tokens.lock().unwrap().remove(&token.code);
        Ok(())
    }
}

/// Records dispatched notifications as (email, code) pairs.
#[derive(Clone, Default)]
struct RecordingNotifier {
    confirmations: Arc<Mutex<Vec<(String, String)>>>,
    resets: Arc<Mutex<Vec<(String, String)>>>,
}

impl Notifier for RecordingNotifier {
    fn send_confirmation(&self, email: &str, _name: &str, code: &str) {
        self.confirmations
            .lock()
            .unwrap()
            .push((email.to_string(), code.to_string()));
    }

    fn send_password_reset(&self, email: &str, _name: &str, code: &str) {
        self.resets
            .lock()
            .unwrap()
            .push((email.to_string(), code.to_string()));
    }
}

type TestService = AuthService<MemUsers, MemTokens, RecordingNotifier>;

fn service() -> (
    TestService,
    MemUsers,
    MemTokens,
    RecordingNotifier,
    SessionIssuer,
) {
    let users = MemUsers::default();
    let tokens = MemTokens::default();
    let notifier = RecordingNotifier::default();
    let issuer = SessionIssuer::new("integration-test-secret");
    let svc = AuthService::new(
        users.clone(),
        tokens.clone(),
        notifier.clone(),
        issuer.clone(),
    );
    (svc, users, tokens, notifier, issuer)
}

#[actix_rt::test]
async fn register_creates_pending_user_with_one_token_and_dispatch() {
    let (svc, users, tokens, notifier, _) = service();

    svc.register("ada@example.com", "Ada", "password123")
        .await
        .unwrap();

    assert_eq!(users.count(), 1);
    let user = users
        .find_by_email("ada@example.com")
        .await
        .unwrap()
        .expect("user must exist");
    assert!(!user.confirmed);

    let user_tokens = tokens.for_user(user.id);
    assert_eq!(user_tokens.len(), 1);

    let sent = notifier.confirmations.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "ada@example.com");
    assert_eq!(sent[0].1, user_tokens[0].code);
}

#[actix_rt::test]
async fn duplicate_email_registration_is_conflict_with_no_writes() {
    let (svc, users, tokens, _, _) = service();

    svc.register("ada@example.com", "Ada", "password123")
        .await
        .unwrap();
    let result = svc.register("ada@example.com", "Imposter", "different1").await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert_eq!(users.count(), 1);
    assert_eq!(tokens.count(), 1);

    let user = users
        .find_by_email("ada@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.name, "Ada");
}

#[actix_rt::test]
async fn confirm_account_flips_flag_once_and_consumes_the_code() {
    let (svc, users, tokens, notifier, _) = service();

    svc.register("ada@example.com", "Ada", "password123")
        .await
        .unwrap();
    let code = notifier.confirmations.lock().unwrap()[0].1.clone();

    svc.confirm_account(&code).await.unwrap();

    let user = users
        .find_by_email("ada@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(user.confirmed);
    assert_eq!(tokens.count(), 0);

    // Resubmitting the consumed code must look like it never existed.
    let second = svc.confirm_account(&code).await;
    assert!(matches!(second, Err(AppError::NotFound(_))));
}

#[actix_rt::test]
async fn unconfirmed_login_is_rejected_and_always_mints_a_fresh_token() {
    let (svc, users, tokens, notifier, _) = service();

    svc.register("ada@example.com", "Ada", "password123")
        .await
        .unwrap();
    let user = users
        .find_by_email("ada@example.com")
        .await
        .unwrap()
        .unwrap();

    // Even the correct password does not get past the confirmation gate,
    // and the gate runs before the password is ever checked.
    let result = svc.login("ada@example.com", "password123").await;
    assert!(matches!(result, Err(AppError::Unconfirmed(_))));

    let result = svc.login("ada@example.com", "totally-wrong").await;
    assert!(matches!(result, Err(AppError::Unconfirmed(_))));

    // One token from registration plus one per rejected login.
    assert_eq!(tokens.for_user(user.id).len(), 3);
    assert_eq!(notifier.confirmations.lock().unwrap().len(), 3);
}

#[actix_rt::test]
async fn confirmed_login_round_trips_through_session_validation() {
    let (svc, _, _, notifier, issuer) = service();

    svc.register("ada@example.com", "Ada", "password123")
        .await
        .unwrap();
    let code = notifier.confirmations.lock().unwrap()[0].1.clone();
    svc.confirm_account(&code).await.unwrap();

    let credential = svc.login("ada@example.com", "password123").await.unwrap();
    let claims = issuer.validate(&credential).unwrap();

    let user = svc
        .current_user(claims.sub)
        .await
        .expect("claims must resolve to the registered user");
    assert_eq!(user.email, "ada@example.com");
}

#[actix_rt::test]
async fn login_distinguishes_missing_user_from_bad_password() {
    let (svc, _, _, notifier, _) = service();

    let result = svc.login("nobody@example.com", "password123").await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    svc.register("ada@example.com", "Ada", "password123")
        .await
        .unwrap();
    let code = notifier.confirmations.lock().unwrap()[0].1.clone();
    svc.confirm_account(&code).await.unwrap();

    let result = svc.login("ada@example.com", "wrong-password").await;
    assert!(matches!(result, Err(AppError::InvalidCredentials(_))));
}

#[actix_rt::test]
async fn password_reset_flow_replaces_the_old_password() {
    let (svc, _, _, notifier, _) = service();

    svc.register("ada@example.com", "Ada", "password123")
        .await
        .unwrap();
    let code = notifier.confirmations.lock().unwrap()[0].1.clone();
    svc.confirm_account(&code).await.unwrap();

    svc.forgot_password("ada@example.com").await.unwrap();
    let reset_code = notifier.resets.lock().unwrap()[0].1.clone();

    // Validation is a pure check: twice in a row both succeed.
    svc.validate_reset_token(&reset_code).await.unwrap();
    svc.validate_reset_token(&reset_code).await.unwrap();

    svc.reset_password(&reset_code, "brand-new-pass").await.unwrap();

    let old = svc.login("ada@example.com", "password123").await;
    assert!(matches!(old, Err(AppError::InvalidCredentials(_))));

    svc.login("ada@example.com", "brand-new-pass")
        .await
        .expect("new password must log in");

    // The reset code was consumed with the password change.
    let reused = svc.reset_password(&reset_code, "again").await;
    assert!(matches!(reused, Err(AppError::NotFound(_))));
}

#[actix_rt::test]
async fn forgot_password_works_for_unconfirmed_accounts() {
    let (svc, _, _, notifier, _) = service();

    svc.register("ada@example.com", "Ada", "password123")
        .await
        .unwrap();

    svc.forgot_password("ada@example.com").await.unwrap();
    assert_eq!(notifier.resets.lock().unwrap().len(), 1);

    let result = svc.forgot_password("nobody@example.com").await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[actix_rt::test]
async fn expired_codes_behave_exactly_like_absent_ones() {
    let (svc, _, tokens, notifier, _) = service();

    svc.register("ada@example.com", "Ada", "password123")
        .await
        .unwrap();
    let code = notifier.confirmations.lock().unwrap()[0].1.clone();

    tokens.backdate(&code, 11);

    let result = svc.confirm_account(&code).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    // The sweep removed the stale row.
    assert_eq!(tokens.count(), 0);
}

#[actix_rt::test]
async fn request_code_reissues_only_for_pending_accounts() {
    let (svc, _, tokens, notifier, _) = service();

    let missing = svc.request_confirmation_code("nobody@example.com").await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    svc.register("ada@example.com", "Ada", "password123")
        .await
        .unwrap();
    svc.request_confirmation_code("ada@example.com")
        .await
        .unwrap();
    assert_eq!(tokens.count(), 2);

    let code = notifier.confirmations.lock().unwrap()[0].1.clone();
    svc.confirm_account(&code).await.unwrap();

    let confirmed = svc.request_confirmation_code("ada@example.com").await;
    assert!(matches!(confirmed, Err(AppError::Conflict(_))));
}

#[actix_rt::test]
async fn emails_are_case_insensitive_across_flows() {
    let (svc, users, _, notifier, _) = service();

    svc.register("Ada@Example.COM", "Ada", "password123")
        .await
        .unwrap();
    assert!(users
        .find_by_email("ada@example.com")
        .await
        .unwrap()
        .is_some());

    let code = notifier.confirmations.lock().unwrap()[0].1.clone();
    svc.confirm_account(&code).await.unwrap();

    svc.login("ADA@example.com", "password123")
        .await
        .expect("login must normalize the email");

    let dup = svc.register("ADA@EXAMPLE.COM", "Clone", "password123").await;
    assert!(matches!(dup, Err(AppError::Conflict(_))));
}

#[actix_rt::test]
async fn change_password_requires_the_current_one() {
    let (svc, users, _, _, _) = service();

    svc.register("ada@example.com", "Ada", "password123")
        .await
        .unwrap();
    let user = users
        .find_by_email("ada@example.com")
        .await
        .unwrap()
        .unwrap();

    let wrong = svc.change_password(user.id, "not-it", "new-password1").await;
    assert!(matches!(wrong, Err(AppError::InvalidCredentials(_))));

    svc.change_password(user.id, "password123", "new-password1")
        .await
        .unwrap();

    svc.check_password(user.id, "new-password1").await.unwrap();
    let old = svc.check_password(user.id, "password123").await;
    assert!(matches!(old, Err(AppError::InvalidCredentials(_))));
}

#[actix_rt::test]
async fn update_profile_rejects_another_users_email() {
    let (svc, users, _, _, _) = service();

    svc.register("ada@example.com", "Ada", "password123")
        .await
        .unwrap();
    svc.register("grace@example.com", "Grace", "password123")
        .await
        .unwrap();

    let grace = users
        .find_by_email("grace@example.com")
        .await
        .unwrap()
        .unwrap();

    let taken = svc
        .update_profile(grace.id, "Grace", "ada@example.com")
        .await;
    assert!(matches!(taken, Err(AppError::Conflict(_))));

    // Keeping your own email is fine.
    svc.update_profile(grace.id, "Grace Hopper", "grace@example.com")
        .await
        .unwrap();
    let grace = users.get(grace.id).unwrap();
    assert_eq!(grace.name, "Grace Hopper");
}
