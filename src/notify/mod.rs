//!
//! # Out-of-band notifications
//!
//! Confirmation and reset codes reach the user only through here; no API
//! response ever carries a raw code. Dispatch is fire-and-forget: callers
//! initiate it before awaiting persistence and never consult the outcome for
//! correctness, so a user can receive a code that was never durably stored.
//! That window is accepted, not papered over.

/// Delivery boundary for confirmation and password-reset codes.
pub trait Notifier {
    fn send_confirmation(&self, email: &str, name: &str, code: &str);
    fn send_password_reset(&self, email: &str, name: &str, code: &str);
}

/// Notifier that writes the would-be emails to the log.
///
/// This is the SMTP seam: a mail-backed implementation would spawn its
/// delivery here and equally ignore the result.
#[derive(Clone)]
pub struct LogNotifier {
    sender: String,
    frontend_url: String,
}

impl LogNotifier {
    pub fn new(sender: &str, frontend_url: &str) -> Self {
        Self {
            sender: sender.to_string(),
            frontend_url: frontend_url.to_string(),
        }
    }
}

impl Notifier for LogNotifier {
    fn send_confirmation(&self, email: &str, name: &str, code: &str) {
        log::info!(
            "confirmation mail from {} to {}: hi {}, confirm your account at \
             {}/auth/confirm-account with code {} (expires in 10 minutes)",
            self.sender,
            email,
            name,
            self.frontend_url,
            code
        );
    }

    fn send_password_reset(&self, email: &str, name: &str, code: &str) {
        log::info!(
            "password reset mail from {} to {}: hi {}, set a new password at \
             {}/auth/new-password with code {} (expires in 10 minutes)",
            self.sender,
            email,
            name,
            self.frontend_url,
            code
        );
    }
}
