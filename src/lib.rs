#![doc = "The `taskcrew` library crate."]
#![doc = ""]
#![doc = "Core business logic for the TaskCrew backend: the account lifecycle"]
#![doc = "(registration, confirmation codes, login, password reset), session"]
#![doc = "issuance and validation, the project authorization guard, and the"]
#![doc = "HTTP routing built on top of them. The binary in `main.rs` wires"]
#![doc = "these together with the configuration and the connection pool."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod projects;
pub mod routes;
pub mod store;

use notify::LogNotifier;
use store::{PgTokenStore, PgUserStore};

/// The lifecycle engine as wired in production: Postgres stores plus the
/// logging notifier. Handlers take it from `web::Data`.
pub type AppAuthService = auth::AuthService<PgUserStore, PgTokenStore, LogNotifier>;
