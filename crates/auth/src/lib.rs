//! Google sign-in for the AAASJ website CMS.
//!
//! This crate provides:
//! - the OIDC authorization-code flow against Google, limited to the
//!   organization's Workspace domain
//! - an in-memory session store
//! - Axum extractors guarding the admin API

mod config;
mod error;
mod extractors;
mod handlers;
mod providers;
mod sessions;
mod state;

pub use config::{AuthConfig, ProviderConfig, DEFAULT_ALLOWED_DOMAIN};
pub use error::AuthError;
pub use extractors::{AdminUser, OptionalUser};
pub use handlers::{auth_routes, SessionUser};
pub use providers::GoogleProvider;
pub use sessions::SessionStore;
pub use state::AuthState;
