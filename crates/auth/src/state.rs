//! Application state for auth.

use std::sync::Arc;

use aaasj_core::auth::{OidcProviderClient, SessionRepository};
use axum::extract::FromRef;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::providers::GoogleProvider;

/// Shared state for auth handlers and extractors.
#[derive(Clone)]
pub struct AuthState {
    pub sessions: Arc<dyn SessionRepository>,
    pub config: AuthConfig,
    provider: Option<Arc<dyn OidcProviderClient>>,
}

impl AuthState {
    /// Creates the auth state, discovering Google when it is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if OIDC discovery fails.
    pub async fn new(
        sessions: Arc<dyn SessionRepository>,
        config: AuthConfig,
    ) -> Result<Self, AuthError> {
        let provider = match config.google {
            Some(ref cfg) => {
                let google = GoogleProvider::new(cfg, &config.allowed_domain).await?;
                Some(Arc::new(google) as Arc<dyn OidcProviderClient>)
            }
            None => {
                tracing::warn!("GOOGLE_CLIENT_ID not set, admin sign-in is disabled");
                None
            }
        };

        Ok(Self {
            sessions,
            config,
            provider,
        })
    }

    /// Creates the auth state around an already built provider.
    pub fn with_provider(
        sessions: Arc<dyn SessionRepository>,
        config: AuthConfig,
        provider: Option<Arc<dyn OidcProviderClient>>,
    ) -> Self {
        Self {
            sessions,
            config,
            provider,
        }
    }

    /// # Errors
    ///
    /// Returns `ProviderNotConfigured` if Google sign-in is not enabled.
    pub fn provider(&self) -> Result<&dyn OidcProviderClient, AuthError> {
        self.provider
            .as_deref()
            .ok_or_else(|| AuthError::ProviderNotConfigured("Google".to_string()))
    }
}

/// Allows AuthState to be extracted from a parent state.
impl<S> FromRef<S> for AuthState
where
    S: AsRef<AuthState>,
{
    fn from_ref(state: &S) -> Self {
        state.as_ref().clone()
    }
}
