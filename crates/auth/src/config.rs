use std::time::Duration;

use url::Url;

use crate::error::AuthError;

/// Google Workspace domain whose accounts may use the CMS.
pub const DEFAULT_ALLOWED_DOMAIN: &str = "aaa-sj.org";

const DEFAULT_SESSION_TTL_DAYS: u64 = 7;

/// Configuration for the Google OIDC client.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub redirect_uri: Url,
}

/// Complete auth configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub google: Option<ProviderConfig>,
    /// Only accounts of this domain get a session.
    pub allowed_domain: String,
    pub session_ttl: Duration,
    pub base_url: Url,
    pub cookie_name: String,
    pub cookie_secure: bool,
}

impl AuthConfig {
    /// Load from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `AUTH_BASE_URL`: Base URL for callback redirects (default: `http://localhost:3000`)
    /// - `GOOGLE_CLIENT_ID`: Google OAuth client ID (optional, enables sign-in)
    /// - `GOOGLE_CLIENT_SECRET`: Google OAuth client secret (required with the ID)
    /// - `AUTH_ALLOWED_DOMAIN`: Workspace domain allowed in (default: `aaa-sj.org`)
    /// - `SESSION_TTL_DAYS`: Session TTL in days (default: 7)
    /// - `COOKIE_SECURE`: Whether to set secure flag on cookies (default: true)
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or Google is partially
    /// configured (client ID without secret).
    pub fn from_env() -> Result<Self, AuthError> {
        let base_url = std::env::var("AUTH_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());
        let base_url: Url = base_url
            .parse()
            .map_err(|e| AuthError::Config(format!("AUTH_BASE_URL '{base_url}': {e}")))?;

        let google = match std::env::var("GOOGLE_CLIENT_ID") {
            Ok(client_id) if !client_id.is_empty() => {
                let client_secret = std::env::var("GOOGLE_CLIENT_SECRET").map_err(|_| {
                    AuthError::Config("GOOGLE_CLIENT_SECRET is required".to_string())
                })?;
                Some(ProviderConfig {
                    client_id,
                    client_secret: Some(client_secret),
                    redirect_uri: callback_url(&base_url)?,
                })
            }
            _ => None,
        };

        let allowed_domain = std::env::var("AUTH_ALLOWED_DOMAIN")
            .ok()
            .filter(|d| !d.trim().is_empty())
            .map(|d| d.trim().to_ascii_lowercase())
            .unwrap_or_else(|| DEFAULT_ALLOWED_DOMAIN.to_string());

        let session_ttl_days = std::env::var("SESSION_TTL_DAYS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_SESSION_TTL_DAYS);

        let cookie_secure = std::env::var("COOKIE_SECURE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(true);

        Ok(Self {
            google,
            allowed_domain,
            session_ttl: Duration::from_secs(session_ttl_days * 24 * 60 * 60),
            base_url,
            cookie_name: "aaasj_session".to_string(),
            cookie_secure,
        })
    }

    /// Configuration without a provider, for tests and local development.
    pub fn local(base_url: Url) -> Self {
        Self {
            google: None,
            allowed_domain: DEFAULT_ALLOWED_DOMAIN.to_string(),
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_DAYS * 24 * 60 * 60),
            base_url,
            cookie_name: "aaasj_session".to_string(),
            cookie_secure: false,
        }
    }

    pub fn session_ttl_seconds(&self) -> i64 {
        i64::try_from(self.session_ttl.as_secs()).unwrap_or(i64::MAX)
    }
}

fn callback_url(base_url: &Url) -> Result<Url, AuthError> {
    base_url
        .join("/auth/google/callback")
        .map_err(|e| AuthError::Config(format!("callback URL: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_url_is_rooted_at_base() {
        let base: Url = "https://aaasj.org/some/path".parse().unwrap();
        assert_eq!(
            callback_url(&base).unwrap().as_str(),
            "https://aaasj.org/auth/google/callback"
        );
    }

    #[test]
    fn local_config_defaults() {
        let config = AuthConfig::local("http://localhost:3000".parse().unwrap());
        assert!(config.google.is_none());
        assert_eq!(config.allowed_domain, "aaa-sj.org");
        assert_eq!(config.session_ttl_seconds(), 7 * 24 * 60 * 60);
        assert!(!config.cookie_secure);
    }
}
