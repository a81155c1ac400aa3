use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cryptographically random session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Signed-in CMS user.
///
/// The Google access token is kept server side so the Photos Library proxy
/// can call Google on the admin's behalf; it is never serialized to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub email: String,
    pub name: Option<String>,
    #[serde(skip_serializing)]
    pub access_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// What the identity provider told us about the user after code exchange.
#[derive(Debug, Clone)]
pub struct OidcClaims {
    /// Provider's unique user identifier.
    pub subject: String,
    pub email: Option<String>,
    pub name: Option<String>,
    /// OAuth access token granted alongside the ID token.
    pub access_token: Option<String>,
}

/// PKCE and state data stored during auth flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthFlowState {
    pub pkce_verifier: String,
    pub created_at: DateTime<Utc>,
    /// URL to redirect to after successful authentication.
    pub return_to: Option<String>,
}
