//! In-memory session storage.

use std::collections::HashMap;
use std::sync::Arc;

use aaasj_core::auth::{
    is_session_expired, AuthFlowState, Result, Session, SessionId, SessionRepository,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

/// How long a login may take between redirect and callback.
const AUTH_FLOW_TTL_MINUTES: i64 = 10;

/// Sessions and pending login flows in `Arc<RwLock<HashMap>>`s.
///
/// Clones share the same maps.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    auth_flows: Arc<RwLock<HashMap<String, AuthFlowState>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops expired sessions and abandoned login flows.
    pub async fn purge_expired(&self, now: DateTime<Utc>) {
        let flow_cutoff = now - Duration::minutes(AUTH_FLOW_TTL_MINUTES);

        let removed_sessions = {
            let mut sessions = self.sessions.write().await;
            let before = sessions.len();
            sessions.retain(|_, s| !is_session_expired(s, now));
            before - sessions.len()
        };
        let removed_flows = {
            let mut flows = self.auth_flows.write().await;
            let before = flows.len();
            flows.retain(|_, f| f.created_at > flow_cutoff);
            before - flows.len()
        };

        if removed_sessions + removed_flows > 0 {
            tracing::debug!(removed_sessions, removed_flows, "Purged stale auth state");
        }
    }
}

#[async_trait]
impl SessionRepository for SessionStore {
    async fn create_session(&self, session: &Session) -> Result<()> {
        self.purge_expired(Utc::now()).await;
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id.as_str().to_string(), session.clone());
        Ok(())
    }

    async fn get_session(&self, id: &SessionId) -> Result<Option<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(id.as_str()).cloned())
    }

    async fn delete_session(&self, id: &SessionId) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(id.as_str());
        Ok(())
    }

    async fn store_auth_flow(&self, state: &str, flow: &AuthFlowState) -> Result<()> {
        let mut flows = self.auth_flows.write().await;
        flows.insert(state.to_string(), flow.clone());
        Ok(())
    }

    async fn take_auth_flow(&self, state: &str) -> Result<Option<AuthFlowState>> {
        let flow = self.auth_flows.write().await.remove(state);
        let cutoff = Utc::now() - Duration::minutes(AUTH_FLOW_TTL_MINUTES);
        Ok(flow.filter(|f| f.created_at > cutoff))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(id: &str, expires_at: DateTime<Utc>) -> Session {
        Session {
            id: SessionId::new(id.to_string()),
            email: "events@aaa-sj.org".to_string(),
            name: Some("Events Team".to_string()),
            access_token: Some("ya29.token".to_string()),
            created_at: Utc::now(),
            expires_at,
        }
    }

    fn flow(created_at: DateTime<Utc>) -> AuthFlowState {
        AuthFlowState {
            pkce_verifier: "test-verifier".to_string(),
            created_at,
            return_to: Some("/admin/photos".to_string()),
        }
    }

    fn id(value: &str) -> SessionId {
        SessionId::new(value.to_string())
    }

    #[tokio::test]
    async fn test_session_create_get_delete() {
        let store = SessionStore::new();
        let session = session("session-1", Utc::now() + Duration::hours(1));

        store.create_session(&session).await.unwrap();
        let retrieved = store.get_session(&id("session-1")).await.unwrap().unwrap();
        assert_eq!(retrieved.email, "events@aaa-sj.org");
        assert_eq!(retrieved.access_token.as_deref(), Some("ya29.token"));

        store.delete_session(&id("session-1")).await.unwrap();
        assert!(store.get_session(&id("session-1")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_nonexistent_session_is_ok() {
        let store = SessionStore::new();
        assert!(store.delete_session(&id("nope")).await.is_ok());
    }

    #[tokio::test]
    async fn test_auth_flow_is_taken_once() {
        let store = SessionStore::new();
        store.store_auth_flow("state-abc", &flow(Utc::now())).await.unwrap();

        let taken = store.take_auth_flow("state-abc").await.unwrap().unwrap();
        assert_eq!(taken.pkce_verifier, "test-verifier");
        assert_eq!(taken.return_to.as_deref(), Some("/admin/photos"));

        assert!(store.take_auth_flow("state-abc").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stale_auth_flow_is_rejected() {
        let store = SessionStore::new();
        let stale = flow(Utc::now() - Duration::minutes(AUTH_FLOW_TTL_MINUTES + 1));
        store.store_auth_flow("old", &stale).await.unwrap();

        assert!(store.take_auth_flow("old").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_purge_drops_expired_sessions_and_flows() {
        let store = SessionStore::new();
        let now = Utc::now();
        store
            .create_session(&session("live", now + Duration::hours(1)))
            .await
            .unwrap();
        store
            .create_session(&session("dead", now - Duration::seconds(1)))
            .await
            .unwrap();
        store
            .store_auth_flow("old", &flow(now - Duration::hours(1)))
            .await
            .unwrap();

        store.purge_expired(now).await;

        assert!(store.get_session(&id("live")).await.unwrap().is_some());
        assert!(store.get_session(&id("dead")).await.unwrap().is_none());
        assert!(store.auth_flows.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_clone_shares_state() {
        let store = SessionStore::new();
        let clone = store.clone();

        store
            .create_session(&session("session-1", Utc::now() + Duration::hours(1)))
            .await
            .unwrap();

        assert!(clone.get_session(&id("session-1")).await.unwrap().is_some());
    }
}
