use chrono::{DateTime, Duration, Utc};
use rand::{distr::Alphanumeric, Rng};

use super::{Session, SessionId};

const TOKEN_LENGTH: usize = 32;

fn random_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Generate a cryptographically random session ID.
pub fn generate_session_id() -> SessionId {
    SessionId::new(random_token())
}

/// Random `state` parameter for the OAuth redirect (CSRF protection).
pub fn generate_state() -> String {
    random_token()
}

/// Check if a session has expired.
pub fn is_session_expired(session: &Session, now: DateTime<Utc>) -> bool {
    session.expires_at <= now
}

/// Calculate session expiry from creation time and TTL.
pub fn calculate_expiry(created_at: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    created_at + ttl
}

/// Display name derived from an email address when Google sends none.
pub fn email_to_name(email: &str) -> String {
    match email.split('@').next() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => "User".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(created_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Session {
        Session {
            id: generate_session_id(),
            email: "board@aaa-sj.org".to_string(),
            name: None,
            access_token: None,
            created_at,
            expires_at,
        }
    }

    #[test]
    fn generate_session_id_produces_32_char_alphanumeric() {
        let id = generate_session_id();
        assert_eq!(id.as_str().len(), 32);
        assert!(id.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn generated_ids_and_states_are_unique() {
        assert_ne!(generate_session_id(), generate_session_id());
        assert_ne!(generate_state(), generate_state());
        assert_eq!(generate_state().len(), 32);
    }

    #[test]
    fn session_expiry_boundaries() {
        let now = Utc::now();

        assert!(!is_session_expired(&session(now, now + Duration::hours(1)), now));
        assert!(is_session_expired(&session(now - Duration::hours(2), now - Duration::hours(1)), now));
        assert!(is_session_expired(&session(now - Duration::hours(1), now), now));
    }

    #[test]
    fn calculate_expiry_adds_ttl_to_created_at() {
        let created = Utc::now();
        let ttl = Duration::days(7);
        assert_eq!(calculate_expiry(created, ttl), created + ttl);
    }

    #[test]
    fn email_to_name_uses_local_part() {
        assert_eq!(email_to_name("treasurer@aaa-sj.org"), "treasurer");
        assert_eq!(email_to_name("no-at-sign"), "no-at-sign");
        assert_eq!(email_to_name(""), "User");
    }
}
