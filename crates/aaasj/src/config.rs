use std::{env, path::PathBuf, time::Duration};

use aaasj_core::scholarship::{DEFAULT_EMAIL_FROM, DEFAULT_EMAIL_TO};
use aaasj_core::security::{RATE_LIMIT_MAX_REQUESTS, RATE_LIMIT_WINDOW};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding `events.json` and `shared-albums.json` (default: "data")
    pub data_dir: PathBuf,
    /// Directory served for non-API paths (default: "public")
    pub static_dir: PathBuf,
    /// Scholarship notification recipient
    pub scholarship_email_to: String,
    /// Scholarship notification sender address
    pub scholarship_email_from: String,
    /// Resend API key; without it applications are only logged
    pub resend_api_key: Option<String>,
    /// Requests per client per window on `/api/*` (default: 100)
    pub rate_limit_max_requests: u32,
    /// Rate limit window in seconds (default: 900)
    pub rate_limit_window_secs: u64,
    /// Server-wide request timeout in seconds (default: 30)
    pub request_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DATA_DIR` - JSON store directory (default: "data")
    /// - `STATIC_DIR` - static asset directory (default: "public")
    /// - `SCHOLARSHIP_EMAIL_TO` - recipient (default: "scholarship@aaa-sj.org")
    /// - `SCHOLARSHIP_EMAIL_FROM` - sender (default: "noreply@aaasj.org")
    /// - `RESEND_API_KEY` - Resend API key (optional)
    /// - `RATE_LIMIT_MAX_REQUESTS` - requests per window (default: 100)
    /// - `RATE_LIMIT_WINDOW_SECS` - window length (default: 900)
    /// - `REQUEST_TIMEOUT_SECS` - request timeout (default: 30)
    pub fn from_env() -> Self {
        Self {
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            static_dir: env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("public")),
            scholarship_email_to: non_empty_var("SCHOLARSHIP_EMAIL_TO")
                .unwrap_or_else(|| DEFAULT_EMAIL_TO.to_string()),
            scholarship_email_from: non_empty_var("SCHOLARSHIP_EMAIL_FROM")
                .unwrap_or_else(|| DEFAULT_EMAIL_FROM.to_string()),
            resend_api_key: non_empty_var("RESEND_API_KEY"),
            rate_limit_max_requests: env::var("RATE_LIMIT_MAX_REQUESTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(RATE_LIMIT_MAX_REQUESTS),
            rate_limit_window_secs: env::var("RATE_LIMIT_WINDOW_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(RATE_LIMIT_WINDOW.as_secs()),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        }
    }

    /// Configuration rooted at a data directory, with defaults for the rest.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            static_dir: PathBuf::from("public"),
            scholarship_email_to: DEFAULT_EMAIL_TO.to_string(),
            scholarship_email_from: DEFAULT_EMAIL_FROM.to_string(),
            resend_api_key: None,
            rate_limit_max_requests: RATE_LIMIT_MAX_REQUESTS,
            rate_limit_window_secs: RATE_LIMIT_WINDOW.as_secs(),
            request_timeout_secs: 30,
        }
    }

    pub fn events_file(&self) -> PathBuf {
        self.data_dir.join("events.json")
    }

    pub fn albums_file(&self) -> PathBuf {
        self.data_dir.join("shared-albums.json")
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_paths() {
        let config = Config::with_data_dir("/srv/aaasj");

        assert_eq!(config.events_file(), PathBuf::from("/srv/aaasj/events.json"));
        assert_eq!(
            config.albums_file(),
            PathBuf::from("/srv/aaasj/shared-albums.json")
        );
    }

    #[test]
    fn test_duration_conversion() {
        let config = Config {
            rate_limit_window_secs: 60,
            request_timeout_secs: 5,
            ..Config::with_data_dir("data")
        };

        assert_eq!(config.rate_limit_window(), Duration::from_secs(60));
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_default_values() {
        // Clear environment variables to test defaults
        env::remove_var("DATA_DIR");
        env::remove_var("STATIC_DIR");
        env::remove_var("SCHOLARSHIP_EMAIL_TO");
        env::remove_var("SCHOLARSHIP_EMAIL_FROM");
        env::remove_var("RESEND_API_KEY");
        env::remove_var("RATE_LIMIT_MAX_REQUESTS");
        env::remove_var("RATE_LIMIT_WINDOW_SECS");
        env::remove_var("REQUEST_TIMEOUT_SECS");

        let config = Config::from_env();

        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.static_dir, PathBuf::from("public"));
        assert_eq!(config.scholarship_email_to, "scholarship@aaa-sj.org");
        assert_eq!(config.scholarship_email_from, "noreply@aaasj.org");
        assert_eq!(config.resend_api_key, None);
        assert_eq!(config.rate_limit_max_requests, 100);
        assert_eq!(config.rate_limit_window_secs, 900);
        assert_eq!(config.request_timeout_secs, 30);
    }
}
