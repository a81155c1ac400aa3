use serde::Serialize;

pub const DEFAULT_EMAIL_TO: &str = "scholarship@aaa-sj.org";
pub const DEFAULT_EMAIL_FROM: &str = "noreply@aaasj.org";

/// Environment variables the mailer needs that are not set.
pub fn missing_mail_variables(api_key: Option<&str>) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if api_key.is_none_or(str::is_empty) {
        missing.push("RESEND_API_KEY");
    }
    missing
}

/// Response message for applications that were logged instead of emailed.
pub fn logged_only_message(missing: &[&str]) -> String {
    format!(
        "Application received and logged. Email will be sent when email delivery is configured. Missing variables: {}",
        missing.join(", ")
    )
}

/// First ten characters of an API key followed by an ellipsis.
pub fn mask_api_key(key: &str) -> String {
    let prefix: String = key.chars().take(10).collect();
    format!("{prefix}...")
}

/// Mail configuration as reported by `GET /api/scholarship/submit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailStatus {
    #[serde(rename = "RESEND_API_KEY")]
    pub api_key: &'static str,
    #[serde(rename = "SCHOLARSHIP_EMAIL_TO")]
    pub email_to: String,
    #[serde(rename = "SCHOLARSHIP_EMAIL_FROM")]
    pub email_from: String,
    #[serde(rename = "isConfigured")]
    pub is_configured: bool,
}

impl MailStatus {
    pub fn new(api_key: Option<&str>, email_to: &str, email_from: &str) -> Self {
        let is_configured = missing_mail_variables(api_key).is_empty();
        Self {
            api_key: if is_configured { "SET" } else { "MISSING" },
            email_to: email_to.to_string(),
            email_from: email_from.to_string(),
            is_configured,
        }
    }
}

/// Key diagnostics that never reveal the full key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MailDebugInfo {
    pub api_key_exists: bool,
    pub api_key_length: usize,
    pub api_key_prefix: String,
    pub email_to: String,
    pub email_from: String,
    pub timestamp: String,
}

impl MailDebugInfo {
    pub fn new(api_key: Option<&str>, email_to: &str, email_from: &str, timestamp: String) -> Self {
        let api_key = api_key.filter(|key| !key.is_empty());
        Self {
            api_key_exists: api_key.is_some(),
            api_key_length: api_key.map_or(0, |key| key.chars().count()),
            api_key_prefix: api_key.map_or_else(|| "N/A".to_string(), mask_api_key),
            email_to: email_to.to_string(),
            email_from: email_from.to_string(),
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_reported() {
        assert_eq!(missing_mail_variables(None), vec!["RESEND_API_KEY"]);
        assert_eq!(missing_mail_variables(Some("")), vec!["RESEND_API_KEY"]);
        assert!(missing_mail_variables(Some("re_123")).is_empty());
    }

    #[test]
    fn logged_only_message_names_missing_variables() {
        let message = logged_only_message(&["RESEND_API_KEY"]);
        assert!(message.starts_with("Application received and logged."));
        assert!(message.ends_with("Missing variables: RESEND_API_KEY"));
    }

    #[test]
    fn status_serializes_with_env_names() {
        let status = MailStatus::new(None, DEFAULT_EMAIL_TO, DEFAULT_EMAIL_FROM);
        let json = serde_json::to_value(&status).unwrap();

        assert_eq!(json["RESEND_API_KEY"], "MISSING");
        assert_eq!(json["SCHOLARSHIP_EMAIL_TO"], "scholarship@aaa-sj.org");
        assert_eq!(json["isConfigured"], false);
    }

    #[test]
    fn debug_info_masks_key() {
        let info = MailDebugInfo::new(
            Some("re_abcdefghijklmnop"),
            DEFAULT_EMAIL_TO,
            DEFAULT_EMAIL_FROM,
            "2026-01-01T00:00:00Z".into(),
        );

        assert!(info.api_key_exists);
        assert_eq!(info.api_key_length, 19);
        assert_eq!(info.api_key_prefix, "re_abcdefg...");

        let none = MailDebugInfo::new(None, DEFAULT_EMAIL_TO, DEFAULT_EMAIL_FROM, String::new());
        assert_eq!(none.api_key_prefix, "N/A");
        assert_eq!(none.api_key_length, 0);
    }
}
