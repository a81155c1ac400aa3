/// Validates a post-login `return_to` target.
///
/// Returns `Some(url)` only for a relative path on this site: it must start
/// with a single `/`, must not contain control characters or backslashes
/// and must not carry a scheme (`://`). Browsers read `\` as `/`, so
/// `/\evil.com` is protocol-relative too. Anything else could send a freshly
/// signed-in admin to another origin.
///
/// # Examples
///
/// ```
/// use aaasj_core::auth::validate_return_to;
///
/// assert_eq!(validate_return_to("/admin/events"), Some("/admin/events"));
/// assert_eq!(validate_return_to("//evil.com"), None);
/// assert_eq!(validate_return_to("/\\evil.com"), None);
/// assert_eq!(validate_return_to("https://evil.com"), None);
/// ```
pub fn validate_return_to(url: &str) -> Option<&str> {
    if !url.starts_with('/') || url.starts_with("//") {
        return None;
    }

    if url.chars().any(|c| c.is_control() || c == '\\') {
        return None;
    }

    if url.contains("://") {
        return None;
    }

    Some(url)
}

/// Domain part of an email address, lowercased.
pub fn email_domain(email: &str) -> Option<String> {
    let (local, domain) = email.trim().rsplit_once('@')?;
    if local.is_empty() || domain.is_empty() {
        return None;
    }
    Some(domain.to_ascii_lowercase())
}

/// Whether an email address belongs to the organization's Google Workspace
/// domain. Subdomains do not count.
///
/// ```
/// use aaasj_core::auth::is_allowed_domain;
///
/// assert!(is_allowed_domain("board@aaa-sj.org", "aaa-sj.org"));
/// assert!(!is_allowed_domain("someone@gmail.com", "aaa-sj.org"));
/// ```
pub fn is_allowed_domain(email: &str, allowed_domain: &str) -> bool {
    email_domain(email).is_some_and(|domain| domain == allowed_domain.to_ascii_lowercase())
}
