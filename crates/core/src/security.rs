//! Request hardening rules shared by the HTTP layer.
//!
//! Origin allow-list, fixed-window rate limiting, upload limits, input
//! sanitization and the Content-Security-Policy directive table.

use std::collections::HashMap;
use std::net::IpAddr;
use std::time::{Duration, Instant};

use thiserror::Error;

/// Origins allowed to make cross-origin requests.
pub const ALLOWED_ORIGINS: &[&str] = &[
    "https://aaasj.org",
    "https://www.aaasj.org",
    "https://aaasj.vercel.app",
    "http://localhost:3000",
];

pub const RATE_LIMIT_MAX_REQUESTS: u32 = 100;
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(15 * 60);

/// Largest accepted upload, in bytes.
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;
pub const MAX_FILES_PER_REQUEST: usize = 5;
pub const ALLOWED_FILE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "application/pdf"];

/// Longest single-line form value kept after sanitization, in characters.
pub const MAX_INPUT_LENGTH: usize = 1000;

const CSP_DIRECTIVES: &[(&str, &[&str])] = &[
    ("default-src", &["'self'"]),
    ("script-src", &["'self'", "'unsafe-eval'", "'unsafe-inline'"]),
    ("style-src", &["'self'", "'unsafe-inline'"]),
    ("img-src", &["'self'", "data:", "https:"]),
    ("font-src", &["'self'", "data:"]),
    (
        "connect-src",
        &[
            "'self'",
            "https://api.resend.com",
            "https://www.googleapis.com",
            "https://lh3.googleusercontent.com",
        ],
    ),
    ("frame-src", &["'none'"]),
    ("object-src", &["'none'"]),
    ("base-uri", &["'self'"]),
    ("form-action", &["'self'"]),
];

/// Content-Security-Policy header value.
pub fn content_security_policy() -> String {
    CSP_DIRECTIVES
        .iter()
        .map(|(directive, sources)| format!("{directive} {}", sources.join(" ")))
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn is_allowed_origin(origin: &str) -> bool {
    ALLOWED_ORIGINS.contains(&origin)
}

/// Trims, removes angle brackets and caps the length of a form value.
pub fn sanitize_input(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|c| *c != '<' && *c != '>')
        .take(MAX_INPUT_LENGTH)
        .collect()
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("File size exceeds {}MB limit", MAX_FILE_SIZE / (1024 * 1024))]
    TooLarge { filename: String, size: usize },

    #[error("File type {content_type} is not allowed")]
    DisallowedType {
        filename: String,
        content_type: String,
    },

    #[error("Too many files (maximum {})", MAX_FILES_PER_REQUEST)]
    TooManyFiles,
}

/// Checks one uploaded file against the size and type limits.
pub fn validate_file_upload(
    filename: &str,
    content_type: &str,
    size: usize,
) -> Result<(), UploadError> {
    if size > MAX_FILE_SIZE {
        return Err(UploadError::TooLarge {
            filename: filename.to_string(),
            size,
        });
    }
    if !ALLOWED_FILE_TYPES.contains(&content_type) {
        return Err(UploadError::DisallowedType {
            filename: filename.to_string(),
            content_type: content_type.to_string(),
        });
    }
    Ok(())
}

/// Key a client is rate limited under: the first `X-Forwarded-For` entry,
/// else the peer address, else `unknown`.
pub fn client_key(forwarded_for: Option<&str>, peer: Option<IpAddr>) -> String {
    forwarded_for
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|ip| ip.to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    resets_at: Instant,
}

/// Fixed-window request counter keyed by client.
///
/// The first request of a client opens a window; further requests are
/// admitted until `max_requests` is reached, after which they are refused
/// until the window has elapsed.
#[derive(Debug)]
pub struct FixedWindowLimiter {
    max_requests: u32,
    window: Duration,
    clients: HashMap<String, Window>,
}

impl FixedWindowLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            clients: HashMap::new(),
        }
    }

    /// Records a request and returns whether it is admitted.
    pub fn check(&mut self, key: &str, now: Instant) -> bool {
        match self.clients.get_mut(key) {
            Some(entry) if now <= entry.resets_at => {
                if entry.count >= self.max_requests {
                    return false;
                }
                entry.count += 1;
                true
            }
            _ => {
                self.clients.insert(
                    key.to_string(),
                    Window {
                        count: 1,
                        resets_at: now + self.window,
                    },
                );
                true
            }
        }
    }

    /// Drops clients whose window has elapsed.
    pub fn prune(&mut self, now: Instant) {
        self.clients.retain(|_, entry| now <= entry.resets_at);
    }

    pub fn tracked_clients(&self) -> usize {
        self.clients.len()
    }
}

impl Default for FixedWindowLimiter {
    fn default() -> Self {
        Self::new(RATE_LIMIT_MAX_REQUESTS, RATE_LIMIT_WINDOW)
    }
}
