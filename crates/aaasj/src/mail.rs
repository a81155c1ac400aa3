//! Outgoing email through the Resend HTTP API.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use aaasj_core::scholarship::{Attachment, OutgoingEmail, ScholarshipError};

const RESEND_EMAILS_URL: &str = "https://api.resend.com/emails";

/// Delivers assembled emails and returns the provider's message id.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<String, ScholarshipError>;
}

#[derive(Debug, Serialize)]
struct ResendAttachment<'a> {
    filename: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content_type: Option<&'a str>,
}

impl<'a> From<&'a Attachment> for ResendAttachment<'a> {
    fn from(attachment: &'a Attachment) -> Self {
        Self {
            filename: &attachment.filename,
            content: STANDARD.encode(&attachment.content),
            content_type: attachment.content_type.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ResendEmail<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<ResendAttachment<'a>>,
}

impl<'a> From<&'a OutgoingEmail> for ResendEmail<'a> {
    fn from(email: &'a OutgoingEmail) -> Self {
        Self {
            from: &email.from,
            to: &email.to,
            subject: &email.subject,
            text: &email.text,
            reply_to: email.reply_to.as_deref(),
            attachments: email.attachments.iter().map(ResendAttachment::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ResendSent {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ResendFailure {
    message: Option<String>,
    name: Option<String>,
}

pub struct ResendMailer {
    client: reqwest::Client,
    api_key: String,
}

impl ResendMailer {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<String, ScholarshipError> {
        let resp = self
            .client
            .post(RESEND_EMAILS_URL)
            .bearer_auth(&self.api_key)
            .json(&ResendEmail::from(email))
            .send()
            .await
            .map_err(|e| ScholarshipError::Mail(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ResendFailure>(&text)
                .ok()
                .and_then(|f| f.message.or(f.name))
                .unwrap_or(text);
            tracing::error!(status = %status, message = %message, "Resend rejected the email");
            return Err(ScholarshipError::Mail(message));
        }

        let sent: ResendSent = resp
            .json()
            .await
            .map_err(|e| ScholarshipError::Mail(e.to_string()))?;
        tracing::info!(message_id = %sent.id, to = ?email.to, "Email sent");
        Ok(sent.id)
    }
}

/// Records every email instead of sending it.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingMailer {
    pub sent: std::sync::Mutex<Vec<OutgoingEmail>>,
    pub fail_with: Option<String>,
}

#[cfg(test)]
impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<String, ScholarshipError> {
        if let Some(message) = &self.fail_with {
            return Err(ScholarshipError::Mail(message.clone()));
        }
        let mut sent = self.sent.lock().map_err(|e| ScholarshipError::Mail(e.to_string()))?;
        sent.push(email.clone());
        Ok(format!("msg-{}", sent.len()))
    }
}
