//! Scholarship application intake and mail diagnostics.

use axum::{
    extract::{multipart::Field, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde_json::json;

use aaasj_auth::AdminUser;
use aaasj_core::scholarship::{
    application_email, logged_only_message, missing_mail_variables, render_application_pdf,
    scholarship_error_to_status_code, Attachment, MailDebugInfo, MailStatus, OutgoingEmail,
    ScholarshipApplication, ScholarshipError, APPLICATION_PDF_FILENAME, TEST_EMAIL_SUBJECT,
};
use aaasj_core::security::{validate_file_upload, UploadError, MAX_FILES_PER_REQUEST};

use crate::state::AppState;

const TEST_EMAIL_TEXT: &str = "This is a test email to verify Resend is working correctly.";

/// A parsed submission: the text fields and every file to attach.
#[derive(Debug, Default)]
struct Submission {
    application: ScholarshipApplication,
    generated_pdf: Option<Attachment>,
    files: Vec<Attachment>,
}

async fn read_upload(
    field: Field<'_>,
    default_name: &str,
) -> Result<Option<Attachment>, ScholarshipError> {
    let filename = field
        .file_name()
        .filter(|name| !name.is_empty())
        .unwrap_or(default_name)
        .to_string();
    let content_type = field.content_type().map(str::to_string);
    let content = field
        .bytes()
        .await
        .map_err(|e| ScholarshipError::InvalidForm(e.to_string()))?;

    if content.is_empty() {
        return Ok(None);
    }

    let declared = content_type.as_deref().unwrap_or("application/octet-stream");
    validate_file_upload(&filename, declared, content.len())?;

    Ok(Some(Attachment {
        filename,
        content_type,
        content: content.to_vec(),
    }))
}

async fn read_submission(mut multipart: Multipart) -> Result<Submission, ScholarshipError> {
    let mut submission = Submission::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ScholarshipError::InvalidForm(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "generatedPdf" => {
                let has_type = field.content_type().is_some();
                if let Some(mut pdf) = read_upload(field, APPLICATION_PDF_FILENAME).await? {
                    if !has_type {
                        pdf.content_type = Some("application/pdf".to_string());
                    }
                    submission.generated_pdf = Some(pdf);
                }
            }
            "files" => {
                if let Some(file) = read_upload(field, "attachment").await? {
                    if submission.files.len() >= MAX_FILES_PER_REQUEST {
                        return Err(UploadError::TooManyFiles.into());
                    }
                    submission.files.push(file);
                }
            }
            _ => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ScholarshipError::InvalidForm(e.to_string()))?;
                if !submission.application.set_field(&name, &value) {
                    tracing::debug!(field = %name, "Ignoring unknown form field");
                }
            }
        }
    }

    Ok(submission)
}

fn submit_error(error: ScholarshipError) -> Response {
    let status = StatusCode::from_u16(scholarship_error_to_status_code(&error))
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        tracing::error!(error = %error, "Scholarship submission failed");
    } else {
        tracing::warn!(error = %error, "Scholarship submission rejected");
    }
    (status, Json(json!({ "message": error.to_string() }))).into_response()
}

/// POST /api/scholarship/submit - emails the application with its PDF copy
/// and any supporting files.
///
/// Without a mail key the application is logged and still accepted.
pub async fn submit_application(State(state): State<AppState>, multipart: Multipart) -> Response {
    let Submission {
        application,
        generated_pdf,
        files,
    } = match read_submission(multipart).await {
        Ok(submission) => submission,
        Err(e) => return submit_error(e),
    };

    let pdf = match generated_pdf {
        Some(pdf) => pdf,
        None => match render_application_pdf(&application) {
            Ok(bytes) => Attachment::pdf(APPLICATION_PDF_FILENAME, bytes),
            Err(e) => return submit_error(e),
        },
    };

    let config = &state.config;
    let mut attachments = vec![pdf];
    attachments.extend(files);
    let email = application_email(
        &application,
        attachments,
        &config.scholarship_email_to,
        &config.scholarship_email_from,
    );

    let Some(mailer) = &state.mailer else {
        let missing = missing_mail_variables(config.resend_api_key.as_deref());
        tracing::info!(
            student = %application.display_name(),
            email = %application.email,
            attachments = email.attachments.len(),
            missing = ?missing,
            body = %email.text,
            "Scholarship application logged without email delivery"
        );
        return Json(json!({
            "ok": true,
            "messageId": "logged-only",
            "message": logged_only_message(&missing),
        }))
        .into_response();
    };

    match mailer.send(&email).await {
        Ok(message_id) => {
            tracing::info!(
                student = %application.display_name(),
                message_id = %message_id,
                "Scholarship application emailed"
            );
            Json(json!({ "ok": true, "messageId": message_id })).into_response()
        }
        Err(e) => submit_error(e),
    }
}

/// GET /api/scholarship/submit - whether email delivery is configured.
pub async fn mail_status(State(state): State<AppState>) -> Json<MailStatus> {
    let config = &state.config;
    Json(MailStatus::new(
        config.resend_api_key.as_deref(),
        &config.scholarship_email_to,
        &config.scholarship_email_from,
    ))
}

fn plain_email(state: &AppState, subject: &str, text: &str) -> OutgoingEmail {
    OutgoingEmail {
        from: state.config.scholarship_email_from.clone(),
        to: vec![state.config.scholarship_email_to.clone()],
        reply_to: None,
        subject: subject.to_string(),
        text: text.to_string(),
        attachments: Vec::new(),
    }
}

/// GET /api/scholarship/debug - reports the mail configuration and sends a
/// test email.
pub async fn mail_debug(AdminUser(admin): AdminUser, State(state): State<AppState>) -> Response {
    let config = &state.config;
    let debug_info = MailDebugInfo::new(
        config.resend_api_key.as_deref(),
        &config.scholarship_email_to,
        &config.scholarship_email_from,
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    );

    let Some(mailer) = &state.mailer else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "RESEND_API_KEY not found", "debugInfo": debug_info })),
        )
            .into_response();
    };

    let test_email = plain_email(
        &state,
        "Resend API Test",
        &format!("Mail debug test requested by {}.", admin.email),
    );
    match mailer.send(&test_email).await {
        Ok(message_id) => Json(json!({
            "success": true,
            "messageId": message_id,
            "debugInfo": debug_info,
        }))
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Mail debug test email failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Resend API error",
                    "errorMessage": e.to_string(),
                    "debugInfo": debug_info,
                })),
            )
                .into_response()
        }
    }
}

/// GET /api/scholarship/test - sends a fixed test email to the recipient.
pub async fn send_test_email(AdminUser(_admin): AdminUser, State(state): State<AppState>) -> Response {
    let Some(mailer) = &state.mailer else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "RESEND_API_KEY not found" })),
        )
            .into_response();
    };

    match mailer
        .send(&plain_email(&state, TEST_EMAIL_SUBJECT, TEST_EMAIL_TEXT))
        .await
    {
        Ok(message_id) => Json(json!({
            "success": true,
            "messageId": message_id,
            "message": "Test email sent successfully!",
        }))
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Test email failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
