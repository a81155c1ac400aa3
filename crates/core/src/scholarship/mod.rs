//! Scholarship application: form fields, the notification email and the
//! PDF copy attached to it.

mod application;
mod email;
mod error;
mod pdf;
mod status;

pub use application::{Attachment, ScholarshipApplication, APPLICATION_PDF_FILENAME};
pub use email::{
    application_email, email_body, from_header, subject, OutgoingEmail, ESSAY_QUESTIONS,
    TEST_EMAIL_SUBJECT,
};
pub use error::{scholarship_error_to_status_code, ScholarshipError};
pub use pdf::render_application_pdf;
pub use status::{
    logged_only_message, mask_api_key, missing_mail_variables, MailDebugInfo, MailStatus,
    DEFAULT_EMAIL_FROM, DEFAULT_EMAIL_TO,
};
