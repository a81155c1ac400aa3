use std::fmt::Write;

use super::{Attachment, ScholarshipApplication};

/// Essay prompts, in form order.
pub const ESSAY_QUESTIONS: [&str; 3] = [
    "What do you believe are the most pressing issues or needs in the Asian American community in South Jersey?",
    "What have you done to help/address these issues/needs?",
    "Please share any past community services, contributions, and achievements you have made to the Asian American community in South Jersey.",
];

pub const TEST_EMAIL_SUBJECT: &str = "Test Email from AAASJ Website";

const BODY_TITLE: &str = "2026 AAASJ Community Service Scholarship Application";

/// A fully assembled message ready for a mail transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub reply_to: Option<String>,
    pub subject: String,
    pub text: String,
    pub attachments: Vec<Attachment>,
}

pub fn subject(application: &ScholarshipApplication) -> String {
    format!(
        "2026 AAASJ Scholarship Application - {}",
        application.display_name()
    )
}

/// `"Student Name" <sender>`: the applicant's name shown on the site's
/// sending address.
pub fn from_header(student_name: &str, sender: &str) -> String {
    let name: String = student_name.chars().filter(|c| *c != '"').collect();
    format!("\"{name}\" <{sender}>")
}

/// Plain-text body listing every answer of the application.
pub fn email_body(app: &ScholarshipApplication) -> String {
    let mut body = String::new();

    // Writing to a String cannot fail.
    let _ = write!(
        body,
        "{BODY_TITLE}\n\n\
         STUDENT PROFILE:\n\
         Student Name: {}\n\
         Address: {}\n\
         City: {}\n\
         State: {}\n\
         Zip: {}\n\
         Email: {}\n\
         Phone: {}\n\n\
         Academic Awards/Achievements:\n{}\n\n\
         Volunteer Work/Community Service:\n{}\n\n\
         Groups/Clubs/Organizations:\n{}\n\n\
         ESSAY QUESTIONS:\n\n",
        app.student_name,
        app.address,
        app.city,
        app.state,
        app.zip,
        app.email,
        app.phone,
        app.academic_awards,
        app.volunteer_work,
        app.groups_clubs,
    );

    let answers = [&app.question1, &app.question2, &app.question3];
    for (n, (question, answer)) in ESSAY_QUESTIONS.iter().zip(answers).enumerate() {
        let _ = write!(body, "{}. {question}\n{answer}\n\n", n + 1);
    }

    body
}

/// Builds the notification email for a submitted application.
pub fn application_email(
    app: &ScholarshipApplication,
    attachments: Vec<Attachment>,
    to: &str,
    sender: &str,
) -> OutgoingEmail {
    OutgoingEmail {
        from: from_header(&app.student_name, sender),
        to: vec![to.to_string()],
        reply_to: app.reply_to().map(str::to_string),
        subject: subject(app),
        text: email_body(app),
        attachments,
    }
}
