use serde::{Deserialize, Serialize};

use crate::security::sanitize_input;

/// File name of the PDF copy of an application.
pub const APPLICATION_PDF_FILENAME: &str = "application.pdf";

/// The text fields of a scholarship application.
///
/// Contact fields are single-line and sanitized on the way in; the activity
/// lists and essay answers are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScholarshipApplication {
    pub student_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub academic_awards: String,
    pub volunteer_work: String,
    pub groups_clubs: String,
    pub question1: String,
    pub question2: String,
    pub question3: String,
}

impl ScholarshipApplication {
    /// Sets a form field by its form name. Returns `false` for unknown names.
    pub fn set_field(&mut self, name: &str, value: &str) -> bool {
        let (slot, single_line) = match name {
            "studentName" => (&mut self.student_name, true),
            "email" => (&mut self.email, true),
            "phone" => (&mut self.phone, true),
            "address" => (&mut self.address, true),
            "city" => (&mut self.city, true),
            "state" => (&mut self.state, true),
            "zip" => (&mut self.zip, true),
            "academicAwards" => (&mut self.academic_awards, false),
            "volunteerWork" => (&mut self.volunteer_work, false),
            "groupsClubs" => (&mut self.groups_clubs, false),
            "question1" => (&mut self.question1, false),
            "question2" => (&mut self.question2, false),
            "question3" => (&mut self.question3, false),
            _ => return false,
        };

        *slot = if single_line {
            sanitize_input(value)
        } else {
            value.to_string()
        };
        true
    }

    /// Name used in the subject line.
    pub fn display_name(&self) -> &str {
        if self.student_name.is_empty() {
            "Applicant"
        } else {
            &self.student_name
        }
    }

    pub fn reply_to(&self) -> Option<&str> {
        Some(self.email.as_str()).filter(|email| !email.is_empty())
    }
}

/// A file sent along with the notification email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: Option<String>,
    pub content: Vec<u8>,
}

impl Attachment {
    pub fn pdf(filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: Some("application/pdf".to_string()),
            content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_fields_are_sanitized() {
        let mut app = ScholarshipApplication::default();

        assert!(app.set_field("studentName", "  <script>Jane</script> "));
        assert!(app.set_field("zip", "08002\n"));

        assert_eq!(app.student_name, "scriptJane/script");
        assert_eq!(app.zip, "08002");
    }

    #[test]
    fn essays_are_kept_verbatim() {
        let mut app = ScholarshipApplication::default();
        let essay = "  Line one\n<em>Line two</em>\n";

        assert!(app.set_field("question2", essay));

        assert_eq!(app.question2, essay);
    }

    #[test]
    fn unknown_fields_are_reported() {
        let mut app = ScholarshipApplication::default();
        assert!(!app.set_field("favoriteColor", "blue"));
        assert_eq!(app, ScholarshipApplication::default());
    }

    #[test]
    fn display_name_falls_back_to_applicant() {
        let mut app = ScholarshipApplication::default();
        assert_eq!(app.display_name(), "Applicant");
        assert_eq!(app.reply_to(), None);

        app.student_name = "Jane Doe".into();
        app.email = "jane@example.com".into();
        assert_eq!(app.display_name(), "Jane Doe");
        assert_eq!(app.reply_to(), Some("jane@example.com"));
    }
}
