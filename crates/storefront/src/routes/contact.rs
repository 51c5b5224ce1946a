//! Contact form route handlers.
//!
//! Messages are validated and logged; nothing is sent anywhere.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use siraj_store_core::Email;

use crate::filters;

/// Maximum accepted message length, in characters.
const MAX_MESSAGE_CHARS: usize = 5000;

/// Contact form data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

/// A validated contact message.
#[derive(Debug)]
pub struct ContactMessage {
    pub name: String,
    pub email: Email,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    /// Validate the form, collecting every problem.
    ///
    /// # Errors
    ///
    /// Returns the list of user-facing error messages.
    pub fn validate(&self) -> Result<ContactMessage, Vec<String>> {
        let mut errors = Vec::new();

        let required = |value: &str, field: &str, errors: &mut Vec<String>| {
            if value.trim().is_empty() {
                errors.push(format!("{field} is required."));
            }
        };
        required(&self.name, "Name", &mut errors);
        required(&self.subject, "Subject", &mut errors);
        required(&self.message, "Message", &mut errors);

        if self.message.chars().count() > MAX_MESSAGE_CHARS {
            errors.push(format!("Message must be at most {MAX_MESSAGE_CHARS} characters."));
        }

        let email = Email::parse(&self.email)
            .inspect_err(|_| errors.push("Please enter a valid email address.".to_string()))
            .ok();

        match email {
            Some(email) if errors.is_empty() => Ok(ContactMessage {
                name: self.name.trim().to_string(),
                email,
                subject: self.subject.trim().to_string(),
                message: self.message.trim().to_string(),
            }),
            _ => Err(errors),
        }
    }
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/contact.html")]
pub struct ContactTemplate {
    pub form: ContactForm,
    pub errors: Vec<String>,
    pub sent: bool,
}

/// Display the contact form.
#[instrument]
pub async fn show() -> ContactTemplate {
    ContactTemplate {
        form: ContactForm::default(),
        errors: Vec::new(),
        sent: false,
    }
}

/// Submit the contact form.
///
/// On success the form is cleared and a confirmation banner shown; on
/// failure the form is re-rendered with the submitted values and errors.
#[instrument(skip(form))]
pub async fn submit(Form(form): Form<ContactForm>) -> Response {
    match form.validate() {
        Ok(message) => {
            tracing::info!(
                email = %message.email,
                subject = %message.subject,
                name = %message.name,
                message_chars = message.message.chars().count(),
                "Contact message received"
            );
            ContactTemplate {
                form: ContactForm::default(),
                errors: Vec::new(),
                sent: true,
            }
            .into_response()
        }
        Err(errors) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ContactTemplate {
                form,
                errors,
                sent: false,
            },
        )
            .into_response(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str, subject: &str, message: &str) -> ContactForm {
        ContactForm {
            name: name.to_string(),
            email: email.to_string(),
            subject: subject.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_valid_form() {
        let message = form(" Ada ", "Ada@Example.com", "Order", "Where is it?")
            .validate()
            .unwrap();
        assert_eq!(message.name, "Ada");
        assert_eq!(message.email.as_str(), "ada@example.com");
    }

    #[test]
    fn test_collects_all_errors() {
        let errors = form("", "nope", " ", "").validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().any(|e| e.contains("email")));
    }

    #[test]
    fn test_message_length_limit() {
        let long = "x".repeat(MAX_MESSAGE_CHARS + 1);
        let errors = form("A", "a@b.co", "S", &long).validate().unwrap_err();
        assert_eq!(errors.len(), 1);
    }
}
