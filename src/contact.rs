//! Contact form payload shared with the mail endpoint.
//!
//! Only the wire shape and its validation live here; delivery is someone
//! else's job.

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

/// Body of the contact form POST.
///
/// Fields are optional on the wire so that a missing field reports the same
/// error as a blank one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRequest {
    /// Sender name
    #[serde(default)]
    pub name: Option<String>,
    /// Reply address
    #[serde(default)]
    pub email: Option<String>,
    /// Message body
    #[serde(default)]
    pub message: Option<String>,
}

/// Rejections and delivery failures, each with its HTTP status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    #[error("Name, email, and message are required")]
    MissingFields,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Email service not configured")]
    NotConfigured,

    #[error("Failed to send message. Please try again later.")]
    Delivery(String),
}

impl ContactError {
    /// HTTP status code reported to the form.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::MissingFields | Self::InvalidEmail => 400,
            Self::NotConfigured => 503,
            Self::Delivery(_) => 500,
        }
    }
}

impl ContactRequest {
    #[must_use]
    pub fn new(name: &str, email: &str, message: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            message: Some(message.to_string()),
        }
    }

    /// Check the payload before handing it to delivery.
    ///
    /// # Errors
    /// - [`ContactError::MissingFields`] if any field is absent or blank
    /// - [`ContactError::InvalidEmail`] if the address is not `local@domain.tld`
    pub fn validate(&self) -> Result<(), ContactError> {
        let filled = |field: &Option<String>| field.as_deref().is_some_and(|v| !v.trim().is_empty());
        if !(filled(&self.name) && filled(&self.email) && filled(&self.message)) {
            return Err(ContactError::MissingFields);
        }

        match self.email.as_deref() {
            Some(email) if is_email(email) => Ok(()),
            _ => Err(ContactError::InvalidEmail),
        }
    }
}

/// `local@domain.tld`: one `@`, no whitespace, a dot inside the domain.
fn is_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain.char_indices().any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Response body returned to the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ContactResponse {
    #[must_use]
    pub const fn ok() -> Self {
        Self { success: true, error: None }
    }

    /// Status code and body for the outcome of a submission.
    #[must_use]
    pub fn from_result(result: &Result<(), ContactError>) -> (u16, Self) {
        match result {
            Ok(()) => (200, Self::ok()),
            Err(e) => (e.status(), Self { success: false, error: Some(e.to_string()) }),
        }
    }
}
