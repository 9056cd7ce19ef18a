//! The contact form payload and its validation.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

/// `local@domain.tld` shape. Deliverability is the mail service's problem.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required fields: name, email, and message are required")]
    MissingFields,
    #[error("Invalid email address")]
    InvalidEmail,
}

/// One form submission. Lives for a single request.
///
/// Absent fields deserialize as empty so they fail validation with a
/// readable message instead of a body-parse error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

impl ContactSubmission {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if [&self.name, &self.email, &self.message]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(ValidationError::MissingFields);
        }
        if !EMAIL_RE.is_match(self.email.trim()) {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(())
    }

    /// `budget`, if it carries any text.
    pub fn budget(&self) -> Option<&str> {
        self.budget.as_deref().map(str::trim).filter(|b| !b.is_empty())
    }

    /// Subject line: the submitted subject, or "Message from <name>".
    pub fn subject_line(&self, prefix: &str) -> String {
        let subject = self
            .subject
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Message from {}", self.name.trim()));
        if prefix.is_empty() {
            subject
        } else {
            format!("{prefix}: {subject}")
        }
    }

    /// Plain-text rendering used as the email body.
    pub fn to_text(&self) -> String {
        let mut text = format!("Name: {}\nEmail: {}\n", self.name.trim(), self.email.trim());
        if let Some(budget) = self.budget() {
            text.push_str(&format!("Budget: {budget}\n"));
        }
        text.push('\n');
        text.push_str(self.message.trim());
        text
    }

    /// Single-line summary for the log-only channel.
    pub fn log_line(&self) -> String {
        let budget = self
            .budget()
            .map(|b| format!(" [budget: {b}]"))
            .unwrap_or_default();
        format!(
            "contact submission from {} <{}>{}: {}",
            self.name.trim(),
            self.email.trim(),
            budget,
            self.message.trim().replace('\n', " ")
        )
    }
}
