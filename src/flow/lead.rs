//! Answers and captured contact details.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// One recorded choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: String,
    pub value: String,
}

impl Answer {
    pub fn new(question_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            question_id: question_id.into(),
            value: value.into(),
        }
    }
}

/// Contact details from the lead form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadData {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl LeadData {
    /// Validate raw form input. Fields are trimmed; all must be non-empty and
    /// the email must contain `@`.
    pub fn new(first_name: &str, last_name: &str, email: &str) -> Result<Self, ValidationError> {
        let first_name = first_name.trim();
        let last_name = last_name.trim();
        let email = email.trim();

        if first_name.is_empty() {
            return Err(ValidationError::MissingField { field: "First name" });
        }
        if last_name.is_empty() {
            return Err(ValidationError::MissingField { field: "Last name" });
        }
        if email.is_empty() {
            return Err(ValidationError::MissingField { field: "Email" });
        }
        if !email.contains('@') {
            return Err(ValidationError::InvalidEmail);
        }

        Ok(Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
        })
    }
}
