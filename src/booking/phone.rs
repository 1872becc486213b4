//! Mobile-number validation against a configured pattern.

use regex::Regex;

use crate::error::{ConfigError, ValidationError};

#[derive(Debug, Clone)]
pub struct PhoneValidator {
    pattern: Regex,
}

impl PhoneValidator {
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let pattern = Regex::new(pattern).map_err(|e| ConfigError::InvalidValue {
            key: "VISION_PHONE_PATTERN".into(),
            message: e.to_string(),
        })?;
        Ok(Self { pattern })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Strip whitespace, then match. Returns the cleaned number.
    pub fn validate(&self, raw: &str) -> Result<String, ValidationError> {
        let cleaned: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        if self.pattern.is_match(&cleaned) {
            Ok(cleaned)
        } else {
            Err(ValidationError::InvalidPhone)
        }
    }
}
