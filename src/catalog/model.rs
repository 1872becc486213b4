//! Question and path types.

use serde::{Deserialize, Serialize};

/// The clinical path chosen by the qualifier question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PathType {
    LaserEye,
    Cataract,
    DryEye,
    ContactLens,
}

impl PathType {
    pub const ALL: [PathType; 4] = [
        PathType::LaserEye,
        PathType::Cataract,
        PathType::DryEye,
        PathType::ContactLens,
    ];

    /// Wire token, identical to the qualifier option value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LaserEye => "LaserEye",
            Self::Cataract => "Cataract",
            Self::DryEye => "DryEye",
            Self::ContactLens => "ContactLens",
        }
    }
}

impl std::fmt::Display for PathType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PathType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PathType::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown path {s:?}"))
    }
}

/// One selectable answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    /// Human-readable text.
    pub label: String,
    /// Canonical token sent to the webhook.
    pub value: String,
}

/// A multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub options: Vec<QuestionOption>,
}

impl Question {
    pub fn new(id: &str, prompt: &str, options: &[(&str, &str)]) -> Self {
        Self {
            id: id.to_string(),
            prompt: prompt.to_string(),
            options: options
                .iter()
                .map(|(label, value)| QuestionOption {
                    label: label.to_string(),
                    value: value.to_string(),
                })
                .collect(),
        }
    }

    /// Whether `value` is one of this question's option values.
    pub fn offers(&self, value: &str) -> bool {
        self.options.iter().any(|o| o.value == value)
    }
}
