//! Assessment stage machine.

use serde::{Deserialize, Serialize};

/// Top-level stages of the assessment.
///
/// Qualifier → Questions → Lead → Result, with back-navigation from Questions
/// and Lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FlowStage {
    #[default]
    Qualifier,
    Questions,
    Lead,
    Result,
}

impl FlowStage {
    /// Check if a transition from `self` to `target` is valid.
    ///
    /// `Questions → Questions` is the move between two path questions.
    pub fn can_transition_to(&self, target: FlowStage) -> bool {
        use FlowStage::*;
        matches!(
            (self, target),
            (Qualifier, Questions)
                | (Questions, Questions)
                | (Questions, Lead)
                | (Questions, Qualifier)
                | (Lead, Questions)
                | (Lead, Result)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Result)
    }

    /// Whether a back action exists in this stage.
    pub fn allows_back(&self) -> bool {
        matches!(self, Self::Questions | Self::Lead)
    }
}

impl std::fmt::Display for FlowStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Qualifier => "qualifier",
            Self::Questions => "questions",
            Self::Lead => "lead",
            Self::Result => "result",
        };
        write!(f, "{s}")
    }
}
