//! The message shown on the result screen.

/// Shown after the lead chooses "not now".
pub const ABANDONED_CONFIRMATION: &str = "Results saved! We'll email you a copy shortly.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultMessage {
    /// Text from the assessment webhook, or the default/fallback text.
    Generated(String),
    /// The lead chose to have results emailed instead of booking.
    AbandonedConfirmation,
}

impl ResultMessage {
    pub fn text(&self) -> &str {
        match self {
            Self::Generated(text) => text,
            Self::AbandonedConfirmation => ABANDONED_CONFIRMATION,
        }
    }

    pub fn is_abandoned_confirmation(&self) -> bool {
        matches!(self, Self::AbandonedConfirmation)
    }
}

impl std::fmt::Display for ResultMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}
