//! Booking overlay state machine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::calendar::{DateWindow, TimeSlot};

/// Stages of the booking overlay.
///
/// Phone → Redirecting (external system) or Phone → Calendar → Success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BookingStage {
    #[default]
    Phone,
    Redirecting,
    Calendar,
    Success,
}

impl BookingStage {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: BookingStage) -> bool {
        use BookingStage::*;
        matches!(
            (self, target),
            (Phone, Redirecting) | (Phone, Calendar) | (Calendar, Success)
        )
    }

    /// No further user action is possible in this overlay instance.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Redirecting | Self::Success)
    }

    /// Whether the overlay may be dismissed.
    pub fn allows_close(&self) -> bool {
        !matches!(self, Self::Redirecting)
    }
}

impl std::fmt::Display for BookingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Phone => "phone",
            Self::Redirecting => "redirecting",
            Self::Calendar => "calendar",
            Self::Success => "success",
        };
        write!(f, "{s}")
    }
}

/// Everything the overlay tracks between open and close.
#[derive(Debug, Clone)]
pub struct BookingState {
    pub stage: BookingStage,
    pub open: bool,
    /// Whitespace-stripped number, set once it validates.
    pub phone_number: Option<String>,
    pub selected_date: Option<NaiveDate>,
    pub preferred_time: Option<TimeSlot>,
    pub window: DateWindow,
    pub submitting: bool,
    /// Inline error for the current stage.
    pub error: Option<String>,
    /// Bumped on every open. A request started under an older generation
    /// must not touch this state when it settles.
    pub generation: u64,
}

impl BookingState {
    /// Fresh state for an overlay opened on `today`.
    pub fn opened(today: NaiveDate) -> Self {
        Self {
            stage: BookingStage::Phone,
            open: true,
            phone_number: None,
            selected_date: None,
            preferred_time: None,
            window: DateWindow::from_today(today),
            submitting: false,
            error: None,
            generation: 0,
        }
    }

    /// Fresh state replacing `self`, under the next generation.
    pub fn reopened(&self, today: NaiveDate) -> Self {
        Self {
            generation: self.generation + 1,
            ..Self::opened(today)
        }
    }

    /// Move to `target`, returning an error string for an illegal move.
    pub fn advance(&mut self, target: BookingStage) -> Result<BookingStage, String> {
        if !self.stage.can_transition_to(target) {
            return Err(format!("Cannot transition from {} to {}", self.stage, target));
        }
        self.stage = target;
        self.error = None;
        Ok(target)
    }
}
