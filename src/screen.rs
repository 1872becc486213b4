//! Render model handed to the presentation layer.
//!
//! A renderer draws exactly what these values describe and reports user
//! input back through the session or booking bridge methods. It keeps no
//! business state of its own.

use chrono::NaiveDate;
use serde::Serialize;

use crate::booking::{BookingStage, TimeSlot};
use crate::catalog::Question;

/// Heading on the waiting screen.
pub const SYNCING_HEADLINE: &str = "AI is analyzing your vision profile...";

/// The active screen of the assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Screen {
    /// Qualifier or path question. Answer with `AssessmentSession::answer`.
    Question {
        question: Question,
        current_step: usize,
        total_steps: usize,
        show_back: bool,
    },
    /// Contact details form. Submit with `AssessmentSession::submit_lead`.
    LeadForm {
        current_step: usize,
        total_steps: usize,
    },
    /// Waiting for the assessment submission.
    Syncing { headline: &'static str },
    /// The generated result and its follow-up actions.
    Result {
        message: String,
        first_name: String,
        show_not_now: bool,
    },
}

/// The booking overlay as the renderer should draw it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingView {
    pub stage: BookingStage,
    pub phone_number: Option<String>,
    pub selected_date: Option<NaiveDate>,
    pub preferred_time: Option<TimeSlot>,
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
    /// Submit buttons are disabled while true.
    pub is_submitting: bool,
    pub can_close: bool,
    pub error: Option<String>,
}

impl BookingView {
    /// Calendar submit is enabled once both fields are filled.
    pub fn can_request_appointment(&self) -> bool {
        self.stage == BookingStage::Calendar
            && !self.is_submitting
            && self.selected_date.is_some()
            && self.preferred_time.is_some()
    }
}
