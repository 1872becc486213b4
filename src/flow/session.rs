//! AssessmentSession: the flow state machine wired to its network and
//! navigation collaborators.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::booking::BookingBridge;
use crate::catalog::QuestionCatalog;
use crate::config::BookingSettings;
use crate::error::{Error, FlowError};
use crate::navigation::{NavigationIntent, Navigator};
use crate::screen::Screen;
use crate::submission::{FALLBACK_RESULT_MESSAGE, Submission};

use super::lead::LeadData;
use super::machine::{AssessmentFlow, FlowPosition};
use super::result::ResultMessage;
use super::state::FlowStage;

/// One visitor's pass through the assessment.
///
/// Locks are never held across a network call, so `screen()` can be read
/// while a submission is in flight.
pub struct AssessmentSession {
    id: Uuid,
    pub(super) flow: Arc<RwLock<AssessmentFlow>>,
    pub(super) submission: Arc<Submission>,
    navigator: Arc<dyn Navigator>,
    booking_settings: BookingSettings,
    booking: RwLock<Option<Arc<BookingBridge>>>,
}

impl AssessmentSession {
    pub fn new(
        catalog: Arc<QuestionCatalog>,
        submission: Arc<Submission>,
        navigator: Arc<dyn Navigator>,
        booking_settings: BookingSettings,
    ) -> Self {
        let id = Uuid::new_v4();
        info!(session_id = %id, "Assessment session started");
        Self {
            id,
            flow: Arc::new(RwLock::new(AssessmentFlow::new(catalog))),
            submission,
            navigator,
            booking_settings,
            booking: RwLock::new(None),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub async fn screen(&self) -> Screen {
        self.flow.read().await.screen()
    }

    pub async fn stage(&self) -> FlowStage {
        self.flow.read().await.stage()
    }

    pub async fn position(&self) -> FlowPosition {
        self.flow.read().await.position()
    }

    /// Copy of the full flow state.
    pub async fn snapshot(&self) -> AssessmentFlow {
        self.flow.read().await.clone()
    }

    pub(super) fn navigator(&self) -> &dyn Navigator {
        self.navigator.as_ref()
    }

    /// Answer the qualifier or the current path question.
    pub async fn answer(&self, value: &str) -> Result<FlowStage, Error> {
        let mut flow = self.flow.write().await;
        let from = flow.stage();
        let stage = flow.answer(value)?;
        debug!(
            session_id = %self.id,
            answers = flow.answers().len(),
            value,
            "Answer recorded"
        );
        if stage != from {
            info!(session_id = %self.id, from = %from, to = %stage, path = ?flow.path(), "Stage changed");
        }
        Ok(stage)
    }

    pub async fn back(&self) -> Result<FlowStage, Error> {
        let mut flow = self.flow.write().await;
        let stage = flow.back()?;
        debug!(session_id = %self.id, stage = %stage, "Went back");
        Ok(stage)
    }

    /// Validate the lead form and run the assessment submission.
    ///
    /// The waiting screen stays up for at least the configured minimum delay
    /// and until the webhook settles. Any webhook failure is replaced by the
    /// fallback message, so this only fails for invalid input or a call in
    /// the wrong stage.
    pub async fn submit_lead(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> Result<FlowStage, Error> {
        let lead = LeadData::new(first_name, last_name, email)?;
        let payload = self.flow.write().await.begin_submission(lead)?;
        info!(session_id = %self.id, path = %payload.path, "Submitting assessment");

        let min_delay = self.submission.config().min_submit_delay;
        let (_, outcome) = tokio::join!(
            tokio::time::sleep(min_delay),
            self.submission.submit_assessment(&payload)
        );

        let message = match outcome {
            Ok(text) => ResultMessage::Generated(text),
            Err(e) => {
                warn!(session_id = %self.id, "Assessment submission failed: {}", e);
                ResultMessage::Generated(FALLBACK_RESULT_MESSAGE.to_string())
            }
        };

        let stage = self.flow.write().await.finish_submission(message)?;
        info!(session_id = %self.id, "Assessment result ready");
        Ok(stage)
    }

    /// Ping the booking intent, then navigate to the follow-up page whatever
    /// the ping's outcome. A second call while the ping is in flight gets
    /// `FlowError::Busy`.
    pub async fn book_consultation(&self) -> Result<(), Error> {
        let lead = self.flow.write().await.begin_booking_intent()?;
        let ping = self.submission.ping_booking_intent(&lead).await;
        self.flow.write().await.finish_booking_intent();
        if let Err(e) = ping {
            warn!(session_id = %self.id, "Booking intent ping failed: {}", e);
        }
        let url = self.submission.config().follow_up_url.clone();
        self.navigator.navigate(NavigationIntent::Redirect(url));
        Ok(())
    }

    /// Open the booking overlay from the result screen, resetting it.
    pub async fn open_booking(&self) -> Result<Arc<BookingBridge>, Error> {
        let lead = self.result_lead("open booking").await?;
        let bridge = {
            let mut slot = self.booking.write().await;
            Arc::clone(slot.get_or_insert_with(|| {
                Arc::new(BookingBridge::new(
                    lead,
                    self.booking_settings.clone(),
                    Arc::clone(&self.submission),
                    Arc::clone(&self.navigator),
                ))
            }))
        };
        bridge.open().await;
        Ok(bridge)
    }

    /// The booking overlay, if it has been opened at least once.
    pub async fn booking(&self) -> Option<Arc<BookingBridge>> {
        self.booking.read().await.clone()
    }

    /// Lead captured for the result stage, or an error outside it.
    pub(super) async fn result_lead(&self, action: &'static str) -> Result<LeadData, FlowError> {
        let flow = self.flow.read().await;
        match (flow.stage(), flow.lead()) {
            (FlowStage::Result, Some(lead)) => Ok(lead.clone()),
            (stage, _) => Err(FlowError::WrongStage { stage, action }),
        }
    }
}
