//! Submission collaborator: every outbound call the flow makes.
//!
//! `Submission` knows the endpoints and the body of each intent; the
//! `Webhook` underneath only knows how to move JSON.

pub mod payload;
pub mod webhook;

use std::sync::Arc;

pub use payload::{
    AssessmentPayload, AssessmentReply, BookingContact, BookingEvent, IntentPayload, intents,
};
pub use webhook::{Delivery, HttpWebhook, Webhook, WebhookRequest};

use crate::config::AssessmentConfig;
use crate::error::SubmissionError;
use crate::flow::LeadData;

/// Shown when the webhook replies without a usable `message`.
pub const DEFAULT_RESULT_MESSAGE: &str = "Thank you for completing the assessment!";

/// Shown when the assessment submission fails outright.
pub const FALLBACK_RESULT_MESSAGE: &str = "Thank you for your submission. Our team will review your information and contact you shortly.";

/// Which abandonment beacon to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbandonSource {
    /// The result screen's close button.
    Close,
    /// The "not now, just email me" action.
    NotNow,
}

pub struct Submission {
    webhook: Arc<dyn Webhook>,
    config: AssessmentConfig,
}

impl Submission {
    pub fn new(webhook: Arc<dyn Webhook>, config: AssessmentConfig) -> Self {
        Self { webhook, config }
    }

    pub fn config(&self) -> &AssessmentConfig {
        &self.config
    }

    /// Post the assessment and extract the result text.
    ///
    /// A reply without a non-empty `message` yields `DEFAULT_RESULT_MESSAGE`.
    /// Transport, status and decoding failures are returned to the caller.
    pub async fn submit_assessment(
        &self,
        payload: &AssessmentPayload,
    ) -> Result<String, SubmissionError> {
        let url = &self.config.assessment_url;
        let body = serde_json::to_value(payload)?;
        let raw = self.webhook.send(WebhookRequest::new(url, body)).await?;

        let reply: AssessmentReply =
            serde_json::from_str(&raw).map_err(|e| SubmissionError::InvalidResponse {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        Ok(reply
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_RESULT_MESSAGE.to_string()))
    }

    /// Tell the backend the lead wants to book.
    pub async fn ping_booking_intent(&self, lead: &LeadData) -> Result<(), SubmissionError> {
        let body = serde_json::to_value(IntentPayload::new(intents::BOOK_CONSULTATION, lead))?;
        self.webhook
            .send(WebhookRequest::new(&self.config.booking_intent_url, body))
            .await
            .map(|_| ())
    }

    /// Fire an abandonment beacon without waiting for it.
    pub fn beacon_abandon(
        &self,
        source: AbandonSource,
        lead: &LeadData,
    ) -> Result<(), SubmissionError> {
        let (url, payload) = match source {
            AbandonSource::Close => (
                &self.config.close_beacon_url,
                IntentPayload::new(intents::ABANDON_NURTURE, lead),
            ),
            AbandonSource::NotNow => (
                &self.config.abandon_url,
                IntentPayload::new(intents::ABANDON_NURTURE, lead)
                    .with_status(intents::RESULT_ABANDONED),
            ),
        };
        let body = serde_json::to_value(payload)?;
        self.webhook.beacon(url, body)
    }

    /// Post a booking-overlay event.
    pub async fn send_booking_event(
        &self,
        url: &str,
        event: &BookingEvent,
        delivery: Delivery,
    ) -> Result<(), SubmissionError> {
        let request = WebhookRequest::new(url, serde_json::to_value(event)?);
        let request = match delivery {
            Delivery::Standard => request,
            Delivery::KeepAlive => request.keep_alive(),
        };
        self.webhook.send(request).await.map(|_| ())
    }
}
