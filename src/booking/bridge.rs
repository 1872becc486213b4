//! BookingBridge drives the booking overlay from phone capture through to the
//! external hand-off or the appointment request.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::{RwLock, RwLockWriteGuard};
use tracing::{debug, info, warn};

use crate::config::{AppointmentFailurePolicy, BookingSettings};
use crate::error::{Error, FlowError, ValidationError};
use crate::flow::LeadData;
use crate::navigation::{NavigationIntent, Navigator};
use crate::screen::BookingView;
use crate::submission::{BookingContact, BookingEvent, Delivery, Submission};

use super::calendar::TimeSlot;
use super::state::{BookingStage, BookingState};

/// Booking overlay for one captured lead.
///
/// State is reset on every `open`. Closing only hides the overlay. Requests
/// still in flight when the overlay is reopened are discarded on completion.
pub struct BookingBridge {
    lead: LeadData,
    settings: BookingSettings,
    submission: Arc<Submission>,
    navigator: Arc<dyn Navigator>,
    state: RwLock<BookingState>,
}

impl BookingBridge {
    /// Create a closed overlay.
    pub fn new(
        lead: LeadData,
        settings: BookingSettings,
        submission: Arc<Submission>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let mut state = BookingState::opened(chrono::Local::now().date_naive());
        state.open = false;
        Self {
            lead,
            settings,
            submission,
            navigator,
            state: RwLock::new(state),
        }
    }

    /// Open the overlay, resetting it to the phone stage.
    pub async fn open(&self) {
        self.open_on(chrono::Local::now().date_naive()).await;
    }

    /// Open with an explicit "today" for the date window.
    ///
    /// Ignored while a redirect is pending; the page is about to leave.
    pub async fn open_on(&self, today: NaiveDate) {
        let mut state = self.state.write().await;
        if state.stage == BookingStage::Redirecting {
            debug!("Booking overlay is redirecting; open ignored");
            return;
        }
        let next = state.reopened(today);
        *state = next;
        info!(email = %self.lead.email, generation = state.generation, "Booking overlay opened");
    }

    /// Hide the overlay. Refused while redirecting.
    pub async fn close(&self) -> Result<(), FlowError> {
        let mut state = self.state.write().await;
        if !state.stage.allows_close() {
            return Err(FlowError::WrongBookingStage {
                stage: state.stage,
                action: "close the booking overlay",
            });
        }
        state.open = false;
        debug!(stage = %state.stage, "Booking overlay closed");
        Ok(())
    }

    pub async fn is_open(&self) -> bool {
        self.state.read().await.open
    }

    pub async fn stage(&self) -> BookingStage {
        self.state.read().await.stage
    }

    pub async fn view(&self) -> BookingView {
        let state = self.state.read().await;
        BookingView {
            stage: state.stage,
            phone_number: state.phone_number.clone(),
            selected_date: state.selected_date,
            preferred_time: state.preferred_time,
            min_date: state.window.min,
            max_date: state.window.max,
            is_submitting: state.submitting,
            can_close: state.stage.allows_close(),
            error: state.error.clone(),
        }
    }

    /// Validate and capture the phone number, then hand off to the external
    /// booking system or continue to the calendar.
    ///
    /// With an external system configured the call returns after the redirect
    /// delay, once the navigation intent has been emitted.
    pub async fn submit_phone(&self, raw: &str) -> Result<BookingStage, Error> {
        let (phone_number, generation) = {
            let mut state = self.state.write().await;
            self.ensure_ready(&state, BookingStage::Phone, "submit a phone number")?;
            let phone_number = match self.settings.phone.validate(raw) {
                Ok(phone) => phone,
                Err(e) => {
                    state.error = Some(e.to_string());
                    return Err(e.into());
                }
            };
            state.phone_number = Some(phone_number.clone());
            state.submitting = true;
            state.error = None;
            (phone_number, state.generation)
        };

        let event = BookingEvent::PhoneCaptured {
            contact: self.contact(phone_number),
        };
        let sent = self
            .submission
            .send_booking_event(&self.settings.webhook_url, &event, Delivery::KeepAlive)
            .await;

        match (sent, self.settings.external_booking_url.clone()) {
            (Ok(()), Some(url)) => {
                self.transition(generation, BookingStage::Redirecting).await?;
                info!(url = %url, delay = ?self.settings.redirect_delay, "Phone captured, redirecting");
                tokio::time::sleep(self.settings.redirect_delay).await;
                self.navigator.navigate(NavigationIntent::Redirect(url));
                Ok(BookingStage::Redirecting)
            }
            (Ok(()), None) => {
                info!("Phone captured, showing calendar");
                self.transition(generation, BookingStage::Calendar).await
            }
            (Err(e), Some(url)) => {
                // Never strand the lead: the external system still gets them.
                warn!("Phone capture failed, redirecting anyway: {}", e);
                self.transition(generation, BookingStage::Redirecting).await?;
                self.navigator.navigate(NavigationIntent::Redirect(url));
                Ok(BookingStage::Redirecting)
            }
            (Err(e), None) => {
                warn!("Phone capture failed: {}", e);
                let mut state = self.current(generation).await?;
                state.submitting = false;
                state.error =
                    Some("We couldn't save your number. Please try again.".to_string());
                Err(FlowError::PhoneCaptureFailed {
                    reason: e.to_string(),
                }
                .into())
            }
        }
    }

    /// Pick the appointment date. Must fall inside the bookable window.
    pub async fn select_date(&self, date: NaiveDate) -> Result<(), Error> {
        let mut state = self.state.write().await;
        self.ensure_ready(&state, BookingStage::Calendar, "select a date")?;
        if !state.window.contains(date) {
            let err = ValidationError::DateOutOfRange {
                date,
                min: state.window.min,
                max: state.window.max,
            };
            state.error = Some(err.to_string());
            return Err(err.into());
        }
        state.selected_date = Some(date);
        state.error = None;
        Ok(())
    }

    pub async fn select_time(&self, slot: TimeSlot) -> Result<(), Error> {
        let mut state = self.state.write().await;
        self.ensure_ready(&state, BookingStage::Calendar, "select a time")?;
        state.preferred_time = Some(slot);
        Ok(())
    }

    /// Send the appointment request.
    ///
    /// On failure the outcome follows `AppointmentFailurePolicy`.
    pub async fn submit_appointment(&self) -> Result<BookingStage, Error> {
        let (event, generation) = {
            let mut state = self.state.write().await;
            self.ensure_ready(&state, BookingStage::Calendar, "request an appointment")?;
            let selected_date = state.selected_date.ok_or(ValidationError::MissingField {
                field: "Preferred date",
            })?;
            let preferred_time = state.preferred_time.ok_or(ValidationError::MissingField {
                field: "Preferred time",
            })?;
            let phone_number = state.phone_number.clone().ok_or(ValidationError::MissingField {
                field: "Mobile number",
            })?;
            state.submitting = true;
            let event = BookingEvent::AppointmentRequested {
                contact: self.contact(phone_number),
                selected_date,
                preferred_time,
            };
            (event, state.generation)
        };

        let sent = self
            .submission
            .send_booking_event(&self.settings.webhook_url, &event, Delivery::Standard)
            .await;

        match sent {
            Ok(()) => {
                info!(event = event.name(), "Appointment requested");
                self.transition(generation, BookingStage::Success).await
            }
            Err(e) => match self.settings.appointment_failure_policy {
                AppointmentFailurePolicy::ProceedToSuccess => {
                    warn!("Appointment request failed, showing success anyway: {}", e);
                    self.transition(generation, BookingStage::Success).await
                }
                AppointmentFailurePolicy::StayOnCalendar => {
                    warn!("Appointment request failed: {}", e);
                    let mut state = self.current(generation).await?;
                    state.submitting = false;
                    state.error = Some(
                        "We couldn't send your request. Please try again.".to_string(),
                    );
                    Err(FlowError::AppointmentFailed {
                        reason: e.to_string(),
                    }
                    .into())
                }
            },
        }
    }

    fn ensure_ready(
        &self,
        state: &BookingState,
        expected: BookingStage,
        action: &'static str,
    ) -> Result<(), FlowError> {
        if !state.open {
            return Err(FlowError::BookingClosed);
        }
        if state.stage != expected {
            return Err(FlowError::WrongBookingStage {
                stage: state.stage,
                action,
            });
        }
        if state.submitting {
            return Err(FlowError::Busy);
        }
        Ok(())
    }

    /// Lock the state for a request that started under `generation`.
    async fn current(
        &self,
        generation: u64,
    ) -> Result<RwLockWriteGuard<'_, BookingState>, FlowError> {
        let state = self.state.write().await;
        if state.generation != generation {
            debug!(
                started = generation,
                current = state.generation,
                "Overlay reopened, dropping stale completion"
            );
            return Err(FlowError::BookingSuperseded);
        }
        Ok(state)
    }

    async fn transition(&self, generation: u64, target: BookingStage) -> Result<BookingStage, Error> {
        let mut state = self.current(generation).await?;
        state.submitting = false;
        let from = state.stage;
        state.advance(target).map_err(|reason| {
            warn!("{}", reason);
            FlowError::WrongBookingStage {
                stage: from,
                action: "advance the booking overlay",
            }
        })?;
        debug!(from = %from, to = %target, "Booking stage changed");
        Ok(target)
    }

    fn contact(&self, phone_number: String) -> BookingContact {
        BookingContact {
            first_name: self.lead.first_name.clone(),
            last_name: self.lead.last_name.clone(),
            email: self.lead.email.clone(),
            phone_number,
        }
    }
}
