//! Wire bodies for every webhook the flow talks to.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::booking::TimeSlot;
use crate::catalog::PathType;
use crate::flow::{Answer, LeadData};

/// Completed assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentPayload {
    pub path: PathType,
    /// Question id → chosen value, qualifier included.
    pub answers: BTreeMap<String, String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl AssessmentPayload {
    pub fn new(path: PathType, answers: &[Answer], lead: &LeadData) -> Self {
        Self {
            path,
            answers: answers
                .iter()
                .map(|a| (a.question_id.clone(), a.value.clone()))
                .collect(),
            first_name: lead.first_name.clone(),
            last_name: lead.last_name.clone(),
            email: lead.email.clone(),
        }
    }
}

/// Reply from the assessment webhook.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssessmentReply {
    #[serde(default)]
    pub message: Option<String>,
}

/// Values of the `intent` field.
pub mod intents {
    pub const BOOK_CONSULTATION: &str = "book_consultation";
    pub const ABANDON_NURTURE: &str = "abandon_nurture";
    pub const RESULT_ABANDONED: &str = "result_abandoned";
}

/// Booking-intent ping and abandonment beacons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentPayload {
    pub intent: &'static str,
    pub email: String,
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'static str>,
}

impl IntentPayload {
    pub fn new(intent: &'static str, lead: &LeadData) -> Self {
        Self {
            intent,
            email: lead.email.clone(),
            first_name: lead.first_name.clone(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: &'static str) -> Self {
        self.status = Some(status);
        self
    }
}

/// Contact block shared by both booking events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingContact {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
}

/// Events posted by the booking overlay, tagged by `stage`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum BookingEvent {
    PhoneCaptured {
        #[serde(flatten)]
        contact: BookingContact,
    },
    AppointmentRequested {
        #[serde(flatten)]
        contact: BookingContact,
        selected_date: NaiveDate,
        preferred_time: TimeSlot,
    },
}

impl BookingEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::PhoneCaptured { .. } => "phone_captured",
            Self::AppointmentRequested { .. } => "appointment_requested",
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn lead() -> LeadData {
        LeadData::new("Jane", "Doe", "jane@x.com").unwrap()
    }

    #[test]
    fn assessment_payload_shape() {
        let answers = vec![
            Answer::new("qualifier", "DryEye"),
            Answer::new("dry_q2", "daily"),
        ];
        let payload = AssessmentPayload::new(PathType::DryEye, &answers, &lead());
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "path": "DryEye",
                "answers": {"qualifier": "DryEye", "dry_q2": "daily"},
                "firstName": "Jane",
                "lastName": "Doe",
                "email": "jane@x.com",
            })
        );
    }

    #[test]
    fn intent_payload_omits_missing_status() {
        let ping = IntentPayload::new(intents::BOOK_CONSULTATION, &lead());
        assert_eq!(
            serde_json::to_value(&ping).unwrap(),
            json!({"intent": "book_consultation", "email": "jane@x.com", "firstName": "Jane"})
        );

        let abandon = IntentPayload::new(intents::ABANDON_NURTURE, &lead())
            .with_status(intents::RESULT_ABANDONED);
        assert_eq!(serde_json::to_value(&abandon).unwrap()["status"], "result_abandoned");
    }

    #[test]
    fn booking_events_carry_stage_tag() {
        let contact = BookingContact {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jane@x.com".into(),
            phone_number: "07123456789".into(),
        };
        let phone = BookingEvent::PhoneCaptured {
            contact: contact.clone(),
        };
        assert_eq!(
            serde_json::to_value(&phone).unwrap(),
            json!({
                "stage": "phone_captured",
                "firstName": "Jane",
                "lastName": "Doe",
                "email": "jane@x.com",
                "phoneNumber": "07123456789",
            })
        );

        let appt = BookingEvent::AppointmentRequested {
            contact,
            selected_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            preferred_time: TimeSlot::Evening,
        };
        let value = serde_json::to_value(&appt).unwrap();
        assert_eq!(value["stage"], "appointment_requested");
        assert_eq!(value["selectedDate"], "2026-03-02");
        assert_eq!(value["preferredTime"], "evening");
        assert_eq!(appt.name(), "appointment_requested");
    }

    #[test]
    fn reply_tolerates_missing_message() {
        let reply: AssessmentReply = serde_json::from_str(r#"{"other": 1}"#).unwrap();
        assert!(reply.message.is_none());
    }
}
