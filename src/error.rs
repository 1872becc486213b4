//! Error types for the vision assessment.

use crate::booking::BookingStage;
use crate::flow::FlowStage;

/// Top-level error type for the assessment core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Flow error: {0}")]
    Flow(#[from] FlowError),

    #[error("Submission error: {0}")]
    Submission(#[from] SubmissionError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {key}. {hint}")]
    MissingRequired { key: String, hint: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// User input rejected before any transition or network call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Please enter a valid mobile number (e.g. 07XXX XXXXXX)")]
    InvalidPhone,

    #[error("Date {date} is outside the bookable window {min}..={max}")]
    DateOutOfRange {
        date: chrono::NaiveDate,
        min: chrono::NaiveDate,
        max: chrono::NaiveDate,
    },

    #[error("Option {value:?} is not offered by question {question_id}")]
    UnknownOption { question_id: String, value: String },
}

/// A callback arrived that the current stage cannot honour.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    #[error("Cannot {action} while in stage {stage}")]
    WrongStage { stage: FlowStage, action: &'static str },

    #[error("Cannot {action} while booking is in stage {stage}")]
    WrongBookingStage {
        stage: BookingStage,
        action: &'static str,
    },

    #[error("A submission is already in flight")]
    Busy,

    #[error("Booking overlay is not open")]
    BookingClosed,

    #[error("Booking overlay was reopened; the earlier request no longer applies")]
    BookingSuperseded,

    #[error("Results were already saved for later")]
    AlreadyAbandoned,

    #[error("Phone capture failed: {reason}")]
    PhoneCaptureFailed { reason: String },

    #[error("Appointment request failed: {reason}")]
    AppointmentFailed { reason: String },
}

/// Transport and decoding failures from a webhook.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("Request to {url} failed: {reason}")]
    RequestFailed { url: String, reason: String },

    #[error("Endpoint {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Invalid response from {url}: {reason}")]
    InvalidResponse { url: String, reason: String },

    #[error("Beacon to {url} could not be dispatched: {reason}")]
    BeaconRejected { url: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Question catalog failed its structural checks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("No questions configured for path {path}")]
    MissingPath { path: String },

    #[error("Path {path} has {actual} questions, expected {expected}")]
    UnevenPaths {
        path: String,
        expected: usize,
        actual: usize,
    },

    #[error("Question {question_id} repeats option value {value:?}")]
    DuplicateOption { question_id: String, value: String },

    #[error("Question {question_id} has no options")]
    NoOptions { question_id: String },

    #[error("Qualifier option {value:?} does not name a path")]
    UnknownPath { value: String },
}

/// Result type alias for the assessment core.
pub type Result<T> = std::result::Result<T, Error>;
