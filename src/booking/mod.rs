//! Booking overlay: the nested flow for scheduling a consultation after the
//! assessment result.
//!
//! Phone capture comes first. With an external booking system configured the
//! lead is handed off there; otherwise a built-in calendar collects a date and
//! time-of-day preference.

pub mod bridge;
pub mod calendar;
pub mod phone;
pub mod state;

pub use bridge::BookingBridge;
pub use calendar::{DateWindow, TimeSlot};
pub use phone::PhoneValidator;
pub use state::{BookingStage, BookingState};
