//! Vision Assessment: multi-step lead qualification flow core.

pub mod booking;
pub mod catalog;
pub mod config;
pub mod error;
pub mod flow;
pub mod navigation;
pub mod screen;
pub mod submission;
