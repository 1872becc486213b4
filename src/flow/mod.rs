//! Assessment flow: qualifier, path questions, lead capture and result.
//!
//! `AssessmentFlow` is the synchronous state machine. `AssessmentSession`
//! owns one behind a lock and adds the submission pacing, the booking
//! overlay, and the abandonment handlers.

mod abandon;
pub mod lead;
pub mod machine;
pub mod result;
pub mod session;
pub mod state;

pub use lead::{Answer, LeadData};
pub use machine::{AssessmentFlow, FlowPosition};
pub use result::{ABANDONED_CONFIRMATION, ResultMessage};
pub use session::AssessmentSession;
pub use state::FlowStage;
