//! Applicant resume intake: validation, Drive upload, roster append, and the
//! per-session screen flow.
//!
//! The gateways to Google Drive and Sheets are traits so the orchestrator and
//! session machinery can be exercised against in-memory fakes; the shipped
//! implementations wrap the generated API clients behind a private runtime.

pub mod domain;
pub mod drive;
pub mod router;
pub mod screen;
pub mod service;
pub mod session;
pub mod sheet;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{ApplicationForm, FormField, ResumeKind, ResumeUpload, SubmittedRecord};
pub use drive::{DriveGateway, DriveOperationError, StoredResume};
pub use router::intake_router;
pub use screen::{render, FieldPrompt, ScreenView};
pub use service::{SubmissionError, SubmissionService};
pub use session::{
    IntakeSession, ScreenAction, SessionError, SessionId, SessionRegistry, Step, TransitionError,
};
pub use sheet::{SheetGateway, SheetOperationError};
pub use validation::{validate, ValidationError};
