use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use super::domain::{ApplicationForm, SubmittedRecord};
use super::drive::DriveGateway;
use super::screen::{render, ScreenView};
use super::service::{SubmissionError, SubmissionService};
use super::sheet::SheetGateway;

/// Identifier of the screen currently shown to the applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Form,
    Submitted,
    PaymentPrompt,
    PaymentSimulation,
    PaymentSuccess,
}

impl Step {
    pub const fn label(self) -> &'static str {
        match self {
            Step::Form => "form",
            Step::Submitted => "submitted",
            Step::PaymentPrompt => "payment_prompt",
            Step::PaymentSimulation => "payment_simulation",
            Step::PaymentSuccess => "payment_success",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// User actions a screen can offer. Every transition is triggered by one of
/// these; nothing moves on a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenAction {
    Submit,
    RequestInsights,
    SubmitAnother,
    ProceedToPayment,
    ConfirmPayment,
    BackToForm,
}

impl ScreenAction {
    pub const fn label(self) -> &'static str {
        match self {
            ScreenAction::Submit => "submit",
            ScreenAction::RequestInsights => "request_insights",
            ScreenAction::SubmitAnother => "submit_another",
            ScreenAction::ProceedToPayment => "proceed_to_payment",
            ScreenAction::ConfirmPayment => "confirm_payment",
            ScreenAction::BackToForm => "back_to_form",
        }
    }
}

impl std::fmt::Display for ScreenAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Raised when an action is applied from a screen that does not offer it.
/// The session is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("action '{action}' is not available from the '{from}' screen")]
pub struct TransitionError {
    pub action: ScreenAction,
    pub from: Step,
}

/// One applicant's screen flow. Owns the current step, the record produced
/// by a successful submission, and the last failure banner.
///
/// A record is present exactly when the step is past the form; both the
/// upload and the append completed before the step ever moves.
#[derive(Debug, Clone)]
pub struct IntakeSession {
    step: Step,
    record: Option<SubmittedRecord>,
    banner: Option<String>,
    payment_flow_enabled: bool,
}

impl IntakeSession {
    pub fn new(payment_flow_enabled: bool) -> Self {
        Self {
            step: Step::Form,
            record: None,
            banner: None,
            payment_flow_enabled,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn record(&self) -> Option<&SubmittedRecord> {
        self.record.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// Drive one submission attempt from the form screen. On failure the
    /// step stays `Form` and the failure message becomes the banner.
    pub fn submit<D, S>(
        &mut self,
        service: &SubmissionService<D, S>,
        form: ApplicationForm,
    ) -> Result<(), SubmissionError>
    where
        D: DriveGateway + 'static,
        S: SheetGateway + 'static,
    {
        match service.submit(form) {
            Ok(record) => {
                self.record = Some(record);
                self.banner = None;
                self.step = Step::Submitted;
                Ok(())
            }
            Err(err) => {
                self.banner = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Apply a non-submission action. Returns the step now showing.
    pub fn apply(&mut self, action: ScreenAction) -> Result<Step, TransitionError> {
        let next = match (self.step, action) {
            (Step::Submitted, ScreenAction::RequestInsights) => {
                if self.payment_flow_enabled {
                    Step::PaymentPrompt
                } else {
                    // Paid insights are not live yet; the offer stays on the
                    // confirmation screen.
                    Step::Submitted
                }
            }
            (Step::Submitted, ScreenAction::SubmitAnother) => self.reset(),
            (Step::PaymentPrompt, ScreenAction::ProceedToPayment) => Step::PaymentSimulation,
            (Step::PaymentSimulation, ScreenAction::ConfirmPayment) => Step::PaymentSuccess,
            (Step::PaymentSuccess, ScreenAction::BackToForm) => self.reset(),
            (from, action) => return Err(TransitionError { action, from }),
        };

        self.step = next;
        Ok(next)
    }

    fn reset(&mut self) -> Step {
        self.record = None;
        self.banner = None;
        Step::Form
    }
}

/// Identifier wrapper for open sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error raised by registry operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("unknown session '{0}'")]
    UnknownSession(String),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// Per-session state map shared by the HTTP handlers. Sessions are
/// independent; the mutex only guards map access.
pub struct SessionRegistry<D, S> {
    service: Arc<SubmissionService<D, S>>,
    enable_payment_flow: bool,
    sessions: Mutex<HashMap<SessionId, IntakeSession>>,
    sequence: AtomicU64,
}

impl<D, S> SessionRegistry<D, S>
where
    D: DriveGateway + 'static,
    S: SheetGateway + 'static,
{
    pub fn new(service: Arc<SubmissionService<D, S>>, enable_payment_flow: bool) -> Self {
        Self {
            service,
            enable_payment_flow,
            sessions: Mutex::new(HashMap::new()),
            sequence: AtomicU64::new(1),
        }
    }

    pub fn open_session(&self) -> (SessionId, ScreenView) {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        let session_id = SessionId(format!("session-{id:06}"));
        let session = IntakeSession::new(self.enable_payment_flow);
        let view = render(&session);

        let mut sessions = self.sessions.lock().expect("session mutex poisoned");
        sessions.insert(session_id.clone(), session);

        (session_id, view)
    }

    pub fn screen(&self, session_id: &SessionId) -> Result<ScreenView, SessionError> {
        let sessions = self.sessions.lock().expect("session mutex poisoned");
        let session = sessions
            .get(session_id)
            .ok_or_else(|| SessionError::UnknownSession(session_id.0.clone()))?;
        Ok(render(session))
    }

    /// Run a submission attempt for the given session. The submission is
    /// only offered on the form screen.
    pub fn submit(
        &self,
        session_id: &SessionId,
        form: ApplicationForm,
    ) -> Result<ScreenView, SessionError> {
        let mut sessions = self.sessions.lock().expect("session mutex poisoned");
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| SessionError::UnknownSession(session_id.0.clone()))?;

        if session.step() != Step::Form {
            return Err(TransitionError {
                action: ScreenAction::Submit,
                from: session.step(),
            }
            .into());
        }

        session.submit(&self.service, form)?;
        Ok(render(session))
    }

    pub fn apply(
        &self,
        session_id: &SessionId,
        action: ScreenAction,
    ) -> Result<ScreenView, SessionError> {
        let mut sessions = self.sessions.lock().expect("session mutex poisoned");
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| SessionError::UnknownSession(session_id.0.clone()))?;

        session.apply(action)?;
        Ok(render(session))
    }
}

impl<D, S> std::fmt::Debug for SessionRegistry<D, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("enable_payment_flow", &self.enable_payment_flow)
            .finish_non_exhaustive()
    }
}
