use serde::Serialize;

use super::domain::{ResumeKind, SubmittedRecord};
use super::session::{IntakeSession, ScreenAction, Step};

/// One screen, fully described. Rendering is a pure function of session
/// state; transitions happen elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreenView {
    pub step: Step,
    pub headline: &'static str,
    pub body: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub fields: Vec<FieldPrompt>,
    pub accepted_resume_extensions: Vec<&'static str>,
    pub actions: Vec<ScreenAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<SubmittedRecord>,
}

/// Input prompt shown on the form screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldPrompt {
    pub name: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
}

const FORM_FIELDS: [FieldPrompt; 4] = [
    FieldPrompt {
        name: "name",
        label: "Name",
        placeholder: "Enter your full name",
    },
    FieldPrompt {
        name: "email",
        label: "Email",
        placeholder: "Enter your email address",
    },
    FieldPrompt {
        name: "location",
        label: "Preferred Job Location",
        placeholder: "e.g., New York, Remote",
    },
    FieldPrompt {
        name: "languages",
        label: "Languages Known",
        placeholder: "e.g., English, Spanish",
    },
];

pub fn render(session: &IntakeSession) -> ScreenView {
    match session.step() {
        Step::Form => ScreenView {
            step: Step::Form,
            headline: "Submit Your Resume for AI Screening",
            body: vec![
                "Please fill in your details and upload your resume.".to_string(),
                "Accepted formats: PDF, DOCX, DOC".to_string(),
            ],
            error: session.last_error().map(str::to_string),
            fields: FORM_FIELDS.to_vec(),
            accepted_resume_extensions: ResumeKind::ACCEPTED_EXTENSIONS.to_vec(),
            actions: vec![ScreenAction::Submit],
            record: None,
        },
        Step::Submitted => ScreenView {
            step: Step::Submitted,
            headline: "Resume submitted successfully!",
            body: vec![
                "Get AI insights to enhance your resume and increase your chances of getting hired! $3.99 only".to_string(),
            ],
            error: None,
            fields: Vec::new(),
            accepted_resume_extensions: Vec::new(),
            actions: vec![ScreenAction::RequestInsights, ScreenAction::SubmitAnother],
            record: session.record().cloned(),
        },
        Step::PaymentPrompt => ScreenView {
            step: Step::PaymentPrompt,
            headline: "Payment Instructions",
            body: vec![
                "This is a paid service. Please proceed to payment to complete your transaction.".to_string(),
                "The cost for this service is $3.99.".to_string(),
                "1. Click the 'Proceed to Payment' button below.".to_string(),
                "2. You will be redirected to a secure payment gateway.".to_string(),
                "3. Complete the payment process.".to_string(),
                "4. Your AI insights will be emailed.".to_string(),
                "If you have any questions or need assistance with the payment process, feel free to contact our support team. Your purchase will be processed securely, and you'll receive a confirmation email once the transaction is complete.".to_string(),
            ],
            error: None,
            fields: Vec::new(),
            accepted_resume_extensions: Vec::new(),
            actions: vec![ScreenAction::ProceedToPayment],
            record: session.record().cloned(),
        },
        Step::PaymentSimulation => ScreenView {
            step: Step::PaymentSimulation,
            headline: "Payment Gateway Simulation",
            body: vec![
                "Imagine this as a secure payment page (e.g., Stripe or PayPal).".to_string(),
            ],
            error: None,
            fields: Vec::new(),
            accepted_resume_extensions: Vec::new(),
            actions: vec![ScreenAction::ConfirmPayment],
            record: session.record().cloned(),
        },
        Step::PaymentSuccess => ScreenView {
            step: Step::PaymentSuccess,
            headline: "Payment Successful!",
            body: vec![
                "Here are your AI insights: [Placeholder for AI-generated insights based on your input]".to_string(),
            ],
            error: None,
            fields: Vec::new(),
            accepted_resume_extensions: Vec::new(),
            actions: vec![ScreenAction::BackToForm],
            record: session.record().cloned(),
        },
    }
}
