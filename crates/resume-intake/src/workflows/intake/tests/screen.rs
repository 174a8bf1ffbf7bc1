use std::sync::Arc;

use super::common::*;
use crate::workflows::intake::screen::render;
use crate::workflows::intake::service::SubmissionService;
use crate::workflows::intake::session::{IntakeSession, ScreenAction, Step};

#[test]
fn form_screen_prompts_for_every_field() {
    let session = IntakeSession::new(false);
    let view = render(&session);

    assert_eq!(view.step, Step::Form);
    assert_eq!(view.headline, "Submit Your Resume for AI Screening");
    assert!(view.error.is_none());
    assert!(view.record.is_none());
    assert_eq!(view.actions, vec![ScreenAction::Submit]);
    assert_eq!(view.accepted_resume_extensions, vec!["pdf", "docx", "doc"]);

    let names: Vec<&str> = view.fields.iter().map(|field| field.name).collect();
    assert_eq!(names, vec!["name", "email", "location", "languages"]);
    let placeholders: Vec<&str> = view.fields.iter().map(|field| field.placeholder).collect();
    assert_eq!(
        placeholders,
        vec![
            "Enter your full name",
            "Enter your email address",
            "e.g., New York, Remote",
            "e.g., English, Spanish",
        ]
    );
}

#[test]
fn failed_submission_banner_shows_on_the_form_screen() {
    let log: CallLog = Arc::new(std::sync::Mutex::new(Vec::new()));
    let drive = Arc::new(FailingDrive::new(log.clone()));
    let sheet = Arc::new(MemorySheet::new(log));
    let service = SubmissionService::new(drive, sheet, FOLDER_ID);
    let mut session = IntakeSession::new(false);
    session.submit(&service, form()).expect_err("upload fails");

    let view = render(&session);
    assert_eq!(view.step, Step::Form);
    let banner = view.error.expect("banner rendered");
    assert!(banner.contains("upload failed"));
}

#[test]
fn submitted_screen_offers_insights_and_a_fresh_form() {
    let (service, _drive, _sheet, _log) = build_service();
    let mut session = IntakeSession::new(false);
    session.submit(&service, form()).expect("submission succeeds");

    let view = render(&session);
    assert_eq!(view.step, Step::Submitted);
    assert_eq!(view.headline, "Resume submitted successfully!");
    assert!(view.body.iter().any(|line| line.contains("$3.99")));
    assert_eq!(
        view.actions,
        vec![ScreenAction::RequestInsights, ScreenAction::SubmitAnother]
    );
    assert!(view.fields.is_empty());

    let record = view.record.expect("record shown");
    assert_eq!(record.email, "jane@x.com");
}

#[test]
fn payment_screens_offer_exactly_one_way_forward() {
    let (service, _drive, _sheet, _log) = build_service();
    let mut session = IntakeSession::new(true);
    session.submit(&service, form()).expect("submission succeeds");

    session.apply(ScreenAction::RequestInsights).expect("prompt");
    let view = render(&session);
    assert_eq!(view.headline, "Payment Instructions");
    assert_eq!(view.actions, vec![ScreenAction::ProceedToPayment]);

    session.apply(ScreenAction::ProceedToPayment).expect("simulation");
    let view = render(&session);
    assert_eq!(view.headline, "Payment Gateway Simulation");
    assert_eq!(view.actions, vec![ScreenAction::ConfirmPayment]);

    session.apply(ScreenAction::ConfirmPayment).expect("success");
    let view = render(&session);
    assert_eq!(view.headline, "Payment Successful!");
    assert_eq!(view.actions, vec![ScreenAction::BackToForm]);
    assert!(view.record.is_some(), "payment screens keep the record visible");
}

#[test]
fn rendering_is_a_pure_function_of_session_state() {
    let (service, _drive, _sheet, _log) = build_service();
    let mut session = IntakeSession::new(false);
    session.submit(&service, form()).expect("submission succeeds");

    assert_eq!(render(&session), render(&session));
    assert_eq!(session.step(), Step::Submitted, "render never mutates the session");
}
