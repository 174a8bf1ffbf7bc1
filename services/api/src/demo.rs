use crate::infra::{InMemoryDriveGateway, InMemorySheetGateway};
use clap::Args;
use std::sync::Arc;

use resume_intake::error::AppError;
use resume_intake::workflows::intake::{
    ApplicationForm, ResumeUpload, ScreenAction, ScreenView, SessionRegistry, SubmissionService,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Applicant name for the scripted submission
    #[arg(long, default_value = "Jane Doe")]
    pub(crate) name: String,
    /// Applicant email for the scripted submission
    #[arg(long, default_value = "jane.doe@example.com")]
    pub(crate) email: String,
    /// Preferred job location
    #[arg(long, default_value = "Remote")]
    pub(crate) location: String,
    /// Languages known (comma-separated)
    #[arg(long, default_value = "English, Spanish")]
    pub(crate) languages: String,
    /// Walk the payment screens after the submission
    #[arg(long)]
    pub(crate) with_payment_flow: bool,
}

/// Walk the full screen flow against in-memory gateways: a rejected attempt,
/// a successful submission, then the post-submission actions.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        name,
        email,
        location,
        languages,
        with_payment_flow,
    } = args;

    println!("Resume intake demo (offline gateways)");

    let drive = Arc::new(InMemoryDriveGateway::default());
    let sheet = Arc::new(InMemorySheetGateway::default());
    let service = Arc::new(SubmissionService::new(
        drive.clone(),
        sheet.clone(),
        "demo-folder",
    ));
    let registry = SessionRegistry::new(service, with_payment_flow);

    let (session_id, screen) = registry.open_session();
    println!("Opened {session_id}");
    print_screen(&screen);

    println!("\nSubmitting with a malformed email to show the banner...");
    let rejected = ApplicationForm {
        name: name.clone(),
        email: "not-an-email".to_string(),
        location: location.clone(),
        languages: languages.clone(),
        resume: demo_resume(),
    };
    match registry.submit(&session_id, rejected) {
        Ok(screen) => print_screen(&screen),
        Err(err) => {
            println!("  Rejected: {err}");
            if let Ok(screen) = registry.screen(&session_id) {
                print_screen(&screen);
            }
        }
    }

    println!("\nSubmitting the completed form...");
    let form = ApplicationForm {
        name,
        email,
        location,
        languages,
        resume: demo_resume(),
    };
    let screen = match registry.submit(&session_id, form) {
        Ok(screen) => screen,
        Err(err) => {
            println!("  Submission failed: {err}");
            return Ok(());
        }
    };
    print_screen(&screen);

    println!("\nStored files:");
    for file_name in drive.uploaded_file_names() {
        println!("  - {file_name}");
    }
    println!("Roster rows:");
    for row in sheet.rows() {
        println!("  - {}", row.join(" | "));
    }

    let actions = if with_payment_flow {
        vec![
            ScreenAction::RequestInsights,
            ScreenAction::ProceedToPayment,
            ScreenAction::ConfirmPayment,
            ScreenAction::BackToForm,
        ]
    } else {
        vec![ScreenAction::RequestInsights, ScreenAction::SubmitAnother]
    };

    for action in actions {
        println!("\nApplying '{action}'...");
        match registry.apply(&session_id, action) {
            Ok(screen) => print_screen(&screen),
            Err(err) => println!("  Unavailable: {err}"),
        }
    }

    Ok(())
}

fn demo_resume() -> ResumeUpload {
    ResumeUpload::new("resume.pdf", b"%PDF-1.4 demo resume".to_vec())
}

fn print_screen(view: &ScreenView) {
    println!("\n[{}] {}", view.step, view.headline);
    if let Some(error) = &view.error {
        println!("  ! {error}");
    }
    for line in &view.body {
        println!("  {line}");
    }
    for field in &view.fields {
        println!("  - {} ({})", field.label, field.placeholder);
    }
    if !view.actions.is_empty() {
        let labels: Vec<&str> = view.actions.iter().map(|action| action.label()).collect();
        println!("  actions: {}", labels.join(", "));
    }
    if let Some(record) = &view.record {
        println!("  stored resume: {}", record.resume_url);
    }
}
