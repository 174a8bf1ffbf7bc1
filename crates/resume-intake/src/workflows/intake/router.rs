use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ApplicationForm, ResumeUpload};
use super::drive::DriveGateway;
use super::service::SubmissionError;
use super::session::{ScreenAction, SessionError, SessionId, SessionRegistry};
use super::sheet::SheetGateway;

// Resume documents regularly exceed axum's default body limit.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Router builder exposing the screen flow over HTTP: open a session, read
/// the current screen, submit the form, apply a screen action.
pub fn intake_router<D, S>(registry: Arc<SessionRegistry<D, S>>) -> Router
where
    D: DriveGateway + 'static,
    S: SheetGateway + 'static,
{
    Router::new()
        .route("/api/v1/intake/sessions", post(open_session_handler::<D, S>))
        .route(
            "/api/v1/intake/sessions/:session_id/screen",
            get(screen_handler::<D, S>),
        )
        .route(
            "/api/v1/intake/sessions/:session_id/submission",
            post(submission_handler::<D, S>),
        )
        .route(
            "/api/v1/intake/sessions/:session_id/actions",
            post(action_handler::<D, S>),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(registry)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActionRequest {
    pub(crate) action: ScreenAction,
}

pub(crate) async fn open_session_handler<D, S>(
    State(registry): State<Arc<SessionRegistry<D, S>>>,
) -> Response
where
    D: DriveGateway + 'static,
    S: SheetGateway + 'static,
{
    let (session_id, screen) = registry.open_session();
    let payload = json!({ "session_id": session_id, "screen": screen });
    (StatusCode::CREATED, axum::Json(payload)).into_response()
}

pub(crate) async fn screen_handler<D, S>(
    State(registry): State<Arc<SessionRegistry<D, S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    D: DriveGateway + 'static,
    S: SheetGateway + 'static,
{
    match registry.screen(&SessionId(session_id)) {
        Ok(screen) => (StatusCode::OK, axum::Json(screen)).into_response(),
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn submission_handler<D, S>(
    State(registry): State<Arc<SessionRegistry<D, S>>>,
    Path(session_id): Path<String>,
    multipart: Multipart,
) -> Response
where
    D: DriveGateway + 'static,
    S: SheetGateway + 'static,
{
    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(message) => {
            let payload = json!({ "error": format!("malformed form upload: {message}") });
            return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
        }
    };

    let session_id = SessionId(session_id);
    // The gateways drive their own runtime; keep them off the server's.
    let outcome = tokio::task::spawn_blocking({
        let registry = registry.clone();
        let session_id = session_id.clone();
        move || registry.submit(&session_id, form)
    })
    .await;

    let result = match outcome {
        Ok(result) => result,
        Err(_) => {
            let payload = json!({ "error": "submission worker failed" });
            return (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response();
        }
    };

    match result {
        Ok(screen) => {
            (StatusCode::CREATED, axum::Json(json!({ "screen": screen }))).into_response()
        }
        Err(SessionError::Submission(err)) => {
            let status = match &err {
                SubmissionError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
                SubmissionError::Upload(_) | SubmissionError::Append(_) => StatusCode::BAD_GATEWAY,
                SubmissionError::Spool(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            let screen = registry.screen(&session_id).ok();
            let payload = json!({ "error": err.to_string(), "screen": screen });
            (status, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(&other),
    }
}

pub(crate) async fn action_handler<D, S>(
    State(registry): State<Arc<SessionRegistry<D, S>>>,
    Path(session_id): Path<String>,
    axum::Json(request): axum::Json<ActionRequest>,
) -> Response
where
    D: DriveGateway + 'static,
    S: SheetGateway + 'static,
{
    match registry.apply(&SessionId(session_id), request.action) {
        Ok(screen) => {
            (StatusCode::OK, axum::Json(json!({ "screen": screen }))).into_response()
        }
        Err(err) => error_response(&err),
    }
}

fn error_response(err: &SessionError) -> Response {
    let status = match err {
        SessionError::UnknownSession(_) => StatusCode::NOT_FOUND,
        SessionError::Transition(_) => StatusCode::CONFLICT,
        SessionError::Submission(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}

async fn read_form(mut multipart: Multipart) -> Result<ApplicationForm, String> {
    let mut name = String::new();
    let mut email = String::new();
    let mut location = String::new();
    let mut languages = String::new();
    let mut resume = ResumeUpload::new("", Vec::new());

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| err.to_string())?
    {
        match field.name() {
            Some("name") => name = field.text().await.map_err(|err| err.to_string())?,
            Some("email") => email = field.text().await.map_err(|err| err.to_string())?,
            Some("location") => location = field.text().await.map_err(|err| err.to_string())?,
            Some("languages") => languages = field.text().await.map_err(|err| err.to_string())?,
            Some("resume") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content = field.bytes().await.map_err(|err| err.to_string())?.to_vec();
                resume = ResumeUpload::new(file_name, content);
            }
            _ => {}
        }
    }

    // Absent fields stay empty and fall to validation, which reports the
    // first missing one.
    Ok(ApplicationForm {
        name,
        email,
        location,
        languages,
        resume,
    })
}
