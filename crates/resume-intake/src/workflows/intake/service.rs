use std::io::Write as _;
use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use tracing::{info, warn};

use super::domain::{ApplicationForm, SubmittedRecord};
use super::drive::{DriveGateway, DriveOperationError};
use super::sheet::{SheetGateway, SheetOperationError};
use super::validation::{validate, ValidationError};

/// Orchestrates one submission attempt: validate, spool, upload, append.
///
/// The upload and the append run strictly in sequence; the append consumes
/// the link the upload produced. Nothing is retried automatically.
pub struct SubmissionService<D, S> {
    drive: Arc<D>,
    sheet: Arc<S>,
    folder_id: String,
}

/// Error raised by a submission attempt.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Rejected(#[from] ValidationError),
    #[error("resume upload failed: {0}")]
    Upload(#[source] DriveOperationError),
    #[error("roster update failed: {0}")]
    Append(#[source] SheetOperationError),
    #[error("temporary spool unavailable: {0}")]
    Spool(#[from] std::io::Error),
}

impl<D, S> SubmissionService<D, S>
where
    D: DriveGateway + 'static,
    S: SheetGateway + 'static,
{
    pub fn new(drive: Arc<D>, sheet: Arc<S>, folder_id: impl Into<String>) -> Self {
        Self {
            drive,
            sheet,
            folder_id: folder_id.into(),
        }
    }

    /// Run one attempt end to end. Invalid forms are rejected before either
    /// gateway is touched. A failed append does not remove the uploaded
    /// file; the divergence is logged so the roster can be reconciled.
    pub fn submit(&self, form: ApplicationForm) -> Result<SubmittedRecord, SubmissionError> {
        validate(&form)?;

        // The extension is known to exist: validation rejects filenames
        // without an accepted one.
        let extension = form.resume.extension().unwrap_or("pdf");
        let file_name = derived_file_name(&form.name, extension, Local::now().naive_local());

        let mut spool = tempfile::Builder::new()
            .prefix("resume-intake-")
            .tempfile()?;
        spool.write_all(&form.resume.content)?;
        spool.flush()?;

        let stored = self
            .drive
            .upload_resume(spool.path(), &file_name, &self.folder_id)
            .map_err(SubmissionError::Upload)?;

        let record = SubmittedRecord {
            name: form.name,
            email: form.email,
            location: form.location,
            languages: form.languages,
            resume_url: stored.web_view_link,
        };

        if let Err(err) = self.sheet.append_row(&record.row()) {
            warn!(
                file_id = %stored.file_id,
                file_name = %file_name,
                "resume stored but roster append failed; stored copy needs manual reconciliation"
            );
            return Err(SubmissionError::Append(err));
        }

        info!(file_id = %stored.file_id, file_name = %file_name, "submission recorded");
        Ok(record)
    }
}

/// Stored filename: applicant name with spaces flattened, a second-resolution
/// timestamp taken at submission time, and the original extension. Repeat
/// submissions by the same applicant therefore never collide.
pub(crate) fn derived_file_name(name: &str, extension: &str, at: NaiveDateTime) -> String {
    let base: String = name
        .chars()
        .map(|c| {
            if c == ' ' || std::path::is_separator(c) {
                '_'
            } else {
                c
            }
        })
        .collect();

    format!("{base}_{}.{extension}", at.format("%Y%m%d_%H%M%S"))
}
