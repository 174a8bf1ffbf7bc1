use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::workflows::intake::domain::{ApplicationForm, ResumeUpload};
use crate::workflows::intake::drive::{DriveGateway, DriveOperationError, StoredResume};
use crate::workflows::intake::service::SubmissionService;
use crate::workflows::intake::session::SessionRegistry;
use crate::workflows::intake::sheet::{SheetGateway, SheetOperationError};

pub(super) fn form() -> ApplicationForm {
    ApplicationForm {
        name: "Jane Doe".to_string(),
        email: "jane@x.com".to_string(),
        location: "Remote".to_string(),
        languages: "English".to_string(),
        resume: ResumeUpload::new("resume.pdf", b"%PDF-1.4 sample resume".to_vec()),
    }
}

/// Shared ordering log: fakes record which gateway ran, in call order.
pub(super) type CallLog = Arc<Mutex<Vec<&'static str>>>;

pub(super) struct RecordedUpload {
    pub(super) file_name: String,
    pub(super) folder_id: String,
    pub(super) spool_path: PathBuf,
    pub(super) spool_bytes: Vec<u8>,
}

pub(super) struct MemoryDrive {
    pub(super) uploads: Mutex<Vec<RecordedUpload>>,
    log: CallLog,
}

impl MemoryDrive {
    pub(super) fn new(log: CallLog) -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
            log,
        }
    }
}

impl DriveGateway for MemoryDrive {
    fn upload_resume(
        &self,
        source: &Path,
        file_name: &str,
        folder_id: &str,
    ) -> Result<StoredResume, DriveOperationError> {
        // Reading proves the spool exists while the gateway runs.
        let spool_bytes =
            std::fs::read(source).map_err(|err| DriveOperationError::Backend(err.to_string()))?;

        self.log.lock().expect("log mutex poisoned").push("drive");
        let mut uploads = self.uploads.lock().expect("upload mutex poisoned");
        uploads.push(RecordedUpload {
            file_name: file_name.to_string(),
            folder_id: folder_id.to_string(),
            spool_path: source.to_path_buf(),
            spool_bytes,
        });
        let index = uploads.len();

        Ok(StoredResume {
            file_id: format!("file-{index}"),
            name: file_name.to_string(),
            web_view_link: format!("https://drive.google.com/file/d/file-{index}/view"),
        })
    }

    fn find_spreadsheet(&self, _name: &str) -> Result<Option<String>, DriveOperationError> {
        Ok(Some("spreadsheet-1".to_string()))
    }
}

pub(super) struct FailingDrive {
    pub(super) spool_path: Mutex<Option<PathBuf>>,
    log: CallLog,
}

impl FailingDrive {
    pub(super) fn new(log: CallLog) -> Self {
        Self {
            spool_path: Mutex::new(None),
            log,
        }
    }
}

impl DriveGateway for FailingDrive {
    fn upload_resume(
        &self,
        source: &Path,
        _file_name: &str,
        _folder_id: &str,
    ) -> Result<StoredResume, DriveOperationError> {
        self.log.lock().expect("log mutex poisoned").push("drive");
        *self.spool_path.lock().expect("spool mutex poisoned") = Some(source.to_path_buf());
        Err(DriveOperationError::Backend("drive offline".to_string()))
    }

    fn find_spreadsheet(&self, _name: &str) -> Result<Option<String>, DriveOperationError> {
        Err(DriveOperationError::Backend("drive offline".to_string()))
    }
}

pub(super) struct MemorySheet {
    pub(super) rows: Mutex<Vec<Vec<String>>>,
    log: CallLog,
}

impl MemorySheet {
    pub(super) fn new(log: CallLog) -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            log,
        }
    }
}

impl SheetGateway for MemorySheet {
    fn append_row(&self, values: &[String]) -> Result<(), SheetOperationError> {
        self.log.lock().expect("log mutex poisoned").push("sheet");
        self.rows
            .lock()
            .expect("row mutex poisoned")
            .push(values.to_vec());
        Ok(())
    }
}

pub(super) struct FailingSheet {
    log: CallLog,
}

impl FailingSheet {
    pub(super) fn new(log: CallLog) -> Self {
        Self { log }
    }
}

impl SheetGateway for FailingSheet {
    fn append_row(&self, _values: &[String]) -> Result<(), SheetOperationError> {
        self.log.lock().expect("log mutex poisoned").push("sheet");
        Err(SheetOperationError::Backend("sheet offline".to_string()))
    }
}

pub(super) const FOLDER_ID: &str = "folder-123";

pub(super) fn build_service() -> (
    SubmissionService<MemoryDrive, MemorySheet>,
    Arc<MemoryDrive>,
    Arc<MemorySheet>,
    CallLog,
) {
    let log: CallLog = Arc::new(Mutex::new(Vec::new()));
    let drive = Arc::new(MemoryDrive::new(log.clone()));
    let sheet = Arc::new(MemorySheet::new(log.clone()));
    let service = SubmissionService::new(drive.clone(), sheet.clone(), FOLDER_ID);
    (service, drive, sheet, log)
}

pub(super) fn build_registry(
    enable_payment_flow: bool,
) -> (
    Arc<SessionRegistry<MemoryDrive, MemorySheet>>,
    Arc<MemoryDrive>,
    Arc<MemorySheet>,
    CallLog,
) {
    let (service, drive, sheet, log) = build_service();
    let registry = Arc::new(SessionRegistry::new(Arc::new(service), enable_payment_flow));
    (registry, drive, sheet, log)
}

pub(super) async fn read_json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) const MULTIPART_BOUNDARY: &str = "intake-test-boundary";

/// Assemble a multipart/form-data body the way a browser would encode the
/// intake form. `resume` carries the filename and file content.
pub(super) fn multipart_body(
    fields: &[(&str, &str)],
    resume: Option<(&str, &[u8])>,
) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    if let Some((file_name, content)) = resume {
        body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"resume\"; filename=\"{file_name}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

pub(super) fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}")
}
