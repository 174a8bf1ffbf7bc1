use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use resume_intake::config::{GoogleConfig, IntakeConfig};
use resume_intake::error::AppError;
use resume_intake::workflows::intake::drive::{
    DriveGateway, DriveOperationError, GoogleConnector, GoogleDriveClient, StoredResume,
};
use resume_intake::workflows::intake::sheet::{
    GoogleSheetsClient, SheetGateway, SheetOperationError, SheetsConnector,
};
use resume_intake::workflows::intake::{SessionRegistry, SubmissionService};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type GoogleRegistry =
    SessionRegistry<GoogleDriveClient<GoogleConnector>, GoogleSheetsClient<SheetsConnector>>;

/// Connect both Google clients, resolve the roster spreadsheet by name, and
/// assemble the session registry. The clients own blocking runtimes, so this
/// must run off the server's async runtime. A missing spreadsheet is fatal.
pub(crate) fn build_registry(
    google: &GoogleConfig,
    intake: &IntakeConfig,
) -> Result<Arc<GoogleRegistry>, AppError> {
    let drive = GoogleDriveClient::connect(&google.credentials_path, intake.upload_timeout)?;

    let spreadsheet_id = drive
        .find_spreadsheet(&google.spreadsheet_name)?
        .ok_or_else(|| AppError::SpreadsheetMissing {
            name: google.spreadsheet_name.clone(),
        })?;

    let sheet = GoogleSheetsClient::connect(
        &google.credentials_path,
        spreadsheet_id,
        google.sheet_range.clone(),
    )
    .map_err(|err| AppError::Startup(err.to_string()))?;

    let service = Arc::new(SubmissionService::new(
        Arc::new(drive),
        Arc::new(sheet),
        google.drive_folder_id.clone(),
    ));

    Ok(Arc::new(SessionRegistry::new(
        service,
        intake.enable_payment_flow,
    )))
}

/// Offline stand-in for Drive used by the CLI demo: uploads land in memory and
/// come back with deterministic links.
#[derive(Default)]
pub(crate) struct InMemoryDriveGateway {
    uploads: Mutex<Vec<String>>,
}

impl InMemoryDriveGateway {
    pub(crate) fn uploaded_file_names(&self) -> Vec<String> {
        self.uploads.lock().expect("upload mutex poisoned").clone()
    }
}

impl DriveGateway for InMemoryDriveGateway {
    fn upload_resume(
        &self,
        source: &Path,
        file_name: &str,
        _folder_id: &str,
    ) -> Result<StoredResume, DriveOperationError> {
        std::fs::read(source).map_err(|err| DriveOperationError::Backend(err.to_string()))?;

        let mut uploads = self.uploads.lock().expect("upload mutex poisoned");
        uploads.push(file_name.to_string());
        let index = uploads.len();

        Ok(StoredResume {
            file_id: format!("demo-file-{index}"),
            name: file_name.to_string(),
            web_view_link: format!("https://drive.google.com/file/d/demo-file-{index}/view"),
        })
    }

    fn find_spreadsheet(&self, _name: &str) -> Result<Option<String>, DriveOperationError> {
        Ok(Some("demo-spreadsheet".to_string()))
    }
}

/// Offline stand-in for the roster sheet: rows accumulate in memory.
#[derive(Default)]
pub(crate) struct InMemorySheetGateway {
    rows: Mutex<Vec<Vec<String>>>,
}

impl InMemorySheetGateway {
    pub(crate) fn rows(&self) -> Vec<Vec<String>> {
        self.rows.lock().expect("row mutex poisoned").clone()
    }
}

impl SheetGateway for InMemorySheetGateway {
    fn append_row(&self, values: &[String]) -> Result<(), SheetOperationError> {
        self.rows
            .lock()
            .expect("row mutex poisoned")
            .push(values.to_vec());
        Ok(())
    }
}
