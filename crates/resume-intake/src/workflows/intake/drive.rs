use std::path::Path;
use std::time::Duration;

use google_drive3::{
    api::File as DriveFile, api::Scope, common, hyper_rustls, hyper_util, yup_oauth2, DriveHub,
};
use tokio::runtime::Runtime;

/// Durable copy of an uploaded resume, as reported back by Drive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredResume {
    pub file_id: String,
    pub name: String,
    pub web_view_link: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DriveOperationError {
    #[error("drive operation failed: {0}")]
    Backend(String),
    #[error("drive upload timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("drive runtime unavailable: {0}")]
    Runtime(String),
    #[error("uploaded file metadata is missing a shareable link")]
    MissingLink,
}

/// Storage side of the intake workflow. Uploads go to a fixed folder; the
/// spreadsheet lookup exists because the roster sheet is addressed by name.
pub trait DriveGateway: Send + Sync {
    fn upload_resume(
        &self,
        source: &Path,
        file_name: &str,
        folder_id: &str,
    ) -> Result<StoredResume, DriveOperationError>;

    fn find_spreadsheet(&self, name: &str) -> Result<Option<String>, DriveOperationError>;
}

pub type GoogleConnector =
    hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>;

/// Thin wrapper around the generated google-drive3 client allowing synchronous
/// workflows to interact with Drive without exposing async details.
pub struct GoogleDriveClient<C>
where
    C: common::Connector + Send + Sync + 'static,
{
    hub: DriveHub<C>,
    runtime: Runtime,
    upload_timeout: Duration,
}

impl<C> GoogleDriveClient<C>
where
    C: common::Connector + Send + Sync + 'static,
{
    pub fn new(hub: DriveHub<C>, runtime: Runtime, upload_timeout: Duration) -> Self {
        Self {
            hub,
            runtime,
            upload_timeout,
        }
    }

    fn map_error<E: std::fmt::Display>(err: E) -> DriveOperationError {
        DriveOperationError::Backend(err.to_string())
    }
}

impl GoogleDriveClient<GoogleConnector> {
    /// Build a client from a service-account key file. The client owns its
    /// runtime; callers must not invoke it from inside another runtime.
    pub fn connect(
        credentials_path: &Path,
        upload_timeout: Duration,
    ) -> Result<Self, DriveOperationError> {
        let runtime =
            Runtime::new().map_err(|err| DriveOperationError::Runtime(err.to_string()))?;
        let hub = runtime.block_on(async {
            let key = yup_oauth2::read_service_account_key(credentials_path)
                .await
                .map_err(|err| DriveOperationError::Runtime(err.to_string()))?;
            let auth = yup_oauth2::ServiceAccountAuthenticator::builder(key)
                .build()
                .await
                .map_err(|err| DriveOperationError::Runtime(err.to_string()))?;
            Ok::<_, DriveOperationError>(DriveHub::new(https_client()?, auth))
        })?;

        Ok(Self::new(hub, runtime, upload_timeout))
    }
}

fn https_client() -> Result<common::Client<GoogleConnector>, DriveOperationError> {
    let connector = hyper_rustls::HttpsConnectorBuilder::new()
        .with_native_roots()
        .map_err(|err| DriveOperationError::Runtime(err.to_string()))?
        .https_or_http()
        .enable_http1()
        .build();

    Ok(
        hyper_util::client::legacy::Client::builder(hyper_util::rt::TokioExecutor::new())
            .build(connector),
    )
}

impl<C> std::fmt::Debug for GoogleDriveClient<C>
where
    C: common::Connector + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleDriveClient")
            .field("upload_timeout", &self.upload_timeout)
            .finish_non_exhaustive()
    }
}

impl<C> DriveGateway for GoogleDriveClient<C>
where
    C: common::Connector + Send + Sync + 'static,
{
    fn upload_resume(
        &self,
        source: &Path,
        file_name: &str,
        folder_id: &str,
    ) -> Result<StoredResume, DriveOperationError> {
        let metadata = DriveFile {
            name: Some(file_name.to_string()),
            parents: Some(vec![folder_id.to_string()]),
            ..DriveFile::default()
        };

        let content = std::fs::File::open(source).map_err(Self::map_error)?;
        let mime_type = mime_guess::from_path(file_name)
            .first()
            .unwrap_or(mime::APPLICATION_OCTET_STREAM);

        let result = self.runtime.block_on(async {
            tokio::time::timeout(
                self.upload_timeout,
                self.hub
                    .files()
                    .create(metadata)
                    .param("fields", "id, webViewLink")
                    .supports_all_drives(true)
                    .add_scope(Scope::File)
                    .upload(content, mime_type),
            )
            .await
        });

        let outcome = result.map_err(|_| DriveOperationError::Timeout(self.upload_timeout))?;
        let (_, file) = outcome.map_err(Self::map_error)?;
        let web_view_link = file.web_view_link.ok_or(DriveOperationError::MissingLink)?;

        Ok(StoredResume {
            file_id: file.id.unwrap_or_default(),
            name: file.name.unwrap_or_else(|| file_name.to_string()),
            web_view_link,
        })
    }

    fn find_spreadsheet(&self, name: &str) -> Result<Option<String>, DriveOperationError> {
        let query = format!(
            "name = '{}' and mimeType = 'application/vnd.google-apps.spreadsheet' and trashed = false",
            name.replace('\'', "\\'")
        );

        let result = self.runtime.block_on(async {
            self.hub
                .files()
                .list()
                .q(&query)
                .param("fields", "files(id,name)")
                .page_size(1)
                .include_items_from_all_drives(true)
                .supports_all_drives(true)
                .add_scope(Scope::Readonly)
                .doit()
                .await
        });

        let (_, file_list) = result.map_err(Self::map_error)?;
        Ok(file_list
            .files
            .unwrap_or_default()
            .into_iter()
            .find_map(|file| file.id))
    }
}
