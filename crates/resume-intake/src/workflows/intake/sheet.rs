use std::path::Path;

use google_sheets4::{api::Scope, api::ValueRange, common, hyper_rustls, hyper_util, yup_oauth2, Sheets};
use tokio::runtime::Runtime;

#[derive(Debug, thiserror::Error)]
pub enum SheetOperationError {
    #[error("sheet append failed: {0}")]
    Backend(String),
    #[error("sheets runtime unavailable: {0}")]
    Runtime(String),
}

/// Roster side of the intake workflow: one appended row per confirmed
/// submission.
pub trait SheetGateway: Send + Sync {
    fn append_row(&self, values: &[String]) -> Result<(), SheetOperationError>;
}

pub type SheetsConnector =
    hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>;

/// Synchronous wrapper around the generated google-sheets4 client, holding the
/// resolved spreadsheet id and the target range for appends.
pub struct GoogleSheetsClient<C>
where
    C: common::Connector + Send + Sync + 'static,
{
    hub: Sheets<C>,
    runtime: Runtime,
    spreadsheet_id: String,
    range: String,
}

impl<C> GoogleSheetsClient<C>
where
    C: common::Connector + Send + Sync + 'static,
{
    pub fn new(
        hub: Sheets<C>,
        runtime: Runtime,
        spreadsheet_id: impl Into<String>,
        range: impl Into<String>,
    ) -> Self {
        Self {
            hub,
            runtime,
            spreadsheet_id: spreadsheet_id.into(),
            range: range.into(),
        }
    }

    fn map_error<E: std::fmt::Display>(err: E) -> SheetOperationError {
        SheetOperationError::Backend(err.to_string())
    }
}

impl GoogleSheetsClient<SheetsConnector> {
    /// Build a client from a service-account key file. The client owns its
    /// runtime; callers must not invoke it from inside another runtime.
    pub fn connect(
        credentials_path: &Path,
        spreadsheet_id: impl Into<String>,
        range: impl Into<String>,
    ) -> Result<Self, SheetOperationError> {
        let runtime =
            Runtime::new().map_err(|err| SheetOperationError::Runtime(err.to_string()))?;
        let hub = runtime.block_on(async {
            let key = yup_oauth2::read_service_account_key(credentials_path)
                .await
                .map_err(|err| SheetOperationError::Runtime(err.to_string()))?;
            let auth = yup_oauth2::ServiceAccountAuthenticator::builder(key)
                .build()
                .await
                .map_err(|err| SheetOperationError::Runtime(err.to_string()))?;
            Ok::<_, SheetOperationError>(Sheets::new(https_client()?, auth))
        })?;

        Ok(Self::new(hub, runtime, spreadsheet_id, range))
    }
}

fn https_client() -> Result<common::Client<SheetsConnector>, SheetOperationError> {
    let connector = hyper_rustls::HttpsConnectorBuilder::new()
        .with_native_roots()
        .map_err(|err| SheetOperationError::Runtime(err.to_string()))?
        .https_or_http()
        .enable_http1()
        .build();

    Ok(
        hyper_util::client::legacy::Client::builder(hyper_util::rt::TokioExecutor::new())
            .build(connector),
    )
}

impl<C> std::fmt::Debug for GoogleSheetsClient<C>
where
    C: common::Connector + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleSheetsClient")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("range", &self.range)
            .finish_non_exhaustive()
    }
}

impl<C> SheetGateway for GoogleSheetsClient<C>
where
    C: common::Connector + Send + Sync + 'static,
{
    fn append_row(&self, values: &[String]) -> Result<(), SheetOperationError> {
        let row = values
            .iter()
            .map(|value| serde_json::Value::String(value.clone()))
            .collect::<Vec<_>>();
        let request = ValueRange {
            major_dimension: None,
            range: Some(self.range.clone()),
            values: Some(vec![row]),
        };

        let result = self.runtime.block_on(async {
            self.hub
                .spreadsheets()
                .values_append(request, &self.spreadsheet_id, &self.range)
                .value_input_option("USER_ENTERED")
                .insert_data_option("INSERT_ROWS")
                .add_scope(Scope::Spreadsheet)
                .doit()
                .await
        });

        result.map_err(Self::map_error)?;
        Ok(())
    }
}
