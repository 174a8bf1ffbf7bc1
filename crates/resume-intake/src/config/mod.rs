use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub google: GoogleConfig,
    pub intake: IntakeConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let credentials_path = PathBuf::from(
            env::var("APP_GOOGLE_CREDENTIALS").unwrap_or_else(|_| "credentials.json".to_string()),
        );
        let drive_folder_id = env::var("APP_DRIVE_FOLDER_ID")
            .unwrap_or_else(|_| "1yROMWTu3ntmV9P0ehjKLnTq3ZlJ1xZbN".to_string());
        let spreadsheet_name =
            env::var("APP_SPREADSHEET_NAME").unwrap_or_else(|_| "Resumes".to_string());
        let sheet_range = env::var("APP_SHEET_RANGE").unwrap_or_else(|_| "Sheet1".to_string());

        let upload_timeout_secs = env::var("APP_UPLOAD_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidUploadTimeout)?;

        let enable_payment_flow = env::var("APP_ENABLE_PAYMENT_FLOW")
            .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            google: GoogleConfig {
                credentials_path,
                drive_folder_id,
                spreadsheet_name,
                sheet_range,
            },
            intake: IntakeConfig {
                upload_timeout: Duration::from_secs(upload_timeout_secs),
                enable_payment_flow,
            },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Service-identity credential and target locations for the Google APIs.
///
/// The credential is loaded once at process start and never mutated; both
/// gateways share it. The folder receives uploaded resumes, the named
/// spreadsheet receives the roster rows.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub credentials_path: PathBuf,
    pub drive_folder_id: String,
    pub spreadsheet_name: String,
    pub sheet_range: String,
}

/// Behavior knobs for the intake workflow itself.
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    pub upload_timeout: Duration,
    pub enable_payment_flow: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidUploadTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidUploadTimeout => {
                write!(f, "APP_UPLOAD_TIMEOUT_SECS must be a whole number of seconds")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidUploadTimeout => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("APP_GOOGLE_CREDENTIALS");
        env::remove_var("APP_DRIVE_FOLDER_ID");
        env::remove_var("APP_SPREADSHEET_NAME");
        env::remove_var("APP_SHEET_RANGE");
        env::remove_var("APP_UPLOAD_TIMEOUT_SECS");
        env::remove_var("APP_ENABLE_PAYMENT_FLOW");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.google.spreadsheet_name, "Resumes");
        assert_eq!(config.google.sheet_range, "Sheet1");
        assert_eq!(config.intake.upload_timeout, Duration::from_secs(30));
        assert!(!config.intake.enable_payment_flow);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn rejects_non_numeric_upload_timeout() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_UPLOAD_TIMEOUT_SECS", "soon");
        let err = AppConfig::load().expect_err("timeout must be numeric");
        assert!(matches!(err, ConfigError::InvalidUploadTimeout));
    }

    #[test]
    fn payment_flow_flag_accepts_truthy_values() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENABLE_PAYMENT_FLOW", "TRUE");
        let config = AppConfig::load().expect("config loads");
        assert!(config.intake.enable_payment_flow);
    }
}
