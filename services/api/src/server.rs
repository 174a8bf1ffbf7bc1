use crate::cli::ServeArgs;
use crate::infra::{build_registry, AppState};
use crate::routes::with_intake_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use resume_intake::config::AppConfig;
use resume_intake::error::AppError;
use resume_intake::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    // The Google clients drive their own blocking runtimes; bootstrapping them
    // (including the fatal spreadsheet lookup) happens off this one.
    let google = config.google.clone();
    let intake = config.intake.clone();
    let registry = tokio::task::spawn_blocking(move || build_registry(&google, &intake))
        .await
        .map_err(|err| AppError::Startup(format!("gateway bootstrap worker failed: {err}")))??;

    let app = with_intake_routes(registry)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "resume intake service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
