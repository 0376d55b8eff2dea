use crate::cli::ServeArgs;
use crate::infra::{build_desk, AppState};
use crate::routes::with_rental_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use rental_desk::config::AppConfig;
use rental_desk::error::AppError;
use rental_desk::telemetry;
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
    if let Some(today) = args.today.take() {
        config.rental.business_date = Some(today);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let (desk, _) = build_desk(&config.rental);

    let app = with_rental_routes(desk)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        business_date = ?config.rental.business_date,
        "rental desk ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
