use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::rental::RepositoryError;

/// Failure that aborts a process entry point (`serve`, `notify-overdue`, `demo`).
///
/// Request-level rejections never reach this type; the rental router renders them itself.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("rental store error: {0}")]
    Storage(#[from] RepositoryError),
}
