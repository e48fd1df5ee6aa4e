use crate::config::ConfigError;
use crate::export::ExportError;
use crate::telemetry::TelemetryError;
use std::fmt;

/// Failures that end a command. Schedule, roster and persistence problems are
/// absorbed by the session and only reach this level as `Rejected`.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Export(ExportError),
    /// A session action was refused; the message is the notice shown to the user.
    Rejected(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Export(err) => write!(f, "export error: {}", err),
            AppError::Rejected(message) => write!(f, "action rejected: {}", message),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Export(err) => Some(err),
            AppError::Rejected(_) => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<ExportError> for AppError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}
