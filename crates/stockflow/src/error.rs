use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::ingest::IngestError;
use crate::workflows::reorder::{PersistenceError, ReorderError, ReorderErrorKind};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Reorder(ReorderError),
    Persistence(PersistenceError),
    Ingest(IngestError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Reorder(err) => write!(f, "reorder planning error: {}", err),
            AppError::Persistence(err) => write!(f, "audit log error: {}", err),
            AppError::Ingest(err) => write!(f, "inventory cleaning error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Reorder(err) => Some(err),
            AppError::Persistence(err) => Some(err),
            AppError::Ingest(err) => Some(err),
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Reorder(err) => match err.kind() {
                ReorderErrorKind::DataIntegrity | ReorderErrorKind::Configuration => {
                    StatusCode::BAD_REQUEST
                }
                ReorderErrorKind::SourceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            },
            AppError::Ingest(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
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

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<ReorderError> for AppError {
    fn from(value: ReorderError) -> Self {
        Self::Reorder(value)
    }
}

impl From<PersistenceError> for AppError {
    fn from(value: PersistenceError) -> Self {
        Self::Persistence(value)
    }
}

impl From<IngestError> for AppError {
    fn from(value: IngestError) -> Self {
        Self::Ingest(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::reorder::{Budget, SourceUnavailableError};

    #[test]
    fn reorder_errors_map_to_client_or_availability_statuses() {
        let budget = Budget::new(-5.0).expect_err("negative budget");
        assert_eq!(
            AppError::from(ReorderError::from(budget)).status_code(),
            StatusCode::BAD_REQUEST
        );

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let unavailable = ReorderError::from(SourceUnavailableError::Open {
            path: "snapshot.csv".into(),
            source: io,
        });
        assert_eq!(
            AppError::from(unavailable).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn infrastructure_errors_are_internal() {
        let error = AppError::from(PersistenceError::Unavailable("disk full".into()));
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(error.to_string().contains("disk full"));
    }
}
