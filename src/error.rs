use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use std::path::PathBuf;
use thiserror::Error;

use crate::encoder::{envelope, ows};
use crate::validation::FeatureError;

/// Failure classes shared by every protocol variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Structural,
    Presence,
    Duplicate,
    Type,
    Authentication,
    Environment,
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("No FME workspace provided")]
    MissingWorkspace,

    #[error("The FME workspace path is invalid: {0}")]
    InvalidWorkspace(String),

    #[error("Positional parameter in script parameter strings: {0}")]
    PositionalArgument(String),

    #[error("No value provided for parameter {0}")]
    MissingValue(String),

    #[error("Parameter {0} defined more than once")]
    DuplicateParameter(String),

    #[error("{message}")]
    InvalidValue { name: String, message: String },

    #[error("The following parameters are missing: {}", .0.join(", "))]
    MissingParameters(Vec<String>),

    #[error("Parameters file not found: {}", .0.display())]
    ParametersFileNotFound(PathBuf),

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Invalid GeoJSON Feature structure: {0}")]
    InvalidFeature(#[from] FeatureError),

    #[error("{0}")]
    Unauthorized(String),

    #[error("FolderOut does not exist: {}", .0.display())]
    OutputDirectoryMissing(PathBuf),

    #[error("Could not write the result file: {0}")]
    ArtifactWrite(#[from] std::io::Error),
}

impl ValidationError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ValidationError::InvalidWorkspace(_)
            | ValidationError::PositionalArgument(_)
            | ValidationError::MissingValue(_)
            | ValidationError::InvalidJson(_) => ErrorCategory::Structural,
            ValidationError::InvalidFeature(FeatureError::MissingProperty(_)) => {
                ErrorCategory::Presence
            }
            ValidationError::InvalidFeature(_) => ErrorCategory::Structural,
            ValidationError::MissingWorkspace | ValidationError::MissingParameters(_) => {
                ErrorCategory::Presence
            }
            ValidationError::DuplicateParameter(_) => ErrorCategory::Duplicate,
            ValidationError::InvalidValue { .. } => ErrorCategory::Type,
            ValidationError::Unauthorized(_) => ErrorCategory::Authentication,
            ValidationError::ParametersFileNotFound(_)
            | ValidationError::OutputDirectoryMissing(_)
            | ValidationError::ArtifactWrite(_) => ErrorCategory::Environment,
        }
    }

    /// Whether the missing-parameters list names `name`.
    pub fn is_missing(&self, name: &str) -> bool {
        matches!(self, ValidationError::MissingParameters(names) if names.iter().any(|n| n == name))
    }
}

/// Failures of the FME Server data download handlers, rendered as failure
/// envelopes.
#[derive(Debug, Error)]
pub enum FmeServerError {
    #[error("Missing required parameters: {}", .0.join(", "))]
    MissingParameters(Vec<String>),

    #[error("Invalid JSON body: {0}")]
    InvalidBody(String),

    #[error("{0}")]
    InvalidFeature(#[from] FeatureError),

    #[error("{0}")]
    Rejected(ValidationError),

    #[error("Simulated FME Server error")]
    Simulated,

    #[error("Cannot build download URL: {0}")]
    DownloadUrl(#[from] url::ParseError),

    #[error("Cannot build result archive: {0}")]
    Archive(#[from] zip::result::ZipError),
}

impl From<ValidationError> for FmeServerError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::MissingParameters(names) => FmeServerError::MissingParameters(names),
            ValidationError::InvalidFeature(err) => FmeServerError::InvalidFeature(err),
            other => FmeServerError::Rejected(other),
        }
    }
}

impl FmeServerError {
    fn status(&self) -> StatusCode {
        match self {
            FmeServerError::MissingParameters(_)
            | FmeServerError::InvalidBody(_)
            | FmeServerError::InvalidFeature(_) => StatusCode::BAD_REQUEST,
            FmeServerError::Rejected(err) => match err.category() {
                ErrorCategory::Authentication => StatusCode::UNAUTHORIZED,
                ErrorCategory::Environment => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::BAD_REQUEST,
            },
            FmeServerError::Simulated
            | FmeServerError::DownloadUrl(_)
            | FmeServerError::Archive(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for FmeServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!("FME Server request failed: {}", self);
        } else {
            tracing::warn!("FME Server request rejected: {}", self);
        }

        envelope::failure(status, self.to_string())
    }
}

/// OGC service exception raised by the WMS/WFS endpoint.
#[derive(Debug, Error)]
pub enum OwsError {
    #[error("{0}")]
    Authorization(String),

    #[error("{0}")]
    MissingParameterValue(String),

    #[error("{0}")]
    OperationNotSupported(String),
}

impl OwsError {
    pub fn code(&self) -> &'static str {
        match self {
            OwsError::Authorization(_) => "AuthorizationError",
            OwsError::MissingParameterValue(_) => "MissingParameterValue",
            OwsError::OperationNotSupported(_) => "OperationNotSupported",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            OwsError::Authorization(_) => StatusCode::UNAUTHORIZED,
            OwsError::MissingParameterValue(_) | OwsError::OperationNotSupported(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

impl IntoResponse for OwsError {
    fn into_response(self) -> Response {
        tracing::warn!("Service exception {}: {}", self.code(), self);

        let body = ows::service_exception(self.code(), &self.to_string());

        (
            self.status(),
            [(header::CONTENT_TYPE, ows::XML_MEDIA_TYPE)],
            body,
        )
            .into_response()
    }
}
