use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use super::exit::SIMULATED_FAILURE_MESSAGE;
use crate::error::ErrorCategory;
use crate::services::Outcome;

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_FAILURE: &str = "failure";

/// Challenge sent with Basic authentication failures.
pub const BASIC_CHALLENGE: &str = "Basic realm=\"FME Server\"";

/// FME Server data download response body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope {
    #[serde(rename = "serviceResponse")]
    pub service_response: ServiceResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceResponse {
    #[serde(rename = "statusInfo")]
    pub status_info: StatusInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusInfo {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Envelope {
    pub fn success(url: Option<String>) -> Self {
        Self {
            service_response: ServiceResponse {
                status_info: StatusInfo {
                    status: STATUS_SUCCESS.to_string(),
                    message: None,
                },
                url,
            },
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            service_response: ServiceResponse {
                status_info: StatusInfo {
                    status: STATUS_FAILURE.to_string(),
                    message: Some(message.into()),
                },
                url: None,
            },
        }
    }
}

/// FME Server protocol generation a request came in through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerProtocol {
    /// GET with Basic authentication.
    V1,
    /// POST with an FME token.
    V2,
}

impl ServerProtocol {
    fn challenge(&self) -> Option<&'static str> {
        match self {
            ServerProtocol::V1 => Some(BASIC_CHALLENGE),
            ServerProtocol::V2 => None,
        }
    }
}

/// Failure envelope with the given status.
pub fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(Envelope::failure(message))).into_response()
}

pub fn encode(outcome: Outcome, protocol: ServerProtocol) -> Response {
    match outcome {
        Outcome::Success(artifact) => {
            let url = artifact.map(|artifact| artifact.reference());
            (StatusCode::OK, Json(Envelope::success(url))).into_response()
        }
        Outcome::SimulatedFailure => {
            failure(StatusCode::INTERNAL_SERVER_ERROR, SIMULATED_FAILURE_MESSAGE)
        }
        Outcome::ValidationFailure(err) => {
            let category = err.category();
            let status = match category {
                ErrorCategory::Authentication => StatusCode::UNAUTHORIZED,
                ErrorCategory::Environment => StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCategory::Structural
                | ErrorCategory::Presence
                | ErrorCategory::Duplicate
                | ErrorCategory::Type => StatusCode::BAD_REQUEST,
            };

            let mut response = failure(status, err.to_string());

            if category == ErrorCategory::Authentication {
                if let Some(challenge) = protocol.challenge() {
                    response.headers_mut().insert(
                        header::WWW_AUTHENTICATE,
                        HeaderValue::from_static(challenge),
                    );
                }
            }

            response
        }
    }
}
