pub mod basic;
pub mod middleware;
pub mod token;

pub use basic::*;
pub use middleware::*;
pub use token::*;

use thiserror::Error;

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Missing or invalid Authorization header")]
    MissingBasic,

    #[error("Authentication error: {0}")]
    Malformed(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing Authorization header")]
    MissingToken,

    #[error("Invalid token format. Expected: fmetoken token=XXX")]
    TokenFormat,

    #[error("Invalid API token")]
    InvalidToken,
}

impl From<AuthError> for ValidationError {
    fn from(err: AuthError) -> Self {
        ValidationError::Unauthorized(err.to_string())
    }
}
