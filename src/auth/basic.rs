use base64::{Engine, engine::general_purpose::STANDARD};

use super::AuthError;

const BASIC_PREFIX: &str = "Basic ";

/// Fixed username/password pair checked against `Authorization: Basic` headers.
#[derive(Debug, Clone, Copy)]
pub struct BasicAuth<'a> {
    username: &'a str,
    password: &'a str,
}

impl<'a> BasicAuth<'a> {
    pub fn new(username: &'a str, password: &'a str) -> Self {
        Self { username, password }
    }

    /// Require a matching Basic header.
    pub fn verify(&self, header: Option<&str>) -> Result<(), AuthError> {
        let encoded = header
            .and_then(|value| value.strip_prefix(BASIC_PREFIX))
            .ok_or(AuthError::MissingBasic)?;

        self.check(encoded)
    }

    /// Accept requests without Basic credentials, but reject wrong ones.
    pub fn verify_optional(&self, header: Option<&str>) -> Result<(), AuthError> {
        match header.and_then(|value| value.strip_prefix(BASIC_PREFIX)) {
            Some(encoded) => self.check(encoded),
            None => Ok(()),
        }
    }

    fn check(&self, encoded: &str) -> Result<(), AuthError> {
        let (username, password) = decode(encoded)?;

        if username == self.username && password == self.password {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

fn decode(encoded: &str) -> Result<(String, String), AuthError> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| AuthError::Malformed(e.to_string()))?;

    let decoded = String::from_utf8(bytes).map_err(|e| AuthError::Malformed(e.to_string()))?;

    decoded
        .split_once(':')
        .map(|(username, password)| (username.to_string(), password.to_string()))
        .ok_or_else(|| AuthError::Malformed("credentials are not user:password".to_string()))
}

/// Value of an `Authorization: Basic` header for the given credentials.
pub fn basic_header(username: &str, password: &str) -> String {
    format!(
        "{}{}",
        BASIC_PREFIX,
        STANDARD.encode(format!("{}:{}", username, password))
    )
}
