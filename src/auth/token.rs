use super::AuthError;

const TOKEN_PREFIX: &str = "fmetoken token=";

/// Accepts `Authorization: fmetoken token=<value>` when the value starts
/// with the configured prefix.
#[derive(Debug, Clone, Copy)]
pub struct TokenAuth<'a> {
    valid_prefix: &'a str,
}

impl<'a> TokenAuth<'a> {
    pub fn new(valid_prefix: &'a str) -> Self {
        Self { valid_prefix }
    }

    pub fn verify(&self, header: Option<&str>) -> Result<(), AuthError> {
        let header = header.ok_or(AuthError::MissingToken)?;
        let token = header
            .strip_prefix(TOKEN_PREFIX)
            .ok_or(AuthError::TokenFormat)?;

        if token.starts_with(self.valid_prefix) {
            Ok(())
        } else {
            Err(AuthError::InvalidToken)
        }
    }
}

/// Value of an FME token `Authorization` header.
pub fn token_header(token: &str) -> String {
    format!("{}{}", TOKEN_PREFIX, token)
}
