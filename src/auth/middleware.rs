use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::{AuthError, BasicAuth, TokenAuth};
use crate::config::Config;
use crate::encoder::envelope::{self, ServerProtocol};
use crate::error::{OwsError, ValidationError};

fn authorization(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
}

fn reject(err: AuthError, protocol: ServerProtocol) -> Response {
    tracing::warn!("Authentication failed: {}", err);
    envelope::encode(ValidationError::from(err).into(), protocol)
}

/// Basic authentication for the V1 data download routes.
pub async fn basic_auth_middleware(
    State(config): State<Arc<Config>>,
    request: Request,
    next: Next,
) -> Response {
    let auth = BasicAuth::new(&config.fme_server.username, &config.fme_server.password);

    match auth.verify(authorization(&request)) {
        Ok(()) => next.run(request).await,
        Err(err) => reject(err, ServerProtocol::V1),
    }
}

/// FME token authentication for the V2 data download routes.
pub async fn token_auth_middleware(
    State(config): State<Arc<Config>>,
    request: Request,
    next: Next,
) -> Response {
    let auth = TokenAuth::new(&config.fme_server.token_prefix);

    match auth.verify(authorization(&request)) {
        Ok(()) => next.run(request).await,
        Err(err) => reject(err, ServerProtocol::V2),
    }
}

/// Optional auth middleware - anonymous requests pass, wrong Basic credentials don't
pub async fn optional_basic_auth_middleware(
    State(config): State<Arc<Config>>,
    request: Request,
    next: Next,
) -> Response {
    let auth = BasicAuth::new(&config.qgis.username, &config.qgis.password);

    match auth.verify_optional(authorization(&request)) {
        Ok(()) => next.run(request).await,
        Err(err) => OwsError::Authorization(err.to_string()).into_response(),
    }
}
