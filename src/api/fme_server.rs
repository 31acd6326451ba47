use axum::{
    Extension, Router,
    extract::{Path, Query},
    http::HeaderMap,
    middleware,
    response::Response,
    routing::{get, post},
};
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

use super::common::{file_stamp, first_values, host};
use crate::auth::{basic_auth_middleware, token_auth_middleware};
use crate::config::Config;
use crate::encoder::envelope::{self, ServerProtocol};
use crate::error::FmeServerError;
use crate::services::{OutcomeSimulator, Workspace};
use crate::validation::{
    LOG_VALUE_LIMIT, RequestParser, SERVER_V1_LOGGED, SERVER_V1_QUERY, SERVER_V2_LOGGED,
    SERVER_V2_PROPERTIES, property_text, truncate, validate_feature,
};

static SIMULATOR: OutcomeSimulator = OutcomeSimulator::new("FME Server Mock", "result.zip");

const NOT_AVAILABLE: &str = "N/A";

/// Download URL handed back for a successful job, rooted at the request's
/// `Host` when present and at the configured base URL otherwise.
pub fn download_url(
    config: &Config,
    headers: &HeaderMap,
    version: &str,
) -> Result<String, FmeServerError> {
    let root = match host(headers) {
        Some(host) => format!("http://{}/", host),
        None => format!("{}/", config.base_url.trim_end_matches('/')),
    };

    let url = Url::parse(&root)?.join(&format!("download/{}/{}.zip", version, file_stamp()))?;
    Ok(url.to_string())
}

async fn v1_datadownload(
    Extension(config): Extension<Arc<Config>>,
    headers: HeaderMap,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<Response, FmeServerError> {
    handle_v1(&config, &headers, Workspace::new(""), query)
}

async fn v1_repository(
    Extension(config): Extension<Arc<Config>>,
    Path(workspace): Path<String>,
    headers: HeaderMap,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<Response, FmeServerError> {
    handle_v1(&config, &headers, Workspace::new(workspace), query)
}

fn handle_v1(
    config: &Config,
    headers: &HeaderMap,
    workspace: Workspace,
    query: Vec<(String, String)>,
) -> Result<Response, FmeServerError> {
    tracing::info!("FME Server V1 request for workspace '{}'", workspace.as_str());

    // Empty values count as missing
    let mut entries = first_values(query);
    entries.retain(|_, value| !value.is_empty());

    let request = RequestParser::new(&SERVER_V1_QUERY).parse_mapping(&entries)?;
    tracing::debug!("Accepted {} required parameters", request.len());

    tracing::info!("Received parameters:");
    for name in SERVER_V1_LOGGED {
        let value = entries.get(*name).map(String::as_str).unwrap_or(NOT_AVAILABLE);
        tracing::info!("  {}: {}", name, truncate(value, LOG_VALUE_LIMIT));
    }

    let url = download_url(config, headers, "v1")?;
    let outcome = SIMULATOR.publish(&workspace, url);

    Ok(envelope::encode(outcome, ServerProtocol::V1))
}

async fn v2_datadownload(
    Extension(config): Extension<Arc<Config>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Result<Response, FmeServerError> {
    handle_v2(&config, &headers, Workspace::new(""), &query, &body)
}

async fn v2_service(
    Extension(config): Extension<Arc<Config>>,
    Path(workspace): Path<String>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Result<Response, FmeServerError> {
    handle_v2(&config, &headers, Workspace::new(workspace), &query, &body)
}

fn handle_v2(
    config: &Config,
    headers: &HeaderMap,
    workspace: Workspace,
    query: &HashMap<String, String>,
    body: &[u8],
) -> Result<Response, FmeServerError> {
    tracing::info!("FME Server V2 request for workspace '{}'", workspace.as_str());

    if query.get("opt_responseformat").map(String::as_str) != Some("json") {
        tracing::warn!("opt_responseformat is not 'json'");
    }

    let document: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| FmeServerError::InvalidBody(e.to_string()))?;

    let feature = validate_feature(&document, &SERVER_V2_PROPERTIES.required_names())?;
    RequestParser::new(&SERVER_V2_PROPERTIES).parse_mapping(&feature.property_entries())?;

    match feature.geometry_kind() {
        Some(kind) => tracing::info!("Geometry type: {}", kind),
        None => tracing::info!("Geometry: null"),
    }

    tracing::info!("Properties:");
    for name in SERVER_V2_LOGGED {
        let value = feature
            .properties
            .get(*name)
            .map(property_text)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        tracing::info!("  {}: {}", name, truncate(&value, LOG_VALUE_LIMIT));
    }

    for name in feature.properties.keys() {
        if !SERVER_V2_LOGGED.contains(&name.as_str()) {
            tracing::debug!("Ignoring legacy property {}", name);
        }
    }

    let url = download_url(config, headers, "v2")?;
    let outcome = SIMULATOR.publish(&workspace, url);

    Ok(envelope::encode(outcome, ServerProtocol::V2))
}

async fn error_test() -> FmeServerError {
    FmeServerError::Simulated
}

/// Data download routes: V1 takes a query string behind Basic auth, V2 a
/// GeoJSON Feature body behind an FME token.
pub fn routes(config: Arc<Config>) -> Router {
    let v1 = Router::new()
        .route("/fmeserver/v1/datadownload", get(v1_datadownload))
        .route(
            "/fmedatadownload/Repositories/{*workspace}",
            get(v1_repository),
        )
        .route_layer(middleware::from_fn_with_state(
            config.clone(),
            basic_auth_middleware,
        ));

    let v2 = Router::new()
        .route("/fmeserver/v2/datadownload", post(v2_datadownload))
        .route("/fmedatadownload/v2/{*workspace}", post(v2_service))
        .route_layer(middleware::from_fn_with_state(
            config,
            token_auth_middleware,
        ));

    Router::new()
        .merge(v1)
        .merge(v2)
        .route("/fmeserver/error/test", get(error_test).post(error_test))
}
