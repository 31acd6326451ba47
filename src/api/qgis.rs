use axum::{
    Extension, Router,
    extract::{Path, Query},
    http::{Method, header},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use bytes::Bytes;
use indexmap::IndexMap;
use std::sync::Arc;

use super::common::{attachment, file_stamp, media_type};
use crate::auth::optional_basic_auth_middleware;
use crate::config::Config;
use crate::encoder::ows::{self, FeatureFootprint};
use crate::error::OwsError;
use crate::services::archive;
use crate::validation::truncate;

const DEFAULT_PROJECT: &str = "/data/test_project.qgs";

/// Feature ids returned for every `GetFeature` request.
const FEATURE_IDS: [u32; 5] = [1, 2, 3, 5, 8];
const FOOTPRINT_ORIGIN: (f64, f64) = (2_500_000.0, 1_200_000.0);
const FOOTPRINT_SIZE: f64 = 100.0;

/// OWS key/value parameters. Keys are matched case-insensitively.
#[derive(Debug, Default)]
struct OwsParams(IndexMap<String, String>);

impl OwsParams {
    fn new(pairs: Vec<(String, String)>) -> Self {
        let mut values = IndexMap::new();
        for (key, value) in pairs {
            values.entry(key.to_ascii_uppercase()).or_insert(value);
        }
        Self(values)
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }
}

async fn qgis_root(
    Extension(config): Extension<Arc<Config>>,
    method: Method,
    Query(query): Query<Vec<(String, String)>>,
    body: Bytes,
) -> Result<Response, OwsError> {
    dispatch(&config, &method, None, OwsParams::new(query), &body)
}

async fn qgis_project(
    Extension(config): Extension<Arc<Config>>,
    method: Method,
    Path(project): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
    body: Bytes,
) -> Result<Response, OwsError> {
    dispatch(&config, &method, Some(project), OwsParams::new(query), &body)
}

fn dispatch(
    config: &Config,
    method: &Method,
    project: Option<String>,
    params: OwsParams,
    body: &[u8],
) -> Result<Response, OwsError> {
    let service = params.get_or("SERVICE", "").to_ascii_uppercase();
    let request = params.get_or("REQUEST", "").to_ascii_uppercase();
    let map = params
        .get("MAP")
        .map(str::to_string)
        .or(project)
        .unwrap_or_else(|| DEFAULT_PROJECT.to_string());

    tracing::info!(
        "QGIS Server {} request: service {}, request {}, map {}",
        method,
        service,
        request,
        map
    );

    match (service.as_str(), request.as_str()) {
        ("WMS", "GETPROJECTSETTINGS") => Ok(get_project_settings(config)),
        ("WMS", "GETPRINT") => get_print(config, &params),
        ("WFS", "GETFEATURE") => Ok(get_feature(config, &params, body)),
        ("WMS", _) | ("WFS", _) => Err(OwsError::OperationNotSupported(format!(
            "Request type '{}' not supported",
            request
        ))),
        _ => Err(OwsError::MissingParameterValue(
            "SERVICE parameter is required".to_string(),
        )),
    }
}

fn xml(body: String) -> Response {
    ([(header::CONTENT_TYPE, media_type::XML)], body).into_response()
}

fn get_project_settings(config: &Config) -> Response {
    tracing::info!("Handling GetProjectSettings");
    xml(ows::project_settings(
        &config.qgis.template_name,
        &config.qgis.coverage_layer,
    ))
}

/// Fixed set of square features laid out on a diagonal.
pub fn footprints() -> Vec<FeatureFootprint> {
    FEATURE_IDS
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let offset = i as f64 * FOOTPRINT_SIZE;
            FeatureFootprint {
                id: *id,
                min_x: FOOTPRINT_ORIGIN.0 + offset,
                min_y: FOOTPRINT_ORIGIN.1 + offset,
                size: FOOTPRINT_SIZE,
            }
        })
        .collect()
}

fn get_feature(config: &Config, params: &OwsParams, body: &[u8]) -> Response {
    let layer = params.get_or("TYPENAME", &config.qgis.coverage_layer);
    tracing::info!("Handling GetFeature for {}", layer);

    // The spatial filter is logged but not evaluated
    if !body.is_empty() {
        let filter = String::from_utf8_lossy(body);
        tracing::debug!("Filter: {}", truncate(&filter, 500));
    }

    let features = footprints();
    tracing::info!("Returning {} features", features.len());
    xml(ows::feature_collection(layer, &features))
}

fn get_print(config: &Config, params: &OwsParams) -> Result<Response, OwsError> {
    let template = params.get_or("TEMPLATE", &config.qgis.template_name);
    let atlas_pk = params.get_or("ATLAS_PK", "");

    tracing::info!(
        "Handling GetPrint: template {}, ATLAS_PK {}, CRS {}, layers {}, format {}",
        template,
        atlas_pk,
        params.get_or("CRS", "EPSG:2056"),
        params.get_or("LAYERS", ""),
        params.get_or("FORMAT", "pdf").to_ascii_lowercase()
    );

    if atlas_pk.is_empty() {
        return Err(OwsError::MissingParameterValue(
            "ATLAS_PK parameter is required for Atlas printing".to_string(),
        ));
    }

    let filename = format!("{}_{}.pdf", template, file_stamp());
    Ok(attachment(&filename, media_type::PDF, archive::print_pdf()))
}

/// WMS/WFS routes used by the atlas print workflow.
pub fn routes(config: Arc<Config>) -> Router {
    Router::new()
        .route("/qgis", get(qgis_root).post(qgis_root))
        .route("/qgis/{*project}", get(qgis_project).post(qgis_project))
        .route_layer(middleware::from_fn_with_state(
            config,
            optional_basic_auth_middleware,
        ))
}
