//! Common test utilities and fixtures
//!
//! Routers are driven in-process through `tower::ServiceExt::oneshot`; the
//! desktop binaries are run as child processes against temporary
//! directories.

#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    extract::Request,
    http::{Method, StatusCode, header},
    response::Response,
};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Output};
use std::sync::{Arc, Once};
use tower::ServiceExt;

use geodoubles::{
    api::{self, Mode},
    auth::{basic_header, token_header},
    config::Config,
};

static INIT: Once = Once::new();

/// Initialize test logging
pub fn init_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("geodoubles=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub const CLIENT_GUID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
pub const ORGANISM_GUID: &str = "9b2f1c3e-8a4d-4e6f-a1b2-c3d4e5f60718";
pub const PRODUCT_GUID: &str = "c1d2e3f4-a5b6-4c7d-8e9f-0a1b2c3d4e5f";
pub const PERIMETER: &str = "POLYGON((6.5 46.5,6.6 46.5,6.6 46.6,6.5 46.6,6.5 46.5))";

// ============================================================================
// Test Application
// ============================================================================

/// An in-process HTTP double
pub struct TestApp {
    pub router: Router,
    pub config: Arc<Config>,
}

impl TestApp {
    /// FME Server double with default credentials
    pub fn fme_server() -> Self {
        Self::new(Mode::FmeServer)
    }

    /// QGIS Server double with default credentials
    pub fn qgis() -> Self {
        Self::new(Mode::Qgis)
    }

    fn new(mode: Mode) -> Self {
        init_logging();

        let config = Arc::new(Config::default());
        let router = api::router(config.clone(), mode);

        Self { router, config }
    }

    /// Basic header for the configured FME Server user
    pub fn fme_basic(&self) -> String {
        basic_header(&self.config.fme_server.username, &self.config.fme_server.password)
    }

    /// Basic header for the configured QGIS user
    pub fn qgis_basic(&self) -> String {
        basic_header(&self.config.qgis.username, &self.config.qgis.password)
    }

    /// Make a GET request without credentials
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None, Body::empty()).await
    }

    /// Make a GET request with an Authorization header
    pub async fn get_with_auth(&self, uri: &str, authorization: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(authorization), Body::empty())
            .await
    }

    /// Make a POST request with a JSON body and an FME token
    pub async fn post_json_with_token(
        &self,
        uri: &str,
        token: &str,
        body: &impl serde::Serialize,
    ) -> TestResponse {
        let body = serde_json::to_string(body).expect("Failed to serialize body");
        self.post_raw(uri, Some(&token_header(token)), body).await
    }

    /// Make a POST request with a raw body
    pub async fn post_raw(
        &self,
        uri: &str,
        authorization: Option<&str>,
        body: impl Into<Body>,
    ) -> TestResponse {
        self.request(Method::POST, uri, authorization, body.into())
            .await
    }

    async fn request(
        &self,
        method: Method,
        uri: &str,
        authorization: Option<&str>,
        body: Body,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }

        let request = builder.body(body).expect("Failed to build request");

        self.send(request).await
    }

    /// Send a request to the router
    async fn send(&self, request: Request) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        TestResponse::from_response(response).await
    }
}

// ============================================================================
// Test Response
// ============================================================================

/// A test response with convenient methods for assertions
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    async fn from_response(response: Response) -> Self {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes()
            .to_vec();

        Self {
            status,
            headers,
            body,
        }
    }

    /// Get the response body as a string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Parse the response body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON")
    }

    /// Get a header value
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
    }

    /// `serviceResponse.statusInfo.status` of an FME envelope
    pub fn envelope_status(&self) -> String {
        let body: serde_json::Value = self.json();
        body["serviceResponse"]["statusInfo"]["status"]
            .as_str()
            .unwrap_or_default()
            .to_string()
    }

    /// `serviceResponse.statusInfo.message` of an FME envelope
    pub fn envelope_message(&self) -> String {
        let body: serde_json::Value = self.json();
        body["serviceResponse"]["statusInfo"]["message"]
            .as_str()
            .unwrap_or_default()
            .to_string()
    }

    /// Assert the status code
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status, expected,
            "Expected status {}, got {}. Body: {}",
            expected,
            self.status,
            self.text()
        );
        self
    }

    /// Assert content type header
    pub fn assert_content_type(&self, expected: &str) -> &Self {
        let content_type = self.header("content-type").unwrap_or_default();
        assert!(
            content_type.starts_with(expected),
            "Expected content type starting with {}, got {}",
            expected,
            content_type
        );
        self
    }
}

// ============================================================================
// Desktop binaries
// ============================================================================

/// Result of running a desktop double
pub struct DesktopRun {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl From<Output> for DesktopRun {
    fn from(output: Output) -> Self {
        Self {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

/// Run a desktop binary with the given arguments
pub fn run_desktop(binary: &str, args: &[&str]) -> DesktopRun {
    run_desktop_os(binary, args.iter().map(OsString::from))
}

/// Run a desktop binary with raw, possibly non-UTF-8 arguments
pub fn run_desktop_os<I>(binary: &str, args: I) -> DesktopRun
where
    I: IntoIterator<Item = OsString>,
{
    Command::new(binary)
        .args(args)
        .env("RUST_LOG", "geodoubles=debug")
        .output()
        .expect("Failed to run desktop binary")
        .into()
}

// ============================================================================
// Test Fixtures
// ============================================================================

/// Complete legacy flag list for FME Desktop V1
pub fn desktop_v1_args(folder_out: &Path) -> Vec<String> {
    [
        "--FolderOut",
        folder_out.to_str().expect("utf-8 path"),
        "--Perimeter",
        PERIMETER,
        "--Product",
        PRODUCT_GUID,
        "--OrderLabel",
        "ORDER-001",
        "--Client",
        CLIENT_GUID,
        "--Organism",
        ORGANISM_GUID,
        "--Request",
        "42",
        "--Parameters",
        r#"{"FORMAT":"DXF","PROJECTION":"SWITZERLAND95"}"#,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// GeoJSON Feature as written to a parameters file or posted to FME Server V2
pub fn order_feature(folder_out: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "Feature",
        "geometry": {
            "type": "Polygon",
            "coordinates": [[[6.5, 46.5], [6.6, 46.5], [6.6, 46.6], [6.5, 46.6], [6.5, 46.5]]]
        },
        "properties": {
            "FolderOut": folder_out,
            "OrderGuid": "f0e1d2c3-b4a5-4968-8776-655443322110",
            "OrderLabel": "ORDER-001",
            "Client": CLIENT_GUID,
            "ClientName": "Test Client",
            "Organism": ORGANISM_GUID,
            "OrganismName": "Test Organism",
            "Product": PRODUCT_GUID,
            "ProductLabel": "Cadastral plan",
            "Parameters": {"FORMAT": "DXF", "PROJECTION": "SWITZERLAND95"}
        }
    })
}
