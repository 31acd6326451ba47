//! Authentication integration tests
//!
//! Tests the Basic, FME token and optional Basic checks in front of the
//! HTTP doubles.

use crate::common::{TestApp, order_feature};
use axum::http::StatusCode;
use geodoubles::auth::basic_header;

const V1_QUERY: &str = "/fmeserver/v1/datadownload?Product=abc&FolderOut=/tmp/out";

/// Health endpoints never require credentials
#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::fme_server();
    let response = app.get("/health").await;
    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "FME Server Mock");

    let app = TestApp::qgis();
    let body: serde_json::Value = app.get("/health").await.json();
    assert_eq!(body["service"], "QGIS Server Mock");
}

/// V1 rejects missing credentials with a challenge
#[tokio::test]
async fn test_v1_requires_basic_auth() {
    let app = TestApp::fme_server();

    let response = app.get(V1_QUERY).await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.envelope_status(), "failure");
    assert_eq!(
        response.envelope_message(),
        "Missing or invalid Authorization header"
    );
    assert_eq!(
        response.header("www-authenticate").as_deref(),
        Some("Basic realm=\"FME Server\"")
    );
}

/// V1 rejects wrong credentials
#[tokio::test]
async fn test_v1_wrong_credentials() {
    let app = TestApp::fme_server();

    let response = app
        .get_with_auth(V1_QUERY, &basic_header("testuser", "wrong"))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.envelope_message(), "Invalid credentials");
}

/// V1 reports malformed Basic payloads
#[tokio::test]
async fn test_v1_malformed_credentials() {
    let app = TestApp::fme_server();

    let response = app.get_with_auth(V1_QUERY, "Basic %%%").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert!(
        response
            .envelope_message()
            .starts_with("Authentication error:")
    );
}

/// V2 rejects tokens without the valid prefix
#[tokio::test]
async fn test_v2_wrong_token() {
    let app = TestApp::fme_server();

    let response = app
        .post_json_with_token(
            "/fmeserver/v2/datadownload?opt_responseformat=json",
            "invalid_token",
            &order_feature("/tmp/out"),
        )
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.envelope_status(), "failure");
    assert_eq!(response.envelope_message(), "Invalid API token");
    assert!(response.header("www-authenticate").is_none());
}

/// V2 requires the fmetoken scheme
#[tokio::test]
async fn test_v2_token_format() {
    let app = TestApp::fme_server();

    let response = app
        .post_raw("/fmeserver/v2/datadownload", Some("Bearer valid_token"), "{}")
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.envelope_message(),
        "Invalid token format. Expected: fmetoken token=XXX"
    );

    let response = app.post_raw("/fmeserver/v2/datadownload", None, "{}").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.envelope_message(), "Missing Authorization header");
}

/// QGIS accepts anonymous and correct Basic credentials, rejects wrong ones
#[tokio::test]
async fn test_qgis_optional_auth() {
    let app = TestApp::qgis();
    let uri = "/qgis?SERVICE=WMS&REQUEST=GetProjectSettings";

    app.get(uri).await.assert_status(StatusCode::OK);
    app.get_with_auth(uri, &app.qgis_basic())
        .await
        .assert_status(StatusCode::OK);
    app.get_with_auth(uri, "Bearer whatever")
        .await
        .assert_status(StatusCode::OK);

    let response = app
        .get_with_auth(uri, &basic_header("qgisuser", "wrong"))
        .await;
    response
        .assert_status(StatusCode::UNAUTHORIZED)
        .assert_content_type("application/xml");
    assert!(response.text().contains(r#"code="AuthorizationError""#));
    assert!(response.text().contains("Invalid credentials"));
}
