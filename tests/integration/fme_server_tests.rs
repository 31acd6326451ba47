//! FME Server data download integration tests

use crate::common::{PERIMETER, PRODUCT_GUID, TestApp, order_feature};
use axum::http::StatusCode;
use std::io::{Cursor, Read};

fn v1_query(path: &str) -> String {
    format!(
        "{}?opt_responseformat=json&Product={}&FolderOut=%2Ftmp%2Fout&Perimeter={}&OrderLabel=ORDER-001",
        path,
        PRODUCT_GUID,
        PERIMETER.replace(' ', "%20").replace(',', "%2C")
    )
}

#[tokio::test]
async fn test_v1_success_returns_download_url() {
    let app = TestApp::fme_server();

    let response = app
        .get_with_auth(&v1_query("/fmeserver/v1/datadownload"), &app.fme_basic())
        .await;

    response
        .assert_status(StatusCode::OK)
        .assert_content_type("application/json");
    assert_eq!(response.envelope_status(), "success");

    let body: serde_json::Value = response.json();
    let url = body["serviceResponse"]["url"].as_str().unwrap();
    assert!(url.starts_with("http://localhost:8888/download/v1/"));
    assert!(url.ends_with(".zip"));
}

#[tokio::test]
async fn test_v1_repository_route() {
    let app = TestApp::fme_server();

    let response = app
        .get_with_auth(
            &v1_query("/fmedatadownload/Repositories/Extract/order.fmw"),
            &app.fme_basic(),
        )
        .await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.envelope_status(), "success");
}

#[tokio::test]
async fn test_v1_missing_parameters() {
    let app = TestApp::fme_server();

    let response = app
        .get_with_auth("/fmeserver/v1/datadownload?OrderLabel=x", &app.fme_basic())
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.envelope_status(), "failure");
    assert_eq!(
        response.envelope_message(),
        "Missing required parameters: Product, FolderOut"
    );

    // Empty values count as missing
    let response = app
        .get_with_auth(
            "/fmeserver/v1/datadownload?Product=&FolderOut=/tmp",
            &app.fme_basic(),
        )
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.envelope_message(),
        "Missing required parameters: Product"
    );
}

#[tokio::test]
async fn test_v1_simulated_failure() {
    let app = TestApp::fme_server();

    let response = app
        .get_with_auth(
            &v1_query("/fmedatadownload/Repositories/Extract/order_fails.fmw"),
            &app.fme_basic(),
        )
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.envelope_status(), "failure");
    assert!(!response.envelope_message().is_empty());
}

#[tokio::test]
async fn test_v2_success_returns_download_url() {
    let app = TestApp::fme_server();

    let response = app
        .post_json_with_token(
            "/fmeserver/v2/datadownload?opt_responseformat=json&opt_servicemode=sync",
            "valid_token_123",
            &order_feature("/tmp/out"),
        )
        .await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["serviceResponse"]["statusInfo"]["status"], "success");
    assert!(
        body["serviceResponse"]["url"]
            .as_str()
            .unwrap()
            .contains("/download/v2/")
    );
}

#[tokio::test]
async fn test_v2_service_route_and_null_geometry() {
    let app = TestApp::fme_server();
    let mut feature = order_feature("/tmp/out");
    feature["geometry"] = serde_json::Value::Null;

    let response = app
        .post_json_with_token(
            "/fmedatadownload/v2/Extract/order.fmw",
            "valid_abc",
            &feature,
        )
        .await;
    response.assert_status(StatusCode::OK);

    let response = app
        .post_json_with_token(
            "/fmedatadownload/v2/Extract/order_fails.fmw",
            "valid_abc",
            &feature,
        )
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_v2_invalid_bodies() {
    let app = TestApp::fme_server();
    let auth = geodoubles::auth::token_header("valid_token");

    let response = app
        .post_raw("/fmeserver/v2/datadownload", Some(&auth), "{not json")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.envelope_message().starts_with("Invalid JSON body:"));

    let response = app
        .post_raw(
            "/fmeserver/v2/datadownload",
            Some(&auth),
            r#"{"type": "FeatureCollection"}"#,
        )
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.envelope_message(), "Type is not 'Feature'");

    let mut feature = order_feature("/tmp/out");
    feature["properties"]
        .as_object_mut()
        .unwrap()
        .remove("FolderOut");
    let response = app
        .post_json_with_token("/fmeserver/v2/datadownload", "valid_token", &feature)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.envelope_message(),
        "Missing 'FolderOut' in properties"
    );
}

#[tokio::test]
async fn test_concurrent_requests_are_independent() {
    let app = TestApp::fme_server();
    let basic = app.fme_basic();

    let succeeding = v1_query("/fmedatadownload/Repositories/Extract/order.fmw");
    let failing = v1_query("/fmedatadownload/Repositories/Extract/order_fails.fmw");
    let feature = order_feature("/tmp/out");

    let (v1_ok, v1_failed, v2_ok, v2_failed) = tokio::join!(
        app.get_with_auth(&succeeding, &basic),
        app.get_with_auth(&failing, &basic),
        app.post_json_with_token("/fmedatadownload/v2/Extract/order.fmw", "valid_token", &feature),
        app.post_json_with_token(
            "/fmedatadownload/v2/Extract/order_fails.fmw",
            "valid_token",
            &feature
        ),
    );

    v1_ok.assert_status(StatusCode::OK);
    v2_ok.assert_status(StatusCode::OK);
    v1_failed.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    v2_failed.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(v1_ok.envelope_status(), "success");
    assert_eq!(v2_failed.envelope_status(), "failure");
}

#[tokio::test]
async fn test_error_endpoint() {
    let app = TestApp::fme_server();

    let response = app.get("/fmeserver/error/test").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.envelope_message(), "Simulated FME Server error");

    let response = app.post_raw("/fmeserver/error/test", None, "").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_download_serves_zip() {
    let app = TestApp::fme_server();

    let response = app.get("/download/v1/20240101_120000.zip").await;
    response
        .assert_status(StatusCode::OK)
        .assert_content_type("application/zip");
    assert_eq!(
        response.header("content-disposition").as_deref(),
        Some("attachment; filename=\"20240101_120000.zip\"")
    );

    let mut archive = zip::ZipArchive::new(Cursor::new(response.body.clone())).unwrap();
    let mut content = String::new();
    archive
        .by_name("result.txt")
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    assert!(content.contains("Version: v1"));
    assert!(archive.by_name("metadata.json").is_ok());
}
