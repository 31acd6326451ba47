//! QGIS Server WMS/WFS integration tests

use crate::common::TestApp;
use axum::http::StatusCode;

#[tokio::test]
async fn test_get_project_settings() {
    let app = TestApp::qgis();

    let response = app
        .get("/qgis?SERVICE=WMS&REQUEST=GetProjectSettings&MAP=/data/project.qgs")
        .await;

    response
        .assert_status(StatusCode::OK)
        .assert_content_type("application/xml");
    let xml = response.text();
    assert!(xml.contains(r#"<ComposerTemplate name="Atlas" atlasCoverageLayer="parcels""#));
}

#[tokio::test]
async fn test_keys_are_case_insensitive() {
    let app = TestApp::qgis();

    let response = app
        .get("/qgis/projects/test.qgs?service=wms&request=getprojectsettings")
        .await;
    response.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn test_get_feature() {
    let app = TestApp::qgis();

    let response = app
        .post_raw(
            "/qgis?SERVICE=WFS&REQUEST=GetFeature&TYPENAME=lots",
            None,
            "<Filter><Intersects/></Filter>",
        )
        .await;

    response
        .assert_status(StatusCode::OK)
        .assert_content_type("application/xml");
    let xml = response.text();
    for id in [1, 2, 3, 5, 8] {
        assert!(xml.contains(&format!(r#"<lots id="lots.{}">"#, id)), "{}", xml);
    }
    assert!(xml.contains(r#"numberReturned="5""#));
}

#[tokio::test]
async fn test_get_feature_default_layer() {
    let app = TestApp::qgis();

    let response = app.get("/qgis?SERVICE=WFS&REQUEST=GetFeature").await;
    response.assert_status(StatusCode::OK);
    assert!(response.text().contains(r#"<parcels id="parcels.1">"#));
}

#[tokio::test]
async fn test_get_print() {
    let app = TestApp::qgis();

    let response = app
        .get("/qgis?SERVICE=WMS&REQUEST=GetPrint&TEMPLATE=Atlas&ATLAS_PK=1,2,3&FORMAT=pdf")
        .await;

    response
        .assert_status(StatusCode::OK)
        .assert_content_type("application/pdf");
    assert!(response.body.starts_with(b"%PDF"));

    let disposition = response.header("content-disposition").unwrap();
    assert!(disposition.starts_with("attachment; filename=\"Atlas_"));
    assert!(disposition.ends_with(".pdf\""));
}

#[tokio::test]
async fn test_get_print_requires_atlas_pk() {
    let app = TestApp::qgis();

    let response = app.get("/qgis?SERVICE=WMS&REQUEST=GetPrint").await;
    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_content_type("application/xml");
    assert!(response.text().contains(r#"code="MissingParameterValue""#));
    assert!(response.text().contains("ATLAS_PK"));
}

#[tokio::test]
async fn test_service_exceptions() {
    let app = TestApp::qgis();

    let response = app.get("/qgis?SERVICE=WMS&REQUEST=GetMap").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.text().contains(r#"code="OperationNotSupported""#));

    let response = app.get("/qgis?SERVICE=WFS&REQUEST=DescribeFeatureType").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.text().contains(r#"code="OperationNotSupported""#));

    let response = app.get("/qgis?REQUEST=GetPrint").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.text().contains("SERVICE parameter is required"));
}
