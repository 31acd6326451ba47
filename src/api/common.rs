use axum::{
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use indexmap::IndexMap;

/// Standard media types
pub mod media_type {
    pub const XML: &str = "application/xml";
    pub const ZIP: &str = "application/zip";
    pub const PDF: &str = "application/pdf";
}

/// Local time stamp used in generated file names, e.g. `20240131_154500`.
pub fn file_stamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Binary download with a `Content-Disposition: attachment` header.
pub fn attachment(filename: &str, media_type: &'static str, body: Bytes) -> Response {
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(media_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response()
}

/// Query pairs in request order. Only the first occurrence of a key is kept.
pub fn first_values(pairs: Vec<(String, String)>) -> IndexMap<String, String> {
    let mut values = IndexMap::new();
    for (key, value) in pairs {
        values.entry(key).or_insert(value);
    }
    values
}

/// `Host` header of the request, if it is readable.
pub fn host(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::HOST).and_then(|h| h.to_str().ok())
}
