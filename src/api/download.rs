use axum::{Router, extract::Path, response::Response, routing::get};

use super::common::{attachment, media_type};
use crate::error::FmeServerError;
use crate::services::archive;

/// Serve the archive behind a download URL issued by the data download
/// handlers. Any version/filename pair is accepted.
async fn download(
    Path((version, filename)): Path<(String, String)>,
) -> Result<Response, FmeServerError> {
    tracing::info!("Download request: version {}, file {}", version, filename);

    let bytes = archive::result_zip(&version, &filename)?;
    Ok(attachment(&filename, media_type::ZIP, bytes))
}

pub fn routes() -> Router {
    Router::new().route("/download/{version}/{filename}", get(download))
}
