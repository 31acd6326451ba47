use axum::{Json, Router, routing::get};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub service: &'static str,
}

pub fn routes(service: &'static str) -> Router {
    Router::new().route(
        "/health",
        get(move || async move {
            Json(Health {
                status: "healthy",
                service,
            })
        }),
    )
}
