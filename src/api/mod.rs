pub mod common;
pub mod download;
pub mod fme_server;
pub mod health;
pub mod qgis;

pub use common::*;

use axum::{Extension, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;

/// Which external service the HTTP server stands in for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    FmeServer,
    Qgis,
}

impl Mode {
    pub fn service_name(&self) -> &'static str {
        match self {
            Mode::FmeServer => "FME Server Mock",
            Mode::Qgis => "QGIS Server Mock",
        }
    }

    pub fn port(&self, config: &Config) -> u16 {
        match self {
            Mode::FmeServer => config.fme_server.port,
            Mode::Qgis => config.qgis.port,
        }
    }
}

pub fn router(config: Arc<Config>, mode: Mode) -> Router {
    let routes = match mode {
        Mode::FmeServer => Router::new()
            .merge(fme_server::routes(config.clone()))
            .merge(download::routes()),
        Mode::Qgis => qgis::routes(config.clone()),
    };

    routes
        .merge(health::routes(mode.service_name()))
        .layer(Extension(config))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
