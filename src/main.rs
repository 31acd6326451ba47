use std::env;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use geodoubles::{
    api::{self, Mode},
    config::Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "geodoubles=debug,tower_http=debug,axum::rejection=trace".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Check for QGIS mode
    let args: Vec<String> = env::args().collect();
    let mode = if args.iter().any(|arg| arg == "--qgis" || arg == "-q") {
        Mode::Qgis
    } else {
        Mode::FmeServer
    };

    let config = Config::load()?;
    tracing::debug!("Configuration: {:?}", config);

    match mode {
        Mode::FmeServer => {
            tracing::info!("V1 credentials: {}/****", config.fme_server.username);
            tracing::info!("V2 token prefix: {}", config.fme_server.token_prefix);
        }
        Mode::Qgis => tracing::info!("Credentials: {}/****", config.qgis.username),
    }

    let addr = format!("{}:{}", config.host, mode.port(&config));
    let app = api::router(config, mode);

    tracing::info!("Starting {} on {}", mode.service_name(), addr);
    let listener = TcpListener::bind(&addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
