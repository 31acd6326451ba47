use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use geodoubles::desktop::v1;

fn main() -> ExitCode {
    // stderr carries only the failure line read by the calling application
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "geodoubles=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .init();

    v1::run_os(std::env::args_os().skip(1)).report()
}
