use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use transit_server::cache::CachedRouteFetcher;
use transit_server::config::{AppConfig, ConfigError};
use transit_server::fetcher::TimeoutFetcher;
use transit_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("transit_server=info,tower_http=info")),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Server failed");
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

async fn run() -> Result<(), StartupError> {
    let config = AppConfig::from_env()?;

    // Backend, then timeout, then cache
    let backend = config.backend.build()?;
    info!(backend = backend.name(), "Route backend ready");
    let fetcher = CachedRouteFetcher::new(
        TimeoutFetcher::new(backend, config.fetch_timeout),
        &config.cache,
    );

    let state = AppState::new(fetcher, config.session_idle, config.map_provider);
    let app = create_router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!(addr = %config.bind, map = %config.map_provider, "Transit route finder listening");
    info!("Open http://{} in your browser for the web interface", config.bind);

    axum::serve(listener, app).await?;
    Ok(())
}
