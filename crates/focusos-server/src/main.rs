use anyhow::Context;
use focusos_core::Config;
use focusos_server::{run_server, state::AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load_or_default();
    let bind = std::env::var("FOCUSOS_BIND").unwrap_or_else(|_| config.server.bind.clone());
    let state = AppState::from_env(&config.mail).context("invalid mail configuration")?;

    run_server(state, &bind).await
}
