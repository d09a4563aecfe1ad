//! BoilerAI echo server entry point.
//!
//! Initializes tracing, loads configuration, acquires the API key from the
//! environment or an interactive prompt, then serves the echo API until
//! interrupted.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use boilerai_server::config::{AppConfig, DEFAULT_LOG_FILTER};
use boilerai_server::credentials::{
    CredentialProvider, EnvCredentialProvider, PromptCredentialProvider,
};
use boilerai_server::http::start_server;
use boilerai_server::{create_router, AppState, Session};

/// BoilerAI echo server: a local backend for frontend testing
#[derive(Parser, Debug)]
#[command(name = "boilerai-server", version, about)]
struct Args {
    /// Path to configuration file (defaults apply when absent)
    #[arg(short, long)]
    config: Option<String>,

    /// Log level filter (e.g., "boilerai_server=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = AppConfig::resolve(args.config.as_deref())?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&log_filter));
    if config.logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!(
        provider = %config.provider.display_name,
        mode = "echo",
        "Starting BoilerAI server"
    );

    // Acquire the API key before the listener starts; the environment wins over the prompt
    let mut session = Session::new(config.provider.name.clone());
    let mut providers: Vec<Box<dyn CredentialProvider>> = vec![
        Box::new(EnvCredentialProvider::new(config.provider.key_env.clone())),
        Box::new(PromptCredentialProvider::stdio(config.provider.clone())),
    ];
    if let Err(e) = session.setup_key(&mut providers) {
        tracing::error!(error = %e, "Failed to set up API key");
        return Err(e.into());
    }

    let state = AppState::new(session);
    let app = create_router(state);

    tracing::info!(
        addr = %config.http.bind_address(),
        "Ready to echo messages from the frontend, press Ctrl+C to stop"
    );

    start_server(app, &config).await?;

    Ok(())
}
