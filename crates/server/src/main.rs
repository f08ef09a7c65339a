use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use booksearch_core::{
    load_config_or_default, open_history_store, validate_config, BookCatalog, CombinedCatalog,
    Config, HistoryStore, SearchSession, TerminalPrompter,
};
use booksearch_server::api::create_router;
use booksearch_server::cli::{Cli, Command};
use booksearch_server::commands;
use booksearch_server::state::AppState;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.command.default_log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Load configuration
    let config =
        load_config_or_default(cli.config.as_deref()).with_context(|| match &cli.config {
            Some(path) => format!("Failed to load config from {:?}", path),
            None => "Failed to load config".to_string(),
        })?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    let catalog: Arc<dyn BookCatalog> = Arc::new(
        CombinedCatalog::from_config(&config.catalog)
            .context("Failed to create catalog clients")?,
    );

    let history =
        Arc::new(open_history_store(&config.history).context("Failed to open history store")?);

    match cli.command {
        Command::Search { keyword } => {
            let session = SearchSession::new(catalog, history, config.catalog.default_limit);
            commands::search(
                &session,
                &keyword,
                &mut TerminalPrompter::stdio(),
                &mut io::stdout(),
            )
            .await
        }
        Command::History { kind } => {
            let session = SearchSession::new(catalog, history, config.catalog.default_limit);
            commands::history(
                &session,
                kind.map(Into::into),
                &mut TerminalPrompter::stdio(),
                &mut io::stdout(),
            )
            .await
        }
        Command::Serve => serve(config, catalog, history).await,
    }
}

async fn serve(
    config: Config,
    catalog: Arc<dyn BookCatalog>,
    history: Arc<HistoryStore>,
) -> Result<()> {
    info!("Catalog sources: {:?}", config.catalog.sources);
    let addr = SocketAddr::new(config.server.host, config.server.port);

    let state = Arc::new(AppState::new(config, catalog, history));
    let app = create_router(state);

    // Start server
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
