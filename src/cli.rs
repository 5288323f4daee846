use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use crate::app;
use crate::config::{AppConfig, StoreBackend};
use crate::database::{MemoryStore, PgStore, Store};
use crate::payment::StripeGateway;
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "bistro-boss-api")]
#[command(about = "Bistro Boss - restaurant ordering API server")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Port to listen on (overrides PORT)")]
        port: Option<u16>,

        #[arg(long, value_enum, help = "Storage backend (overrides STORE_BACKEND)")]
        store: Option<StoreBackend>,
    },

    #[command(about = "Apply database migrations and exit")]
    Migrate,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve {
        port: None,
        store: None,
    }) {
        Commands::Serve { port, store } => serve(port, store).await,
        Commands::Migrate => migrate().await,
    }
}

async fn serve(port: Option<u16>, backend: Option<StoreBackend>) -> anyhow::Result<()> {
    let mut config = AppConfig::load().context("failed to load configuration")?;
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(backend) = backend {
        config.database.backend = backend;
    }
    config.validate().context("invalid configuration")?;

    tracing::info!(
        "Starting Bistro Boss API in {:?} mode ({:?} store)",
        config.environment,
        config.database.backend
    );
    if config.payment.stripe_secret_key.is_none() {
        tracing::warn!("STRIPE_SECRET_KEY is not set; checkout sessions will be refused");
    }

    let store = open_store(&config).await?;
    let payments = Arc::new(StripeGateway::new(&config.payment));
    let bind_addr = config.bind_addr();
    let state = AppState::new(config, store.clone(), payments);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Bistro Boss is listening on http://{}", bind_addr);

    axum::serve(listener, app::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    store.close().await;
    tracing::info!("Server stopped");
    Ok(())
}

async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn Store>> {
    match config.database.backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreBackend::Postgres => {
            let store = PgStore::connect(&config.database)
                .await
                .context("failed to connect to PostgreSQL")?;
            if config.database.auto_migrate {
                store.migrate().await.context("failed to run migrations")?;
            }
            Ok(Arc::new(store))
        }
    }
}

async fn migrate() -> anyhow::Result<()> {
    let mut config = AppConfig::load().context("failed to load configuration")?;
    config.database.backend = StoreBackend::Postgres;
    if config.database.url.is_none() {
        anyhow::bail!("DATABASE_URL (or DB_USER/DB_PASS/DB_HOST/DB_NAME) must be set to migrate");
    }

    let store = PgStore::connect(&config.database)
        .await
        .context("failed to connect to PostgreSQL")?;
    store.migrate().await.context("failed to run migrations")?;
    store.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
