use clap::Parser;
use tracing_subscriber::EnvFilter;

use bistro_boss_api::cli::{self, Cli};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, ACCESS_TOKEN_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bistro_boss_api=info,tower_http=info")),
        )
        .init();

    if let Err(e) = cli::run(Cli::parse()).await {
        tracing::error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
