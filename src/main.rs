use clap::Parser;
use tracing_subscriber::EnvFilter;

use gram_panchayat_api::cli::{self, Cli};
use gram_panchayat_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL, JWT_SECRET etc. are picked up
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();

    if let Err(e) = cli::run(cli, config).await {
        match std::env::var("VERBOSE_ERRORS").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => eprintln!("Error: {e:#}"),
        }
        std::process::exit(1);
    }

    Ok(())
}
