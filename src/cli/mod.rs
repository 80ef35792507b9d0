use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::config::AppConfig;
use crate::database::Database;
use crate::scheduler::{self, PgReviewQueue};
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "gram-panchayat-api")]
#[command(about = "Death registration and task tracking for gram panchayat field staff")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    #[command(about = "Run the HTTP server and the daily review sampler (default)")]
    Serve,

    #[command(about = "Apply pending database migrations and exit")]
    Migrate,

    #[command(about = "Run one review sampling cycle now")]
    SampleReviews {
        #[arg(long, help = "Completion day to sample, YYYY-MM-DD (defaults to yesterday)")]
        date: Option<NaiveDate>,
    },
}

pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    config.validate().context("invalid configuration")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Migrate => {
            let db = Database::connect(&config).await?;
            db.migrate().await?;
            db.close().await;
            Ok(())
        }
        Commands::SampleReviews { date } => {
            let db = Database::connect(&config).await?;
            let date = match date {
                Some(d) => d,
                None => chrono::Local::now()
                    .date_naive()
                    .pred_opt()
                    .context("no previous day")?,
            };
            let queue = PgReviewQueue::new(db.clone());
            let mut rng = StdRng::from_entropy();
            let report = scheduler::run_cycle(&queue, date, config.scheduler.sample_percent, &mut rng).await?;
            info!(
                date = %report.date,
                eligible = report.eligible,
                inserted = report.inserted,
                "Review sampling finished"
            );
            db.close().await;
            Ok(())
        }
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    info!("Starting Gram Panchayat API in {:?} mode", config.environment);

    let db = Database::connect(&config).await?;
    db.migrate().await?;

    let otp_sender = crate::otp::sender_from_config(&config.otp)?;

    if config.scheduler.enabled {
        scheduler::spawn(Arc::new(PgReviewQueue::new(db.clone())), config.scheduler.clone());
    }

    let port = config.api.port;
    let app = crate::routes::app(AppState::new(db.clone(), config, otp_sender));

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default() {
        let cli = Cli::parse_from(["gram-panchayat-api"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn sample_reviews_takes_a_date() {
        let cli = Cli::parse_from(["gram-panchayat-api", "sample-reviews", "--date", "2024-06-09"]);
        assert_eq!(
            cli.command,
            Some(Commands::SampleReviews {
                date: NaiveDate::from_ymd_opt(2024, 6, 9)
            })
        );
    }
}
