use anyhow::Context;
use clap::Parser;
use configuration::{ConfigOverrides, TourSettings};
use database::{run_session, Client, InMemoryClient, Lifecycle, UserStore};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod tour;

use tour::TourOutcome;

/// The main entry point: create a user, find it by email, read its name.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if there is one
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = configuration::load_config().context("Failed to load configuration")?;
    config.apply_overrides(&cli.overrides);
    configuration::validate(&config)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    tracing::debug!(tour = ?config.tour, "Configuration loaded.");
    tracing::info!("my new project");

    if cli.in_memory {
        let client = InMemoryClient::new();
        run_tour(&client, &config.tour).await
    } else {
        let client = Client::new(config.database.clone());
        run_tour(&client, &config.tour).await
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Creates one user, finds it again by email, and reports its name.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    overrides: ConfigOverrides,

    /// Run against a process-local store instead of PostgreSQL.
    #[arg(long)]
    in_memory: bool,
}

/// Runs the tour inside a session so the client is always disconnected.
async fn run_tour<C>(client: &C, settings: &TourSettings) -> anyhow::Result<()>
where
    C: Lifecycle + UserStore,
{
    match run_session(client, tour::run(client, settings)).await? {
        TourOutcome::Named(name) => tracing::debug!(%name, "Tour finished."),
        TourOutcome::NameAbsent => tracing::debug!("Tour finished without a name."),
    }
    Ok(())
}
