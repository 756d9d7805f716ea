mod display;

use std::io::{self, Write};

use anyhow::{Context, bail};
use casinolens_core::config::{DEFAULT_CURRENT_CASINOS_FEED_URL, DEFAULT_RESULTS_BASE_URL};
use casinolens_core::report::StatusFilter;
use casinolens_core::{DashboardConfig, StoreConfig};
use casinolens_sync::{DashboardClient, ResultsMode};
use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;

/// Terminal dashboard for casino promotion research results
#[derive(Parser)]
#[command(name = "casinolens", version, about, long_about = None)]
struct Cli {
    /// Base URL of the research API
    #[arg(long, env = "CASINOLENS_API_URL", default_value = DEFAULT_RESULTS_BASE_URL, global = true)]
    api_url: String,

    /// URL of the current-casino feed
    #[arg(long, env = "CASINOLENS_FEED_URL", default_value = DEFAULT_CURRENT_CASINOS_FEED_URL, global = true)]
    feed_url: String,

    /// Base URL of the hosted store holding run history
    #[arg(long, env = "CASINOLENS_STORE_URL", global = true)]
    store_url: Option<String>,

    /// API key for the run store
    #[arg(long, env = "CASINOLENS_STORE_KEY", hide_env_values = true, global = true)]
    store_key: Option<String>,

    /// Log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the most recently stored research result
    Latest {
        /// Only show comparisons with this status (all, better, worse, same, alternative, new-casino)
        #[arg(long, default_value = "all")]
        status: StatusFilter,
    },
    /// Run the research job now, then show the stored result
    Run {
        #[arg(long, default_value = "all")]
        status: StatusFilter,
    },
    /// List historical research runs, or show one by id
    History {
        /// Show the report stored for this run
        #[arg(long)]
        id: Option<i64>,
        #[arg(long, default_value = "all")]
        status: StatusFilter,
    },
    /// List casinos currently tracked by the backing store
    Current,
    /// Normalise a raw offer value locally, without any network access
    Inspect {
        /// Raw field text, e.g. a fenced JSON blob
        raw: String,
        /// Display text used when nothing readable can be extracted
        #[arg(long, default_value = "No offer details")]
        fallback: String,
    },
    /// Check that the research API is up
    Health,
}

impl Cli {
    fn config(&self) -> DashboardConfig {
        let store = match (&self.store_url, &self.store_key) {
            (Some(url), Some(api_key)) => Some(StoreConfig {
                url: url.clone(),
                api_key: api_key.clone(),
            }),
            _ => None,
        };
        DashboardConfig {
            results_base_url: self.api_url.clone(),
            current_casinos_feed_url: self.feed_url.clone(),
            store,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
    tracing::debug!("casinolens v{}", env!("CARGO_PKG_VERSION"));

    let client = DashboardClient::new(cli.config());
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Latest { status } => {
            let Some(result) = client.fetch_results(ResultsMode::Last).await else {
                bail!("No data available");
            };
            display::write_result(&mut out, &result, status)?;
        }
        Commands::Run { status } => {
            eprintln!("Running research... this can take several minutes.");
            if !client.trigger_manual_run().await {
                bail!("Failed to start research");
            }
            let Some(result) = client.fetch_results(ResultsMode::Last).await else {
                bail!("Research completed but failed to fetch results");
            };
            display::write_result(&mut out, &result, status)?;
        }
        Commands::History { id, status } => {
            if client.config().store.is_none() {
                bail!("run history needs --store-url and --store-key (or CASINOLENS_STORE_URL/CASINOLENS_STORE_KEY)");
            }
            let runs = client.research_runs().await;
            match id {
                None => display::write_runs(&mut out, &runs)?,
                Some(id) => {
                    let run = runs
                        .iter()
                        .find(|r| r.id == id)
                        .with_context(|| format!("no research run with id {id}"))?;
                    writeln!(out, "Report #{} ({}, {})", run.id, run.mode, run.created_at)?;
                    display::write_result(&mut out, &run.result_json, status)?;
                }
            }
        }
        Commands::Current => {
            let casinos = client.current_casinos().await;
            display::write_current_casinos(&mut out, &casinos)?;
        }
        Commands::Inspect { raw, fallback } => {
            display::write_inspection(&mut out, &raw, &fallback)?;
        }
        Commands::Health => {
            let health = client
                .health()
                .await
                .context("research API health check failed")?;
            writeln!(out, "  {:<26} {}", "Status", health.status)?;
            writeln!(out, "  {:<26} {}", "Timestamp", health.timestamp)?;
        }
    }

    out.flush()?;
    Ok(())
}
