//! Valora CLI binary.
//!
//! Provides command-line interface for the valora valuation engines.

mod cmd;
mod data;
mod engines;
mod report;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::{path::PathBuf, process};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "valora")]
#[command(about = "Valuation calculation engine for equity research", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable tables
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Where the financial snapshot comes from.
#[derive(Debug, Args)]
pub(crate) struct SourceArgs {
    /// Snapshot JSON file
    #[arg(long, conflicts_with = "symbol", required_unless_present = "symbol")]
    pub(crate) snapshot: Option<PathBuf>,

    /// Ticker symbol to fetch from the valuation service
    #[arg(short, long)]
    pub(crate) symbol: Option<String>,

    /// Full assumption set as JSON; flags below override individual fields
    #[arg(long)]
    pub(crate) assumptions: Option<PathBuf>,
}

/// Saving a run to the history store.
#[derive(Debug, Args)]
pub(crate) struct SaveArgs {
    /// Save the run to the valuation service
    #[arg(long)]
    pub(crate) save: bool,

    /// Comment stored with the saved run
    #[arg(long, requires = "save")]
    pub(crate) comment: Option<String>,

    /// Valuation date for the saved run (YYYY-MM-DD, defaults to today)
    #[arg(long, requires = "save")]
    pub(crate) date: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available valuation engines
    Engines,

    /// Forward discounted cash flow valuation
    Dcf {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        overrides: cmd::dcf::DcfOverrides,

        /// Print a growth x discount-rate sensitivity grid
        #[arg(long)]
        sensitivity: bool,

        #[command(flatten)]
        save: SaveArgs,
    },

    /// Growth rate implied by the market price
    ReverseDcf {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        overrides: cmd::reverse_dcf::ReverseDcfOverrides,

        /// Fail if the root search does not converge
        #[arg(long)]
        require_converged: bool,

        #[command(flatten)]
        save: SaveArgs,
    },

    /// Multi-phase growth valuation
    Growth {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        overrides: cmd::growth::GrowthOverrides,

        #[command(flatten)]
        save: SaveArgs,
    },

    /// Saved valuation runs
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },
}

#[derive(Subcommand)]
enum HistoryCommand {
    /// List saved runs for a symbol
    List {
        /// Engine name (dcf, reverse_dcf, growth)
        engine: String,

        /// Ticker symbol
        symbol: String,
    },

    /// Delete a saved run
    Delete {
        /// Engine name (dcf, reverse_dcf, growth)
        engine: String,

        /// Ticker symbol
        symbol: String,

        /// Valuation date (YYYY-MM-DD)
        date: String,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{}", report::error_message(&e));
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "valora=debug" } else { "valora=info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Engines => {
            cmd::engines::list_engines(cli.format)?;
        }
        Commands::Dcf {
            source,
            overrides,
            sensitivity,
            save,
        } => {
            cmd::dcf::run_dcf(&source, &overrides, sensitivity, &save, cli.format).await?;
        }
        Commands::ReverseDcf {
            source,
            overrides,
            require_converged,
            save,
        } => {
            cmd::reverse_dcf::run_reverse_dcf(
                &source,
                &overrides,
                require_converged,
                &save,
                cli.format,
            )
            .await?;
        }
        Commands::Growth {
            source,
            overrides,
            save,
        } => {
            cmd::growth::run_growth(&source, &overrides, &save, cli.format).await?;
        }
        Commands::History { command } => match command {
            HistoryCommand::List { engine, symbol } => {
                cmd::history::list_history(&engine, &symbol, cli.format).await?;
            }
            HistoryCommand::Delete {
                engine,
                symbol,
                date,
            } => {
                cmd::history::delete_history(&engine, &symbol, &date).await?;
            }
        },
    }

    Ok(())
}
