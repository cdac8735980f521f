mod commands;
mod render;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "expocal")]
#[command(about = "Browse upcoming exhibitions and trade fairs in a terminal calendar")]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Store or forget the Gemini API key
    Auth {
        /// Remove the stored key instead of setting one
        #[arg(long)]
        forget: bool,
    },
    /// Show a month grid with its events (defaults to the current month)
    Month {
        /// Month to show (YYYY-MM)
        month: Option<String>,

        /// Search the web again even if stored events are recent
        #[arg(short, long)]
        refresh: bool,
    },
    /// List the events running on one day
    Day {
        /// Day to show (YYYY-MM-DD)
        date: String,
    },
    /// Search the web for the latest events
    Refresh {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show when events were last fetched
    Status,
    /// Delete stored events, keeping the API key
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command.unwrap_or(Commands::Month {
        month: None,
        refresh: false,
    }) {
        Commands::Auth { forget } => commands::auth::run(forget),
        Commands::Month { month, refresh } => commands::month::run(month.as_deref(), refresh).await,
        Commands::Day { date } => commands::day::run(&date).await,
        Commands::Refresh { yes } => commands::refresh::run(yes).await,
        Commands::Status => commands::status::run(),
        Commands::Clear => commands::clear::run(),
    }
}

/// RUST_LOG wins when set; otherwise warnings only, or debug with --verbose.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "expocal=debug,expocal_core=debug,expocal_provider_gemini=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
