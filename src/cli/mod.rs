//! CLI module for the game library
//!
//! Headless access to the same library state the window drives.

mod commands;
mod output;

use clap::{Parser, Subcommand};

pub use output::{OutputFormat, print_error};

/// Game Library - browse and download games
#[derive(Parser, Debug)]
#[command(name = "game-library")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[command(flatten)]
    pub output: OutputOptions,

    /// Runs the window when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output formatting options
#[derive(Parser, Debug, Clone)]
pub struct OutputOptions {
    /// Output in JSON format (for machine parsing)
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl OutputOptions {
    pub fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Browse the catalog
    Catalog {
        #[command(subcommand)]
        command: commands::catalog::CatalogCommands,
    },

    /// Run a simulated download without a timer
    Simulate(commands::simulate::SimulateArgs),

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: commands::config::ConfigCommands,
    },
}

/// Run a CLI subcommand
pub async fn run(command: Commands, output: &OutputOptions) -> anyhow::Result<()> {
    let format = output.format();
    let quiet = output.quiet;

    match command {
        Commands::Catalog { command } => commands::catalog::run(command, format, quiet).await,
        Commands::Simulate(args) => commands::simulate::run(args, format, quiet).await,
        Commands::Config { command } => commands::config::run(command, format, quiet).await,
    }
}
