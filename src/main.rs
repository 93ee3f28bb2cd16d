mod app;
mod catalog;
mod cli;
mod config;
mod covers;
mod filter;
mod library;
mod scheduler;
mod simulator;
mod state;
mod task;
mod tracker;
mod ui;
mod view;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;
use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.output.verbose {
        "game_library=trace,info"
    } else if cli.command.is_some() {
        "game_library=warn"
    } else {
        "game_library=debug,info"
    };

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(command) = cli.command {
        if let Err(e) = cli::run(command, &cli.output).await {
            cli::print_error(&format!("{:#}", e));
            std::process::exit(1);
        }
        return Ok(());
    }

    tracing::info!("Starting game library");

    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("Failed to load configuration, using defaults: {}", e);
        Config::default()
    });

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1100.0, 760.0])
        .with_min_inner_size([640.0, 480.0])
        .with_title("Game Library");

    let native_options = eframe::NativeOptions {
        viewport,
        persist_window: true,
        ..Default::default()
    };

    eframe::run_native(
        "Game Library",
        native_options,
        Box::new(|cc| Ok(Box::new(app::LibraryApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run application: {}", e))?;

    Ok(())
}
