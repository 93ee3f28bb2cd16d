//! Configuration management commands

use anyhow::Result;
use clap::{Subcommand, ValueEnum};
use serde::Serialize;

use crate::catalog::Variant;
use crate::cli::output::{OutputFormat, print_formatted, print_success};
use crate::config::{Config, is_valid_speed};
use crate::ui::ThemePreset;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Get a specific config value
    Get {
        /// Config key (e.g., "library.variant", "launcher.theme")
        key: String,
    },

    /// Set a config value
    Set {
        /// Config key (e.g., "library.variant", "launcher.theme")
        key: String,

        /// Value to set
        value: String,
    },

    /// Show config file path
    Path,
}

#[derive(Serialize)]
struct ConfigPathResult {
    path: String,
    exists: bool,
}

pub async fn run(command: ConfigCommands, format: OutputFormat, quiet: bool) -> Result<()> {
    match command {
        ConfigCommands::Show => show(format).await,
        ConfigCommands::Get { key } => get(&key, format).await,
        ConfigCommands::Set { key, value } => set(&key, &value, quiet).await,
        ConfigCommands::Path => path(format).await,
    }
}

async fn show(format: OutputFormat) -> Result<()> {
    let config = Config::load()?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&config)?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            let toml = toml::to_string_pretty(&config)?;
            println!("{}", toml);
        }
    }

    Ok(())
}

async fn get(key: &str, format: OutputFormat) -> Result<()> {
    let config = Config::load()?;

    // Parse dotted key path and extract value
    let value = get_config_value(&config, key)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(&value)?);
        }
        OutputFormat::Text => {
            println!("{}", value);
        }
    }

    Ok(())
}

fn get_config_value(config: &Config, key: &str) -> Result<String> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["library", "variant"] => Ok(config.library.variant.name().to_string()),
        ["library", "catalog_url"] => Ok(config.library.catalog_url.clone()),
        ["library", "image_url_template"] => Ok(config.library.image_url_template.clone()),
        ["library", "download_url_template"] => Ok(config.library.download_url_template.clone()),
        ["simulator", "tick_interval_ms"] => Ok(config.simulator.tick_interval_ms.to_string()),
        ["simulator", "min_speed"] => Ok(config.simulator.min_speed.to_string()),
        ["simulator", "max_speed"] => Ok(config.simulator.max_speed.to_string()),
        ["launcher", "theme"] => Ok(config.launcher.theme.key().to_string()),
        _ => anyhow::bail!("Unknown config key: {}", key),
    }
}

async fn set(key: &str, value: &str, quiet: bool) -> Result<()> {
    let mut config = Config::load()?;

    set_config_value(&mut config, key, value)?;
    config.save()?;

    print_success(&format!("Set {} = {}", key, value), quiet);
    Ok(())
}

fn set_config_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["library", "variant"] => {
            config.library.variant = Variant::from_str(value, true)
                .map_err(|e| anyhow::anyhow!("Invalid variant '{}': {}", value, e))?;
        }
        ["library", "catalog_url"] => {
            config.library.catalog_url = value.to_string();
        }
        ["library", "image_url_template"] => {
            config.library.image_url_template = value.to_string();
        }
        ["library", "download_url_template"] => {
            config.library.download_url_template = value.to_string();
        }
        ["simulator", "tick_interval_ms"] => {
            config.simulator.tick_interval_ms = value.parse()?;
        }
        ["simulator", "min_speed"] => {
            config.simulator.min_speed = parse_speed(value)?;
        }
        ["simulator", "max_speed"] => {
            config.simulator.max_speed = parse_speed(value)?;
        }
        ["launcher", "theme"] => {
            config.launcher.theme = ThemePreset::parse(value)
                .ok_or_else(|| anyhow::anyhow!("Unknown theme: {}", value))?;
        }
        _ => anyhow::bail!("Unknown or read-only config key: {}", key),
    }

    Ok(())
}

fn parse_speed(value: &str) -> Result<f64> {
    let speed: f64 = value.parse()?;
    if !is_valid_speed(speed) {
        anyhow::bail!("Speed must be a positive number of MB/s: {}", value);
    }
    Ok(speed)
}

async fn path(format: OutputFormat) -> Result<()> {
    let path = Config::config_path()?;
    let exists = path.exists();

    let result = ConfigPathResult {
        path: path.to_string_lossy().to_string(),
        exists,
    };

    print_formatted(&result, format, |r| {
        format!("{}{}", r.path, if r.exists { "" } else { " (not found)" })
    });

    Ok(())
}
