use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::catalog::{
    CatalogEndpoints, DEFAULT_CATALOG_URL, DEFAULT_DOWNLOAD_URL_TEMPLATE,
    DEFAULT_IMAGE_URL_TEMPLATE, Variant,
};
use crate::simulator::{MAX_SPEED, MIN_SPEED};
use crate::ui::ThemePreset;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub library: LibraryConfig,
    #[serde(default)]
    pub simulator: SimulatorConfig,
    #[serde(default)]
    pub launcher: LauncherConfig,
}

/// Which catalog to show and where it comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryConfig {
    #[serde(default)]
    pub variant: Variant,
    /// Remote catalog endpoint (external variant)
    #[serde(default = "default_catalog_url")]
    pub catalog_url: String,
    /// `{steamid}` is replaced with the record's store id
    #[serde(default = "default_image_url_template")]
    pub image_url_template: String,
    /// `{gamefile}` is replaced with the record's file name
    #[serde(default = "default_download_url_template")]
    pub download_url_template: String,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            catalog_url: default_catalog_url(),
            image_url_template: default_image_url_template(),
            download_url_template: default_download_url_template(),
        }
    }
}

impl LibraryConfig {
    pub fn endpoints(&self) -> CatalogEndpoints {
        CatalogEndpoints {
            catalog_url: self.catalog_url.clone(),
            image_url_template: self.image_url_template.clone(),
            download_url_template: self.download_url_template.clone(),
        }
    }
}

fn default_catalog_url() -> String {
    DEFAULT_CATALOG_URL.to_string()
}

fn default_image_url_template() -> String {
    DEFAULT_IMAGE_URL_TEMPLATE.to_string()
}

fn default_download_url_template() -> String {
    DEFAULT_DOWNLOAD_URL_TEMPLATE.to_string()
}

/// Simulated download timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Milliseconds between progress steps
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Lower bound of the displayed speed (MB/s)
    #[serde(default = "default_min_speed")]
    pub min_speed: f64,
    /// Upper bound of the displayed speed (MB/s)
    #[serde(default = "default_max_speed")]
    pub max_speed: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            min_speed: default_min_speed(),
            max_speed: default_max_speed(),
        }
    }
}

impl SimulatorConfig {
    /// Tick period, never shorter than 1ms
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    /// Speed bounds with `min <= max`.
    ///
    /// Falls back to the built-in range unless both bounds are finite and positive.
    pub fn speed_range(&self) -> (f64, f64) {
        let (min, max) = (self.min_speed, self.max_speed);
        if !is_valid_speed(min) || !is_valid_speed(max) {
            tracing::warn!("Ignoring invalid speed range {}..{}", min, max);
            return (MIN_SPEED, MAX_SPEED);
        }
        if min <= max { (min, max) } else { (max, min) }
    }
}

/// Speeds must be finite and positive
pub fn is_valid_speed(speed: f64) -> bool {
    speed.is_finite() && speed > 0.0
}

fn default_tick_interval_ms() -> u64 {
    100
}

fn default_min_speed() -> f64 {
    MIN_SPEED
}

fn default_max_speed() -> f64 {
    MAX_SPEED
}

/// Launcher appearance settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LauncherConfig {
    #[serde(default)]
    pub theme: ThemePreset,
}

impl Config {
    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("com", "gamelibrary", "GameLibrary")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        let config_dir = dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Load configuration from `path`, falling back to defaults when the file is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Invalid configuration in {}", path.display()))?;
            tracing::info!("Loaded configuration from {:?}", path);
            Ok(config)
        } else {
            tracing::info!("No configuration file found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.library.variant, Variant::Simulated);
        assert_eq!(config.library.catalog_url, DEFAULT_CATALOG_URL);
        assert_eq!(config.simulator.tick_interval(), Duration::from_millis(100));
        assert_eq!(config.simulator.speed_range(), (5.0, 15.0));
        assert_eq!(config.launcher.theme, ThemePreset::Midnight);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.library.variant = Variant::External;
        config.library.catalog_url = "http://localhost:8080/games.json".to_string();
        config.simulator.tick_interval_ms = 250;
        config.launcher.theme = ThemePreset::Catppuccin;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[library]\nvariant = \"external\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.library.variant, Variant::External);
        assert_eq!(config.library.download_url_template, DEFAULT_DOWNLOAD_URL_TEMPLATE);
        assert_eq!(config.simulator, SimulatorConfig::default());
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[library]\nvariant = \"cloud\"\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_simulator_bounds_are_sanitized() {
        let config = SimulatorConfig {
            tick_interval_ms: 0,
            min_speed: 20.0,
            max_speed: 10.0,
        };
        assert_eq!(config.tick_interval(), Duration::from_millis(1));
        assert_eq!(config.speed_range(), (10.0, 20.0));
    }

    #[test]
    fn test_non_finite_speeds_fall_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[simulator]\nmax_speed = inf\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.simulator.speed_range(), (MIN_SPEED, MAX_SPEED));

        for (min, max) in [(f64::NAN, 10.0), (5.0, f64::NEG_INFINITY), (0.0, 10.0), (-3.0, 4.0)] {
            let config = SimulatorConfig {
                tick_interval_ms: 100,
                min_speed: min,
                max_speed: max,
            };
            assert_eq!(config.speed_range(), (MIN_SPEED, MAX_SPEED), "{}..{}", min, max);
        }
    }

    #[test]
    fn test_endpoints_follow_config() {
        let mut config = LibraryConfig::default();
        config.download_url_template = "http://mirror/{gamefile}".to_string();
        assert_eq!(config.endpoints().download_url("a.zip"), "http://mirror/a.zip");
    }
}
