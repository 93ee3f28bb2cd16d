//! Game catalog: records, ingestion, and the remote catalog client.
//!
//! This module provides:
//!
//! - `GameRecord`: one entry of the library grid, normalized at ingestion
//! - `Variant`: which catalog source and download model the library runs with
//! - `seed_catalog()`: the built-in catalog used by the simulated variant
//! - `CatalogClient`: fetches the remote JSON catalog used by the external variant
//!
//! Categories arrive either as a single label or as a delimited list. Both are
//! normalized into a set of labels so the filter can use plain set membership.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Remote catalog location
pub const DEFAULT_CATALOG_URL: &str = "https://vmiguel.com/games/games.json";

/// Header image template, `{steamid}` is substituted
pub const DEFAULT_IMAGE_URL_TEMPLATE: &str =
    "https://shared.fastly.steamstatic.com/store_item_assets/steam/apps/{steamid}/header.jpg";

/// Download link template, `{gamefile}` is substituted
pub const DEFAULT_DOWNLOAD_URL_TEMPLATE: &str = "https://vmiguel.com/games/{gamefile}";

/// User agent for catalog requests
pub const USER_AGENT: &str = concat!("GameLibrary/", env!("CARGO_PKG_VERSION"));

/// Unit assumed when a size label carries none
const DEFAULT_SIZE_UNIT: &str = "GB";

/// Unique key of a game within one catalog snapshot
pub type GameId = u32;

/// Catalog source and download model
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Built-in catalog, downloads are simulated with a progress timer
    #[default]
    Simulated,
    /// Remote catalog, downloads open an external link
    External,
}

impl Variant {
    /// Category labels offered by the selector, "all" excluded
    pub fn categories(&self) -> &'static [&'static str] {
        match self {
            Variant::Simulated => &["action", "rpg", "strategy", "racing"],
            Variant::External => &["solo", "multiplayer"],
        }
    }

    /// Lowercase name as used in config and CLI
    pub fn name(&self) -> &'static str {
        match self {
            Variant::Simulated => "simulated",
            Variant::External => "external",
        }
    }
}

/// One game in the library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: GameId,
    pub title: String,
    /// Free-text size, e.g. "35.7 GB"
    pub size: String,
    /// Normalized category labels (case preserved)
    pub categories: BTreeSet<String>,
    /// Header image URL, if the source provides one
    pub image: Option<String>,
    pub premium: bool,
    pub locked: bool,
    pub downloaded: bool,
    /// External download link (external variant only)
    pub download_url: Option<String>,
}

impl GameRecord {
    /// Create an unlocked, not-downloaded record
    pub fn new(id: GameId, title: &str, size: &str, category: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            size: size.to_string(),
            categories: normalize_categories(category),
            image: None,
            premium: false,
            locked: false,
            downloaded: false,
            download_url: None,
        }
    }

    pub fn premium(mut self) -> Self {
        self.premium = true;
        self
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    /// Whether the record carries the given label (case-sensitive)
    pub fn has_category(&self, label: &str) -> bool {
        self.categories.contains(label)
    }
}

/// Split a raw category field into a label set.
///
/// Labels are separated by commas, slashes, pipes, semicolons or whitespace.
pub fn normalize_categories(raw: &str) -> BTreeSet<String> {
    raw.split(|c: char| matches!(c, ',' | '/' | '|' | ';') || c.is_whitespace())
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect()
}

/// Numeric prefix and unit suffix of a size label
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSize {
    pub value: f64,
    pub unit: String,
}

/// Parse the leading decimal number of a size label.
///
/// Anything after the number is kept as the unit (defaulting to GB). Returns
/// `None` when the label does not start with a number.
pub fn parse_size(text: &str) -> Option<ParsedSize> {
    let text = text.trim_start();
    let mut seen_dot = false;
    let end = text
        .char_indices()
        .find(|&(_, c)| {
            if c == '.' && !seen_dot {
                seen_dot = true;
                false
            } else {
                !c.is_ascii_digit()
            }
        })
        .map(|(i, _)| i)
        .unwrap_or(text.len());

    let value: f64 = text[..end].parse().ok()?;
    let unit = text[end..].trim();
    let unit = if unit.is_empty() { DEFAULT_SIZE_UNIT } else { unit };

    Some(ParsedSize {
        value,
        unit: unit.to_string(),
    })
}

/// Drop records whose id was already seen, keeping catalog order.
pub fn ingest(records: impl IntoIterator<Item = GameRecord>) -> Vec<GameRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| {
            let fresh = seen.insert(record.id);
            if !fresh {
                tracing::warn!(
                    "Dropping duplicate catalog entry {} ({})",
                    record.id,
                    record.title
                );
            }
            fresh
        })
        .collect()
}

/// Built-in catalog for the simulated variant
pub fn seed_catalog() -> Vec<GameRecord> {
    vec![
        GameRecord::new(1, "Cyber Nexus 2077", "62.3 GB", "action").premium(),
        GameRecord::new(2, "Star Voyager: Ultimate Edition", "48.1 GB", "rpg")
            .premium()
            .locked(),
        GameRecord::new(3, "Racing Masters 2024", "35.7 GB", "racing"),
        GameRecord::new(4, "Medieval Legends", "28.9 GB", "strategy").locked(),
    ]
}

// ============================================================================
// Remote catalog
// ============================================================================

/// Errors that can occur while fetching the remote catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Catalog server returned {0}")]
    Status(reqwest::StatusCode),

    #[error("Catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// URLs used to fetch the catalog and build per-game links
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEndpoints {
    pub catalog_url: String,
    pub image_url_template: String,
    pub download_url_template: String,
}

impl Default for CatalogEndpoints {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            image_url_template: DEFAULT_IMAGE_URL_TEMPLATE.to_string(),
            download_url_template: DEFAULT_DOWNLOAD_URL_TEMPLATE.to_string(),
        }
    }
}

impl CatalogEndpoints {
    pub fn image_url(&self, steamid: &str) -> String {
        self.image_url_template.replace("{steamid}", steamid)
    }

    pub fn download_url(&self, gamefile: &str) -> String {
        self.download_url_template.replace("{gamefile}", gamefile)
    }
}

/// JSON scalars that show up as either numbers or strings
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Number(u64),
    Text(String),
}

impl Scalar {
    fn to_text(&self) -> String {
        match self {
            Scalar::Number(n) => n.to_string(),
            Scalar::Text(s) => s.clone(),
        }
    }

    fn to_id(&self) -> Option<GameId> {
        match self {
            Scalar::Number(n) => GameId::try_from(*n).ok(),
            Scalar::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Entry of the remote catalog as served
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteGame {
    id: Scalar,
    title: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    size: String,
    #[serde(default)]
    steamid: Option<Scalar>,
    #[serde(default)]
    gamefile: Option<String>,
    #[serde(default)]
    is_locked: bool,
    #[serde(default)]
    is_premium: bool,
}

impl RemoteGame {
    fn into_record(self, endpoints: &CatalogEndpoints) -> Option<GameRecord> {
        let Some(id) = self.id.to_id() else {
            tracing::warn!("Skipping catalog entry with invalid id: {}", self.title);
            return None;
        };

        Some(GameRecord {
            id,
            categories: normalize_categories(&self.category),
            image: self.steamid.map(|s| endpoints.image_url(&s.to_text())),
            download_url: self.gamefile.map(|f| endpoints.download_url(&f)),
            title: self.title,
            size: self.size,
            premium: self.is_premium,
            locked: self.is_locked,
            downloaded: false,
        })
    }
}

/// Parse a remote catalog body into records
pub fn parse_remote_catalog(
    body: &str,
    endpoints: &CatalogEndpoints,
) -> Result<Vec<GameRecord>, CatalogError> {
    let games: Vec<RemoteGame> = serde_json::from_str(body)?;
    Ok(ingest(
        games
            .into_iter()
            .filter_map(|game| game.into_record(endpoints)),
    ))
}

/// HTTP client for the remote catalog
#[derive(Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    endpoints: CatalogEndpoints,
}

impl CatalogClient {
    pub fn new(endpoints: CatalogEndpoints) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client, endpoints })
    }

    /// Fetch and parse the catalog once. No retry.
    pub async fn fetch(&self) -> Result<Vec<GameRecord>, CatalogError> {
        let url = &self.endpoints.catalog_url;
        tracing::debug!("Fetching catalog from {}", url);

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(CatalogError::Status(response.status()));
        }

        let body = response.text().await?;
        let records = parse_remote_catalog(&body, &self.endpoints)?;
        tracing::info!("Fetched {} games from {}", records.len(), url);
        Ok(records)
    }
}
