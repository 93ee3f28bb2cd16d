//! Catalog browsing commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;

use crate::catalog::{CatalogClient, Variant};
use crate::cli::output::{OutputFormat, fit, print_error, print_formatted};
use crate::config::Config;
use crate::filter::CategoryFilter;
use crate::library::LibraryState;
use crate::view::{self, CardView, LibraryView};

#[derive(Subcommand, Debug)]
pub enum CatalogCommands {
    /// List games matching a search term and category
    List {
        /// Case-insensitive title substring
        #[arg(long)]
        search: Option<String>,

        /// Category label, or "all"
        #[arg(long, default_value = "all")]
        category: String,

        /// Catalog to list (uses configured variant if not specified)
        #[arg(long, value_enum)]
        variant: Option<Variant>,
    },

    /// List the category selector values
    Categories {
        /// Catalog variant (uses configured variant if not specified)
        #[arg(long, value_enum)]
        variant: Option<Variant>,
    },
}

#[derive(Serialize)]
struct CategoriesResult {
    variant: Variant,
    categories: Vec<&'static str>,
}

pub async fn run(command: CatalogCommands, format: OutputFormat, quiet: bool) -> Result<()> {
    match command {
        CatalogCommands::List {
            search,
            category,
            variant,
        } => list(search, &category, variant, format, quiet).await,
        CatalogCommands::Categories { variant } => categories(variant, format).await,
    }
}

async fn list(
    search: Option<String>,
    category: &str,
    variant: Option<Variant>,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let config = Config::load()?;
    let variant = variant.unwrap_or(config.library.variant);

    let state = load_library(variant, &config, quiet)
        .await
        .search(search.as_deref().unwrap_or_default())
        .select_category(CategoryFilter::parse(category));

    let view = view::build(&state);
    print_formatted(&view.cards, format, |_| format_list_text(&view));

    Ok(())
}

/// Library for `variant`, fetching the remote catalog when needed.
///
/// A failed fetch leaves the catalog empty.
async fn load_library(variant: Variant, config: &Config, quiet: bool) -> LibraryState {
    let state = LibraryState::for_variant(variant);
    if variant != Variant::External {
        return state;
    }

    let fetched = match CatalogClient::new(config.library.endpoints()) {
        Ok(client) => client.fetch().await,
        Err(e) => Err(e),
    };
    match fetched {
        Ok(records) => state.with_catalog(records),
        Err(e) => {
            tracing::error!("Error fetching games: {}", e);
            if !quiet {
                print_error(&e.to_string());
            }
            state
        }
    }
}

async fn categories(variant: Option<Variant>, format: OutputFormat) -> Result<()> {
    let config = Config::load()?;
    let variant = variant.unwrap_or(config.library.variant);

    let view = view::build(&LibraryState::new(variant, Vec::new()));
    let result = CategoriesResult {
        variant,
        categories: view.categories,
    };

    print_formatted(&result, format, |r| r.categories.join("\n"));
    Ok(())
}

fn format_list_text(view: &LibraryView) -> String {
    if let Some(message) = view.empty_message {
        return message.to_string();
    }

    let mut lines = vec![format!(
        "{}  {}  {}  {}",
        fit("ID", 4),
        fit("TITLE", 34),
        fit("SIZE", 10),
        "STATUS"
    )];
    lines.extend(view.cards.iter().map(format_card_row));
    lines.join("\n")
}

fn format_card_row(card: &CardView) -> String {
    let title = if card.premium {
        format!("{} ★", card.title)
    } else {
        card.title.clone()
    };
    format!(
        "{}  {}  {}  {}",
        fit(&card.id.to_string(), 4),
        fit(&title, 34),
        fit(&card.size, 10),
        card.action.label()
    )
}
