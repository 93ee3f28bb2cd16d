//! Catalog filtering by search term and category.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::GameRecord;

/// Category selection
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryFilter {
    #[default]
    All,
    Label(String),
}

impl CategoryFilter {
    /// Parse a selector value; "all" selects everything
    pub fn parse(value: &str) -> Self {
        if value == "all" {
            CategoryFilter::All
        } else {
            CategoryFilter::Label(value.to_string())
        }
    }

    /// Selector value as shown on the category buttons
    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Label(label) => label,
        }
    }

    pub fn matches(&self, record: &GameRecord) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Label(label) => record.has_category(label),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current search term and category selection
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Matched as a case-insensitive substring of the title, untrimmed
    pub search_term: String,
    pub category: CategoryFilter,
}

impl FilterCriteria {
    /// `needle` is the search term, already lowercased
    fn matches(&self, record: &GameRecord, needle: &str) -> bool {
        (needle.is_empty() || record.title.to_lowercase().contains(needle))
            && self.category.matches(record)
    }
}

/// Lazily yield the records matching `criteria`, in catalog order.
pub fn filter<'a>(
    catalog: &'a [GameRecord],
    criteria: &'a FilterCriteria,
) -> impl Iterator<Item = &'a GameRecord> + 'a {
    let needle = criteria.search_term.to_lowercase();
    catalog
        .iter()
        .filter(move |record| criteria.matches(record, &needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed_catalog;

    fn criteria_for(search_term: &str, category: CategoryFilter) -> FilterCriteria {
        FilterCriteria {
            search_term: search_term.to_string(),
            category,
        }
    }

    fn ids<'a>(records: impl Iterator<Item = &'a GameRecord>) -> Vec<u32> {
        records.map(|r| r.id).collect()
    }

    #[test]
    fn test_empty_criteria_returns_catalog() {
        let catalog = seed_catalog();
        let criteria = FilterCriteria::default();
        let visible: Vec<GameRecord> = filter(&catalog, &criteria).cloned().collect();
        assert_eq!(visible, catalog);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let catalog = seed_catalog();
        for term in ["racing", "RACING", "Masters", "2024"] {
            let criteria = criteria_for(term, CategoryFilter::All);
            assert_eq!(ids(filter(&catalog, &criteria)), vec![3], "term {:?}", term);
        }
    }

    #[test]
    fn test_search_partitions_catalog() {
        let catalog = seed_catalog();
        for term in ["e", "an", "x", "Legends", "zzz", " "] {
            let criteria = criteria_for(term, CategoryFilter::All);
            let visible = ids(filter(&catalog, &criteria));
            let needle = term.to_lowercase();
            for record in &catalog {
                let contains = record.title.to_lowercase().contains(&needle);
                assert_eq!(visible.contains(&record.id), contains, "term {:?}", term);
            }
        }
    }

    #[test]
    fn test_search_term_is_not_trimmed() {
        let catalog = seed_catalog();
        // "Racing Masters" contains " Masters" but no title ends with "2024 "
        let criteria = criteria_for(" masters", CategoryFilter::All);
        assert_eq!(ids(filter(&catalog, &criteria)), vec![3]);
        let criteria = criteria_for("2024 ", CategoryFilter::All);
        assert!(ids(filter(&catalog, &criteria)).is_empty());
    }

    #[test]
    fn test_category_filter() {
        let catalog = seed_catalog();
        let criteria = criteria_for("", CategoryFilter::parse("rpg"));
        assert_eq!(ids(filter(&catalog, &criteria)), vec![2]);

        // Labels are case-sensitive
        let criteria = criteria_for("", CategoryFilter::parse("RPG"));
        assert!(ids(filter(&catalog, &criteria)).is_empty());

        // Unknown labels never match
        let criteria = criteria_for("", CategoryFilter::parse("puzzle"));
        assert!(ids(filter(&catalog, &criteria)).is_empty());
    }

    #[test]
    fn test_racing_masters_scenario() {
        let catalog = vec![GameRecord::new(1, "Racing Masters 2024", "35.7 GB", "racing")];

        let criteria = criteria_for("racing", CategoryFilter::All);
        assert_eq!(ids(filter(&catalog, &criteria)), vec![1]);

        let criteria = criteria_for("", CategoryFilter::parse("rpg"));
        assert!(ids(filter(&catalog, &criteria)).is_empty());
    }

    #[test]
    fn test_multi_label_membership() {
        let catalog = vec![
            GameRecord::new(1, "Duo", "1 GB", "solo, multiplayer"),
            GameRecord::new(2, "Lone", "1 GB", "solo"),
            GameRecord::new(3, "Crowd", "1 GB", "multiplayer"),
        ];
        let criteria = criteria_for("", CategoryFilter::parse("multiplayer"));
        assert_eq!(ids(filter(&catalog, &criteria)), vec![1, 3]);
        let criteria = criteria_for("o", CategoryFilter::parse("solo"));
        assert_eq!(ids(filter(&catalog, &criteria)), vec![1, 2]);
    }

    #[test]
    fn test_category_filter_parse() {
        assert_eq!(CategoryFilter::parse("all"), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::parse("solo"),
            CategoryFilter::Label("solo".to_string())
        );
        assert_eq!(CategoryFilter::All.to_string(), "all");
        assert_eq!(CategoryFilter::parse("rpg").as_str(), "rpg");
    }
}
