use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One category-to-prefix pairing from the prefixes file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefixEntry {
    pub category: String,
    pub prefix: String,
}

#[derive(Debug, Deserialize)]
pub struct PrefixesFile {
    pub prefixes: Vec<PrefixEntry>,
}

/// Validated category-to-article-prefix table.
///
/// Categories absent from the table are skipped with a warning during article
/// assignment, never defaulted.
#[derive(Debug, Clone, Default)]
pub struct PrefixTable {
    by_category: HashMap<String, String>,
}

impl PrefixTable {
    /// Build a table from entries, rejecting duplicates and malformed prefixes.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if a category is blank, a prefix is
    /// not 2-4 uppercase ASCII letters, or a category/prefix appears twice.
    pub fn from_entries(entries: Vec<PrefixEntry>) -> Result<Self, ConfigError> {
        let mut by_category = HashMap::new();
        let mut seen_prefixes = std::collections::HashSet::new();

        for entry in entries {
            if entry.category.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "prefix entry has a blank category".to_string(),
                ));
            }
            let valid_len = (2..=4).contains(&entry.prefix.len());
            if !valid_len || !entry.prefix.chars().all(|c| c.is_ascii_uppercase()) {
                return Err(ConfigError::Validation(format!(
                    "prefix '{}' for category '{}' must be 2-4 uppercase ASCII letters",
                    entry.prefix, entry.category
                )));
            }
            if !seen_prefixes.insert(entry.prefix.clone()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate prefix: '{}'",
                    entry.prefix
                )));
            }
            let key = entry.category.trim().to_lowercase();
            if by_category.insert(key, entry.prefix).is_some() {
                return Err(ConfigError::Validation(format!(
                    "duplicate category in prefixes file: '{}'",
                    entry.category
                )));
            }
        }

        Ok(Self { by_category })
    }

    /// Case-insensitive prefix lookup by category name.
    #[must_use]
    pub fn get(&self, category: &str) -> Option<&str> {
        self.by_category
            .get(&category.trim().to_lowercase())
            .map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_category.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_category.is_empty()
    }
}

/// Load and validate the prefix table from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_prefixes(path: &Path) -> Result<PrefixTable, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::PrefixFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: PrefixesFile = serde_yaml::from_str(&content)?;
    PrefixTable::from_entries(file.prefixes)
}
