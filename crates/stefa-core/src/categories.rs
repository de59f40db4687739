use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A category as read from the `categories` table, with one level of nesting.
///
/// Loaded once at the start of a run and treated as an immutable snapshot for
/// the run's duration; category renames during a run are not observed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub subcategories: Vec<CategoryEntry>,
}

/// Read-only name-to-id lookup built from a category snapshot.
///
/// Names are case-folded and trimmed on insert and on lookup. Subcategories
/// are flattened into the same namespace as their parents. The insertion
/// order of entries is preserved so that substring matching stays
/// deterministic ("first match wins" needs a stable iteration order).
#[derive(Debug, Clone, Default)]
pub struct CategoryLookup {
    by_name: HashMap<String, Uuid>,
    names_by_id: HashMap<Uuid, String>,
    ordered: Vec<(String, Uuid)>,
}

impl CategoryLookup {
    /// Build a lookup from category entries, flattening subcategories.
    #[must_use]
    pub fn from_entries(entries: &[CategoryEntry]) -> Self {
        let mut lookup = Self::default();
        for entry in entries {
            lookup.insert(entry);
        }
        lookup
    }

    fn insert(&mut self, entry: &CategoryEntry) {
        let key = normalize(&entry.name);
        // First entry wins on duplicate names; later duplicates are dropped
        // entirely so get() and entries() agree on the id.
        if !self.by_name.contains_key(&key) {
            self.by_name.insert(key.clone(), entry.id);
            self.names_by_id.insert(entry.id, entry.name.clone());
            self.ordered.push((key, entry.id));
        }
        for sub in &entry.subcategories {
            self.insert(sub);
        }
    }

    /// Exact case-insensitive lookup of a trimmed category name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Uuid> {
        self.by_name.get(&normalize(name)).copied()
    }

    /// Original-case name for a known category id.
    #[must_use]
    pub fn name_of(&self, id: Uuid) -> Option<&str> {
        self.names_by_id.get(&id).map(String::as_str)
    }

    /// `true` when the id came from this snapshot.
    #[must_use]
    pub fn contains_id(&self, id: Uuid) -> bool {
        self.names_by_id.contains_key(&id)
    }

    /// Iterate `(normalized_name, id)` pairs in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, Uuid)> {
        self.ordered.iter().map(|(name, id)| (name.as_str(), *id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, subcategories: Vec<CategoryEntry>) -> CategoryEntry {
        CategoryEntry {
            id: Uuid::new_v4(),
            name: name.to_string(),
            subcategories,
        }
    }

    #[test]
    fn get_is_case_insensitive_and_trims() {
        let entries = vec![entry("Казки", vec![])];
        let lookup = CategoryLookup::from_entries(&entries);
        assert_eq!(lookup.get("казки"), Some(entries[0].id));
        assert_eq!(lookup.get("  КАЗКИ  "), Some(entries[0].id));
        assert_eq!(lookup.get("Фентезі"), None);
    }

    #[test]
    fn subcategories_are_flattened() {
        let sub = entry("Казки народів світу", vec![]);
        let sub_id = sub.id;
        let entries = vec![entry("Дитяча література", vec![sub])];
        let lookup = CategoryLookup::from_entries(&entries);
        assert_eq!(lookup.len(), 2);
        assert_eq!(lookup.get("казки народів світу"), Some(sub_id));
    }

    #[test]
    fn entries_preserve_insertion_order() {
        let entries = vec![
            entry("Фентезі", vec![]),
            entry("Детективи", vec![]),
            entry("Казки", vec![]),
        ];
        let lookup = CategoryLookup::from_entries(&entries);
        let names: Vec<&str> = lookup.entries().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["фентезі", "детективи", "казки"]);
    }

    #[test]
    fn name_of_returns_original_case() {
        let entries = vec![entry("Казки", vec![])];
        let lookup = CategoryLookup::from_entries(&entries);
        assert_eq!(lookup.name_of(entries[0].id), Some("Казки"));
        assert!(lookup.contains_id(entries[0].id));
        assert!(!lookup.contains_id(Uuid::new_v4()));
    }

    #[test]
    fn duplicate_names_keep_first_entry_position() {
        let first = entry("Казки", vec![]);
        let first_id = first.id;
        let entries = vec![first, entry("казки", vec![])];
        let lookup = CategoryLookup::from_entries(&entries);
        assert_eq!(lookup.len(), 1);
        assert_eq!(lookup.entries().next().map(|(_, id)| id), Some(first_id));
    }
}
