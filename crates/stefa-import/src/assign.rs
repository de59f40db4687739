//! Code and article assignment.
//!
//! Two independent strategies coexist: a globally incrementing sequence code
//! (`SB-<year>-<seq>`) assigned positionally at import time, and a
//! per-category article (`<PREFIX>-<NNN>`) recomputed in full on every
//! renumber run.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use stefa_core::{BookRecord, PrefixTable};
use uuid::Uuid;

/// Format a sequence code for the row at `index` (0-based).
///
/// `start_offset` is operator-supplied and exists to continue numbering
/// after a manually loaded first batch. Purely positional: the same index
/// in two different runs yields the same code.
#[must_use]
pub fn sequence_code(year: i32, index: usize, start_offset: usize) -> String {
    format!("SB-{year}-{:04}", index + start_offset)
}

/// Assign sequence codes to all records in source order.
pub fn assign_sequence_codes(records: &mut [BookRecord], year: i32, start_offset: usize) {
    for (index, record) in records.iter_mut().enumerate() {
        record.code = sequence_code(year, index, start_offset);
    }
}

/// A stored book as needed for article renumbering.
#[derive(Debug, Clone)]
pub struct ArticleBook {
    pub id: Uuid,
    pub title: String,
    /// Resolved category name (original case).
    pub category: String,
    pub created_at: DateTime<Utc>,
}

/// One computed article assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleAssignment {
    pub book_id: Uuid,
    pub article: String,
}

/// Result of a full article recompute.
#[derive(Debug, Clone, Default)]
pub struct ArticlePlan {
    pub assignments: Vec<ArticleAssignment>,
    /// Categories with books but no configured prefix, in group order.
    pub skipped_categories: Vec<String>,
}

/// Recompute articles for the whole catalog.
///
/// Books are grouped by category name and each group is sorted by
/// `created_at` ascending (stable sort, no secondary tie-break) before
/// numbering from 1. Categories absent from the prefix table are collected
/// on `skipped_categories` and logged; they never abort the run. Previous
/// articles are overwritten unconditionally by the caller.
#[must_use]
pub fn assign_articles(books: &[ArticleBook], prefixes: &PrefixTable) -> ArticlePlan {
    let mut groups: BTreeMap<&str, Vec<&ArticleBook>> = BTreeMap::new();
    for book in books {
        groups.entry(book.category.as_str()).or_default().push(book);
    }

    let mut plan = ArticlePlan::default();
    for (category, mut group) in groups {
        let Some(prefix) = prefixes.get(category) else {
            tracing::warn!(category, books = group.len(), "no article prefix configured; skipping category");
            plan.skipped_categories.push(category.to_string());
            continue;
        };
        group.sort_by_key(|book| book.created_at);
        for (position, book) in group.iter().enumerate() {
            plan.assignments.push(ArticleAssignment {
                book_id: book.id,
                article: format!("{prefix}-{:03}", position + 1),
            });
        }
    }
    plan
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::TimeZone;
    use stefa_core::PrefixEntry;

    use super::*;

    fn prefix_table() -> PrefixTable {
        PrefixTable::from_entries(vec![
            PrefixEntry {
                category: "Казки".to_string(),
                prefix: "KZ".to_string(),
            },
            PrefixEntry {
                category: "Фентезі".to_string(),
                prefix: "FE".to_string(),
            },
        ])
        .unwrap()
    }

    fn book(category: &str, day: u32) -> ArticleBook {
        ArticleBook {
            id: Uuid::new_v4(),
            title: format!("{category} {day}"),
            category: category.to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 1, day, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn sequence_code_pads_to_four_digits() {
        assert_eq!(sequence_code(2025, 0, 11), "SB-2025-0011");
        assert_eq!(sequence_code(2025, 0, 1), "SB-2025-0001");
        assert_eq!(sequence_code(2024, 999, 1), "SB-2024-1000");
    }

    #[test]
    fn assign_sequence_codes_is_positional() {
        let mut records: Vec<BookRecord> = (0..3)
            .map(|i| BookRecord {
                title: format!("Книга {i}"),
                author: String::new(),
                isbn: None,
                description: None,
                cover_url: None,
                category_raw: String::new(),
                category_id: None,
                available: true,
                code: String::new(),
                qty_total: 1,
                qty_available: 1,
                price_uah: 0.0,
            })
            .collect();
        assign_sequence_codes(&mut records, 2025, 11);
        let codes: Vec<&str> = records.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["SB-2025-0011", "SB-2025-0012", "SB-2025-0013"]);
    }

    #[test]
    fn sequence_codes_are_pairwise_distinct() {
        // P2: all codes within a run are unique.
        let codes: HashSet<String> = (0..200).map(|i| sequence_code(2025, i, 1)).collect();
        assert_eq!(codes.len(), 200);
    }

    #[test]
    fn articles_numbered_by_created_at_within_category() {
        let older = book("Казки", 1);
        let newer = book("Казки", 20);
        // Insertion order deliberately reversed relative to created_at.
        let plan = assign_articles(&[newer.clone(), older.clone()], &prefix_table());
        assert_eq!(plan.assignments.len(), 2);
        assert_eq!(
            plan.assignments[0],
            ArticleAssignment {
                book_id: older.id,
                article: "KZ-001".to_string()
            }
        );
        assert_eq!(
            plan.assignments[1],
            ArticleAssignment {
                book_id: newer.id,
                article: "KZ-002".to_string()
            }
        );
    }

    #[test]
    fn articles_number_each_category_independently() {
        let books = vec![book("Казки", 1), book("Фентезі", 2), book("Казки", 3)];
        let plan = assign_articles(&books, &prefix_table());
        let articles: Vec<&str> = plan.assignments.iter().map(|a| a.article.as_str()).collect();
        assert!(articles.contains(&"KZ-001"));
        assert!(articles.contains(&"KZ-002"));
        assert!(articles.contains(&"FE-001"));
    }

    #[test]
    fn unknown_category_is_skipped_not_defaulted() {
        let books = vec![book("Пригоди", 1), book("Казки", 2)];
        let plan = assign_articles(&books, &prefix_table());
        assert_eq!(plan.skipped_categories, vec!["Пригоди".to_string()]);
        assert_eq!(plan.assignments.len(), 1);
        assert_eq!(plan.assignments[0].article, "KZ-001");
    }

    #[test]
    fn renumber_is_idempotent_for_distinct_timestamps() {
        // P5: re-running over the same input yields identical assignments.
        let books: Vec<ArticleBook> = (1..=9).map(|day| book("Казки", day)).collect();
        let first = assign_articles(&books, &prefix_table());
        let second = assign_articles(&books, &prefix_table());
        assert_eq!(first.assignments, second.assignments);
    }

    #[test]
    fn empty_input_produces_empty_plan() {
        let plan = assign_articles(&[], &prefix_table());
        assert!(plan.assignments.is_empty());
        assert!(plan.skipped_categories.is_empty());
    }
}
