//! Category resolver: free-text category strings to canonical category ids.
//!
//! Matching runs in a fixed priority order and the first hit wins; there is
//! no scoring or ranking among candidates. Resolution never fails; an
//! unresolved category yields `None` and is surfaced on the run report's
//! needs-attention list.

use stefa_core::CategoryLookup;
use uuid::Uuid;

/// Ordered keyword-heuristic rules applied to the *book title* when the
/// category cell is empty. Keywords are lowercase substrings; rules are
/// evaluated top to bottom and within a rule left to right.
const KEYWORD_RULES: &[(&[&str], &str)] = &[
    (&["казк", "приказк"], "Дитяча література"),
    (&["детектив", "таємниц", "загадк"], "Детективи"),
    (&["фентезі", "чарівн", "магі"], "Фентезі"),
    (&["енциклопед", "пізнав", "чому"], "Пізнавальні"),
    (&["вірш", "поез"], "Поезія"),
];

/// Resolve a raw category cell to a category id.
///
/// Priority order:
/// 1. Exact case-insensitive match of the full trimmed string.
/// 2. When the string contains commas: each part in order, exact match then
///    bidirectional substring match against every known name.
/// 3. When the category cell is empty: keyword heuristic over the book
///    title, then the configured default category.
///
/// Returns `None` when nothing matched; never an id absent from `lookup`.
#[must_use]
pub fn resolve_category(
    category_raw: &str,
    title: &str,
    lookup: &CategoryLookup,
    default_category: &str,
) -> Option<Uuid> {
    let trimmed = category_raw.trim();

    if trimmed.is_empty() {
        return resolve_by_title_keywords(title, lookup, default_category);
    }

    if let Some(id) = lookup.get(trimmed) {
        return Some(id);
    }

    if trimmed.contains(',') {
        for part in trimmed.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            if let Some(id) = lookup.get(part) {
                return Some(id);
            }
            if let Some(id) = substring_match(part, lookup) {
                return Some(id);
            }
        }
    }

    None
}

/// Bidirectional substring match: the known name contains the part, or the
/// part contains the known name. First entry wins in snapshot order.
fn substring_match(part: &str, lookup: &CategoryLookup) -> Option<Uuid> {
    let part = part.to_lowercase();
    lookup
        .entries()
        .find(|(name, _)| name.contains(&part) || part.contains(name))
        .map(|(_, id)| id)
}

fn resolve_by_title_keywords(
    title: &str,
    lookup: &CategoryLookup,
    default_category: &str,
) -> Option<Uuid> {
    let title = title.to_lowercase();
    for (keywords, category) in KEYWORD_RULES {
        if keywords.iter().any(|keyword| title.contains(keyword)) {
            if let Some(id) = lookup.get(category) {
                return Some(id);
            }
            tracing::warn!(
                category,
                "keyword rule matched but category is absent from snapshot"
            );
        }
    }
    lookup.get(default_category)
}
