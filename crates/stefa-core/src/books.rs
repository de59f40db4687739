use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Author sentinel substituted when a source row has no author column or the
/// cell is blank. Stored as-is so operators can find and fix these later.
pub const UNKNOWN_AUTHOR: &str = "Невідомий автор";

/// Placeholder title for a row whose title cell is missing or blank.
///
/// `ordinal` is the 1-based position of the row in the source file, so the
/// operator can trace the placeholder back to the spreadsheet line.
#[must_use]
pub fn placeholder_title(ordinal: usize) -> String {
    format!("Книга {ordinal}")
}

/// A catalog book as it flows through the import pipeline, normalized from a
/// raw spreadsheet/CSV row and enriched stage by stage (category resolution,
/// code assignment) before being upserted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookRecord {
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    /// The untouched category cell, possibly comma-joined multi-category text.
    pub category_raw: String,
    /// Resolved `categories.id`; `None` when resolution found no match.
    pub category_id: Option<Uuid>,
    pub available: bool,
    /// Globally unique business key (`SB-<year>-<seq>`); empty until the
    /// code assigner runs.
    pub code: String,
    pub qty_total: i32,
    pub qty_available: i32,
    /// Rental price in UAH. Convenience `f64` at pipeline level; persisted as
    /// `NUMERIC(10,2)`, so values are rounded to two decimal places at write
    /// time.
    pub price_uah: f64,
}

impl BookRecord {
    /// Returns `true` once the category resolver produced a match.
    #[must_use]
    pub fn has_category(&self) -> bool {
        self.category_id.is_some()
    }

    /// Returns `true` when the title is a row-ordinal placeholder rather than
    /// real source data.
    #[must_use]
    pub fn has_placeholder_title(&self) -> bool {
        self.title.starts_with("Книга ")
    }
}
