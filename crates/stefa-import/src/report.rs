//! Run report: human-readable transcript plus optional JSON and SQL
//! artifacts for auditing.
//!
//! Artifact writes are best-effort from the run's point of view: the CLI
//! logs failures and keeps its exit status.

use std::path::Path;

use serde::Serialize;
use stefa_core::BookRecord;

use crate::batch::BatchTotals;
use crate::error::ImportError;

/// How many records the report keeps as a sample for operator review.
const SAMPLE_SIZE: usize = 3;

#[derive(Debug, Clone, Serialize)]
pub struct SampleRecord {
    pub code: String,
    pub title: String,
    pub author: String,
    pub category_resolved: bool,
}

/// Aggregated outcome of one import run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub source: String,
    pub total_rows: u64,
    pub totals: BatchTotals,
    /// Titles of books whose category could not be resolved.
    pub without_category: Vec<String>,
    pub sample: Vec<SampleRecord>,
}

impl RunReport {
    #[must_use]
    pub fn new(source: &str, records: &[BookRecord], totals: BatchTotals) -> Self {
        let without_category: Vec<String> = records
            .iter()
            .filter(|record| !record.has_category())
            .map(|record| record.title.clone())
            .collect();

        let sample = records
            .iter()
            .take(SAMPLE_SIZE)
            .map(|record| SampleRecord {
                code: record.code.clone(),
                title: record.title.clone(),
                author: record.author.clone(),
                category_resolved: record.has_category(),
            })
            .collect();

        Self {
            source: source.to_string(),
            total_rows: records.len() as u64,
            totals,
            without_category,
            sample,
        }
    }

    /// Render the operator-facing console transcript.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("import run for '{}'\n", self.source));
        out.push_str(&format!(
            "  rows: {}  loaded: {}  updated: {}  errors: {}\n",
            self.total_rows, self.totals.loaded, self.totals.updated, self.totals.errors
        ));
        if self.without_category.is_empty() {
            out.push_str("  all books resolved to a category\n");
        } else {
            out.push_str(&format!(
                "  {} books without category (needs attention):\n",
                self.without_category.len()
            ));
            for title in &self.without_category {
                out.push_str(&format!("    - {title}\n"));
            }
        }
        for record in &self.sample {
            out.push_str(&format!(
                "  sample: {} | {} — {}\n",
                record.code, record.title, record.author
            ));
        }
        out
    }

    /// Write the report as a JSON artifact.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::ArtifactIo`] if the file cannot be written.
    pub fn write_json(&self, path: &Path) -> Result<(), ImportError> {
        let json = serde_json::to_string_pretty(self).map_err(|e| ImportError::ArtifactIo {
            path: path.display().to_string(),
            source: std::io::Error::other(e),
        })?;
        std::fs::write(path, json).map_err(|e| ImportError::ArtifactIo {
            path: path.display().to_string(),
            source: e,
        })
    }
}

/// Write an idempotent SQL artifact replaying the run's upserts.
///
/// One `INSERT ... ON CONFLICT (code) DO UPDATE` statement per record, safe
/// to re-run against the catalog.
///
/// # Errors
///
/// Returns [`ImportError::ArtifactIo`] if the file cannot be written.
pub fn write_sql_artifact(path: &Path, records: &[BookRecord]) -> Result<(), ImportError> {
    let mut sql = String::from("-- generated catalog upsert script; idempotent by code\n");
    for record in records {
        sql.push_str(&upsert_statement(record));
        sql.push('\n');
    }
    std::fs::write(path, sql).map_err(|e| ImportError::ArtifactIo {
        path: path.display().to_string(),
        source: e,
    })
}

fn upsert_statement(record: &BookRecord) -> String {
    format!(
        "INSERT INTO books (code, title, author, isbn, description, cover_url, category_id, \
         available, qty_total, qty_available, price_uah) VALUES ({}, {}, {}, {}, {}, {}, {}, \
         {}, {}, {}, {:.2}) ON CONFLICT (code) DO UPDATE SET title = EXCLUDED.title, \
         author = EXCLUDED.author, isbn = EXCLUDED.isbn, description = EXCLUDED.description, \
         cover_url = EXCLUDED.cover_url, category_id = EXCLUDED.category_id, \
         available = EXCLUDED.available, qty_total = EXCLUDED.qty_total, \
         qty_available = EXCLUDED.qty_available, price_uah = EXCLUDED.price_uah, \
         updated_at = NOW();",
        quote(&record.code),
        quote(&record.title),
        quote(&record.author),
        quote_opt(record.isbn.as_deref()),
        quote_opt(record.description.as_deref()),
        quote_opt(record.cover_url.as_deref()),
        record
            .category_id
            .map_or_else(|| "NULL".to_string(), |id| format!("'{id}'")),
        record.available,
        record.qty_total,
        record.qty_available,
        record.price_uah,
    )
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn quote_opt(value: Option<&str>) -> String {
    value.map_or_else(|| "NULL".to_string(), quote)
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn record(title: &str, code: &str, category_id: Option<Uuid>) -> BookRecord {
        BookRecord {
            title: title.to_string(),
            author: "Нар. творчість".to_string(),
            isbn: None,
            description: None,
            cover_url: None,
            category_raw: "Казки".to_string(),
            category_id,
            available: true,
            code: code.to_string(),
            qty_total: 2,
            qty_available: 1,
            price_uah: 120.5,
        }
    }

    #[test]
    fn report_collects_books_without_category() {
        let records = vec![
            record("Колобок", "SB-2025-0001", Some(Uuid::new_v4())),
            record("Загадкова", "SB-2025-0002", None),
        ];
        let report = RunReport::new("books.csv", &records, BatchTotals::default());
        assert_eq!(report.without_category, vec!["Загадкова".to_string()]);
        assert_eq!(report.total_rows, 2);
    }

    #[test]
    fn report_sample_is_capped() {
        let records: Vec<BookRecord> = (0..10)
            .map(|i| record(&format!("Книга {i}"), &format!("SB-2025-{i:04}"), None))
            .collect();
        let report = RunReport::new("books.csv", &records, BatchTotals::default());
        assert_eq!(report.sample.len(), SAMPLE_SIZE);
        assert_eq!(report.sample[0].code, "SB-2025-0000");
    }

    #[test]
    fn render_mentions_counts_and_warnings() {
        let records = vec![record("Загадкова", "SB-2025-0001", None)];
        let totals = BatchTotals {
            loaded: 1,
            updated: 0,
            errors: 0,
        };
        let rendered = RunReport::new("books.csv", &records, totals).render();
        assert!(rendered.contains("loaded: 1"));
        assert!(rendered.contains("needs attention"));
        assert!(rendered.contains("Загадкова"));
    }

    #[test]
    fn upsert_statement_escapes_quotes_and_nulls() {
        let mut r = record("Д'Артаньян", "SB-2025-0001", None);
        r.description = Some("п'єса".to_string());
        let sql = upsert_statement(&r);
        assert!(sql.contains("'Д''Артаньян'"));
        assert!(sql.contains("'п''єса'"));
        assert!(sql.contains("NULL"));
        assert!(sql.contains("ON CONFLICT (code) DO UPDATE"));
        assert!(sql.contains("120.50"));
    }

    #[test]
    fn sql_artifact_has_one_statement_per_record() {
        let dir = std::env::temp_dir().join("stefa-report-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("run.sql");
        let records = vec![
            record("Колобок", "SB-2025-0001", None),
            record("Ріпка", "SB-2025-0002", None),
        ];
        write_sql_artifact(&path, &records).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.matches("INSERT INTO books").count(), 2);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn json_artifact_roundtrips() {
        let dir = std::env::temp_dir().join("stefa-report-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("run.json");
        let records = vec![record("Колобок", "SB-2025-0001", None)];
        let report = RunReport::new(
            "books.csv",
            &records,
            BatchTotals {
                loaded: 1,
                updated: 0,
                errors: 0,
            },
        );
        report.write_json(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["totals"]["loaded"], 1);
        assert_eq!(value["source"], "books.csv");
        std::fs::remove_file(&path).ok();
    }
}
