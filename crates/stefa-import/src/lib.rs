//! Catalog import pipeline: row parsing, category resolution, code/article
//! assignment, batched upserting, and run reporting.
//!
//! Stages are pure transformations over in-memory lists; the only I/O lives
//! in [`source`] (reading CSV data) and in the per-batch operation the caller
//! passes to [`batch::drain_batches`]. Malformed rows are defaulted, never
//! rejected, so output counts always equal input row counts.

pub mod assign;
pub mod batch;
pub mod error;
pub mod report;
pub mod resolver;
pub mod row;
pub mod source;

pub use assign::{assign_articles, assign_sequence_codes, sequence_code, ArticleBook, ArticlePlan};
pub use batch::{drain_batches, BatchTotals};
pub use error::ImportError;
pub use report::{write_sql_artifact, RunReport};
pub use resolver::resolve_category;
pub use row::{parse_row, parse_table};
pub use source::{fetch_csv_url, read_csv_path, RawTable};
