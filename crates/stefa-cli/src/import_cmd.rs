//! The `import` command: source rows through the full normalization pipeline
//! and into the catalog.
//!
//! Setup failures (unreadable source, no rows, no categories) abort before
//! any write occurs. Batch failures are counted and reported; the command
//! still exits zero so operators read the transcript rather than the exit
//! code for partial outcomes.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use chrono::{Datelike, Utc};
use stefa_core::{AppConfig, CategoryLookup};
use stefa_import::{
    assign_sequence_codes, drain_batches, parse_table, resolve_category, write_sql_artifact,
    RawTable, RunReport,
};

pub(crate) struct ImportOptions {
    pub source: String,
    pub dry_run: bool,
    pub batch_size: Option<usize>,
    pub start_offset: usize,
    pub sql_out: Option<PathBuf>,
    pub json_report: Option<PathBuf>,
}

/// Run a full import.
///
/// # Errors
///
/// Returns an error only for setup failures: an unreadable or empty source,
/// or an empty category table. Per-batch write failures are aggregated into
/// the run report instead.
pub(crate) async fn run_import(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    opts: &ImportOptions,
) -> anyhow::Result<()> {
    let table = load_source(&opts.source, config.fetch_timeout_secs)
        .await
        .with_context(|| format!("cannot load source '{}'", opts.source))?;
    tracing::info!(rows = table.row_count(), source = %opts.source, "source loaded");

    let categories = stefa_db::list_categories(pool)
        .await
        .context("failed to load category snapshot")?;
    let lookup = CategoryLookup::from_entries(&categories);
    if lookup.is_empty() {
        anyhow::bail!("category table is empty; run `stefa migrate` and seed categories first");
    }

    let mut records = parse_table(&table.headers, &table.rows);
    for record in &mut records {
        record.category_id = resolve_category(
            &record.category_raw,
            &record.title,
            &lookup,
            &config.default_category,
        );
    }
    assign_sequence_codes(&mut records, Utc::now().year(), opts.start_offset);

    if opts.dry_run {
        println!(
            "dry-run: would upsert {} books from '{}'",
            records.len(),
            opts.source
        );
        for record in records.iter().take(5) {
            let category = record
                .category_id
                .and_then(|id| lookup.name_of(id))
                .unwrap_or("<без категорії>");
            println!("  {} | {} — {}", record.code, record.title, category);
        }
        let unresolved = records.iter().filter(|r| !r.has_category()).count();
        if unresolved > 0 {
            println!("  {unresolved} books would land without a category");
        }
        return Ok(());
    }

    let batch_size = opts.batch_size.unwrap_or(config.batch_size);
    let delay = Duration::from_millis(config.batch_delay_ms);
    let totals = drain_batches(&records, batch_size, delay, |batch| {
        Box::pin(stefa_db::upsert_books_batch(pool, batch))
    })
    .await;

    let report = RunReport::new(&opts.source, &records, totals);
    print!("{}", report.render());

    if let Some(path) = &opts.json_report {
        if let Err(error) = report.write_json(path) {
            tracing::warn!(path = %path.display(), %error, "could not write JSON report");
        }
    }
    if let Some(path) = &opts.sql_out {
        if let Err(error) = write_sql_artifact(path, &records) {
            tracing::warn!(path = %path.display(), %error, "could not write SQL artifact");
        }
    }

    Ok(())
}

/// Load rows from a local CSV path or a published-CSV URL.
async fn load_source(source: &str, timeout_secs: u64) -> anyhow::Result<RawTable> {
    if is_url(source) {
        Ok(stefa_import::fetch_csv_url(source, timeout_secs).await?)
    } else {
        Ok(stefa_import::read_csv_path(std::path::Path::new(source))?)
    }
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
