//! The `renumber` command: full per-category article recompute.
//!
//! Articles are recomputed from scratch on every run and previous values are
//! overwritten unconditionally, including any manual edits made between runs.
//! `--dry-run` exists so operators can inspect the plan first.

use anyhow::Context;
use stefa_core::AppConfig;
use stefa_import::{assign_articles, ArticleBook};

/// Run a full article renumber.
///
/// # Errors
///
/// Returns an error for setup failures: an unreadable prefix file or a
/// failed catalog listing. Individual article updates that fail are logged
/// and counted, not propagated.
pub(crate) async fn run_renumber(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    dry_run: bool,
) -> anyhow::Result<()> {
    let prefixes = stefa_core::load_prefixes(&config.prefixes_path)
        .with_context(|| format!("cannot load prefix table from {}", config.prefixes_path.display()))?;

    let rows = stefa_db::list_books_for_renumber(pool)
        .await
        .context("failed to list books for renumbering")?;
    let total = rows.len();

    let mut uncategorized: u64 = 0;
    let books: Vec<ArticleBook> = rows
        .into_iter()
        .filter_map(|row| match row.category_name {
            Some(category) => Some(ArticleBook {
                id: row.id,
                title: row.title,
                category,
                created_at: row.created_at,
            }),
            None => {
                tracing::warn!(code = %row.code, title = %row.title, "book has no category; excluded from renumbering");
                uncategorized += 1;
                None
            }
        })
        .collect();

    let plan = assign_articles(&books, &prefixes);

    if dry_run {
        println!(
            "dry-run: would assign {} articles across {} books ({} uncategorized)",
            plan.assignments.len(),
            total,
            uncategorized
        );
        for assignment in plan.assignments.iter().take(10) {
            println!("  {} -> {}", assignment.book_id, assignment.article);
        }
        for category in &plan.skipped_categories {
            println!("  skipped category without prefix: {category}");
        }
        return Ok(());
    }

    let mut updated: u64 = 0;
    let mut errors: u64 = 0;
    for assignment in &plan.assignments {
        match stefa_db::update_article(pool, assignment.book_id, &assignment.article).await {
            Ok(()) => updated += 1,
            Err(error) => {
                tracing::error!(book_id = %assignment.book_id, %error, "failed to update article");
                errors += 1;
            }
        }
    }

    println!(
        "renumbered {updated} books ({errors} errors, {uncategorized} uncategorized, {} categories without prefix)",
        plan.skipped_categories.len()
    );
    for category in &plan.skipped_categories {
        println!("  skipped category without prefix: {category}");
    }

    Ok(())
}
