//! Database operations for the `books` table.
//!
//! The bulk upsert conflicts on the business `code` column, which makes
//! re-running a full import the recovery path after a partial failure.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use stefa_core::BookRecord;
use uuid::Uuid;

use crate::DbError;

/// A stored book row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BookRow {
    pub id: Uuid,
    pub code: String,
    /// Per-category label identifier; `NULL` until a renumber run assigns it.
    pub article: Option<String>,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub category_id: Option<Uuid>,
    pub available: bool,
    pub qty_total: i32,
    pub qty_available: i32,
    /// `NUMERIC(10,2)`; pipeline-level `f64` prices are rounded here.
    pub price_uah: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The slice of a book needed for article renumbering.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RenumberRow {
    pub id: Uuid,
    pub title: String,
    pub code: String,
    pub article: Option<String>,
    /// `NULL` when the book has no resolved category.
    pub category_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Upsert one batch of normalized records in a single statement.
///
/// Conflicts on `code` update every imported column in place. Returns
/// `(inserted, updated)` counts, distinguished via the `xmax` system column
/// (zero on a freshly inserted row version).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the statement fails; the caller counts the
/// whole batch as failed in that case.
pub async fn upsert_books_batch(
    pool: &PgPool,
    batch: &[BookRecord],
) -> Result<(u64, u64), DbError> {
    if batch.is_empty() {
        return Ok((0, 0));
    }

    let mut builder = build_upsert(batch);
    let inserted_flags: Vec<bool> = builder.build_query_scalar().fetch_all(pool).await?;

    let inserted = inserted_flags.iter().filter(|flag| **flag).count() as u64;
    let updated = inserted_flags.len() as u64 - inserted;
    Ok((inserted, updated))
}

/// Build the multi-row upsert statement for a batch. Split out so the
/// generated SQL can be unit-tested without a pool.
fn build_upsert(batch: &[BookRecord]) -> QueryBuilder<'_, Postgres> {
    let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(
        "INSERT INTO books \
             (code, title, author, isbn, description, cover_url, category_id, \
              available, qty_total, qty_available, price_uah) ",
    );

    builder.push_values(batch, |mut row, record| {
        row.push_bind(&record.code)
            .push_bind(&record.title)
            .push_bind(&record.author)
            .push_bind(&record.isbn)
            .push_bind(&record.description)
            .push_bind(&record.cover_url)
            .push_bind(record.category_id)
            .push_bind(record.available)
            .push_bind(record.qty_total)
            .push_bind(record.qty_available)
            .push_bind(record.price_uah)
            .push_unseparated("::numeric(10,2)");
    });

    builder.push(
        " ON CONFLICT (code) DO UPDATE SET \
             title         = EXCLUDED.title, \
             author        = EXCLUDED.author, \
             isbn          = EXCLUDED.isbn, \
             description   = EXCLUDED.description, \
             cover_url     = EXCLUDED.cover_url, \
             category_id   = EXCLUDED.category_id, \
             available     = EXCLUDED.available, \
             qty_total     = EXCLUDED.qty_total, \
             qty_available = EXCLUDED.qty_available, \
             price_uah     = EXCLUDED.price_uah, \
             updated_at    = NOW() \
         RETURNING (xmax = 0) AS inserted",
    );

    builder
}

/// List every book with its category name for a full article recompute.
///
/// Ordered by category then `created_at` ascending. No secondary tie-break
/// on equal timestamps; the renumber pipeline inherits whatever order
/// Postgres returns for ties.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_books_for_renumber(pool: &PgPool) -> Result<Vec<RenumberRow>, DbError> {
    let rows = sqlx::query_as::<_, RenumberRow>(
        "SELECT b.id, b.title, b.code, b.article, c.name AS category_name, b.created_at \
         FROM books b \
         LEFT JOIN categories c ON c.id = b.category_id \
         ORDER BY c.name NULLS LAST, b.created_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Overwrite a book's article unconditionally.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row matches `id`, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn update_article(pool: &PgPool, id: Uuid, article: &str) -> Result<(), DbError> {
    let rows_affected =
        sqlx::query("UPDATE books SET article = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(article)
            .execute(pool)
            .await?
            .rows_affected();

    if rows_affected == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Total books in the catalog.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_books(pool: &PgPool) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM books")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Books whose category resolution came up empty.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_books_without_category(pool: &PgPool) -> Result<i64, DbError> {
    let count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM books WHERE category_id IS NULL")
            .fetch_one(pool)
            .await?;
    Ok(count)
}

/// Books still waiting for an article from a renumber run.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_books_without_article(pool: &PgPool) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM books WHERE article IS NULL")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// A page of books without an article, oldest first, for operator review.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_books_missing_article(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<BookRow>, DbError> {
    let rows = sqlx::query_as::<_, BookRow>(
        "SELECT id, code, article, title, author, isbn, description, cover_url, \
                category_id, available, qty_total, qty_available, price_uah, \
                created_at, updated_at \
         FROM books \
         WHERE article IS NULL \
         ORDER BY created_at \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
