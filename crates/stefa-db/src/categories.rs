//! Database operations for the `categories` table.

use sqlx::PgPool;
use stefa_core::CategoryEntry;
use uuid::Uuid;

use crate::DbError;

/// A row from the `categories` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryRow {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
}

/// Read the full category snapshot and assemble one level of nesting.
///
/// Called once at the start of a run; the result is treated as immutable for
/// the run's duration.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_categories(pool: &PgPool) -> Result<Vec<CategoryEntry>, DbError> {
    let rows = sqlx::query_as::<_, CategoryRow>(
        "SELECT id, name, parent_id FROM categories ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    Ok(assemble_tree(rows))
}

/// Group child rows under their parents. Rows referencing a missing parent
/// are promoted to roots with a warning rather than dropped.
fn assemble_tree(rows: Vec<CategoryRow>) -> Vec<CategoryEntry> {
    let known_ids: std::collections::HashSet<Uuid> = rows.iter().map(|r| r.id).collect();

    let mut roots: Vec<CategoryEntry> = Vec::new();
    let mut children: Vec<(Uuid, CategoryRow)> = Vec::new();

    for row in rows {
        match row.parent_id {
            Some(parent) if known_ids.contains(&parent) => children.push((parent, row)),
            Some(parent) => {
                tracing::warn!(category = %row.name, parent = %parent, "parent category missing; treating as root");
                roots.push(CategoryEntry {
                    id: row.id,
                    name: row.name,
                    subcategories: vec![],
                });
            }
            None => roots.push(CategoryEntry {
                id: row.id,
                name: row.name,
                subcategories: vec![],
            }),
        }
    }

    for (parent_id, child) in children {
        if let Some(parent) = roots.iter_mut().find(|root| root.id == parent_id) {
            parent.subcategories.push(CategoryEntry {
                id: child.id,
                name: child.name,
                subcategories: vec![],
            });
        } else {
            // Parent exists in the table but is itself a child; the catalog
            // only nests one level, so deeper rows surface as roots.
            tracing::warn!(category = %child.name, "category nested deeper than one level; treating as root");
            roots.push(CategoryEntry {
                id: child.id,
                name: child.name,
                subcategories: vec![],
            });
        }
    }

    roots
}
