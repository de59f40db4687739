//! The `status` command: catalog counts for operator review.

use anyhow::Context;

pub(crate) async fn run_status(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let total = stefa_db::count_books(pool)
        .await
        .context("failed to count books")?;
    let without_category = stefa_db::count_books_without_category(pool)
        .await
        .context("failed to count books without category")?;
    let without_article = stefa_db::count_books_without_article(pool)
        .await
        .context("failed to count books without article")?;

    println!("catalog status");
    println!("  books:            {total}");
    println!("  without category: {without_category}");
    println!("  without article:  {without_article}");

    if without_article > 0 {
        let examples = stefa_db::list_books_missing_article(pool, 5)
            .await
            .context("failed to list books without article")?;
        println!("  oldest books awaiting an article:");
        for book in examples {
            println!(
                "    {} | {} — {} ({} грн)",
                book.code, book.title, book.author, book.price_uah
            );
        }
    }

    Ok(())
}
