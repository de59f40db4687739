use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

mod import_cmd;
mod renumber;
mod status;

#[derive(Debug, Parser)]
#[command(name = "stefa")]
#[command(about = "Stefa.books catalog bulk-load toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load books from a CSV file or published-CSV URL into the catalog
    Import {
        /// Local CSV path or http(s) URL of a published-CSV export
        #[arg(long)]
        source: String,

        /// Preview the normalized records without writing to the database
        #[arg(long)]
        dry_run: bool,

        /// Records per upsert batch (defaults to STEFA_BATCH_SIZE)
        #[arg(long)]
        batch_size: Option<usize>,

        /// First sequence number, to continue after a manual batch
        #[arg(long, default_value_t = 1)]
        start_offset: usize,

        /// Write an idempotent SQL replay script to this path
        #[arg(long)]
        sql_out: Option<PathBuf>,

        /// Write a JSON run report to this path
        #[arg(long)]
        json_report: Option<PathBuf>,
    },
    /// Recompute per-category articles for the whole catalog
    Renumber {
        /// Preview the assignments without writing to the database
        #[arg(long)]
        dry_run: bool,
    },
    /// Show catalog counts and books needing operator attention
    Status,
    /// Apply pending database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = stefa_core::load_app_config().context("failed to load configuration")?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let pool = stefa_db::connect_pool(
        &config.database_url,
        stefa_db::PoolConfig::from_app_config(&config),
    )
    .await
    .context("failed to connect to database")?;

    match cli.command {
        Commands::Import {
            source,
            dry_run,
            batch_size,
            start_offset,
            sql_out,
            json_report,
        } => {
            import_cmd::run_import(
                &pool,
                &config,
                &import_cmd::ImportOptions {
                    source,
                    dry_run,
                    batch_size,
                    start_offset,
                    sql_out,
                    json_report,
                },
            )
            .await
        }
        Commands::Renumber { dry_run } => renumber::run_renumber(&pool, &config, dry_run).await,
        Commands::Status => status::run_status(&pool).await,
        Commands::Migrate => {
            let applied = stefa_db::run_migrations(&pool)
                .await
                .context("migration failed")?;
            println!("applied {applied} migrations");
            Ok(())
        }
    }
}
