//! Offline unit tests for stefa-db pool configuration and row types.
//! These tests do not require a live database connection.

use std::path::PathBuf;

use chrono::Utc;
use rust_decimal::Decimal;
use stefa_core::{AppConfig, Environment};
use stefa_db::{BookRow, PoolConfig, RenumberRow};
use uuid::Uuid;

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        log_level: "info".to_string(),
        prefixes_path: PathBuf::from("./config/prefixes.yaml"),
        default_category: "Дитяча література".to_string(),
        batch_size: 20,
        batch_delay_ms: 150,
        fetch_timeout_secs: 30,
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

/// Compile-time smoke test: confirm that [`BookRow`] has all expected fields
/// with the correct types. No database required.
#[test]
fn book_row_has_expected_fields() {
    let now = Utc::now();
    let row = BookRow {
        id: Uuid::new_v4(),
        code: "SB-2025-0001".to_string(),
        article: Some("KZ-001".to_string()),
        title: "Колобок".to_string(),
        author: "Нар. творчість".to_string(),
        isbn: None,
        description: None,
        cover_url: None,
        category_id: Some(Uuid::new_v4()),
        available: true,
        qty_total: 2,
        qty_available: 1,
        price_uah: Decimal::new(12050, 2),
        created_at: now,
        updated_at: now,
    };

    assert_eq!(row.code, "SB-2025-0001");
    assert_eq!(row.article.as_deref(), Some("KZ-001"));
    assert_eq!(row.price_uah.to_string(), "120.50");
}

#[test]
fn renumber_row_tolerates_missing_category() {
    let row = RenumberRow {
        id: Uuid::new_v4(),
        title: "Загадкова".to_string(),
        code: "SB-2025-0002".to_string(),
        article: None,
        category_name: None,
        created_at: Utc::now(),
    };

    assert!(row.category_name.is_none());
    assert!(row.article.is_none());
}
