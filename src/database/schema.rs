//! Idempotent schema application.
//!
//! The schema has no version table; every statement here is safe to run on
//! every startup. Tables and indexes use `IF NOT EXISTS`. Columns that
//! arrived after a table's first shipped shape are added only after
//! introspecting `pragma_table_info`, never by attempting the ALTER and
//! ignoring the failure.

use anyhow::Result;
use sqlx::SqlitePool;

use crate::utils::logging::log_database_operation;

const TABLES: &[(&str, &str)] = &[
    (
        "certificate_orders",
        r#"
        CREATE TABLE IF NOT EXISTS certificate_orders (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            fio TEXT NOT NULL,
            group_name TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "polls",
        r#"
        CREATE TABLE IF NOT EXISTS polls (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            type TEXT NOT NULL,
            title TEXT,
            question TEXT,
            options TEXT,
            link_or_file_id TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "user_groups",
        r#"
        CREATE TABLE IF NOT EXISTS user_groups (
            user_id INTEGER PRIMARY KEY,
            group_name TEXT NOT NULL
        )
        "#,
    ),
    (
        "pedagog_auth",
        r#"
        CREATE TABLE IF NOT EXISTS pedagog_auth (
            user_id INTEGER PRIMARY KEY,
            fio TEXT NOT NULL,
            password_hash TEXT NOT NULL
        )
        "#,
    ),
    (
        "student_auth",
        r#"
        CREATE TABLE IF NOT EXISTS student_auth (
            user_id INTEGER PRIMARY KEY,
            fio TEXT NOT NULL,
            group_name TEXT NOT NULL,
            password_hash TEXT NOT NULL
        )
        "#,
    ),
    (
        "lunch_schedule",
        r#"
        CREATE TABLE IF NOT EXISTS lunch_schedule (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            group_name TEXT NOT NULL,
            schedule_date TEXT NOT NULL,
            start_time TEXT NOT NULL,
            end_time TEXT NOT NULL,
            note TEXT
        )
        "#,
    ),
    (
        "open_doors_registrations",
        r#"
        CREATE TABLE IF NOT EXISTS open_doors_registrations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            event_index INTEGER NOT NULL,
            fio TEXT NOT NULL,
            contact TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    ),
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_pedagog_auth_fio ON pedagog_auth(fio)",
    "CREATE INDEX IF NOT EXISTS idx_student_auth_fio ON student_auth(fio)",
    "CREATE INDEX IF NOT EXISTS idx_certificate_orders_user_id ON certificate_orders(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_polls_user_id ON polls(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_polls_target_audience ON polls(target_audience)",
    "CREATE INDEX IF NOT EXISTS idx_lunch_schedule_group ON lunch_schedule(group_name)",
    "CREATE INDEX IF NOT EXISTS idx_lunch_schedule_date ON lunch_schedule(schedule_date)",
    "CREATE INDEX IF NOT EXISTS idx_open_doors_reg_user ON open_doors_registrations(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_open_doors_reg_event ON open_doors_registrations(event_index)",
];

/// Ensures every table, evolved column, and index exists.
pub async fn apply(pool: &SqlitePool) -> Result<()> {
    for (table, ddl) in TABLES {
        sqlx::query(ddl).execute(pool).await?;
        log_database_operation("ensure_table", table, None);
    }

    // Poll targeting shipped after the polls table itself.
    ensure_column(pool, "polls", "target_audience", "TEXT").await?;
    ensure_column(pool, "polls", "target_groups", "TEXT").await?;

    for ddl in INDEXES {
        sqlx::query(ddl).execute(pool).await?;
    }
    log_database_operation("ensure_indexes", "all", Some("lookup indexes ensured"));

    Ok(())
}

/// Adds `column` to `table` unless introspection shows it already exists.
async fn ensure_column(pool: &SqlitePool, table: &str, column: &str, decl: &str) -> Result<()> {
    let sql = format!("SELECT name FROM pragma_table_info('{table}')");
    let columns: Vec<String> = sqlx::query_scalar(&sql).fetch_all(pool).await?;

    if columns.iter().any(|c| c == column) {
        return Ok(());
    }

    log_database_operation("alter", table, Some(&format!("adding column {column}")));
    let alter = format!("ALTER TABLE {table} ADD COLUMN {column} {decl}");
    sqlx::query(&alter).execute(pool).await?;

    Ok(())
}
