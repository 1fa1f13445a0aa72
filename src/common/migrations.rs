// src/common/migrations.rs
//! Database migration and schema management

use sqlx::SqlitePool;
use tracing::info;

/// Run all database migrations
///
/// Tables are created with IF NOT EXISTS so this is safe to run on every
/// startup against an existing database.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    create_user_tables(pool).await?;
    create_indexes(pool).await?;

    info!("Database migration completed successfully");

    Ok(())
}

/// Create user tables
///
/// `google_id` carries a UNIQUE constraint: exactly one user may exist per
/// Google subject. Concurrent first logins for the same subject are resolved
/// by the storage layer rejecting the losing insert.
async fn create_user_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            google_id TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL,
            name TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'NONE',
            password_set INTEGER,
            codechef_username TEXT,
            verification_hex TEXT,
            submission_id TEXT,
            created_at TEXT DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create performance indexes
async fn create_indexes(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS idx_users_google_id ON users(google_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)")
        .execute(pool)
        .await?;

    Ok(())
}
