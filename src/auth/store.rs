//! Find-or-create user provisioning against the users table

use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use super::models::User;
use crate::common::{generate_user_id, safe_email_log};

/// Look up a user by Google subject id, creating the record on first login.
///
/// Existing users are returned unchanged; email/name drift on the provider
/// side is not reconciled. New users start with status 'NONE'.
///
/// Two concurrent first logins for the same subject can both observe
/// "absent" and race to insert; the UNIQUE constraint on `google_id`
/// rejects the loser, which then re-reads and returns the winner's row.
pub async fn find_or_create(
    pool: &SqlitePool,
    google_id: &str,
    email: &str,
    name: &str,
) -> Result<User, sqlx::Error> {
    if let Some(existing) = fetch_by_google_id(pool, google_id).await? {
        debug!(
            user_id = %existing.id,
            provider_id = %google_id,
            "Found existing user in database"
        );
        return Ok(existing);
    }

    let id = generate_user_id();
    info!(
        user_id = %id,
        email = %safe_email_log(email),
        "Creating new user account via Google login"
    );

    let inserted = sqlx::query(
        "INSERT INTO users (id, google_id, email, name, status) VALUES (?, ?, ?, ?, 'NONE')",
    )
    .bind(&id)
    .bind(google_id)
    .bind(email)
    .bind(name)
    .execute(pool)
    .await;

    if let Err(e) = inserted {
        let unique_violation = e
            .as_database_error()
            .map_or(false, |db_err| db_err.is_unique_violation());

        if unique_violation {
            // Lost the race to a concurrent first login; the winner's row
            // is the user now.
            warn!(
                provider_id = %google_id,
                "Concurrent user creation detected, re-reading existing row"
            );
            if let Some(winner) = fetch_by_google_id(pool, google_id).await? {
                return Ok(winner);
            }
        }
        return Err(e);
    }

    // fetch back the persisted row so defaults (status, created_at) are populated
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(&id)
        .fetch_one(pool)
        .await
}

async fn fetch_by_google_id(
    pool: &SqlitePool,
    google_id: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE google_id = ?")
        .bind(google_id)
        .fetch_optional(pool)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::migrations;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        // one connection: every pooled connection to :memory: is its own db
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory database");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        pool
    }

    #[tokio::test]
    async fn test_first_login_creates_user_with_none_status() {
        let pool = test_pool().await;

        let user = find_or_create(&pool, "google-sub-1", "user@example.com", "Example User")
            .await
            .expect("find_or_create should succeed");

        assert!(user.id.starts_with("U_"));
        assert_eq!(user.google_id, "google-sub-1");
        assert_eq!(user.email, "user@example.com");
        assert_eq!(user.name, "Example User");
        assert_eq!(user.status, "NONE");
        assert_eq!(user.password_set, None);
    }

    #[tokio::test]
    async fn test_repeat_login_returns_same_user() {
        let pool = test_pool().await;

        let first = find_or_create(&pool, "google-sub-2", "user@example.com", "Example User")
            .await
            .expect("first login should succeed");

        // Provider-side drift is not reconciled on repeat logins
        let second = find_or_create(&pool, "google-sub-2", "renamed@example.com", "Renamed")
            .await
            .expect("repeat login should succeed");

        assert_eq!(first.id, second.id);
        assert_eq!(second.email, "user@example.com");
        assert_eq!(second.name, "Example User");

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .expect("count query should succeed");
        assert_eq!(count.0, 1, "repeat login must not create a second row");
    }

    #[tokio::test]
    async fn test_distinct_subjects_create_distinct_users() {
        let pool = test_pool().await;

        let a = find_or_create(&pool, "google-sub-a", "a@example.com", "A")
            .await
            .expect("login should succeed");
        let b = find_or_create(&pool, "google-sub-b", "b@example.com", "B")
            .await
            .expect("login should succeed");

        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_storage_layer_enforces_subject_uniqueness() {
        let pool = test_pool().await;

        find_or_create(&pool, "google-sub-c", "c@example.com", "C")
            .await
            .expect("login should succeed");

        // A direct second insert for the same subject must be rejected by
        // the UNIQUE constraint, independent of find_or_create's pre-check.
        let result = sqlx::query(
            "INSERT INTO users (id, google_id, email, name, status) VALUES (?, ?, ?, ?, 'NONE')",
        )
        .bind("U_OTHER1")
        .bind("google-sub-c")
        .bind("c@example.com")
        .bind("C")
        .execute(&pool)
        .await;

        let err = result.expect_err("duplicate google_id insert should fail");
        assert!(err
            .as_database_error()
            .map_or(false, |db_err| db_err.is_unique_violation()));
    }
}
