// Application state shared across all modules

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::services::GoogleVerifier;

/// Application state containing the database pool, services, and configuration
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub jwt_secret: String,
    pub google_verifier: Arc<GoogleVerifier>,
    pub user_frontend_url: Option<String>,
    pub admin_frontend_url: Option<String>,
}
