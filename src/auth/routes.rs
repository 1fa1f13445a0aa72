//! Authentication routes

use axum::{routing::post, Router};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `POST /api/auth/google` - Google OAuth login, sets the session cookie
/// - `POST /api/auth/logout` - Logout, clears both session cookies
pub fn auth_routes() -> Router {
    Router::new()
        .route("/api/auth/google", post(handlers::google_login))
        .route("/api/auth/logout", post(handlers::logout_handler))
}
