// src/main.rs
use axum::{extract::Extension, response::Json, routing::get, Router};
use dotenv::dotenv;
use reqwest::Client;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::env;
use std::path::PathBuf;
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod auth;
mod common;
mod services;

use common::AppState;
use services::GoogleVerifier;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // ========================================================================
    // ENVIRONMENT CONFIGURATION
    // ========================================================================

    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://auth_api.db".to_string());
    let jwt_secret =
        env::var("JWT_ACCESS_SECRET").unwrap_or_else(|_| "replace_with_strong_secret".to_string());
    let google_client_id = env::var("GOOGLE_CLIENT_ID").unwrap_or_default();
    let user_frontend_url = env::var("USER_FRONTEND_URL").ok();
    let admin_frontend_url = env::var("ADMIN_FRONTEND_URL").ok();

    if google_client_id.is_empty() {
        warn!("GOOGLE_CLIENT_ID is not set; Google logins will fail verification");
    }

    // ========================================================================
    // DATABASE SETUP
    // ========================================================================

    if let Some(path_part) = database_url.strip_prefix("sqlite://") {
        let path_without_params = path_part.split('?').next().unwrap_or("");
        if !path_without_params.is_empty() && !path_without_params.starts_with(':') {
            let db_path = PathBuf::from(path_without_params);
            if let Some(parent) = db_path.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
        }
    }

    let connect_options = SqliteConnectOptions::from_str(&database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .connect_with(connect_options)
        .await?;

    common::migrations::run_migrations(&pool).await?;

    // ========================================================================
    // SERVICE INITIALIZATION
    // ========================================================================

    let http_client = Client::builder().no_proxy().build()?;

    let google_verifier = Arc::new(GoogleVerifier::new(http_client, google_client_id));
    info!("GoogleVerifier initialized");

    // ========================================================================
    // APPLICATION STATE
    // ========================================================================

    let app_state = AppState {
        db: pool,
        jwt_secret,
        google_verifier,
        user_frontend_url,
        admin_frontend_url,
    };

    info!(
        user_frontend = ?app_state.user_frontend_url,
        admin_frontend = ?app_state.admin_frontend_url,
        "Frontend origins configured (cookies gate cross-origin access, not CORS)"
    );

    let shared = Arc::new(RwLock::new(app_state));

    // ========================================================================
    // ROUTER COMPOSITION
    // ========================================================================

    let app = Router::new()
        .merge(auth::auth_routes())
        .route("/api/health", get(health))
        .layer(Extension(shared.clone()))
        .layer(
            // Echo back whichever origin presents itself. Access control is
            // carried by the cookie attributes (Secure, SameSite) and the
            // browser's cookie-sending rules, not by an origin allowlist.
            CorsLayer::new()
                .allow_origin(AllowOrigin::mirror_request())
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::PUT,
                    axum::http::Method::DELETE,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::AUTHORIZATION,
                ])
                .allow_credentials(true),
        )
        .layer(TraceLayer::new_for_http());

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "message": "Server is running"
    }))
}
