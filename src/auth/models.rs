//! Authentication data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// JWT session claims structure
///
/// Claim names match the wire format consumed by the frontends
/// (`userId` / `isAdmin`). `is_admin` is always false for tokens issued
/// by the Google login path.
#[derive(Serialize, Deserialize, Debug)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
    pub exp: usize,
}

/// User database model
///
/// `google_id` is the provider subject claim and the primary lookup key;
/// exactly one row exists per distinct value. `email` and `name` are copied
/// from the verified token at creation time and never refreshed here.
/// The trailing optional fields belong to account features outside the
/// login flow and are read-only pass-through.
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: String,
    pub google_id: String,
    pub email: String,
    pub name: String,
    pub status: String,
    pub password_set: Option<bool>,
    pub codechef_username: Option<String>,
    pub verification_hex: Option<String>,
    pub submission_id: Option<String>,
    pub created_at: Option<String>,
}

/// Google login request body
#[derive(Deserialize)]
pub struct GoogleLoginRequest {
    #[serde(default)]
    pub token: String,
}
