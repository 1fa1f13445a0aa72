//! Authentication handlers

use axum::extract::{Extension, Json};
use axum::http::header::SET_COOKIE;
use axum::response::{AppendHeaders, IntoResponse, Response};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

use super::models::GoogleLoginRequest;
use super::{session, store};
use crate::common::{safe_email_log, ApiError, AppState};

/// Fixed client-facing message for every authentication failure. Expired
/// token, wrong audience, network failure, timeout and provisioning failure
/// are deliberately indistinguishable to the caller.
const INVALID_TOKEN_MESSAGE: &str = "Invalid Google token";

/// POST /api/auth/google
/// Authenticates a user via Google OAuth ID token
///
/// # Request Body
/// ```json
/// {
///   "token": "<google id token>"
/// }
/// ```
///
/// # Response
/// ```json
/// {
///   "user": { ... }
/// }
/// ```
///
/// The signed session token is delivered only as an HTTP-only cookie and
/// never appears in the response body.
pub async fn google_login(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<GoogleLoginRequest>,
) -> Result<Response, ApiError> {
    info!("Received Google auth request");
    let state = state_lock.read().await.clone();

    if payload.token.is_empty() {
        return Err(ApiError::ValidationError("Token is required".to_string()));
    }

    match google_login_inner(&state, &payload.token).await {
        Ok(response) => Ok(response),
        // Validation never reaches here; everything past the token-presence
        // check collapses into the one generic unauthorized response so
        // internal failure modes are not distinguishable from the outside.
        Err(e) => {
            error!(error = %e, "Google auth error");
            Err(ApiError::Unauthorized(INVALID_TOKEN_MESSAGE.to_string()))
        }
    }
}

async fn google_login_inner(state: &AppState, token: &str) -> Result<Response, ApiError> {
    let identity = state
        .google_verifier
        .verify(token)
        .await
        .map_err(|_| ApiError::Unauthorized(INVALID_TOKEN_MESSAGE.to_string()))?;

    let user = store::find_or_create(&state.db, &identity.sub, &identity.email, &identity.name)
        .await
        .map_err(ApiError::DatabaseError)?;

    let jwt_token = session::issue_user_token(&state.jwt_secret, &user.id).map_err(|e| {
        error!(
            error = %e,
            user_id = %user.id,
            "JWT encoding error during authentication"
        );
        ApiError::InternalServer("jwt error".to_string())
    })?;

    info!(
        user_id = %user.id,
        email = %safe_email_log(&user.email),
        "User authentication successful via Google login"
    );

    let cookie = session::user_session_cookie(jwt_token);

    // Only public user fields; no token in the body
    let resp = serde_json::json!({
        "user": {
            "id": user.id,
            "name": user.name,
            "email": user.email,
            "status": user.status,
            "passwordSet": user.password_set,
            "codechefUsername": user.codechef_username,
            "verificationHex": user.verification_hex,
            "submissionId": user.submission_id,
        },
    });

    Ok((
        AppendHeaders([(SET_COOKIE, cookie.to_string())]),
        Json(resp),
    )
        .into_response())
}

/// POST /api/auth/logout
/// Clears both session cookies. Stateless and unauthenticated: logging out
/// a caller with no session is a no-op that still reports success.
///
/// # Response
/// ```json
/// {
///   "message": "Logged out successfully"
/// }
/// ```
pub async fn logout_handler() -> impl IntoResponse {
    let [user_cookie, admin_cookie] = session::clear_session_cookies();

    info!("User logout successful");

    (
        AppendHeaders([
            (SET_COOKIE, user_cookie.to_string()),
            (SET_COOKIE, admin_cookie.to_string()),
        ]),
        Json(serde_json::json!({
            "message": "Logged out successfully"
        })),
    )
}
