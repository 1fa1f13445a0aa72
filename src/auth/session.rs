//! Session token issuing and cookie shaping.
//!
//! Sessions are stateless: the signed JWT is the full session state, so a
//! token cannot be revoked before its natural expiry. The token travels
//! only in an HTTP-only cookie, never in a response body.

use chrono::{Duration, Utc};
use cookie::time::Duration as CookieDuration;
use cookie::{Cookie, SameSite};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

use super::models::Claims;

/// Cookie carrying the user session token
pub const USER_SESSION_COOKIE: &str = "userAccessToken";

/// Cookie reserved for admin sessions. Never set by this service; logout
/// clears it so a browser holding one ends up fully signed out.
pub const ADMIN_SESSION_COOKIE: &str = "adminAccessToken";

const SESSION_TTL_DAYS: i64 = 7;

/// Sign a session token for a user.
///
/// Claims are fixed to `isAdmin: false` on this path; admin sessions are
/// issued elsewhere with a different secret and cookie name.
pub fn issue_user_token(
    secret: &str,
    user_id: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let exp = (Utc::now() + Duration::days(SESSION_TTL_DAYS)).timestamp() as usize;
    let claims = Claims {
        user_id: user_id.to_string(),
        is_admin: false,
        exp,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Build the user session cookie for a freshly issued token.
///
/// HttpOnly + Secure + SameSite=None: the frontends live on other origins,
/// so the cookie must be cross-site-sendable over HTTPS only.
pub fn user_session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((USER_SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .max_age(CookieDuration::days(SESSION_TTL_DAYS))
        .build()
}

/// Build removal cookies for both session cookie names.
///
/// Browsers only drop a cookie when the clearing attributes match the
/// attributes it was set with, so these must mirror [`user_session_cookie`]
/// exactly (and the admin cookie's set-time attributes, which are the same).
pub fn clear_session_cookies() -> [Cookie<'static>; 2] {
    [
        removal_cookie(USER_SESSION_COOKIE),
        removal_cookie(ADMIN_SESSION_COOKIE),
    ]
}

fn removal_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .max_age(CookieDuration::ZERO)
        .build()
}
