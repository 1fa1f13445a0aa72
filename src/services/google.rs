// src/services/google.rs
//! Google ID token verification.
//!
//! Tokens are checked against Google's tokeninfo endpoint
//! (https://developers.google.com/identity/sign-in/web/backend-auth) with a
//! hard 10 second timeout. Every failure mode - network error, non-success
//! status, malformed payload, audience mismatch, expired token, timeout -
//! collapses into the single opaque [`GoogleAuthError`]. The concrete cause
//! is logged here for operators and never surfaced to callers.

use chrono::Utc;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::common::safe_email_log;

const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Hard cap on the round trip to Google. The request races this timer;
/// if the timer wins, the in-flight call is dropped and its eventual
/// result discarded.
const VERIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// Opaque verification failure. Callers only learn that the token did not
/// check out; the cause has already been logged.
#[derive(Debug, Error)]
#[error("Google ID token verification failed")]
pub struct GoogleAuthError;

/// Verified identity claims extracted from a Google ID token
#[derive(Debug, Clone)]
pub struct GoogleIdentity {
    pub sub: String,
    pub email: String,
    pub name: String,
}

/// Verifies Google ID tokens against a fixed audience (the OAuth client id)
pub struct GoogleVerifier {
    http: Client,
    client_id: String,
}

impl GoogleVerifier {
    pub fn new(http: Client, client_id: String) -> Self {
        Self { http, client_id }
    }

    /// Verify a raw ID token and extract its identity claims.
    ///
    /// The caller is responsible for rejecting empty tokens before this
    /// point; an empty string here simply fails verification.
    pub async fn verify(&self, raw_token: &str) -> Result<GoogleIdentity, GoogleAuthError> {
        let body = match tokio::time::timeout(VERIFY_TIMEOUT, self.fetch_tokeninfo(raw_token))
            .await
        {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    timeout_secs = VERIFY_TIMEOUT.as_secs(),
                    "Google token verification timed out"
                );
                return Err(GoogleAuthError);
            }
        };

        self.validate_claims(&body)
    }

    /// One round trip to the tokeninfo endpoint, returning the parsed JSON body
    async fn fetch_tokeninfo(&self, raw_token: &str) -> Result<serde_json::Value, GoogleAuthError> {
        let tokeninfo_url = format!("{}?id_token={}", TOKENINFO_URL, raw_token);

        let resp = self.http.get(&tokeninfo_url).send().await.map_err(|e| {
            error!(
                error = %e,
                endpoint = TOKENINFO_URL,
                "HTTP error contacting Google tokeninfo endpoint"
            );
            GoogleAuthError
        })?;

        let status = resp.status();
        debug!(http_status = %status, "Received response from Google tokeninfo endpoint");

        if !status.is_success() {
            warn!(
                http_status = %status,
                "Google tokeninfo rejected the token"
            );
            return Err(GoogleAuthError);
        }

        resp.json::<serde_json::Value>().await.map_err(|e| {
            error!(
                error = %e,
                "Failed to parse Google tokeninfo JSON response - malformed token"
            );
            GoogleAuthError
        })
    }

    /// Check audience and expiry, then extract sub/email/name
    fn validate_claims(&self, body: &serde_json::Value) -> Result<GoogleIdentity, GoogleAuthError> {
        match body.get("aud").and_then(|v| v.as_str()) {
            Some(aud) if aud == self.client_id => {
                debug!(token_audience = %aud, "Google token audience validation successful");
            }
            Some(aud) => {
                warn!(
                    token_audience = %aud,
                    expected_client_id = %self.client_id,
                    "Google token audience validation failed - rejecting token"
                );
                return Err(GoogleAuthError);
            }
            None => {
                warn!(
                    expected_client_id = %self.client_id,
                    "Google token missing audience field - rejecting token"
                );
                return Err(GoogleAuthError);
            }
        }

        // tokeninfo serves exp as a decimal string; tolerate a bare number too
        let exp = body.get("exp").and_then(|v| {
            v.as_i64()
                .or_else(|| v.as_str().and_then(|s| s.parse::<i64>().ok()))
        });
        if let Some(exp) = exp {
            let current_time = Utc::now().timestamp();
            if exp < current_time {
                warn!(
                    token_exp = exp,
                    current_time = current_time,
                    "Google token has expired"
                );
                return Err(GoogleAuthError);
            }
        }

        let sub = body.get("sub").and_then(|v| v.as_str());
        let email = body.get("email").and_then(|v| v.as_str());
        let name = body.get("name").and_then(|v| v.as_str());

        let (sub, email, name) = match (sub, email, name) {
            (Some(sub), Some(email), Some(name)) => (sub, email, name),
            _ => {
                warn!(
                    has_sub = sub.is_some(),
                    has_email = email.is_some(),
                    has_name = name.is_some(),
                    "Google token missing required identity claims"
                );
                return Err(GoogleAuthError);
            }
        };

        debug!(
            provider_id = %sub,
            email = %safe_email_log(email),
            "Google token validation successful"
        );

        Ok(GoogleIdentity {
            sub: sub.to_string(),
            email: email.to_string(),
            name: name.to_string(),
        })
    }
}
