//! Request authentication.
//!
//! Two unrelated mechanisms live here:
//!
//! - **Bearer credentials.** Every protected route expects
//!   `Authorization: Bearer <refresh token>`. The middleware only checks the
//!   header shape; the token itself is validated by the classroom service
//!   when a handler uses it.
//! - **OAuth `state`.** The consent flow round-trips an opaque `state` value.
//!   It is signed with HMAC-SHA256 so the callback can reject values this
//!   server never issued:
//!
//! ```text
//! state     = "{nonce}.{expiry}.{signature}"
//! signature = hex(HMAC-SHA256(secret, "{nonce}.{expiry}"))
//! ```

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::{
    extract::{FromRequestParts, Request},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::debug;

use super::handlers::ErrorResponse;
use crate::error::StateError;

// =============================================================================
// Types
// =============================================================================

type HmacSha256 = Hmac<Sha256>;

/// Bearer scheme name, matched case-insensitively.
const BEARER_SCHEME: &str = "Bearer";

/// Nonce length in bytes before hex encoding.
const NONCE_LEN: usize = 16;

/// Authentication error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No `Authorization` header on the request
    MissingCredential,

    /// The header is present but is not a usable bearer credential
    MalformedCredential,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingCredential => write!(f, "Missing Authorization header"),
            AuthError::MalformedCredential => {
                write!(f, "Authorization header must be 'Bearer <token>'")
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = StatusCode::UNAUTHORIZED;
        let error_type = match &self {
            AuthError::MissingCredential => "missing_credential",
            AuthError::MalformedCredential => "malformed_credential",
        };
        let message = self.to_string();

        debug!(
            error_type = error_type,
            status = status.as_u16(),
            "Authentication failed: {}",
            message
        );

        let error_response = ErrorResponse::with_status(error_type, message, status);
        (status, Json(error_response)).into_response()
    }
}

/// The caller's refresh token, taken verbatim from the bearer header.
///
/// Inserted into request extensions by [`bearer_auth_middleware`] and
/// extracted by handlers that call the classroom service.
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshToken(pub String);

impl RefreshToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keep tokens out of logs.
impl std::fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RefreshToken(..)")
    }
}

impl<S> FromRequestParts<S> for RefreshToken
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(token) = parts.extensions.get::<RefreshToken>() {
            return Ok(token.clone());
        }

        // Routes outside the middleware still get the same header handling.
        let token = credential_from_header(parts.headers.get(AUTHORIZATION))?;
        Ok(RefreshToken(token.to_string()))
    }
}

// =============================================================================
// Bearer Parsing
// =============================================================================

/// Parse an `Authorization` header value into its bearer token.
///
/// Accepts `Bearer <token>` with a case-insensitive scheme, exactly one space,
/// and a non-empty token of visible ASCII characters.
pub fn parse_bearer(value: &str) -> Result<&str, AuthError> {
    let (scheme, token) = value
        .split_once(' ')
        .ok_or(AuthError::MalformedCredential)?;

    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return Err(AuthError::MalformedCredential);
    }

    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_graphic()) {
        return Err(AuthError::MalformedCredential);
    }

    Ok(token)
}

fn credential_from_header(value: Option<&http::HeaderValue>) -> Result<&str, AuthError> {
    let value = value.ok_or(AuthError::MissingCredential)?;
    let value = value.to_str().map_err(|_| AuthError::MalformedCredential)?;
    parse_bearer(value)
}

// =============================================================================
// Axum Middleware
// =============================================================================

/// Require a bearer credential on every request passing through this layer.
///
/// On success the token is stored as a [`RefreshToken`] extension and the
/// request continues. Otherwise the request is answered with 401 and the
/// handler never runs.
pub async fn bearer_auth_middleware(mut request: Request, next: Next) -> Result<Response, AuthError> {
    let token = credential_from_header(request.headers().get(AUTHORIZATION))?.to_string();

    request.extensions_mut().insert(RefreshToken(token));

    Ok(next.run(request).await)
}

// =============================================================================
// OAuth State Signing
// =============================================================================

/// Issues and verifies signed OAuth `state` values.
#[derive(Clone)]
pub struct StateSigner {
    secret_key: Vec<u8>,
    ttl: Duration,
}

impl StateSigner {
    /// Create a signer with the given secret and state lifetime.
    pub fn new(secret_key: impl AsRef<[u8]>, ttl: Duration) -> Self {
        Self {
            secret_key: secret_key.as_ref().to_vec(),
            ttl,
        }
    }

    /// Issue a fresh state valid for the configured TTL.
    pub fn issue(&self) -> String {
        self.issue_with_expiry(unix_now().saturating_add(self.ttl.as_secs()))
    }

    /// Issue a state with an explicit expiry (Unix epoch seconds).
    pub fn issue_with_expiry(&self, expiry: u64) -> String {
        let nonce = hex::encode(rand::random::<[u8; NONCE_LEN]>());
        let signature = self.compute_signature(&nonce, expiry);
        format!("{}.{}.{}", nonce, expiry, signature)
    }

    /// Check that `state` was issued by this signer and has not expired.
    pub fn verify(&self, state: &str) -> Result<(), StateError> {
        let mut parts = state.split('.');
        let (nonce, expiry, signature) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(nonce), Some(expiry), Some(signature), None) if !nonce.is_empty() => {
                (nonce, expiry, signature)
            }
            _ => return Err(StateError::Malformed),
        };

        let expiry: u64 = expiry.parse().map_err(|_| StateError::Malformed)?;
        let provided_sig = hex::decode(signature).map_err(|_| StateError::Malformed)?;

        let current_time = unix_now();
        if current_time > expiry {
            return Err(StateError::Expired {
                expired_at: expiry,
                current_time,
            });
        }

        let expected_sig = self.signature_bytes(nonce, expiry);

        if provided_sig.ct_eq(&expected_sig).into() {
            Ok(())
        } else {
            Err(StateError::InvalidSignature)
        }
    }

    fn compute_signature(&self, nonce: &str, expiry: u64) -> String {
        hex::encode(self.signature_bytes(nonce, expiry))
    }

    fn signature_bytes(&self, nonce: &str, expiry: u64) -> Vec<u8> {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret_key).expect("HMAC can take key of any size");
        mac.update(format!("{}.{}", nonce, expiry).as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

// =============================================================================
// Tests
// =============================================================================
