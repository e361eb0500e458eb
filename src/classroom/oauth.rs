//! OAuth 2.0 authorization-code flow against Google.
//!
//! The browser side of the flow is driven by the frontend: it asks the backend
//! for a consent URL, sends the teacher there, and posts the returned `code`
//! back. This module only builds the URL and talks to the token endpoint.

use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::ClassroomError;

use super::models::AuthorizedTokens;

/// Google's consent-screen endpoint.
pub const DEFAULT_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Google's token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Scopes needed to read a teacher's courses and rosters.
pub const CLASSROOM_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/classroom.courses.readonly",
    "https://www.googleapis.com/auth/classroom.rosters.readonly",
    "https://www.googleapis.com/auth/classroom.profile.emails",
    "https://www.googleapis.com/auth/classroom.profile.photos",
];

/// OAuth client registration.
#[derive(Debug, Clone)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// Talks to the consent and token endpoints.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    credentials: OAuthCredentials,
    http_client: reqwest::Client,
    auth_url: String,
    token_url: String,
}

impl OAuthClient {
    /// Create a client against Google's production endpoints.
    pub fn new(credentials: OAuthCredentials, http_client: reqwest::Client) -> Self {
        Self::with_endpoints(credentials, http_client, DEFAULT_AUTH_URL, DEFAULT_TOKEN_URL)
    }

    /// Create a client against custom endpoints.
    pub fn with_endpoints(
        credentials: OAuthCredentials,
        http_client: reqwest::Client,
        auth_url: impl Into<String>,
        token_url: impl Into<String>,
    ) -> Self {
        Self {
            credentials,
            http_client,
            auth_url: auth_url.into(),
            token_url: token_url.into(),
        }
    }

    /// Build the consent URL.
    ///
    /// Requests offline access and forces the consent prompt so Google always
    /// returns a refresh token, even for teachers who registered before.
    pub fn authorization_url(&self, state: &str) -> String {
        let scope = CLASSROOM_SCOPES.join(" ");
        let params = [
            ("client_id", self.credentials.client_id.as_str()),
            ("redirect_uri", self.credentials.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", scope.as_str()),
            ("access_type", "offline"),
            ("prompt", "consent"),
            ("state", state),
        ];

        match Url::parse_with_params(&self.auth_url, &params) {
            Ok(url) => url.to_string(),
            // A bad base URL is rejected by config validation; fall back to
            // plain concatenation so this stays infallible.
            Err(_) => {
                let query = url::form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(params.iter())
                    .finish();
                format!("{}?{}", self.auth_url, query)
            }
        }
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(&self, code: &str) -> Result<AuthorizedTokens, ClassroomError> {
        let params = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", self.credentials.redirect_uri.as_str()),
        ];

        let token = self.request_token(&params, "token exchange").await?;
        debug!("authorization code exchanged");

        Ok(AuthorizedTokens {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
        })
    }

    /// Exchange a refresh token for a short-lived access token.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<String, ClassroomError> {
        let params = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];

        let token = self.request_token(&params, "token refresh").await?;
        Ok(token.access_token)
    }

    async fn request_token(
        &self,
        params: &[(&str, &str)],
        what: &str,
    ) -> Result<TokenResponse, ClassroomError> {
        let response = self
            .http_client
            .post(&self.token_url)
            .form(params)
            .send()
            .await
            .map_err(|e| ClassroomError::Network(format!("{} request failed: {}", what, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClassroomError::Network(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(token_error(status, what, &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| ClassroomError::InvalidResponse(format!("invalid token response: {}", e)))
    }
}

/// Google answers `400 invalid_grant` for revoked or unknown tokens, so any
/// 400/401 from the token endpoint is an authentication failure.
fn token_error(status: reqwest::StatusCode, what: &str, body: &str) -> ClassroomError {
    if status == reqwest::StatusCode::BAD_REQUEST || status == reqwest::StatusCode::UNAUTHORIZED {
        ClassroomError::Authentication(format!("{} failed ({}): {}", what, status, body))
    } else {
        ClassroomError::Api {
            status: status.as_u16(),
            message: format!("{} failed: {}", what, body),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}
