//! Configuration management.
//!
//! Every option can be given as a command-line flag or an environment
//! variable. Google credentials and the state secret have no defaults and
//! must be provided.
//!
//! # Environment Variables
//!
//! - `CLASSROOM_HOST` - Server bind address (default: 0.0.0.0)
//! - `PORT` - Server port (default: 8080)
//! - `CLASSROOM_CORS_ORIGIN` - Single allowed CORS origin (default: any)
//! - `CLASSROOM_MONGO_URI` - MongoDB connection string
//! - `CLASSROOM_MONGO_DATABASE` - MongoDB database name
//! - `GOOGLE_CLIENT_ID`, `GOOGLE_CLIENT_SECRET`, `GOOGLE_REDIRECT_URI` - OAuth client
//! - `CLASSROOM_STATE_SECRET` - HMAC secret for OAuth state values
//! - `CLASSROOM_STATE_TTL` - OAuth state lifetime in seconds (default: 600)
//! - `CLASSROOM_API_URL`, `GOOGLE_AUTH_URL`, `GOOGLE_TOKEN_URL` - Endpoint overrides
//! - `CLASSROOM_HTTP_TIMEOUT` - Outbound request timeout in seconds (default: 30)
//! - `CLASSROOM_MAX_UPLOAD_BYTES` - Request body limit (default: 10 MiB)

use std::time::Duration;

use clap::Parser;
use url::Url;

use crate::classroom::{
    OAuthCredentials, DEFAULT_AUTH_URL, DEFAULT_CLASSROOM_API_URL, DEFAULT_TOKEN_URL,
};
use crate::server::{RouterConfig, DEFAULT_MAX_UPLOAD_BYTES};

// =============================================================================
// Default Values
// =============================================================================

pub const DEFAULT_HOST: &str = "0.0.0.0";

pub const DEFAULT_PORT: u16 = 8080;

pub const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017";

pub const DEFAULT_MONGO_DATABASE: &str = "classroom_extender";

/// Default OAuth state lifetime in seconds.
pub const DEFAULT_STATE_TTL_SECS: u64 = 600;

/// Default outbound HTTP timeout in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Shortest accepted state secret, in bytes.
const MIN_STATE_SECRET_LEN: usize = 16;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Classroom Extender - course and roster backend for Google Classroom.
///
/// Authenticates teachers with OAuth, lists their courses and rosters,
/// stores uploaded rosters in MongoDB, and exports course data to XLSX.
#[derive(Parser, Debug, Clone)]
#[command(name = "classroom-extender")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "CLASSROOM_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "PORT")]
    pub port: u16,

    /// Allowed CORS origin (e.g. https://classroom.example.com).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "CLASSROOM_CORS_ORIGIN")]
    pub cors_origin: Option<String>,

    /// Maximum request body size in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_BYTES, env = "CLASSROOM_MAX_UPLOAD_BYTES")]
    pub max_upload_bytes: usize,

    // =========================================================================
    // MongoDB Configuration
    // =========================================================================
    /// MongoDB connection string.
    #[arg(long, default_value = DEFAULT_MONGO_URI, env = "CLASSROOM_MONGO_URI")]
    pub mongo_uri: String,

    /// Database holding the rosters and registrations collections.
    #[arg(long, default_value = DEFAULT_MONGO_DATABASE, env = "CLASSROOM_MONGO_DATABASE")]
    pub mongo_database: String,

    // =========================================================================
    // Google OAuth Configuration
    // =========================================================================
    /// OAuth client ID.
    #[arg(long, env = "GOOGLE_CLIENT_ID")]
    pub google_client_id: String,

    /// OAuth client secret.
    #[arg(long, env = "GOOGLE_CLIENT_SECRET", hide_env_values = true)]
    pub google_client_secret: String,

    /// Redirect URI registered for the OAuth client.
    #[arg(long, env = "GOOGLE_REDIRECT_URI")]
    pub google_redirect_uri: String,

    /// Secret key for signing OAuth state values.
    #[arg(long, env = "CLASSROOM_STATE_SECRET", hide_env_values = true)]
    pub state_secret: String,

    /// OAuth state lifetime in seconds.
    #[arg(long, default_value_t = DEFAULT_STATE_TTL_SECS, env = "CLASSROOM_STATE_TTL")]
    pub state_ttl: u64,

    // =========================================================================
    // Endpoint Overrides
    // =========================================================================
    /// Base URL of the Classroom REST API.
    #[arg(long, default_value = DEFAULT_CLASSROOM_API_URL, env = "CLASSROOM_API_URL")]
    pub classroom_api_url: String,

    /// OAuth consent endpoint.
    #[arg(long, default_value = DEFAULT_AUTH_URL, env = "GOOGLE_AUTH_URL")]
    pub google_auth_url: String,

    /// OAuth token endpoint.
    #[arg(long, default_value = DEFAULT_TOKEN_URL, env = "GOOGLE_TOKEN_URL")]
    pub google_token_url: String,

    /// Timeout for outbound requests in seconds.
    #[arg(long, default_value_t = DEFAULT_HTTP_TIMEOUT_SECS, env = "CLASSROOM_HTTP_TIMEOUT")]
    pub http_timeout: u64,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.google_client_id.trim().is_empty() {
            return Err("Google client ID is required. Set --google-client-id or GOOGLE_CLIENT_ID".to_string());
        }

        if self.google_client_secret.trim().is_empty() {
            return Err(
                "Google client secret is required. Set --google-client-secret or GOOGLE_CLIENT_SECRET"
                    .to_string(),
            );
        }

        check_url("google_redirect_uri", &self.google_redirect_uri)?;
        check_url("classroom_api_url", &self.classroom_api_url)?;
        check_url("google_auth_url", &self.google_auth_url)?;
        check_url("google_token_url", &self.google_token_url)?;

        if self.state_secret.len() < MIN_STATE_SECRET_LEN {
            return Err(format!(
                "state_secret must be at least {} bytes. Set --state-secret or CLASSROOM_STATE_SECRET",
                MIN_STATE_SECRET_LEN
            ));
        }

        if self.state_ttl == 0 {
            return Err("state_ttl must be greater than 0".to_string());
        }

        if self.http_timeout == 0 {
            return Err("http_timeout must be greater than 0".to_string());
        }

        if self.max_upload_bytes == 0 {
            return Err("max_upload_bytes must be greater than 0".to_string());
        }

        if self.mongo_database.trim().is_empty() {
            return Err("mongo_database must not be empty".to_string());
        }

        if let Some(origin) = &self.cors_origin {
            let parsed = Url::parse(origin)
                .map_err(|e| format!("cors_origin '{}' is not a valid URL: {}", origin, e))?;
            if parsed.path() != "/" || parsed.query().is_some() {
                return Err(format!(
                    "cors_origin '{}' must be a bare origin like https://example.com",
                    origin
                ));
            }
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// OAuth client registration for the classroom client.
    pub fn oauth_credentials(&self) -> OAuthCredentials {
        OAuthCredentials {
            client_id: self.google_client_id.clone(),
            client_secret: self.google_client_secret.clone(),
            redirect_uri: self.google_redirect_uri.clone(),
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout)
    }

    /// Build the router configuration.
    pub fn router_config(&self) -> RouterConfig {
        let mut router_config = RouterConfig::new(&self.state_secret)
            .with_state_ttl(Duration::from_secs(self.state_ttl))
            .with_max_upload_bytes(self.max_upload_bytes)
            .with_tracing(!self.no_tracing);

        if let Some(origin) = &self.cors_origin {
            router_config = router_config.with_cors_origin(origin.trim_end_matches('/'));
        }

        router_config
    }
}

fn check_url(name: &str, value: &str) -> Result<(), String> {
    match Url::parse(value) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Ok(()),
        Ok(_) => Err(format!("{} must be an http(s) URL: {}", name, value)),
        Err(e) => Err(format!("{} is not a valid URL ({}): {}", name, e, value)),
    }
}

// =============================================================================
// Tests
// =============================================================================
