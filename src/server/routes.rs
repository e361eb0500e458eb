//! Router configuration.
//!
//! # Route Structure
//!
//! ```text
//! /health                        - Health check (public)
//! /start_authentication          - OAuth consent URL (public)
//! /persist_registration          - OAuth callback (public)
//! /getMyTeacherCourses           - Active courses (bearer)
//! /getMyInactiveTeacherCourses   - Inactive courses (bearer)
//! /courseStudents                - Roster upload (bearer)
//! /courseDataExcel               - XLSX export (bearer)
//! /getCourseStudents             - Live roster (bearer)
//! /getStoredCourseStudents       - Stored roster (bearer)
//! ```
//!
//! # Example
//!
//! ```ignore
//! let config = RouterConfig::new("state-secret")
//!     .with_cors_origin("https://classroom.example.com");
//!
//! let router = create_router(classroom_client, mongo_store, config);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::time::Duration;

use axum::{extract::DefaultBodyLimit, middleware, routing::get, Router};
use http::header::{AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE};
use http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use super::auth::{bearer_auth_middleware, StateSigner};
use super::controllers::{AuthenticationController, Controller, CourseController, StudentController};
use super::handlers::{health_handler, AppState};
use super::route_paths::HEALTH;
use crate::classroom::ClassroomApi;
use crate::store::ClassroomStore;

/// Default OAuth state lifetime.
pub const DEFAULT_STATE_TTL: Duration = Duration::from_secs(600);

/// Default request body limit (10 MiB), large enough for roster uploads.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Clone)]
pub struct RouterConfig {
    /// Secret key for signing OAuth state values
    pub state_secret: String,

    /// How long an issued OAuth state stays valid
    pub state_ttl: Duration,

    /// Allowed CORS origin (None = allow any origin)
    pub cors_origin: Option<String>,

    /// Maximum request body size in bytes
    pub max_upload_bytes: usize,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Create a configuration with the given state secret.
    ///
    /// By default any CORS origin is allowed, states live ten minutes, bodies
    /// are capped at 10 MiB, and tracing is on.
    pub fn new(state_secret: impl Into<String>) -> Self {
        Self {
            state_secret: state_secret.into(),
            state_ttl: DEFAULT_STATE_TTL,
            cors_origin: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            enable_tracing: true,
        }
    }

    /// Restrict CORS to a single origin.
    pub fn with_cors_origin(mut self, origin: impl Into<String>) -> Self {
        self.cors_origin = Some(origin.into());
        self
    }

    pub fn with_state_ttl(mut self, ttl: Duration) -> Self {
        self.state_ttl = ttl;
        self
    }

    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// Course and student routes sit behind the bearer middleware; health and the
/// OAuth flow are public. CORS, the body limit, and tracing wrap everything.
pub fn create_router<C, S>(classroom: C, store: S, config: RouterConfig) -> Router
where
    C: ClassroomApi + 'static,
    S: ClassroomStore + 'static,
{
    let state_signer = StateSigner::new(&config.state_secret, config.state_ttl);
    let app_state = AppState::new(classroom, store, state_signer);

    let protected: [&dyn Controller<C, S>; 2] = [&CourseController, &StudentController];
    let protected_routes = mount(Router::new(), &protected)
        .route_layer(middleware::from_fn(bearer_auth_middleware));

    let public: [&dyn Controller<C, S>; 1] = [&AuthenticationController];
    let public_routes = mount(Router::new().route(HEALTH, get(health_handler)), &public);

    let router = protected_routes
        .merge(public_routes)
        .with_state(app_state)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(build_cors_layer(&config));

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

fn mount<C, S>(
    router: Router<AppState<C, S>>,
    controllers: &[&dyn Controller<C, S>],
) -> Router<AppState<C, S>>
where
    C: ClassroomApi + 'static,
    S: ClassroomStore + 'static,
{
    controllers
        .iter()
        .fold(router, |router, controller| controller.register(router))
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .expose_headers([CONTENT_DISPOSITION])
        .max_age(Duration::from_secs(86400));

    match &config.cors_origin {
        None => cors.allow_origin(Any),
        Some(origin) => match origin.parse::<HeaderValue>() {
            Ok(origin) => cors.allow_origin(origin),
            Err(_) => {
                // No origin allowed; cross-origin requests fail closed.
                warn!(origin = %origin, "ignoring unparsable CORS origin");
                cors
            }
        },
    }
}

// =============================================================================
// Tests
// =============================================================================
