//! HTTP server layer.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    CORS / body limit / trace                    │
//! │                                                                 │
//! │   public                          bearer_auth_middleware        │
//! │  ┌──────────────────────────┐    ┌───────────────────────────┐  │
//! │  │ /health                  │    │ CourseController          │  │
//! │  │ AuthenticationController │    │ StudentController         │  │
//! │  └──────────────────────────┘    └───────────────────────────┘  │
//! │                                                                 │
//! │              AppState { classroom, store, state_signer }        │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod controllers;
pub mod handlers;
pub mod route_paths;
pub mod routes;

pub use auth::{bearer_auth_middleware, parse_bearer, AuthError, RefreshToken, StateSigner};
pub use controllers::{
    AuthenticationController, AuthorizationResponse, Controller, CourseController,
    RegistrationRequest, RegistrationResponse, StudentController,
};
pub use handlers::{
    health_handler, require_course_id, AppState, CourseQuery, ErrorResponse, HealthResponse,
    StatusResponse,
};
pub use routes::{create_router, RouterConfig, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_STATE_TTL};
