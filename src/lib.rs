//! # Classroom Extender
//!
//! An HTTP backend that extends Google Classroom for teachers.
//!
//! Teachers sign in through Google's OAuth consent screen; the backend hands
//! the resulting refresh token back to the frontend, which then sends it as a
//! bearer credential on every request. With it the backend can list the
//! teacher's courses, read course rosters, keep uploaded rosters in MongoDB,
//! and export a course with its students as an XLSX workbook.
//!
//! ## Architecture
//!
//! - [`classroom`] - `ClassroomApi` trait and the Google REST/OAuth client
//! - [`store`] - `ClassroomStore` trait and the MongoDB implementation
//! - [`roster`] - CSV roster parsing
//! - [`export`] - XLSX workbook generation
//! - [`server`] - Axum router, bearer middleware, controllers
//! - [`config`] - CLI and environment configuration
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use classroom_extender::{
//!     create_router, GoogleClassroomClient, MongoClassroomStore, OAuthCredentials, RouterConfig,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let credentials = OAuthCredentials {
//!     client_id: "client-id".to_string(),
//!     client_secret: "client-secret".to_string(),
//!     redirect_uri: "http://localhost:4200/oauth/callback".to_string(),
//! };
//! let classroom = GoogleClassroomClient::new(credentials, Duration::from_secs(30))?;
//!
//! let db = classroom_extender::store::connect("mongodb://localhost:27017", "classroom").await?;
//! let store = MongoClassroomStore::new(&db);
//!
//! let router = create_router(classroom, store, RouterConfig::new("a-long-state-secret"));
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, router).await?;
//! # Ok(())
//! # }
//! ```

pub mod classroom;
pub mod config;
pub mod error;
pub mod export;
pub mod roster;
pub mod server;
pub mod store;

// Re-export commonly used types
pub use classroom::{
    ClassroomApi, Course, CourseStatus, GoogleClassroomClient, OAuthCredentials, Student,
    TeacherProfile,
};
pub use config::Config;
pub use error::{ApiError, ClassroomError, ExportError, RosterError, StateError, StoreError};
pub use export::build_course_workbook;
pub use roster::parse_roster;
pub use server::{create_router, AppState, RouterConfig, StateSigner};
pub use store::{ClassroomStore, MongoClassroomStore, Registration};
