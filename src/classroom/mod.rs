//! External classroom API layer.
//!
//! Handlers never talk to Google directly. They go through the
//! [`ClassroomApi`] trait so the HTTP layer can be exercised against a mock.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              Controllers                │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │           ClassroomApi Trait            │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │         GoogleClassroomClient           │
//! │  (OAuth token exchange + REST calls)    │
//! └─────────────────────────────────────────┘
//! ```

mod client;
mod models;
mod oauth;

use async_trait::async_trait;

use crate::error::ClassroomError;

pub use client::{GoogleClassroomClient, DEFAULT_CLASSROOM_API_URL};
pub use models::{AuthorizedTokens, Course, CourseStatus, Student, TeacherProfile};
pub use oauth::{OAuthClient, OAuthCredentials, CLASSROOM_SCOPES, DEFAULT_AUTH_URL, DEFAULT_TOKEN_URL};

/// Operations the backend needs from the external classroom service.
///
/// Every data call takes the caller's refresh token; implementations are
/// expected to exchange it for whatever short-lived credential the service
/// needs.
#[async_trait]
pub trait ClassroomApi: Send + Sync {
    /// Build the consent-screen URL a teacher is redirected to.
    fn authorization_url(&self, state: &str) -> String;

    /// Exchange an authorization code from the consent redirect for tokens.
    async fn exchange_code(&self, code: &str) -> Result<AuthorizedTokens, ClassroomError>;

    /// Fetch the profile of the user owning `access_token`.
    async fn teacher_profile(&self, access_token: &str) -> Result<TeacherProfile, ClassroomError>;

    /// List the courses the caller teaches, restricted to `status`.
    async fn list_teacher_courses(
        &self,
        refresh_token: &str,
        status: CourseStatus,
    ) -> Result<Vec<Course>, ClassroomError>;

    /// Fetch a single course.
    async fn get_course(&self, refresh_token: &str, course_id: &str)
        -> Result<Course, ClassroomError>;

    /// List the students enrolled in a course.
    async fn list_course_students(
        &self,
        refresh_token: &str,
        course_id: &str,
    ) -> Result<Vec<Student>, ClassroomError>;
}
