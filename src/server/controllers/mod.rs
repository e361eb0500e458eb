//! Feature controllers.
//!
//! Each controller owns a group of routes and registers them on a router.
//! The router builder decides which controllers sit behind the bearer
//! middleware.

mod authentication;
mod course;
mod student;

use axum::Router;

use crate::classroom::ClassroomApi;
use crate::store::ClassroomStore;

use super::handlers::AppState;

pub use authentication::{
    AuthenticationController, AuthorizationResponse, RegistrationRequest, RegistrationResponse,
};
pub use course::CourseController;
pub use student::StudentController;

/// A group of routes that can be mounted on the application router.
pub trait Controller<C, S>
where
    C: ClassroomApi + 'static,
    S: ClassroomStore + 'static,
{
    /// Add this controller's routes to `router`.
    fn register(&self, router: Router<AppState<C, S>>) -> Router<AppState<C, S>>;
}
