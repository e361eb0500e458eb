//! Roster routes.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use tracing::debug;

use crate::classroom::{ClassroomApi, Student};
use crate::error::ApiError;
use crate::server::auth::RefreshToken;
use crate::server::handlers::{AppState, CourseQuery};
use crate::server::route_paths::students;
use crate::store::ClassroomStore;

use super::Controller;

pub struct StudentController;

impl<C, S> Controller<C, S> for StudentController
where
    C: ClassroomApi + 'static,
    S: ClassroomStore + 'static,
{
    fn register(&self, router: Router<AppState<C, S>>) -> Router<AppState<C, S>> {
        router
            .route(students::GET_COURSE_STUDENTS, get(course_students::<C, S>))
            .route(
                students::GET_STORED_COURSE_STUDENTS,
                get(stored_course_students::<C, S>),
            )
    }
}

/// `GET /getCourseStudents?courseId=`: the live roster from the classroom
/// service.
async fn course_students<C, S>(
    State(state): State<AppState<C, S>>,
    token: RefreshToken,
    query: Result<Query<CourseQuery>, QueryRejection>,
) -> Result<Json<Vec<Student>>, ApiError>
where
    C: ClassroomApi,
    S: ClassroomStore,
{
    let Query(query) = query.map_err(|e| ApiError::InvalidInput(e.body_text()))?;
    let course_id = query.require_course_id()?;

    let students = state
        .classroom
        .list_course_students(token.as_str(), course_id)
        .await?;

    debug!(course_id, count = students.len(), "fetched course roster");
    Ok(Json(students))
}

/// `GET /getStoredCourseStudents?courseId=`: the last uploaded roster, or an
/// empty list.
async fn stored_course_students<C, S>(
    State(state): State<AppState<C, S>>,
    query: Result<Query<CourseQuery>, QueryRejection>,
) -> Result<Json<Vec<Student>>, ApiError>
where
    C: ClassroomApi,
    S: ClassroomStore,
{
    let Query(query) = query.map_err(|e| ApiError::InvalidInput(e.body_text()))?;
    let course_id = query.require_course_id()?;

    let students = state.store.load_roster(course_id).await?.unwrap_or_default();
    Ok(Json(students))
}
