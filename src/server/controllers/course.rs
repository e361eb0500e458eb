//! Course routes: active and inactive course lists, roster upload, and
//! spreadsheet export.

use axum::{
    extract::{multipart::MultipartRejection, rejection::QueryRejection, Multipart, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use tracing::{debug, info};

use crate::classroom::{ClassroomApi, Course, CourseStatus};
use crate::error::ApiError;
use crate::export::{build_course_workbook, export_file_stem, XLSX_CONTENT_TYPE};
use crate::roster::parse_roster;
use crate::server::auth::RefreshToken;
use crate::server::handlers::{require_course_id, AppState, CourseQuery, StatusResponse};
use crate::server::route_paths::courses;
use crate::store::ClassroomStore;

use super::Controller;

/// Multipart field carrying the course id.
const COURSE_ID_FIELD: &str = "courseId";

/// Multipart field name accepted for the roster file when no file name is sent.
const FILE_FIELD: &str = "file";

pub struct CourseController;

impl<C, S> Controller<C, S> for CourseController
where
    C: ClassroomApi + 'static,
    S: ClassroomStore + 'static,
{
    fn register(&self, router: Router<AppState<C, S>>) -> Router<AppState<C, S>> {
        router
            .route(courses::GET_MY_TEACHER_COURSES, get(active_courses::<C, S>))
            .route(
                courses::GET_MY_INACTIVE_TEACHER_COURSES,
                get(inactive_courses::<C, S>),
            )
            .route(courses::POST_COURSE_STUDENTS, post(upload_course_students::<C, S>))
            .route(courses::GET_COURSE_DATA_EXCEL, get(course_data_excel::<C, S>))
    }
}

async fn list_courses<C, S>(
    state: &AppState<C, S>,
    token: &RefreshToken,
    status: CourseStatus,
) -> Result<Vec<Course>, ApiError>
where
    C: ClassroomApi,
    S: ClassroomStore,
{
    let mut courses = state
        .classroom
        .list_teacher_courses(token.as_str(), status)
        .await?;

    courses.retain(|course| course.status == status);
    debug!(status = status.as_str(), count = courses.len(), "listed teacher courses");
    Ok(courses)
}

/// `GET /getMyTeacherCourses`
async fn active_courses<C, S>(
    State(state): State<AppState<C, S>>,
    token: RefreshToken,
) -> Result<Json<Vec<Course>>, ApiError>
where
    C: ClassroomApi,
    S: ClassroomStore,
{
    list_courses(&state, &token, CourseStatus::Active).await.map(Json)
}

/// `GET /getMyInactiveTeacherCourses`
async fn inactive_courses<C, S>(
    State(state): State<AppState<C, S>>,
    token: RefreshToken,
) -> Result<Json<Vec<Course>>, ApiError>
where
    C: ClassroomApi,
    S: ClassroomStore,
{
    list_courses(&state, &token, CourseStatus::Inactive).await.map(Json)
}

/// `POST /courseStudents`
///
/// Multipart body with a `courseId` text field and one roster file. The
/// parsed roster replaces whatever was stored for that course.
async fn upload_course_students<C, S>(
    State(state): State<AppState<C, S>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<StatusResponse>, ApiError>
where
    C: ClassroomApi,
    S: ClassroomStore,
{
    let multipart = multipart.map_err(|e| ApiError::InvalidInput(e.body_text()))?;
    let (course_id, file) = read_upload(multipart).await?;

    let course_id = require_course_id(course_id.as_deref())?;
    let file = match file {
        Some(file) if !file.is_empty() => file,
        _ => return Err(ApiError::InvalidInput("roster file is required".to_string())),
    };

    let students = parse_roster(course_id, &file)?;
    state.store.save_roster(course_id, &students).await?;

    info!(course_id, count = students.len(), "roster stored");
    Ok(Json(StatusResponse::ok()))
}

/// Collect the course id and the roster file from a multipart body.
async fn read_upload(mut multipart: Multipart) -> Result<(Option<String>, Option<Bytes>), ApiError> {
    let mut course_id = None;
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidInput(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let is_file = field.file_name().is_some() || name == FILE_FIELD;

        if name == COURSE_ID_FIELD {
            let value = field
                .text()
                .await
                .map_err(|e| ApiError::InvalidInput(e.body_text()))?;
            course_id = Some(value);
        } else if is_file && file.is_none() {
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::InvalidInput(e.body_text()))?;
            file = Some(data);
        }
    }

    Ok((course_id, file))
}

/// `GET /courseDataExcel?courseId=`
async fn course_data_excel<C, S>(
    State(state): State<AppState<C, S>>,
    token: RefreshToken,
    query: Result<Query<CourseQuery>, QueryRejection>,
) -> Result<Response, ApiError>
where
    C: ClassroomApi,
    S: ClassroomStore,
{
    let Query(query) = query.map_err(|e| ApiError::InvalidInput(e.body_text()))?;
    let course_id = query.require_course_id()?;

    let (course, students) = tokio::try_join!(
        state.classroom.get_course(token.as_str(), course_id),
        state.classroom.list_course_students(token.as_str(), course_id),
    )?;

    let workbook = build_course_workbook(&course, &students)?;
    let disposition = format!(
        "attachment; filename=\"{}.xlsx\"",
        export_file_stem(&course.name)
    );

    debug!(course_id, bytes = workbook.len(), "course workbook built");

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        workbook,
    )
        .into_response())
}
