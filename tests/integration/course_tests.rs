//! Course endpoint integration tests.
//!
//! Tests verify:
//! - Active and inactive course lists are filtered by status
//! - The bearer token is forwarded to the classroom service
//! - Classroom failures surface as 500 with an error kind
//! - XLSX export headers, body, and input validation

use axum::http::{header, StatusCode};
use tower::ServiceExt;

use classroom_extender::classroom::CourseStatus;

use super::test_utils::{
    authorized_get, authorized_get_with, body_bytes, body_json, course, student, test_router,
    MemoryStore, MockClassroom, REVOKED_TOKEN, VALID_TOKEN,
};

fn mixed_courses() -> MockClassroom {
    MockClassroom::new()
        .with_course(course("c1", "Algebra I", CourseStatus::Active))
        .with_course(course("c2", "Biology", CourseStatus::Active))
        .with_course(course("c3", "Old Chemistry", CourseStatus::Inactive))
}

// =============================================================================
// Course Lists
// =============================================================================

#[tokio::test]
async fn test_active_courses_only() {
    let router = test_router(mixed_courses(), MemoryStore::new());

    let response = router
        .oneshot(authorized_get("/getMyTeacherCourses"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let courses = json.as_array().unwrap();
    assert_eq!(courses.len(), 2);
    assert!(courses.iter().all(|c| c["status"] == "active"));

    let ids: Vec<_> = courses.iter().map(|c| c["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["c1", "c2"]);
}

#[tokio::test]
async fn test_inactive_courses_only() {
    let router = test_router(mixed_courses(), MemoryStore::new());

    let response = router
        .oneshot(authorized_get("/getMyInactiveTeacherCourses"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let courses = json.as_array().unwrap();
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0]["id"], "c3");
    assert_eq!(courses[0]["status"], "inactive");
}

#[tokio::test]
async fn test_course_json_shape() {
    let router = test_router(mixed_courses(), MemoryStore::new());

    let response = router
        .oneshot(authorized_get("/getMyTeacherCourses"))
        .await
        .unwrap();
    let json = body_json(response).await;
    let first = &json[0];

    assert_eq!(first["name"], "Algebra I");
    assert_eq!(first["section"], "Period 1");
    assert_eq!(first["ownerId"], "teacher-1");
    assert!(first.get("room").is_none());
}

#[tokio::test]
async fn test_no_courses_is_empty_array() {
    let router = test_router(MockClassroom::new(), MemoryStore::new());

    let response = router
        .oneshot(authorized_get("/getMyTeacherCourses"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!([]));
}

#[tokio::test]
async fn test_bearer_token_forwarded() {
    let classroom = mixed_courses();
    let router = test_router(classroom.clone(), MemoryStore::new());

    let response = router
        .oneshot(authorized_get("/getMyTeacherCourses"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(classroom.tokens_seen().await, vec![VALID_TOKEN.to_string()]);
}

#[tokio::test]
async fn test_revoked_token_is_server_error() {
    let router = test_router(mixed_courses(), MemoryStore::new());

    let response = router
        .oneshot(authorized_get_with("/getMyTeacherCourses", REVOKED_TOKEN))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["error"], "authentication_failed");
    assert_eq!(json["message"], "Internal server error");
    assert_eq!(json["status"], 500);
}

// =============================================================================
// XLSX Export
// =============================================================================

#[tokio::test]
async fn test_course_data_excel() {
    let classroom = mixed_courses().with_students(
        "c1",
        vec![student("s1", "Ada Lovelace", "c1"), student("s2", "Alan Turing", "c1")],
    );
    let router = test_router(classroom.clone(), MemoryStore::new());

    let response = router
        .oneshot(authorized_get("/courseDataExcel?courseId=c1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert_eq!(
        response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"Algebra I.xlsx\""
    );

    let body = body_bytes(response).await;
    assert_eq!(&body[..2], b"PK");

    // Course metadata and roster.
    assert_eq!(classroom.call_count(), 2);
}

#[tokio::test]
async fn test_course_data_excel_requires_course_id() {
    let classroom = mixed_courses();

    for uri in ["/courseDataExcel", "/courseDataExcel?courseId=", "/courseDataExcel?courseId=%20"] {
        let router = test_router(classroom.clone(), MemoryStore::new());
        let response = router.oneshot(authorized_get(uri)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{}", uri);
        let json = body_json(response).await;
        assert_eq!(json["error"], "invalid_input");
    }

    assert_eq!(classroom.call_count(), 0);
}

#[tokio::test]
async fn test_undecodable_query_is_invalid_input() {
    let classroom = mixed_courses();
    let store = MemoryStore::new();

    for uri in [
        "/courseDataExcel?courseId=c1&courseId=c2",
        "/getCourseStudents?courseId=c1&courseId=c2",
        "/getStoredCourseStudents?courseId=c1&courseId=c2",
    ] {
        let router = test_router(classroom.clone(), store.clone());
        let response = router.oneshot(authorized_get(uri)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{}", uri);
        let json = body_json(response).await;
        assert_eq!(json["error"], "invalid_input");
        assert_eq!(json["status"], 500);
    }

    assert_eq!(classroom.call_count(), 0);
}

#[tokio::test]
async fn test_course_data_excel_unknown_course() {
    let router = test_router(mixed_courses(), MemoryStore::new());

    let response = router
        .oneshot(authorized_get("/courseDataExcel?courseId=missing"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["error"], "not_found");
}

#[tokio::test]
async fn test_course_data_excel_sanitizes_file_name() {
    let classroom = MockClassroom::new()
        .with_course(course("c9", "Bio/Chem \"Lab\"", CourseStatus::Active));
    let router = test_router(classroom, MemoryStore::new());

    let response = router
        .oneshot(authorized_get("/courseDataExcel?courseId=c9"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"Bio_Chem _Lab_.xlsx\""
    );
}
