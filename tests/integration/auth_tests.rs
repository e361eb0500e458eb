//! Authentication integration tests.
//!
//! Tests verify:
//! - Protected routes reject missing or malformed bearer credentials
//!   before any handler logic runs
//! - Public routes need no credential
//! - The OAuth consent flow issues verifiable states and registers teachers
//! - Tampered or expired states are rejected

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use tower::ServiceExt;

use classroom_extender::classroom::CourseStatus;
use classroom_extender::StateSigner;

use super::test_utils::{
    authorized_get_with, body_json, course, get, post_json, teacher, test_router, MemoryStore,
    MockClassroom, TEST_SECRET, VALID_CODE, VALID_TOKEN,
};

const PROTECTED_ROUTES: &[&str] = &[
    "/getMyTeacherCourses",
    "/getMyInactiveTeacherCourses",
    "/courseDataExcel?courseId=c1",
    "/getCourseStudents?courseId=c1",
    "/getStoredCourseStudents?courseId=c1",
];

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

fn classroom() -> MockClassroom {
    MockClassroom::new().with_course(course("c1", "Algebra I", CourseStatus::Active))
}

// =============================================================================
// Bearer Interceptor
// =============================================================================

#[tokio::test]
async fn test_missing_credential_rejected() {
    let classroom = classroom();

    for uri in PROTECTED_ROUTES {
        let router = test_router(classroom.clone(), MemoryStore::new());
        let response = router.oneshot(get(uri)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
        let json = body_json(response).await;
        assert_eq!(json["error"], "missing_credential");
        assert_eq!(json["status"], 401);
    }

    assert_eq!(classroom.call_count(), 0);
}

#[tokio::test]
async fn test_malformed_credential_rejected() {
    let classroom = classroom();

    for value in ["Basic dXNlcjpwYXNz", "Bearer", "Bearer ", "Bearer two tokens", VALID_TOKEN] {
        let router = test_router(classroom.clone(), MemoryStore::new());
        let request = Request::builder()
            .uri("/getMyTeacherCourses")
            .header(header::AUTHORIZATION, value)
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{:?}", value);
        assert_eq!(body_json(response).await["error"], "malformed_credential");
    }

    assert_eq!(classroom.call_count(), 0);
}

#[tokio::test]
async fn test_upload_without_credential_never_writes() {
    let store = MemoryStore::new();
    let router = test_router(classroom(), store.clone());

    let request = Request::builder()
        .method("POST")
        .uri("/courseStudents")
        .header(header::CONTENT_TYPE, "multipart/form-data; boundary=x")
        .body(Body::from("--x--\r\n"))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn test_scheme_is_case_insensitive() {
    let router = test_router(classroom(), MemoryStore::new());

    let request = Request::builder()
        .uri("/getMyTeacherCourses")
        .header(header::AUTHORIZATION, format!("bearer {}", VALID_TOKEN))
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let router = test_router(classroom(), MemoryStore::new());

    let response = router.oneshot(get("/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_preflight_needs_no_credential() {
    let router = test_router(classroom(), MemoryStore::new());

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/getMyTeacherCourses")
        .header(header::ORIGIN, "http://localhost:4200")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}

// =============================================================================
// Public Routes
// =============================================================================

#[tokio::test]
async fn test_health_is_public() {
    let router = test_router(classroom(), MemoryStore::new());

    let response = router.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_start_authentication() {
    let router = test_router(classroom(), MemoryStore::new());

    let response = router.oneshot(get("/start_authentication")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let state = json["state"].as_str().unwrap();
    let url = json["authorizationUrl"].as_str().unwrap();

    assert!(url.ends_with(&format!("state={}", state)));

    let signer = StateSigner::new(TEST_SECRET, Duration::from_secs(600));
    assert!(signer.verify(state).is_ok());
}

// =============================================================================
// Registration
// =============================================================================

#[tokio::test]
async fn test_persist_registration() {
    let classroom = classroom();
    let store = MemoryStore::new();
    let router = test_router(classroom.clone(), store.clone());

    let response = router
        .clone()
        .oneshot(get("/start_authentication"))
        .await
        .unwrap();
    let state = body_json(response).await["state"]
        .as_str()
        .unwrap()
        .to_string();

    let response = router
        .oneshot(post_json(
            "/persist_registration",
            serde_json::json!({ "code": VALID_CODE, "state": state }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["refreshToken"], VALID_TOKEN);
    assert_eq!(json["profile"]["id"], "teacher-1");
    assert_eq!(json["profile"]["email"], "grace@school.example.com");

    let registration = store.registration("teacher-1").await.unwrap();
    assert_eq!(registration.name, teacher().name);
    assert_eq!(registration.email, teacher().email);

    // Code exchange and profile lookup.
    assert_eq!(classroom.call_count(), 2);
}

#[tokio::test]
async fn test_registered_token_works_on_protected_routes() {
    let router = test_router(classroom(), MemoryStore::new());
    let signer = StateSigner::new(TEST_SECRET, Duration::from_secs(600));

    let response = router
        .clone()
        .oneshot(post_json(
            "/persist_registration",
            serde_json::json!({ "code": VALID_CODE, "state": signer.issue() }),
        ))
        .await
        .unwrap();
    let token = body_json(response).await["refreshToken"]
        .as_str()
        .unwrap()
        .to_string();

    let response = router
        .oneshot(authorized_get_with("/getMyTeacherCourses", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_tampered_state_rejected() {
    let classroom = classroom();
    let store = MemoryStore::new();
    let router = test_router(classroom.clone(), store.clone());

    let other = StateSigner::new("some-other-secret-key", Duration::from_secs(600));
    let response = router
        .oneshot(post_json(
            "/persist_registration",
            serde_json::json!({ "code": VALID_CODE, "state": other.issue() }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "invalid_state");
    assert_eq!(classroom.call_count(), 0);
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn test_state_checked_before_code() {
    let classroom = classroom();
    let router = test_router(classroom.clone(), MemoryStore::new());

    let other = StateSigner::new("some-other-secret-key", Duration::from_secs(600));
    let response = router
        .oneshot(post_json(
            "/persist_registration",
            serde_json::json!({ "code": "  ", "state": other.issue() }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "invalid_state");
    assert_eq!(classroom.call_count(), 0);
}

#[tokio::test]
async fn test_blank_code_with_valid_state() {
    let classroom = classroom();
    let store = MemoryStore::new();
    let router = test_router(classroom.clone(), store.clone());
    let signer = StateSigner::new(TEST_SECRET, Duration::from_secs(600));

    let response = router
        .oneshot(post_json(
            "/persist_registration",
            serde_json::json!({ "code": "", "state": signer.issue() }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "invalid_input");
    assert_eq!(classroom.call_count(), 0);
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn test_expired_state_rejected() {
    let classroom = classroom();
    let router = test_router(classroom.clone(), MemoryStore::new());

    let signer = StateSigner::new(TEST_SECRET, Duration::from_secs(600));
    let state = signer.issue_with_expiry(now() - 60);

    let response = router
        .oneshot(post_json(
            "/persist_registration",
            serde_json::json!({ "code": VALID_CODE, "state": state }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "invalid_state");
    assert!(json["message"].as_str().unwrap().contains("expired"));
    assert_eq!(classroom.call_count(), 0);
}

#[tokio::test]
async fn test_rejected_code() {
    let store = MemoryStore::new();
    let router = test_router(classroom(), store.clone());
    let signer = StateSigner::new(TEST_SECRET, Duration::from_secs(600));

    let response = router
        .oneshot(post_json(
            "/persist_registration",
            serde_json::json!({ "code": "4/stale-code", "state": signer.issue() }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "authentication_failed");
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn test_malformed_registration_body() {
    let classroom = classroom();
    let router = test_router(classroom.clone(), MemoryStore::new());

    let response = router
        .oneshot(post_json(
            "/persist_registration",
            serde_json::json!({ "code": VALID_CODE }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "invalid_input");
    assert_eq!(classroom.call_count(), 0);
}
