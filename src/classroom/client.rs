//! Google Classroom REST client.
//!
//! Every data call refreshes an access token from the caller's refresh token
//! and then issues the request with bearer auth. Access tokens are not cached.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::ClassroomError;

use super::models::{AuthorizedTokens, Course, CourseStatus, Student, TeacherProfile};
use super::oauth::{OAuthClient, OAuthCredentials};
use super::ClassroomApi;

/// Base URL for the Google Classroom API v1.
pub const DEFAULT_CLASSROOM_API_URL: &str = "https://classroom.googleapis.com/v1";

/// Page size requested from list endpoints.
const PAGE_SIZE: &str = "100";

/// Google Classroom implementation of [`ClassroomApi`].
#[derive(Debug, Clone)]
pub struct GoogleClassroomClient {
    http_client: reqwest::Client,
    oauth: OAuthClient,
    api_url: String,
}

impl GoogleClassroomClient {
    /// Create a client against Google's production endpoints.
    pub fn new(credentials: OAuthCredentials, timeout: Duration) -> Result<Self, ClassroomError> {
        let http_client = build_http_client(timeout)?;
        let oauth = OAuthClient::new(credentials, http_client.clone());
        Ok(Self {
            http_client,
            oauth,
            api_url: DEFAULT_CLASSROOM_API_URL.to_string(),
        })
    }

    /// Create a client with custom endpoints (for proxies or test doubles).
    pub fn with_endpoints(
        credentials: OAuthCredentials,
        timeout: Duration,
        api_url: impl Into<String>,
        auth_url: impl Into<String>,
        token_url: impl Into<String>,
    ) -> Result<Self, ClassroomError> {
        let http_client = build_http_client(timeout)?;
        let oauth =
            OAuthClient::with_endpoints(credentials, http_client.clone(), auth_url, token_url);
        Ok(Self {
            http_client,
            oauth,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Get the API base URL.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Issue an authenticated GET and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        access_token: &str,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ClassroomError> {
        let url = format!("{}/{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(access_token)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClassroomError::Network("request timeout".to_string())
                } else if e.is_connect() {
                    ClassroomError::Network(format!("connection failed: {}", e))
                } else {
                    ClassroomError::Network(format!("request failed: {}", e))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClassroomError::Network(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(status_error(status, path, body));
        }

        serde_json::from_str(&body).map_err(|e| {
            ClassroomError::InvalidResponse(format!("failed to parse {}: {}", path, e))
        })
    }
}

fn build_http_client(timeout: Duration) -> Result<reqwest::Client, ClassroomError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ClassroomError::Network(format!("failed to build HTTP client: {}", e)))
}

fn status_error(status: reqwest::StatusCode, path: &str, body: String) -> ClassroomError {
    match status {
        reqwest::StatusCode::UNAUTHORIZED => {
            ClassroomError::Authentication("access token expired or invalid".to_string())
        }
        reqwest::StatusCode::FORBIDDEN => ClassroomError::Forbidden(path.to_string()),
        reqwest::StatusCode::NOT_FOUND => ClassroomError::NotFound(path.to_string()),
        _ => ClassroomError::Api {
            status: status.as_u16(),
            message: body,
        },
    }
}

#[async_trait]
impl ClassroomApi for GoogleClassroomClient {
    fn authorization_url(&self, state: &str) -> String {
        self.oauth.authorization_url(state)
    }

    async fn exchange_code(&self, code: &str) -> Result<AuthorizedTokens, ClassroomError> {
        self.oauth.exchange_code(code).await
    }

    async fn teacher_profile(&self, access_token: &str) -> Result<TeacherProfile, ClassroomError> {
        let profile: ApiUserProfile = self.get_json(access_token, "userProfiles/me", &[]).await?;
        Ok(profile.into_profile())
    }

    async fn list_teacher_courses(
        &self,
        refresh_token: &str,
        status: CourseStatus,
    ) -> Result<Vec<Course>, ClassroomError> {
        let access_token = self.oauth.refresh_access_token(refresh_token).await?;

        let mut courses = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query: Vec<(&str, &str)> = vec![("teacherId", "me"), ("pageSize", PAGE_SIZE)];
            for state in status.course_states() {
                query.push(("courseStates", *state));
            }
            if let Some(ref token) = page_token {
                query.push(("pageToken", token.as_str()));
            }

            let page: CourseListResponse = self.get_json(&access_token, "courses", &query).await?;
            courses.extend(page.courses.into_iter().filter_map(ApiCourse::into_course));

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(count = courses.len(), status = status.as_str(), "fetched teacher courses");
        Ok(courses)
    }

    async fn get_course(
        &self,
        refresh_token: &str,
        course_id: &str,
    ) -> Result<Course, ClassroomError> {
        let access_token = self.oauth.refresh_access_token(refresh_token).await?;
        let path = format!("courses/{}", urlencoding::encode(course_id));

        let course: ApiCourse = self.get_json(&access_token, &path, &[]).await?;
        course
            .into_course()
            .ok_or_else(|| ClassroomError::InvalidResponse(format!("course {} has no id", course_id)))
    }

    async fn list_course_students(
        &self,
        refresh_token: &str,
        course_id: &str,
    ) -> Result<Vec<Student>, ClassroomError> {
        let access_token = self.oauth.refresh_access_token(refresh_token).await?;
        let path = format!("courses/{}/students", urlencoding::encode(course_id));

        let mut students = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query: Vec<(&str, &str)> = vec![("pageSize", PAGE_SIZE)];
            if let Some(ref token) = page_token {
                query.push(("pageToken", token.as_str()));
            }

            let page: StudentListResponse = self.get_json(&access_token, &path, &query).await?;
            students.extend(
                page.students
                    .into_iter()
                    .filter_map(|s| s.into_student(course_id)),
            );

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(count = students.len(), course_id, "fetched course students");
        Ok(students)
    }
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CourseListResponse {
    #[serde(default)]
    courses: Vec<ApiCourse>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiCourse {
    id: Option<String>,
    #[serde(default)]
    name: String,
    section: Option<String>,
    room: Option<String>,
    #[serde(default)]
    owner_id: String,
    course_state: Option<String>,
}

impl ApiCourse {
    fn into_course(self) -> Option<Course> {
        let id = self.id.filter(|id| !id.is_empty())?;
        let status = self
            .course_state
            .as_deref()
            .map(CourseStatus::from_course_state)
            .unwrap_or(CourseStatus::Inactive);

        Some(Course {
            id,
            name: self.name,
            section: self.section.filter(|s| !s.is_empty()),
            room: self.room.filter(|r| !r.is_empty()),
            status,
            owner_id: self.owner_id,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StudentListResponse {
    #[serde(default)]
    students: Vec<ApiStudent>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiStudent {
    user_id: Option<String>,
    #[serde(default)]
    profile: ApiUserProfile,
}

impl ApiStudent {
    fn into_student(self, course_id: &str) -> Option<Student> {
        let profile = self.profile.into_profile();
        let id = self.user_id.filter(|id| !id.is_empty()).unwrap_or(profile.id);
        if id.is_empty() {
            return None;
        }

        Some(Student {
            id,
            name: profile.name,
            email: profile.email,
            course_id: course_id.to_string(),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiUserProfile {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: ApiName,
    #[serde(default)]
    email_address: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiName {
    #[serde(default)]
    full_name: String,
}

impl ApiUserProfile {
    fn into_profile(self) -> TeacherProfile {
        TeacherProfile {
            id: self.id,
            name: self.name.full_name,
            email: self.email_address,
        }
    }
}
