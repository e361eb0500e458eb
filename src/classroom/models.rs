//! Local data shapes for courses, students and teacher profiles.
//!
//! These are what the HTTP API returns and what the store persists. The
//! Google wire formats live in `client.rs` and are mapped into these types.

use serde::{Deserialize, Serialize};

/// Whether a course is currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseStatus {
    Active,
    Inactive,
}

impl CourseStatus {
    /// Map a Google Classroom `courseState` value.
    ///
    /// Only `ACTIVE` counts as active; archived, provisioned, declined and
    /// suspended courses are all inactive.
    pub fn from_course_state(state: &str) -> Self {
        if state.eq_ignore_ascii_case("ACTIVE") {
            CourseStatus::Active
        } else {
            CourseStatus::Inactive
        }
    }

    /// The `courseStates` query values that select this status.
    pub fn course_states(&self) -> &'static [&'static str] {
        match self {
            CourseStatus::Active => &["ACTIVE"],
            CourseStatus::Inactive => &["ARCHIVED", "PROVISIONED", "DECLINED", "SUSPENDED"],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CourseStatus::Active => "active",
            CourseStatus::Inactive => "inactive",
        }
    }
}

/// A course owned or taught by the authenticated teacher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    pub status: CourseStatus,
    pub owner_id: String,
}

/// A student enrolled in one course.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub email: String,
    pub course_id: String,
}

/// The authenticated teacher's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherProfile {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Tokens returned by a successful authorization-code exchange.
#[derive(Debug, Clone)]
pub struct AuthorizedTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
}
