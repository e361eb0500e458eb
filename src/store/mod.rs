//! Document persistence for rosters and teacher registrations.
//!
//! The HTTP layer depends on the [`ClassroomStore`] trait only; the MongoDB
//! implementation is constructed once at startup and passed in explicitly.

mod mongo;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::classroom::{Student, TeacherProfile};
use crate::error::StoreError;

pub use mongo::{connect, MongoClassroomStore, REGISTRATIONS_COLLECTION, ROSTERS_COLLECTION};

/// A teacher who completed the OAuth consent flow.
///
/// The refresh token is handed back to the client and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub user_id: String,
    pub name: String,
    pub email: String,
}

impl From<TeacherProfile> for Registration {
    fn from(profile: TeacherProfile) -> Self {
        Self {
            user_id: profile.id,
            name: profile.name,
            email: profile.email,
        }
    }
}

/// Storage operations needed by the controllers.
#[async_trait]
pub trait ClassroomStore: Send + Sync {
    /// Replace the stored roster of `course_id` with `students`.
    ///
    /// There is exactly one roster per course; saving twice keeps only the
    /// last upload. Concurrent saves for the same course are last-writer-wins.
    async fn save_roster(&self, course_id: &str, students: &[Student]) -> Result<(), StoreError>;

    /// Load the stored roster of `course_id`, or `None` if nothing was saved.
    async fn load_roster(&self, course_id: &str) -> Result<Option<Vec<Student>>, StoreError>;

    /// Record (or refresh) a teacher registration.
    async fn save_registration(&self, registration: &Registration) -> Result<(), StoreError>;
}
