//! MongoDB-backed implementation of `ClassroomStore`.

use async_trait::async_trait;
use mongodb::bson::{doc, DateTime};
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::classroom::Student;
use crate::error::StoreError;

use super::{ClassroomStore, Registration};

/// Collection holding one roster document per course.
pub const ROSTERS_COLLECTION: &str = "rosters";

/// Collection holding one document per registered teacher.
pub const REGISTRATIONS_COLLECTION: &str = "registrations";

/// Open a client, select `database`, and verify the server answers `ping`.
///
/// This is called once at startup; the returned handle is cheap to clone and
/// pools connections internally.
pub async fn connect(uri: &str, database: &str) -> Result<Database, StoreError> {
    let client = Client::with_uri_str(uri)
        .await
        .map_err(|e| StoreError::Connection(e.to_string()))?;
    let db = client.database(database);

    db.run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| StoreError::Connection(e.to_string()))?;

    info!(database, "connected to MongoDB");
    Ok(db)
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RosterDocument {
    #[serde(rename = "_id")]
    course_id: String,
    students: Vec<Student>,
    updated_at: DateTime,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegistrationDocument {
    #[serde(rename = "_id")]
    user_id: String,
    name: String,
    email: String,
    registered_at: DateTime,
}

/// Stores rosters and registrations in a MongoDB database.
#[derive(Clone)]
pub struct MongoClassroomStore {
    rosters: Collection<RosterDocument>,
    registrations: Collection<RegistrationDocument>,
}

impl MongoClassroomStore {
    /// Create a store on an already-connected database.
    pub fn new(db: &Database) -> Self {
        Self {
            rosters: db.collection(ROSTERS_COLLECTION),
            registrations: db.collection(REGISTRATIONS_COLLECTION),
        }
    }
}

#[async_trait]
impl ClassroomStore for MongoClassroomStore {
    async fn save_roster(&self, course_id: &str, students: &[Student]) -> Result<(), StoreError> {
        let document = RosterDocument {
            course_id: course_id.to_string(),
            students: students.to_vec(),
            updated_at: DateTime::now(),
        };

        self.rosters
            .replace_one(doc! { "_id": course_id }, &document)
            .upsert(true)
            .await?;

        debug!(course_id, count = students.len(), "roster saved");
        Ok(())
    }

    async fn load_roster(&self, course_id: &str) -> Result<Option<Vec<Student>>, StoreError> {
        let document = self.rosters.find_one(doc! { "_id": course_id }).await?;
        Ok(document.map(|d| d.students))
    }

    async fn save_registration(&self, registration: &Registration) -> Result<(), StoreError> {
        let document = RegistrationDocument {
            user_id: registration.user_id.clone(),
            name: registration.name.clone(),
            email: registration.email.clone(),
            registered_at: DateTime::now(),
        };

        self.registrations
            .replace_one(doc! { "_id": registration.user_id.as_str() }, &document)
            .upsert(true)
            .await?;

        debug!(user_id = %registration.user_id, "registration saved");
        Ok(())
    }
}
