//! Public projections of the stored account records.
//!
//! These are the only account shapes that ever cross the API boundary;
//! the password hash stays behind in the entity models.

use serde::Serialize;

use crate::entities::{admins, faculty, project_events, students};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<admins::Model> for AdminProfile {
    fn from(model: admins::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            role: model.role,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyProfile {
    pub id: i32,
    pub username: String,
    pub name: String,
    pub email: String,
    pub section: String,
    pub dept: String,
    pub coordinator: String,
    pub role: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<faculty::Model> for FacultyProfile {
    fn from(model: faculty::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            name: model.name,
            email: model.email,
            section: model.section,
            dept: model.dept,
            coordinator: model.coordinator,
            role: model.role,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub id: i32,
    pub username: String,
    pub name: String,
    pub email: String,
    pub section: String,
    pub dept: String,
    pub role: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<students::Model> for StudentProfile {
    fn from(model: students::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            name: model.name,
            email: model.email,
            section: model.section,
            dept: model.dept,
            role: model.role,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Project event record. Wire field names are mixed-case for client
/// compatibility (`short_name` and `max_team_size` stay snake_case,
/// `isEnabled` is camelCase).
#[derive(Debug, Clone, Serialize)]
pub struct EventRecord {
    pub id: i32,
    pub short_name: String,
    pub name: String,
    pub coordinators: Vec<String>,
    pub max_team_size: i32,
    #[serde(rename = "isEnabled")]
    pub is_enabled: bool,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl From<project_events::Model> for EventRecord {
    fn from(model: project_events::Model) -> Self {
        let coordinators = serde_json::from_value(model.coordinators).unwrap_or_default();
        Self {
            id: model.id,
            short_name: model.short_name,
            name: model.name,
            coordinators,
            max_team_size: model.max_team_size,
            is_enabled: model.is_enabled,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
