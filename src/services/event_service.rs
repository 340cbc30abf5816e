//! Domain service for project events.

use thiserror::Error;

use crate::models::EventRecord;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for EventError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for EventError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct CreateEvent {
    pub short_name: String,
    pub name: String,
    pub coordinators: Vec<String>,
    pub max_team_size: i32,
    pub is_enabled: bool,
}

#[async_trait::async_trait]
pub trait EventService: Send + Sync {
    async fn create_event(&self, request: CreateEvent) -> Result<EventRecord, EventError>;

    /// Replaces the coordinator list on an existing event.
    async fn assign_coordinators(
        &self,
        event_id: i32,
        coordinators: Vec<String>,
    ) -> Result<EventRecord, EventError>;
}
