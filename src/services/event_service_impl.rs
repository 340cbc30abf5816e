//! `SeaORM` implementation of the `EventService` trait.

use async_trait::async_trait;

use crate::db::{NewEvent, Store};
use crate::models::EventRecord;
use crate::services::event_service::{CreateEvent, EventError, EventService};

pub struct SeaOrmEventService {
    store: Store,
}

impl SeaOrmEventService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl EventService for SeaOrmEventService {
    async fn create_event(&self, request: CreateEvent) -> Result<EventRecord, EventError> {
        if self.store.event_exists(&request.short_name).await? {
            return Err(EventError::Conflict("Event already exists".to_string()));
        }

        let event = self
            .store
            .create_event(NewEvent {
                short_name: request.short_name,
                name: request.name,
                coordinators: request.coordinators,
                max_team_size: request.max_team_size,
                is_enabled: request.is_enabled,
            })
            .await?;

        Ok(event)
    }

    async fn assign_coordinators(
        &self,
        event_id: i32,
        coordinators: Vec<String>,
    ) -> Result<EventRecord, EventError> {
        self.store
            .set_event_coordinators(event_id, coordinators)
            .await?
            .ok_or_else(|| EventError::NotFound("Event not found.".to_string()))
    }
}
