use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::entities::project_events;
use crate::models::EventRecord;

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub short_name: String,
    pub name: String,
    pub coordinators: Vec<String>,
    pub max_team_size: i32,
    pub is_enabled: bool,
}

pub struct EventRepository {
    conn: DatabaseConnection,
}

impl EventRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: i32) -> Result<Option<EventRecord>> {
        let event = project_events::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query event by ID")?;
        Ok(event.map(EventRecord::from))
    }

    pub async fn exists_by_short_name(&self, short_name: &str) -> Result<bool> {
        let found = project_events::Entity::find()
            .filter(project_events::Column::ShortName.eq(short_name))
            .one(&self.conn)
            .await
            .context("Failed to check for existing event")?;
        Ok(found.is_some())
    }

    pub async fn create(&self, new: NewEvent) -> Result<EventRecord> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = project_events::ActiveModel {
            short_name: Set(new.short_name),
            name: Set(new.name),
            coordinators: Set(serde_json::json!(new.coordinators)),
            max_team_size: Set(new.max_team_size),
            is_enabled: Set(new.is_enabled),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert event")?;
        Ok(EventRecord::from(model))
    }

    /// Replaces the coordinator list. Returns `None` when the event
    /// does not exist.
    pub async fn set_coordinators(
        &self,
        id: i32,
        coordinators: Vec<String>,
    ) -> Result<Option<EventRecord>> {
        let Some(event) = project_events::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query event for coordinator update")?
        else {
            return Ok(None);
        };

        let mut active: project_events::ActiveModel = event.into();
        active.coordinators = Set(serde_json::json!(coordinators));
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update event coordinators")?;
        Ok(Some(EventRecord::from(model)))
    }
}
