use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::faculty;
use crate::models::{FacultyProfile, Role};

#[derive(Debug, Clone)]
pub struct NewFaculty {
    pub username: String,
    pub name: String,
    pub email: String,
    pub section: String,
    pub dept: String,
    /// "true"/"false" string, lowercased by the caller
    pub coordinator: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Default)]
pub struct FacultyChanges {
    pub username: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub section: Option<String>,
    pub dept: Option<String>,
    pub coordinator: Option<String>,
}

pub struct FacultyRepository {
    conn: DatabaseConnection,
}

impl FacultyRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: i32) -> Result<Option<FacultyProfile>> {
        let member = faculty::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query faculty by ID")?;
        Ok(member.map(FacultyProfile::from))
    }

    pub async fn find_by_username_with_hash(
        &self,
        username: &str,
    ) -> Result<Option<(FacultyProfile, String)>> {
        let member = faculty::Entity::find()
            .filter(faculty::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query faculty by username")?;

        Ok(member.map(|f| {
            let hash = f.password_hash.clone();
            (FacultyProfile::from(f), hash)
        }))
    }

    pub async fn get_with_hash(&self, id: i32) -> Result<Option<(FacultyProfile, String)>> {
        let member = faculty::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query faculty by ID")?;

        Ok(member.map(|f| {
            let hash = f.password_hash.clone();
            (FacultyProfile::from(f), hash)
        }))
    }

    pub async fn exists_by_username_or_email(&self, username: &str, email: &str) -> Result<bool> {
        let found = faculty::Entity::find()
            .filter(
                Condition::any()
                    .add(faculty::Column::Username.eq(username))
                    .add(faculty::Column::Email.eq(email)),
            )
            .one(&self.conn)
            .await
            .context("Failed to check for existing faculty")?;
        Ok(found.is_some())
    }

    pub async fn create(&self, new: NewFaculty) -> Result<FacultyProfile> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = faculty::ActiveModel {
            username: Set(new.username),
            name: Set(new.name),
            email: Set(new.email),
            section: Set(new.section),
            dept: Set(new.dept),
            coordinator: Set(new.coordinator),
            password_hash: Set(new.password_hash),
            role: Set(Role::Faculty.as_str().to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert faculty")?;
        Ok(FacultyProfile::from(model))
    }

    pub async fn list_all(&self) -> Result<Vec<FacultyProfile>> {
        let members = faculty::Entity::find()
            .order_by_asc(faculty::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list faculty")?;
        Ok(members.into_iter().map(FacultyProfile::from).collect())
    }

    pub async fn update(&self, id: i32, changes: FacultyChanges) -> Result<Option<FacultyProfile>> {
        let Some(member) = faculty::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query faculty for update")?
        else {
            return Ok(None);
        };

        let mut active: faculty::ActiveModel = member.into();
        if let Some(username) = changes.username {
            active.username = Set(username);
        }
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(section) = changes.section {
            active.section = Set(section);
        }
        if let Some(dept) = changes.dept {
            active.dept = Set(dept);
        }
        if let Some(coordinator) = changes.coordinator {
            active.coordinator = Set(coordinator);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update faculty")?;
        Ok(Some(FacultyProfile::from(model)))
    }

    pub async fn set_password_hash(&self, id: i32, password_hash: String) -> Result<()> {
        let member = faculty::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query faculty for password update")?
            .ok_or_else(|| anyhow::anyhow!("Faculty not found: {id}"))?;

        let mut active: faculty::ActiveModel = member.into();
        active.password_hash = Set(password_hash);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active.update(&self.conn).await?;

        Ok(())
    }
}
