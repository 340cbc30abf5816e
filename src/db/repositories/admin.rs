use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::admins;
use crate::models::{AdminProfile, Role};

/// Fields required to persist a new admin. The password must already
/// be hashed by the caller.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct AdminChanges {
    pub name: Option<String>,
    pub email: Option<String>,
}

pub struct AdminRepository {
    conn: DatabaseConnection,
}

impl AdminRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: i32) -> Result<Option<AdminProfile>> {
        let admin = admins::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query admin by ID")?;
        Ok(admin.map(AdminProfile::from))
    }

    /// Admin lookup by login key, including the stored hash for
    /// credential verification.
    pub async fn find_by_email_with_hash(
        &self,
        email: &str,
    ) -> Result<Option<(AdminProfile, String)>> {
        let admin = admins::Entity::find()
            .filter(admins::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query admin by email")?;

        Ok(admin.map(|a| {
            let hash = a.password_hash.clone();
            (AdminProfile::from(a), hash)
        }))
    }

    pub async fn get_with_hash(&self, id: i32) -> Result<Option<(AdminProfile, String)>> {
        let admin = admins::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query admin by ID")?;

        Ok(admin.map(|a| {
            let hash = a.password_hash.clone();
            (AdminProfile::from(a), hash)
        }))
    }

    pub async fn exists_by_email(&self, email: &str) -> Result<bool> {
        let found = admins::Entity::find()
            .filter(admins::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to check for existing admin")?;
        Ok(found.is_some())
    }

    pub async fn create(&self, new: NewAdmin) -> Result<AdminProfile> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = admins::ActiveModel {
            name: Set(new.name),
            email: Set(new.email),
            password_hash: Set(new.password_hash),
            role: Set(Role::Admin.as_str().to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert admin")?;
        Ok(AdminProfile::from(model))
    }

    pub async fn list_all(&self) -> Result<Vec<AdminProfile>> {
        let admins = admins::Entity::find()
            .order_by_asc(admins::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list admins")?;
        Ok(admins.into_iter().map(AdminProfile::from).collect())
    }

    /// Applies the supplied fields and refreshes `updated_at`. Returns
    /// `None` when no admin with that ID exists.
    pub async fn update(&self, id: i32, changes: AdminChanges) -> Result<Option<AdminProfile>> {
        let Some(admin) = admins::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query admin for update")?
        else {
            return Ok(None);
        };

        let mut active: admins::ActiveModel = admin.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update admin")?;
        Ok(Some(AdminProfile::from(model)))
    }

    pub async fn set_password_hash(&self, id: i32, password_hash: String) -> Result<()> {
        let admin = admins::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query admin for password update")?
            .ok_or_else(|| anyhow::anyhow!("Admin not found: {id}"))?;

        let mut active: admins::ActiveModel = admin.into();
        active.password_hash = Set(password_hash);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active.update(&self.conn).await?;

        Ok(())
    }
}
