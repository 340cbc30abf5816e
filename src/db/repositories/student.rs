use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::students;
use crate::models::{Role, StudentProfile};

#[derive(Debug, Clone)]
pub struct NewStudent {
    pub username: String,
    pub name: String,
    pub email: String,
    pub section: String,
    pub dept: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Default)]
pub struct StudentChanges {
    pub username: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub section: Option<String>,
    pub dept: Option<String>,
}

pub struct StudentRepository {
    conn: DatabaseConnection,
}

impl StudentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: i32) -> Result<Option<StudentProfile>> {
        let student = students::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query student by ID")?;
        Ok(student.map(StudentProfile::from))
    }

    pub async fn find_by_username_with_hash(
        &self,
        username: &str,
    ) -> Result<Option<(StudentProfile, String)>> {
        let student = students::Entity::find()
            .filter(students::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query student by username")?;

        Ok(student.map(|s| {
            let hash = s.password_hash.clone();
            (StudentProfile::from(s), hash)
        }))
    }

    pub async fn get_with_hash(&self, id: i32) -> Result<Option<(StudentProfile, String)>> {
        let student = students::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query student by ID")?;

        Ok(student.map(|s| {
            let hash = s.password_hash.clone();
            (StudentProfile::from(s), hash)
        }))
    }

    /// Duplicate probe used by creation and bulk import: a record with
    /// either the same username or the same email counts as existing.
    pub async fn exists_by_username_or_email(&self, username: &str, email: &str) -> Result<bool> {
        let found = students::Entity::find()
            .filter(
                Condition::any()
                    .add(students::Column::Username.eq(username))
                    .add(students::Column::Email.eq(email)),
            )
            .one(&self.conn)
            .await
            .context("Failed to check for existing student")?;
        Ok(found.is_some())
    }

    pub async fn create(&self, new: NewStudent) -> Result<StudentProfile> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = students::ActiveModel {
            username: Set(new.username),
            name: Set(new.name),
            email: Set(new.email),
            section: Set(new.section),
            dept: Set(new.dept),
            password_hash: Set(new.password_hash),
            role: Set(Role::Student.as_str().to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert student")?;
        Ok(StudentProfile::from(model))
    }

    pub async fn list_all(&self) -> Result<Vec<StudentProfile>> {
        let students = students::Entity::find()
            .order_by_asc(students::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list students")?;
        Ok(students.into_iter().map(StudentProfile::from).collect())
    }

    pub async fn list_by_section(&self, section: &str) -> Result<Vec<StudentProfile>> {
        let students = students::Entity::find()
            .filter(students::Column::Section.eq(section))
            .order_by_asc(students::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list students by section")?;
        Ok(students.into_iter().map(StudentProfile::from).collect())
    }

    pub async fn update(&self, id: i32, changes: StudentChanges) -> Result<Option<StudentProfile>> {
        let Some(student) = students::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query student for update")?
        else {
            return Ok(None);
        };

        let mut active: students::ActiveModel = student.into();
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
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update student")?;
        Ok(Some(StudentProfile::from(model)))
    }

    pub async fn set_password_hash(&self, id: i32, password_hash: String) -> Result<()> {
        let student = students::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query student for password update")?
            .ok_or_else(|| anyhow::anyhow!("Student not found: {id}"))?;

        let mut active: students::ActiveModel = student.into();
        active.password_hash = Set(password_hash);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active.update(&self.conn).await?;

        Ok(())
    }
}
