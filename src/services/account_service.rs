//! Domain service for account CRUD, scoped per variant.

use thiserror::Error;

use crate::models::{AdminProfile, FacultyProfile, StudentProfile};

#[derive(Debug, Error)]
pub enum AccountError {
    /// Duplicate unique key (email, or username for faculty/students).
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AccountError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AccountError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct CreateAdmin {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct CreateFaculty {
    pub username: String,
    pub name: String,
    pub email: String,
    pub section: String,
    pub dept: String,
    /// Defaults to "false" when omitted.
    pub coordinator: Option<String>,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct CreateStudent {
    pub username: String,
    pub name: String,
    pub email: String,
    pub section: String,
    pub dept: String,
    pub password: String,
}

/// Partial updates: `None` or empty strings leave the stored value
/// unchanged (last-write-wins merge, no null-clearing).
#[derive(Debug, Clone, Default)]
pub struct UpdateAdmin {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateFaculty {
    pub username: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub section: Option<String>,
    pub dept: Option<String>,
    pub coordinator: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateStudent {
    pub username: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub section: Option<String>,
    pub dept: Option<String>,
}

#[async_trait::async_trait]
pub trait AccountService: Send + Sync {
    /// # Errors
    ///
    /// [`AccountError::Conflict`] when the unique key already exists.
    async fn create_admin(&self, request: CreateAdmin) -> Result<AdminProfile, AccountError>;

    async fn create_faculty(&self, request: CreateFaculty) -> Result<FacultyProfile, AccountError>;

    async fn create_student(&self, request: CreateStudent) -> Result<StudentProfile, AccountError>;

    /// An empty collection is a [`AccountError::NotFound`], not an
    /// empty list; clients expect "none found" as 404.
    async fn list_admins(&self) -> Result<Vec<AdminProfile>, AccountError>;

    async fn list_faculty(&self) -> Result<Vec<FacultyProfile>, AccountError>;

    async fn list_students(&self) -> Result<Vec<StudentProfile>, AccountError>;

    async fn update_admin(&self, id: i32, update: UpdateAdmin)
    -> Result<AdminProfile, AccountError>;

    async fn update_faculty(
        &self,
        id: i32,
        update: UpdateFaculty,
    ) -> Result<FacultyProfile, AccountError>;

    async fn update_student(
        &self,
        id: i32,
        update: UpdateStudent,
    ) -> Result<StudentProfile, AccountError>;

    /// Students whose `section` equals the calling faculty's section.
    async fn list_section_students(
        &self,
        faculty_id: i32,
    ) -> Result<Vec<StudentProfile>, AccountError>;
}
