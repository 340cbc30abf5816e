//! Domain service for credential exchange and password management.
//!
//! Login keys differ per variant: admins authenticate with their
//! email, faculty and students with their username. A successful login
//! issues a bearer token scoped to the account's id and role.

use thiserror::Error;

use crate::models::{AdminProfile, FacultyProfile, StudentProfile};

#[derive(Debug, Error)]
pub enum AuthError {
    /// Login key (or account id) does not resolve to a record.
    #[error("{0}")]
    NotFound(String),

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Invalid old password")]
    InvalidOldPassword,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Token plus the public projection of the account that logged in.
#[derive(Debug, Clone)]
pub struct Login<T> {
    pub token: String,
    pub account: T,
}

#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// # Errors
    ///
    /// [`AuthError::NotFound`] when no admin has that email,
    /// [`AuthError::InvalidPassword`] on a hash mismatch.
    async fn login_admin(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Login<AdminProfile>, AuthError>;

    async fn login_faculty(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Login<FacultyProfile>, AuthError>;

    async fn login_student(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Login<StudentProfile>, AuthError>;

    async fn admin_profile(&self, id: i32) -> Result<AdminProfile, AuthError>;

    async fn faculty_profile(&self, id: i32) -> Result<FacultyProfile, AuthError>;

    async fn student_profile(&self, id: i32) -> Result<StudentProfile, AuthError>;

    /// Replaces the stored hash after the old password verifies.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidOldPassword`] on a mismatch.
    async fn change_admin_password(
        &self,
        id: i32,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError>;

    async fn change_faculty_password(
        &self,
        id: i32,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError>;

    async fn change_student_password(
        &self,
        id: i32,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError>;
}
