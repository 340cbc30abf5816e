//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use std::sync::Arc;

use crate::db::Store;
use crate::db::repositories::password;
use crate::models::{AdminProfile, FacultyProfile, Role, StudentProfile};
use crate::services::auth_service::{AuthError, AuthService, Login};
use crate::services::token::TokenService;

pub struct SeaOrmAuthService {
    store: Store,
    tokens: Arc<TokenService>,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, tokens: Arc<TokenService>) -> Self {
        Self { store, tokens }
    }

    fn issue_token(&self, id: i32, role: Role) -> Result<String, AuthError> {
        self.tokens
            .issue(id, role)
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    async fn verify_or_reject(
        password_input: &str,
        hash: &str,
        mismatch: AuthError,
    ) -> Result<(), AuthError> {
        let is_valid = password::verify_password(password_input, hash).await?;
        if is_valid { Ok(()) } else { Err(mismatch) }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login_admin(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Login<AdminProfile>, AuthError> {
        let (account, hash) = self
            .store
            .find_admin_with_hash(email)
            .await?
            .ok_or_else(|| AuthError::NotFound("Admin not found".to_string()))?;

        Self::verify_or_reject(password, &hash, AuthError::InvalidPassword).await?;

        // Login tokens always carry "admin", even for a stored
        // superadmin row; the elevated role never reaches a token.
        let token = self.issue_token(account.id, Role::Admin)?;
        Ok(Login { token, account })
    }

    async fn login_faculty(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Login<FacultyProfile>, AuthError> {
        let (account, hash) = self
            .store
            .find_faculty_with_hash(username)
            .await?
            .ok_or_else(|| AuthError::NotFound("Faculty not found".to_string()))?;

        Self::verify_or_reject(password, &hash, AuthError::InvalidPassword).await?;

        let token = self.issue_token(account.id, Role::Faculty)?;
        Ok(Login { token, account })
    }

    async fn login_student(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Login<StudentProfile>, AuthError> {
        let (account, hash) = self
            .store
            .find_student_with_hash(username)
            .await?
            .ok_or_else(|| AuthError::NotFound("Student not found".to_string()))?;

        Self::verify_or_reject(password, &hash, AuthError::InvalidPassword).await?;

        let token = self.issue_token(account.id, Role::Student)?;
        Ok(Login { token, account })
    }

    async fn admin_profile(&self, id: i32) -> Result<AdminProfile, AuthError> {
        self.store
            .get_admin(id)
            .await?
            .ok_or_else(|| AuthError::NotFound("Admin not found".to_string()))
    }

    async fn faculty_profile(&self, id: i32) -> Result<FacultyProfile, AuthError> {
        self.store
            .get_faculty(id)
            .await?
            .ok_or_else(|| AuthError::NotFound("Faculty not found".to_string()))
    }

    async fn student_profile(&self, id: i32) -> Result<StudentProfile, AuthError> {
        self.store
            .get_student(id)
            .await?
            .ok_or_else(|| AuthError::NotFound("Student not found".to_string()))
    }

    async fn change_admin_password(
        &self,
        id: i32,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let (_, hash) = self
            .store
            .get_admin_with_hash(id)
            .await?
            .ok_or_else(|| AuthError::NotFound("Admin not found".to_string()))?;

        Self::verify_or_reject(old_password, &hash, AuthError::InvalidOldPassword).await?;

        let new_hash = password::hash_password(new_password).await?;
        self.store.set_admin_password_hash(id, new_hash).await?;
        Ok(())
    }

    async fn change_faculty_password(
        &self,
        id: i32,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let (_, hash) = self
            .store
            .get_faculty_with_hash(id)
            .await?
            .ok_or_else(|| AuthError::NotFound("Faculty not found".to_string()))?;

        Self::verify_or_reject(old_password, &hash, AuthError::InvalidOldPassword).await?;

        let new_hash = password::hash_password(new_password).await?;
        self.store.set_faculty_password_hash(id, new_hash).await?;
        Ok(())
    }

    async fn change_student_password(
        &self,
        id: i32,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let (_, hash) = self
            .store
            .get_student_with_hash(id)
            .await?
            .ok_or_else(|| AuthError::NotFound("Student not found".to_string()))?;

        Self::verify_or_reject(old_password, &hash, AuthError::InvalidOldPassword).await?;

        let new_hash = password::hash_password(new_password).await?;
        self.store.set_student_password_hash(id, new_hash).await?;
        Ok(())
    }
}
