//! `SeaORM` implementation of the `AccountService` trait.

use async_trait::async_trait;

use crate::db::{
    AdminChanges, FacultyChanges, NewAdmin, NewFaculty, NewStudent, Store, StudentChanges,
};
use crate::db::repositories::password;
use crate::models::{AdminProfile, FacultyProfile, StudentProfile};
use crate::services::account_service::{
    AccountError, AccountService, CreateAdmin, CreateFaculty, CreateStudent, UpdateAdmin,
    UpdateFaculty, UpdateStudent,
};

pub struct SeaOrmAccountService {
    store: Store,
}

impl SeaOrmAccountService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

/// Collapses omitted and blank-after-trim values so the partial merge
/// treats them both as "leave unchanged".
fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim().to_string();
        if trimmed.is_empty() { None } else { Some(trimmed) }
    })
}

#[async_trait]
impl AccountService for SeaOrmAccountService {
    async fn create_admin(&self, request: CreateAdmin) -> Result<AdminProfile, AccountError> {
        if self.store.admin_exists(&request.email).await? {
            return Err(AccountError::Conflict("Admin already exists".to_string()));
        }

        let password_hash = password::hash_password(&request.password).await?;
        let admin = self
            .store
            .create_admin(NewAdmin {
                name: request.name,
                email: request.email,
                password_hash,
            })
            .await?;

        Ok(admin)
    }

    async fn create_faculty(&self, request: CreateFaculty) -> Result<FacultyProfile, AccountError> {
        if self
            .store
            .faculty_exists(&request.username, &request.email)
            .await?
        {
            return Err(AccountError::Conflict("Faculty already exists".to_string()));
        }

        let password_hash = password::hash_password(&request.password).await?;
        let member = self
            .store
            .create_faculty(NewFaculty {
                username: request.username,
                name: request.name,
                email: request.email,
                section: request.section,
                dept: request.dept,
                coordinator: request
                    .coordinator
                    .unwrap_or_else(|| "false".to_string())
                    .to_lowercase(),
                password_hash,
            })
            .await?;

        Ok(member)
    }

    async fn create_student(&self, request: CreateStudent) -> Result<StudentProfile, AccountError> {
        if self
            .store
            .student_exists(&request.username, &request.email)
            .await?
        {
            return Err(AccountError::Conflict("Student already exists".to_string()));
        }

        let password_hash = password::hash_password(&request.password).await?;
        let student = self
            .store
            .create_student(NewStudent {
                username: request.username,
                name: request.name,
                email: request.email,
                section: request.section,
                dept: request.dept,
                password_hash,
            })
            .await?;

        Ok(student)
    }

    async fn list_admins(&self) -> Result<Vec<AdminProfile>, AccountError> {
        let admins = self.store.list_admins().await?;
        if admins.is_empty() {
            return Err(AccountError::NotFound("No admins found".to_string()));
        }
        Ok(admins)
    }

    async fn list_faculty(&self) -> Result<Vec<FacultyProfile>, AccountError> {
        let members = self.store.list_faculty().await?;
        if members.is_empty() {
            return Err(AccountError::NotFound("No faculty found".to_string()));
        }
        Ok(members)
    }

    async fn list_students(&self) -> Result<Vec<StudentProfile>, AccountError> {
        let students = self.store.list_students().await?;
        if students.is_empty() {
            return Err(AccountError::NotFound("No students found".to_string()));
        }
        Ok(students)
    }

    async fn update_admin(
        &self,
        id: i32,
        update: UpdateAdmin,
    ) -> Result<AdminProfile, AccountError> {
        let changes = AdminChanges {
            name: non_empty(update.name),
            email: non_empty(update.email),
        };

        self.store
            .update_admin(id, changes)
            .await?
            .ok_or_else(|| AccountError::NotFound("Admin not found".to_string()))
    }

    async fn update_faculty(
        &self,
        id: i32,
        update: UpdateFaculty,
    ) -> Result<FacultyProfile, AccountError> {
        let changes = FacultyChanges {
            username: non_empty(update.username),
            name: non_empty(update.name),
            email: non_empty(update.email),
            section: non_empty(update.section),
            dept: non_empty(update.dept),
            coordinator: non_empty(update.coordinator).map(|c| c.to_lowercase()),
        };

        self.store
            .update_faculty(id, changes)
            .await?
            .ok_or_else(|| AccountError::NotFound("Faculty not found".to_string()))
    }

    async fn update_student(
        &self,
        id: i32,
        update: UpdateStudent,
    ) -> Result<StudentProfile, AccountError> {
        let changes = StudentChanges {
            username: non_empty(update.username),
            name: non_empty(update.name),
            email: non_empty(update.email),
            section: non_empty(update.section),
            dept: non_empty(update.dept),
        };

        self.store
            .update_student(id, changes)
            .await?
            .ok_or_else(|| AccountError::NotFound("Student not found".to_string()))
    }

    async fn list_section_students(
        &self,
        faculty_id: i32,
    ) -> Result<Vec<StudentProfile>, AccountError> {
        let member = self
            .store
            .get_faculty(faculty_id)
            .await?
            .ok_or_else(|| AccountError::NotFound("Faculty not found".to_string()))?;

        Ok(self.store.list_students_by_section(&member.section).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::non_empty;

    #[test]
    fn non_empty_drops_blank_and_whitespace_values() {
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(Some("   ".to_string())), None);
        assert_eq!(non_empty(Some(" kept ".to_string())), Some("kept".to_string()));
    }
}
