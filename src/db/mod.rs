use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::models::{AdminProfile, EventRecord, FacultyProfile, StudentProfile};

pub mod migrator;
pub mod repositories;

pub use repositories::admin::{AdminChanges, NewAdmin};
pub use repositories::event::NewEvent;
pub use repositories::faculty::{FacultyChanges, NewFaculty};
pub use repositories::student::{NewStudent, StudentChanges};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let is_memory = db_url.contains(":memory:");

        if !is_memory {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        if is_memory {
            // Each pooled connection to :memory: would be its own
            // database; pin the pool to a single long-lived connection.
            opt.max_connections(1).min_connections(1).sqlx_logging(false);
        } else {
            opt.max_connections(max_connections)
                .min_connections(min_connections)
                .connect_timeout(Duration::from_secs(10))
                .acquire_timeout(Duration::from_secs(10))
                .idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600))
                .sqlx_logging(false);
        }

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn admin_repo(&self) -> repositories::admin::AdminRepository {
        repositories::admin::AdminRepository::new(self.conn.clone())
    }

    fn faculty_repo(&self) -> repositories::faculty::FacultyRepository {
        repositories::faculty::FacultyRepository::new(self.conn.clone())
    }

    fn student_repo(&self) -> repositories::student::StudentRepository {
        repositories::student::StudentRepository::new(self.conn.clone())
    }

    fn event_repo(&self) -> repositories::event::EventRepository {
        repositories::event::EventRepository::new(self.conn.clone())
    }

    // ========== Admin ==========

    pub async fn get_admin(&self, id: i32) -> Result<Option<AdminProfile>> {
        self.admin_repo().get(id).await
    }

    pub async fn find_admin_with_hash(
        &self,
        email: &str,
    ) -> Result<Option<(AdminProfile, String)>> {
        self.admin_repo().find_by_email_with_hash(email).await
    }

    pub async fn get_admin_with_hash(&self, id: i32) -> Result<Option<(AdminProfile, String)>> {
        self.admin_repo().get_with_hash(id).await
    }

    pub async fn admin_exists(&self, email: &str) -> Result<bool> {
        self.admin_repo().exists_by_email(email).await
    }

    pub async fn create_admin(&self, new: NewAdmin) -> Result<AdminProfile> {
        self.admin_repo().create(new).await
    }

    pub async fn list_admins(&self) -> Result<Vec<AdminProfile>> {
        self.admin_repo().list_all().await
    }

    pub async fn update_admin(
        &self,
        id: i32,
        changes: AdminChanges,
    ) -> Result<Option<AdminProfile>> {
        self.admin_repo().update(id, changes).await
    }

    pub async fn set_admin_password_hash(&self, id: i32, password_hash: String) -> Result<()> {
        self.admin_repo().set_password_hash(id, password_hash).await
    }

    // ========== Faculty ==========

    pub async fn get_faculty(&self, id: i32) -> Result<Option<FacultyProfile>> {
        self.faculty_repo().get(id).await
    }

    pub async fn find_faculty_with_hash(
        &self,
        username: &str,
    ) -> Result<Option<(FacultyProfile, String)>> {
        self.faculty_repo().find_by_username_with_hash(username).await
    }

    pub async fn get_faculty_with_hash(&self, id: i32) -> Result<Option<(FacultyProfile, String)>> {
        self.faculty_repo().get_with_hash(id).await
    }

    pub async fn faculty_exists(&self, username: &str, email: &str) -> Result<bool> {
        self.faculty_repo()
            .exists_by_username_or_email(username, email)
            .await
    }

    pub async fn create_faculty(&self, new: NewFaculty) -> Result<FacultyProfile> {
        self.faculty_repo().create(new).await
    }

    pub async fn list_faculty(&self) -> Result<Vec<FacultyProfile>> {
        self.faculty_repo().list_all().await
    }

    pub async fn update_faculty(
        &self,
        id: i32,
        changes: FacultyChanges,
    ) -> Result<Option<FacultyProfile>> {
        self.faculty_repo().update(id, changes).await
    }

    pub async fn set_faculty_password_hash(&self, id: i32, password_hash: String) -> Result<()> {
        self.faculty_repo().set_password_hash(id, password_hash).await
    }

    // ========== Students ==========

    pub async fn get_student(&self, id: i32) -> Result<Option<StudentProfile>> {
        self.student_repo().get(id).await
    }

    pub async fn find_student_with_hash(
        &self,
        username: &str,
    ) -> Result<Option<(StudentProfile, String)>> {
        self.student_repo().find_by_username_with_hash(username).await
    }

    pub async fn get_student_with_hash(&self, id: i32) -> Result<Option<(StudentProfile, String)>> {
        self.student_repo().get_with_hash(id).await
    }

    pub async fn student_exists(&self, username: &str, email: &str) -> Result<bool> {
        self.student_repo()
            .exists_by_username_or_email(username, email)
            .await
    }

    pub async fn create_student(&self, new: NewStudent) -> Result<StudentProfile> {
        self.student_repo().create(new).await
    }

    pub async fn list_students(&self) -> Result<Vec<StudentProfile>> {
        self.student_repo().list_all().await
    }

    pub async fn list_students_by_section(&self, section: &str) -> Result<Vec<StudentProfile>> {
        self.student_repo().list_by_section(section).await
    }

    pub async fn update_student(
        &self,
        id: i32,
        changes: StudentChanges,
    ) -> Result<Option<StudentProfile>> {
        self.student_repo().update(id, changes).await
    }

    pub async fn set_student_password_hash(&self, id: i32, password_hash: String) -> Result<()> {
        self.student_repo().set_password_hash(id, password_hash).await
    }

    // ========== Project events ==========

    pub async fn get_event(&self, id: i32) -> Result<Option<EventRecord>> {
        self.event_repo().get(id).await
    }

    pub async fn event_exists(&self, short_name: &str) -> Result<bool> {
        self.event_repo().exists_by_short_name(short_name).await
    }

    pub async fn create_event(&self, new: NewEvent) -> Result<EventRecord> {
        self.event_repo().create(new).await
    }

    pub async fn set_event_coordinators(
        &self,
        id: i32,
        coordinators: Vec<String>,
    ) -> Result<Option<EventRecord>> {
        self.event_repo().set_coordinators(id, coordinators).await
    }
}
