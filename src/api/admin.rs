use axum::{
    Json,
    extract::{Extension, Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::auth::{Identity, require_role};
use super::validation::{require_fields, validate_email};
use super::{ApiError, AppState, MessageResponse};
use crate::models::{AdminProfile, EventRecord, FacultyProfile, Role, StudentProfile};
use crate::services::account_service::{
    CreateAdmin, CreateFaculty, CreateStudent, UpdateAdmin, UpdateFaculty, UpdateStudent,
};
use crate::services::event_service::CreateEvent;
use crate::services::{ImportError, ImportReport};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct CreateAdminRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct AdminLoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub old_password: String,
    #[serde(default)]
    pub new_password: String,
}

#[derive(Deserialize)]
pub struct CreateFacultyRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub dept: String,
    pub coordinator: Option<String>,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct CreateStudentRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub dept: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct UpdateAdminRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateFacultyRequest {
    pub username: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub section: Option<String>,
    pub dept: Option<String>,
    pub coordinator: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateStudentRequest {
    pub username: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub section: Option<String>,
    pub dept: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateEventRequest {
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub coordinators: Vec<String>,
    pub max_team_size: Option<i32>,
    #[serde(rename = "isEnabled")]
    pub is_enabled: Option<bool>,
}

#[derive(Deserialize)]
pub struct AssignCoordinatorsRequest {
    #[serde(rename = "eventId")]
    pub event_id: Option<i32>,
    pub coordinators: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct AdminResponse {
    pub message: String,
    pub admin: AdminProfile,
}

#[derive(Serialize)]
pub struct FacultyResponse {
    pub message: String,
    pub faculty: FacultyProfile,
}

#[derive(Serialize)]
pub struct StudentResponse {
    pub message: String,
    pub student: StudentProfile,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub admin: AdminProfile,
}

#[derive(Serialize)]
pub struct AdminListResponse {
    pub message: String,
    pub admins: Vec<AdminProfile>,
}

#[derive(Serialize)]
pub struct FacultyListResponse {
    pub message: String,
    pub faculty: Vec<FacultyProfile>,
}

#[derive(Serialize)]
pub struct StudentListResponse {
    pub message: String,
    pub students: Vec<StudentProfile>,
}

#[derive(Serialize)]
pub struct EventResponse {
    pub message: String,
    pub event: EventRecord,
}

#[derive(Serialize)]
pub struct ImportResponse<T> {
    pub message: String,
    pub report: ImportReport<T>,
}

// ============================================================================
// Account handlers
// ============================================================================

/// POST /api/v1/admin/create-admin
/// Unauthenticated: the first admin has to come from somewhere.
pub async fn create_admin(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateAdminRequest>,
) -> Result<(StatusCode, Json<AdminResponse>), ApiError> {
    require_fields(&[
        ("name", &payload.name),
        ("email", &payload.email),
        ("password", &payload.password),
    ])?;
    validate_email(&payload.email)?;

    let admin = state
        .accounts()
        .create_admin(CreateAdmin {
            name: payload.name,
            email: payload.email,
            password: payload.password,
        })
        .await?;

    tracing::info!("Admin created: {}", admin.email);

    Ok((
        StatusCode::CREATED,
        Json(AdminResponse {
            message: "Admin created successfully".to_string(),
            admin,
        }),
    ))
}

/// POST /api/v1/admin/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AdminLoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    require_fields(&[("email", &payload.email), ("password", &payload.password)])?;

    let login = state
        .auth()
        .login_admin(&payload.email, &payload.password)
        .await?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token: login.token,
        admin: login.account,
    }))
}

/// GET /api/v1/admin/profile
pub async fn profile(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<AdminResponse>, ApiError> {
    require_role(&identity, Role::Admin)?;

    let admin = state.auth().admin_profile(identity.id).await?;

    Ok(Json(AdminResponse {
        message: "Admin details fetched successfully".to_string(),
        admin,
    }))
}

/// PUT /api/v1/admin/change-password
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    require_role(&identity, Role::Admin)?;
    require_fields(&[
        ("oldPassword", &payload.old_password),
        ("newPassword", &payload.new_password),
    ])?;

    state
        .auth()
        .change_admin_password(identity.id, &payload.old_password, &payload.new_password)
        .await?;

    Ok(Json(MessageResponse::new("Password changed successfully")))
}

/// GET /api/v1/admin/all-admins
pub async fn all_admins(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<AdminListResponse>, ApiError> {
    require_role(&identity, Role::Admin)?;

    let admins = state.accounts().list_admins().await?;

    Ok(Json(AdminListResponse {
        message: "Admins fetched successfully".to_string(),
        admins,
    }))
}

/// GET /api/v1/admin/all-students
pub async fn all_students(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<StudentListResponse>, ApiError> {
    require_role(&identity, Role::Admin)?;

    let students = state.accounts().list_students().await?;

    Ok(Json(StudentListResponse {
        message: "Students fetched successfully".to_string(),
        students,
    }))
}

/// GET /api/v1/admin/all-faculty
pub async fn all_faculty(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<FacultyListResponse>, ApiError> {
    require_role(&identity, Role::Admin)?;

    let faculty = state.accounts().list_faculty().await?;

    Ok(Json(FacultyListResponse {
        message: "Faculty fetched successfully".to_string(),
        faculty,
    }))
}

/// POST /api/v1/admin/create-faculty
pub async fn create_faculty(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<CreateFacultyRequest>,
) -> Result<(StatusCode, Json<FacultyResponse>), ApiError> {
    require_role(&identity, Role::Admin)?;
    require_fields(&[
        ("username", &payload.username),
        ("name", &payload.name),
        ("email", &payload.email),
        ("section", &payload.section),
        ("dept", &payload.dept),
        ("password", &payload.password),
    ])?;
    validate_email(&payload.email)?;

    let faculty = state
        .accounts()
        .create_faculty(CreateFaculty {
            username: payload.username,
            name: payload.name,
            email: payload.email,
            section: payload.section,
            dept: payload.dept,
            coordinator: payload.coordinator,
            password: payload.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(FacultyResponse {
            message: "Faculty created successfully".to_string(),
            faculty,
        }),
    ))
}

/// POST /api/v1/admin/create-student
pub async fn create_student(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<CreateStudentRequest>,
) -> Result<(StatusCode, Json<StudentResponse>), ApiError> {
    require_role(&identity, Role::Admin)?;
    require_fields(&[
        ("username", &payload.username),
        ("name", &payload.name),
        ("email", &payload.email),
        ("section", &payload.section),
        ("dept", &payload.dept),
        ("password", &payload.password),
    ])?;
    validate_email(&payload.email)?;

    let student = state
        .accounts()
        .create_student(CreateStudent {
            username: payload.username,
            name: payload.name,
            email: payload.email,
            section: payload.section,
            dept: payload.dept,
            password: payload.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(StudentResponse {
            message: "Student created successfully".to_string(),
            student,
        }),
    ))
}

/// PUT /api/v1/admin/update-admin/{id}
/// Partial merge: omitted or empty fields keep their stored values.
pub async fn update_admin(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateAdminRequest>,
) -> Result<Json<AdminResponse>, ApiError> {
    require_role(&identity, Role::Admin)?;

    let admin = state
        .accounts()
        .update_admin(
            id,
            UpdateAdmin {
                name: payload.name,
                email: payload.email,
            },
        )
        .await?;

    Ok(Json(AdminResponse {
        message: "Admin updated successfully".to_string(),
        admin,
    }))
}

/// PUT /api/v1/admin/update-faculty/{id}
pub async fn update_faculty(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateFacultyRequest>,
) -> Result<Json<FacultyResponse>, ApiError> {
    require_role(&identity, Role::Admin)?;

    let faculty = state
        .accounts()
        .update_faculty(
            id,
            UpdateFaculty {
                username: payload.username,
                name: payload.name,
                email: payload.email,
                section: payload.section,
                dept: payload.dept,
                coordinator: payload.coordinator,
            },
        )
        .await?;

    Ok(Json(FacultyResponse {
        message: "Faculty updated successfully".to_string(),
        faculty,
    }))
}

/// PUT /api/v1/admin/update-student/{id}
pub async fn update_student(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateStudentRequest>,
) -> Result<Json<StudentResponse>, ApiError> {
    require_role(&identity, Role::Admin)?;

    let student = state
        .accounts()
        .update_student(
            id,
            UpdateStudent {
                username: payload.username,
                name: payload.name,
                email: payload.email,
                section: payload.section,
                dept: payload.dept,
            },
        )
        .await?;

    Ok(Json(StudentResponse {
        message: "Student updated successfully".to_string(),
        student,
    }))
}

// ============================================================================
// Bulk upload handlers
// ============================================================================

/// POST /api/v1/admin/upload-student
/// Multipart field `file`, `.xlsx`/`.xls` only. Answers 201 when every
/// row imported, 207 when some rows errored.
pub async fn upload_student(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    require_role(&identity, Role::Admin)?;
    let (filename, bytes) = extract_upload(multipart).await?;

    let report = state.imports().import_students(&filename, &bytes).await?;

    Ok(import_response("Student", report))
}

/// POST /api/v1/admin/upload-faculty
pub async fn upload_faculty(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    require_role(&identity, Role::Admin)?;
    let (filename, bytes) = extract_upload(multipart).await?;

    let report = state.imports().import_faculty(&filename, &bytes).await?;

    Ok(import_response("Faculty", report))
}

async fn extract_upload(mut multipart: Multipart) -> Result<(String, Vec<u8>), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Invalid multipart request: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or(ImportError::MissingFile)?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation(format!("Failed to read upload: {e}")))?;

        return Ok((filename, bytes.to_vec()));
    }

    Err(ImportError::MissingFile.into())
}

fn import_response<T: Serialize>(label: &str, report: ImportReport<T>) -> Response {
    let (status, message) = if report.all_succeeded() {
        (
            StatusCode::CREATED,
            format!("{label} data imported successfully"),
        )
    } else {
        (
            StatusCode::MULTI_STATUS,
            format!(
                "{label} data imported with {} error(s)",
                report.error_count
            ),
        )
    };

    (status, Json(ImportResponse { message, report })).into_response()
}

// ============================================================================
// Project event handlers
// ============================================================================

/// POST /api/v1/admin/create-event
pub async fn create_event(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), ApiError> {
    require_role(&identity, Role::Admin)?;

    let Some(max_team_size) = payload.max_team_size else {
        return Err(ApiError::validation(
            "Short name, name, and max team size are required.",
        ));
    };
    if payload.short_name.trim().is_empty() || payload.name.trim().is_empty() {
        return Err(ApiError::validation(
            "Short name, name, and max team size are required.",
        ));
    }

    let event = state
        .events()
        .create_event(CreateEvent {
            short_name: payload.short_name,
            name: payload.name,
            coordinators: payload.coordinators,
            max_team_size,
            is_enabled: payload.is_enabled.unwrap_or(true),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(EventResponse {
            message: "Event created successfully".to_string(),
            event,
        }),
    ))
}

/// PUT /api/v1/admin/assign-coordinators
pub async fn assign_coordinators(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<AssignCoordinatorsRequest>,
) -> Result<Json<EventResponse>, ApiError> {
    require_role(&identity, Role::Admin)?;

    let (Some(event_id), Some(coordinators)) = (payload.event_id, payload.coordinators) else {
        return Err(ApiError::validation(
            "Event ID and coordinators are required.",
        ));
    };

    let event = state
        .events()
        .assign_coordinators(event_id, coordinators)
        .await?;

    Ok(Json(EventResponse {
        message: "Coordinators assigned successfully".to_string(),
        event,
    }))
}
