use axum::{
    Json,
    extract::{Extension, State},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::auth::{Identity, require_role};
use super::validation::require_fields;
use super::{ApiError, AppState, MessageResponse};
use crate::models::{FacultyProfile, Role, StudentProfile};

#[derive(Deserialize)]
pub struct FacultyLoginRequest {
    #[serde(default)]
    pub username: String,
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

#[derive(Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub faculty: FacultyProfile,
}

#[derive(Serialize)]
pub struct FacultyResponse {
    pub message: String,
    pub faculty: FacultyProfile,
}

#[derive(Serialize)]
pub struct SectionStudentsResponse {
    pub message: String,
    pub students: Vec<StudentProfile>,
}

/// POST /api/v1/faculty/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<FacultyLoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    require_fields(&[
        ("username", &payload.username),
        ("password", &payload.password),
    ])?;

    let login = state
        .auth()
        .login_faculty(&payload.username, &payload.password)
        .await?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token: login.token,
        faculty: login.account,
    }))
}

/// GET /api/v1/faculty/profile
pub async fn profile(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<FacultyResponse>, ApiError> {
    require_role(&identity, Role::Faculty)?;

    let faculty = state.auth().faculty_profile(identity.id).await?;

    Ok(Json(FacultyResponse {
        message: "Faculty profile retrieved successfully".to_string(),
        faculty,
    }))
}

/// PUT /api/v1/faculty/change-password
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    require_role(&identity, Role::Faculty)?;
    require_fields(&[
        ("oldPassword", &payload.old_password),
        ("newPassword", &payload.new_password),
    ])?;

    state
        .auth()
        .change_faculty_password(identity.id, &payload.old_password, &payload.new_password)
        .await?;

    Ok(Json(MessageResponse::new("Password changed successfully")))
}

/// GET /api/v1/faculty/section-students
/// Roster scoped to the calling faculty's own section. An empty
/// section answers 200 with an empty list, unlike the admin listings.
pub async fn section_students(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<SectionStudentsResponse>, ApiError> {
    require_role(&identity, Role::Faculty)?;

    let students = state.accounts().list_section_students(identity.id).await?;

    Ok(Json(SectionStudentsResponse {
        message: "Students from section retrieved successfully".to_string(),
        students,
    }))
}
