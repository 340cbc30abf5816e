use axum::{
    Json,
    extract::{Extension, State},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::auth::{Identity, require_role};
use super::validation::require_fields;
use super::{ApiError, AppState, MessageResponse};
use crate::models::{Role, StudentProfile};

#[derive(Deserialize)]
pub struct StudentLoginRequest {
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
    pub student: StudentProfile,
}

#[derive(Serialize)]
pub struct StudentResponse {
    pub message: String,
    pub student: StudentProfile,
}

/// POST /api/v1/student/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<StudentLoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    require_fields(&[
        ("username", &payload.username),
        ("password", &payload.password),
    ])?;

    let login = state
        .auth()
        .login_student(&payload.username, &payload.password)
        .await?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token: login.token,
        student: login.account,
    }))
}

/// GET /api/v1/student/profile
pub async fn profile(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<StudentResponse>, ApiError> {
    require_role(&identity, Role::Student)?;

    let student = state.auth().student_profile(identity.id).await?;

    Ok(Json(StudentResponse {
        message: "Student profile retrieved successfully".to_string(),
        student,
    }))
}

/// PUT /api/v1/student/change-password
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    require_role(&identity, Role::Student)?;
    require_fields(&[
        ("oldPassword", &payload.old_password),
        ("newPassword", &payload.new_password),
    ])?;

    state
        .auth()
        .change_student_password(identity.id, &payload.old_password, &payload.new_password)
        .await?;

    Ok(Json(MessageResponse::new("Password changed successfully")))
}
