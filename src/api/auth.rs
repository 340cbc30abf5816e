//! Bearer-token gate for protected routes.
//!
//! The middleware is role-agnostic: it verifies the token and attaches
//! the resolved identity to the request. Role-specific handlers
//! re-check the role themselves via [`require_role`].

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::models::Role;

/// Verified identity attached to the request by [`authenticate`].
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: i32,
    pub role: Role,
}

pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::unauthenticated("Access denied. No token provided."))?
        .to_string();

    let claims = state
        .tokens()
        .verify(&token)
        .map_err(|_| ApiError::unauthenticated("Invalid token"))?;

    request.extensions_mut().insert(Identity {
        id: claims.id,
        role: claims.role,
    });

    Ok(next.run(request).await)
}

/// Defense-in-depth role check inside role-scoped handlers. Admin
/// tokens always carry `admin` (never `superadmin`), so an exact match
/// is sufficient.
pub fn require_role(identity: &Identity, role: Role) -> Result<(), ApiError> {
    if identity.role == role {
        Ok(())
    } else {
        Err(ApiError::Forbidden(format!(
            "Unauthorized: {} not authenticated",
            role.label()
        )))
    }
}
