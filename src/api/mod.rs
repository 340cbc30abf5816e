use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::constants::limits::MAX_UPLOAD_BYTES;
use crate::state::SharedState;

mod admin;
pub mod auth;
mod error;
mod faculty;
mod student;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,
}

impl AppState {
    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn tokens(&self) -> &crate::services::TokenService {
        &self.shared.tokens
    }

    #[must_use]
    pub fn auth(&self) -> &Arc<dyn crate::services::AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn accounts(&self) -> &Arc<dyn crate::services::AccountService> {
        &self.shared.account_service
    }

    #[must_use]
    pub fn imports(&self) -> &Arc<dyn crate::services::ImportService> {
        &self.shared.import_service
    }

    #[must_use]
    pub fn events(&self) -> &Arc<dyn crate::services::EventService> {
        &self.shared.event_service
    }
}

pub async fn create_app_state(shared: Arc<SharedState>) -> Arc<AppState> {
    Arc::new(AppState { shared })
}

pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared).await)
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.shared.config.server.cors_allowed_origins.clone();

    let admin_router = Router::new()
        .route("/create-admin", post(admin::create_admin))
        .route("/login", post(admin::login))
        .merge(admin_protected_router(state.clone()));

    let faculty_router = Router::new()
        .route("/login", post(faculty::login))
        .merge(faculty_protected_router(state.clone()));

    let student_router = Router::new()
        .route("/login", post(student::login))
        .merge(student_protected_router(state.clone()));

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .route("/", get(welcome))
        .nest("/api/v1/admin", admin_router)
        .nest("/api/v1/faculty", faculty_router)
        .nest("/api/v1/student", student_router)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn admin_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/profile", get(admin::profile))
        .route("/change-password", put(admin::change_password))
        .route("/all-admins", get(admin::all_admins))
        .route("/all-students", get(admin::all_students))
        .route("/all-faculty", get(admin::all_faculty))
        .route("/create-faculty", post(admin::create_faculty))
        .route("/create-student", post(admin::create_student))
        .route("/update-admin/{id}", put(admin::update_admin))
        .route("/update-faculty/{id}", put(admin::update_faculty))
        .route("/update-student/{id}", put(admin::update_student))
        .route("/upload-student", post(admin::upload_student))
        .route("/upload-faculty", post(admin::upload_faculty))
        .route("/create-event", post(admin::create_event))
        .route("/assign-coordinators", put(admin::assign_coordinators))
        .route_layer(middleware::from_fn_with_state(state, auth::authenticate))
}

fn faculty_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/profile", get(faculty::profile))
        .route("/change-password", put(faculty::change_password))
        .route("/section-students", get(faculty::section_students))
        .route_layer(middleware::from_fn_with_state(state, auth::authenticate))
}

fn student_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/profile", get(student::profile))
        .route("/change-password", put(student::change_password))
        .route_layer(middleware::from_fn_with_state(state, auth::authenticate))
}

async fn welcome() -> Json<MessageResponse> {
    Json(MessageResponse::new("Welcome to the API"))
}
