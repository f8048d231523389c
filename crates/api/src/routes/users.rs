//! User management routes (admin only).

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, audit_trail, middleware::AuthUser, middleware::require_role};
use botica_core::audit::AuditAction;
use botica_core::auth::hash_password;
use botica_db::{SessionRepository, UserRepository};
use botica_shared::auth::CreateUserRequest;

/// Creates the user management routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users", post(create_user))
        .route("/users/{id}/deactivate", post(deactivate_user))
}

/// Response for a user row.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email.
    pub email: String,
    /// Role name.
    pub role: Option<String>,
    /// Whether the account is active.
    pub is_active: bool,
    /// Created at timestamp.
    pub created_at: String,
}

/// GET `/users` - List users with their roles.
async fn list_users(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, &["admin"]) {
        return response;
    }

    let repo = UserRepository::new((*state.db).clone());

    match repo.list().await {
        Ok(rows) => {
            let items: Vec<UserResponse> = rows
                .into_iter()
                .map(|(user, role)| UserResponse {
                    id: user.id,
                    name: user.name,
                    email: user.email,
                    role: role.map(|r| r.name),
                    is_active: user.is_active,
                    created_at: user.created_at.to_rfc3339(),
                })
                .collect();

            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list users");
            internal_error()
        }
    }
}

/// POST `/users` - Create a user with a role.
async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateUserRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, &["admin"]) {
        return response;
    }

    if payload.name.trim().is_empty() || payload.email.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": "Nombre y correo son requeridos"
            })),
        )
            .into_response();
    }

    let repo = UserRepository::new((*state.db).clone());

    match repo.email_exists(&payload.email).await {
        Ok(true) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "email_exists",
                    "message": "Ya existe un usuario con ese correo."
                })),
            )
                .into_response();
        }
        Ok(false) => {}
        Err(e) => {
            error!(error = %e, "Database error checking email");
            return internal_error();
        }
    }

    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return internal_error();
        }
    };

    match repo
        .create(&payload.name, &payload.email, &password_hash, payload.role_id)
        .await
    {
        Ok(user) => {
            info!(user_id = %user.id, email = %user.email, "User created");

            audit_trail::record(
                &state,
                Some(auth.user_id()),
                AuditAction::UserCreate,
                Some(user.email.clone()),
                Some("users"),
                Some(user.id),
            )
            .await;

            (
                StatusCode::CREATED,
                Json(json!({
                    "id": user.id,
                    "name": user.name,
                    "email": user.email,
                    "is_active": user.is_active
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create user");
            internal_error()
        }
    }
}

/// POST `/users/{id}/deactivate` - Deactivate an account and revoke its
/// sessions.
async fn deactivate_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, &["admin"]) {
        return response;
    }

    let repo = UserRepository::new((*state.db).clone());

    match repo.deactivate(id).await {
        Ok(true) => {
            let session_repo = SessionRepository::new((*state.db).clone());
            if let Err(e) = session_repo.revoke_all_user_sessions(id).await {
                error!(error = %e, user_id = %id, "Failed to revoke sessions");
            }

            info!(user_id = %id, "User deactivated");

            audit_trail::record(
                &state,
                Some(auth.user_id()),
                AuditAction::UserDeactivate,
                None,
                Some("users"),
                Some(id),
            )
            .await;

            (
                StatusCode::OK,
                Json(json!({ "message": "Usuario desactivado" })),
            )
                .into_response()
        }
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Usuario no encontrado"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to deactivate user");
            internal_error()
        }
    }
}

fn internal_error() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": "An error occurred"
        })),
    )
        .into_response()
}
