//! Role management routes (admin only).
//!
//! Role writes always touch roles and permissions together; the repository
//! runs them in one transaction and role deletion cascades to permissions.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, audit_trail, middleware::AuthUser, middleware::require_role};
use botica_core::audit::AuditAction;
use botica_db::repositories::role::{RoleError, RoleRepository, RoleWithPermissions};

/// Creates the role routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/roles", get(list_roles))
        .route("/roles", post(create_role))
        .route("/roles/{id}", get(get_role))
        .route("/roles/{id}", put(update_role))
        .route("/roles/{id}", delete(delete_role))
}

/// Request body for creating or rewriting a role.
#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    /// Role name.
    pub name: String,
    /// Permission action strings owned by the role.
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Response for a role with its permissions.
#[derive(Debug, Serialize)]
pub struct RoleResponse {
    /// Role ID.
    pub id: Uuid,
    /// Role name.
    pub name: String,
    /// Permission action strings.
    pub permissions: Vec<String>,
    /// Created at timestamp.
    pub created_at: String,
}

impl From<RoleWithPermissions> for RoleResponse {
    fn from(r: RoleWithPermissions) -> Self {
        Self {
            id: r.role.id,
            name: r.role.name,
            permissions: r.permissions.into_iter().map(|p| p.action).collect(),
            created_at: r.role.created_at.to_rfc3339(),
        }
    }
}

/// GET `/roles` - List roles with permissions.
async fn list_roles(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, &["admin"]) {
        return response;
    }

    let repo = RoleRepository::new((*state.db).clone());

    match repo.list().await {
        Ok(rows) => {
            let items: Vec<RoleResponse> = rows.into_iter().map(RoleResponse::from).collect();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list roles");
            role_error_response(&e)
        }
    }
}

/// GET `/roles/{id}` - Get one role with permissions.
async fn get_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, &["admin"]) {
        return response;
    }

    let repo = RoleRepository::new((*state.db).clone());

    match repo.get(id).await {
        Ok(r) => (StatusCode::OK, Json(RoleResponse::from(r))).into_response(),
        Err(e) => role_error_response(&e),
    }
}

/// POST `/roles` - Create a role with its permission set.
async fn create_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<RoleRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, &["admin"]) {
        return response;
    }

    if payload.name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": "El nombre del rol es obligatorio"
            })),
        )
            .into_response();
    }

    let repo = RoleRepository::new((*state.db).clone());

    match repo.create(&payload.name, &payload.permissions).await {
        Ok(r) => {
            info!(role_id = %r.role.id, name = %r.role.name, "Role created");

            audit_trail::record(
                &state,
                Some(auth.user_id()),
                AuditAction::RoleCreate,
                Some(r.role.name.clone()),
                Some("roles"),
                Some(r.role.id),
            )
            .await;

            (StatusCode::CREATED, Json(RoleResponse::from(r))).into_response()
        }
        Err(e) => role_error_response(&e),
    }
}

/// PUT `/roles/{id}` - Rewrite a role's name and permission set.
async fn update_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RoleRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, &["admin"]) {
        return response;
    }

    let repo = RoleRepository::new((*state.db).clone());

    match repo.update(id, &payload.name, &payload.permissions).await {
        Ok(r) => {
            audit_trail::record(
                &state,
                Some(auth.user_id()),
                AuditAction::RoleUpdate,
                Some(r.role.name.clone()),
                Some("roles"),
                Some(id),
            )
            .await;

            (StatusCode::OK, Json(RoleResponse::from(r))).into_response()
        }
        Err(e) => role_error_response(&e),
    }
}

/// DELETE `/roles/{id}` - Delete a role; permissions cascade.
async fn delete_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, &["admin"]) {
        return response;
    }

    let repo = RoleRepository::new((*state.db).clone());

    match repo.delete(id).await {
        Ok(()) => {
            info!(role_id = %id, "Role deleted");

            audit_trail::record(
                &state,
                Some(auth.user_id()),
                AuditAction::RoleDelete,
                None,
                Some("roles"),
                Some(id),
            )
            .await;

            (
                StatusCode::OK,
                Json(json!({ "message": "Rol eliminado correctamente" })),
            )
                .into_response()
        }
        Err(e) => role_error_response(&e),
    }
}

fn role_error_response(e: &RoleError) -> axum::response::Response {
    match e {
        RoleError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Rol no encontrado"
            })),
        )
            .into_response(),
        RoleError::DuplicateName(_) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "duplicate_name",
                "message": "El nombre del rol ya está en uso."
            })),
        )
            .into_response(),
        RoleError::Database(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "internal_error",
                "message": "An error occurred"
            })),
        )
            .into_response(),
    }
}
