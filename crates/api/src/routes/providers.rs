//! Provider routes.

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

use crate::{AppState, audit_trail, middleware::AuthUser};
use botica_core::audit::AuditAction;
use botica_db::entities::providers;
use botica_db::repositories::provider::{ProviderError, ProviderInput, ProviderRepository};

/// Creates the provider routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/providers", get(list_providers))
        .route("/providers", post(create_provider))
        .route("/providers/{id}", get(get_provider))
        .route("/providers/{id}", put(update_provider))
        .route("/providers/{id}", delete(delete_provider))
}

/// Request body for creating or replacing a provider.
#[derive(Debug, Deserialize)]
pub struct ProviderRequest {
    /// Company name.
    pub name: String,
    /// Optional contact person.
    pub contact_name: Option<String>,
    /// Optional email.
    pub email: Option<String>,
    /// Optional phone.
    pub phone: Option<String>,
}

/// Response for a provider.
#[derive(Debug, Serialize)]
pub struct ProviderResponse {
    /// Provider ID.
    pub id: Uuid,
    /// Company name.
    pub name: String,
    /// Contact person.
    pub contact_name: Option<String>,
    /// Email.
    pub email: Option<String>,
    /// Phone.
    pub phone: Option<String>,
    /// Created at timestamp.
    pub created_at: String,
}

impl From<providers::Model> for ProviderResponse {
    fn from(p: providers::Model) -> Self {
        Self {
            id: p.id,
            name: p.name,
            contact_name: p.contact_name,
            email: p.email,
            phone: p.phone,
            created_at: p.created_at.to_rfc3339(),
        }
    }
}

/// GET `/providers` - List providers.
async fn list_providers(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    let repo = ProviderRepository::new((*state.db).clone());

    match repo.list().await {
        Ok(rows) => {
            let items: Vec<ProviderResponse> =
                rows.into_iter().map(ProviderResponse::from).collect();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list providers");
            provider_error_response(&e)
        }
    }
}

/// GET `/providers/{id}` - Get one provider.
async fn get_provider(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ProviderRepository::new((*state.db).clone());

    match repo.find_by_id(id).await {
        Ok(p) => (StatusCode::OK, Json(ProviderResponse::from(p))).into_response(),
        Err(e) => provider_error_response(&e),
    }
}

/// POST `/providers` - Create a provider.
async fn create_provider(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ProviderRequest>,
) -> impl IntoResponse {
    if payload.name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": "El nombre es obligatorio"
            })),
        )
            .into_response();
    }

    let input = ProviderInput {
        name: payload.name,
        contact_name: payload.contact_name,
        email: payload.email,
        phone: payload.phone,
    };

    let repo = ProviderRepository::new((*state.db).clone());

    match repo.create(&input).await {
        Ok(p) => {
            info!(provider_id = %p.id, "Provider created");

            audit_trail::record(
                &state,
                Some(auth.user_id()),
                AuditAction::ProviderCreate,
                Some(p.name.clone()),
                Some("providers"),
                Some(p.id),
            )
            .await;

            (StatusCode::CREATED, Json(ProviderResponse::from(p))).into_response()
        }
        Err(e) => provider_error_response(&e),
    }
}

/// PUT `/providers/{id}` - Replace a provider's fields.
async fn update_provider(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProviderRequest>,
) -> impl IntoResponse {
    let input = ProviderInput {
        name: payload.name,
        contact_name: payload.contact_name,
        email: payload.email,
        phone: payload.phone,
    };

    let repo = ProviderRepository::new((*state.db).clone());

    match repo.update(id, &input).await {
        Ok(p) => {
            audit_trail::record(
                &state,
                Some(auth.user_id()),
                AuditAction::ProviderUpdate,
                None,
                Some("providers"),
                Some(id),
            )
            .await;

            (StatusCode::OK, Json(ProviderResponse::from(p))).into_response()
        }
        Err(e) => provider_error_response(&e),
    }
}

/// DELETE `/providers/{id}` - Remove a provider.
async fn delete_provider(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ProviderRepository::new((*state.db).clone());

    match repo.delete(id).await {
        Ok(()) => {
            audit_trail::record(
                &state,
                Some(auth.user_id()),
                AuditAction::ProviderDelete,
                None,
                Some("providers"),
                Some(id),
            )
            .await;

            (
                StatusCode::OK,
                Json(json!({ "message": "Proveedor eliminado correctamente" })),
            )
                .into_response()
        }
        Err(e) => provider_error_response(&e),
    }
}

fn provider_error_response(e: &ProviderError) -> axum::response::Response {
    match e {
        ProviderError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Proveedor no encontrado"
            })),
        )
            .into_response(),
        ProviderError::Database(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "internal_error",
                "message": "An error occurred"
            })),
        )
            .into_response(),
    }
}
