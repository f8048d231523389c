//! Client routes.

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
use botica_db::entities::clients;
use botica_db::repositories::client::{ClientError, ClientInput, ClientRepository};

/// Creates the client routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/clients", get(list_clients))
        .route("/clients", post(create_client))
        .route("/clients/{id}", get(get_client))
        .route("/clients/{id}", put(update_client))
        .route("/clients/{id}", delete(delete_client))
}

/// Request body for creating or replacing a client.
#[derive(Debug, Deserialize)]
pub struct ClientRequest {
    /// Display name.
    pub name: String,
    /// Optional email, unique when present.
    pub email: Option<String>,
    /// Optional phone, unique when present.
    pub phone: Option<String>,
    /// Optional national ID.
    pub cedula: Option<String>,
    /// Optional tax registry number.
    pub rnc: Option<String>,
    /// Optional address.
    pub address: Option<String>,
}

/// Response for a client.
#[derive(Debug, Serialize)]
pub struct ClientResponse {
    /// Client ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email.
    pub email: Option<String>,
    /// Phone.
    pub phone: Option<String>,
    /// National ID.
    pub cedula: Option<String>,
    /// Tax registry number.
    pub rnc: Option<String>,
    /// Address.
    pub address: Option<String>,
    /// Created at timestamp.
    pub created_at: String,
}

impl From<clients::Model> for ClientResponse {
    fn from(c: clients::Model) -> Self {
        Self {
            id: c.id,
            name: c.name,
            email: c.email,
            phone: c.phone,
            cedula: c.cedula,
            rnc: c.rnc,
            address: c.address,
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

impl ClientRequest {
    fn into_input(self) -> Result<ClientInput, &'static str> {
        if self.name.trim().is_empty() {
            return Err("El nombre es obligatorio");
        }
        Ok(ClientInput {
            name: self.name,
            email: self.email,
            phone: self.phone,
            cedula: self.cedula,
            rnc: self.rnc,
            address: self.address,
        })
    }
}

/// GET `/clients` - List clients.
async fn list_clients(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    let repo = ClientRepository::new((*state.db).clone());

    match repo.list().await {
        Ok(rows) => {
            let items: Vec<ClientResponse> = rows.into_iter().map(ClientResponse::from).collect();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list clients");
            client_error_response(&e)
        }
    }
}

/// GET `/clients/{id}` - Get one client.
async fn get_client(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ClientRepository::new((*state.db).clone());

    match repo.find_by_id(id).await {
        Ok(c) => (StatusCode::OK, Json(ClientResponse::from(c))).into_response(),
        Err(e) => client_error_response(&e),
    }
}

/// POST `/clients` - Create a client.
async fn create_client(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ClientRequest>,
) -> impl IntoResponse {
    let input = match payload.into_input() {
        Ok(i) => i,
        Err(message) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "validation_error", "message": message })),
            )
                .into_response();
        }
    };

    let repo = ClientRepository::new((*state.db).clone());

    match repo.create(&input).await {
        Ok(c) => {
            info!(client_id = %c.id, "Client created");

            audit_trail::record(
                &state,
                Some(auth.user_id()),
                AuditAction::ClientCreate,
                Some(c.name.clone()),
                Some("clients"),
                Some(c.id),
            )
            .await;

            (StatusCode::CREATED, Json(ClientResponse::from(c))).into_response()
        }
        Err(e) => client_error_response(&e),
    }
}

/// PUT `/clients/{id}` - Replace a client's fields.
async fn update_client(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ClientRequest>,
) -> impl IntoResponse {
    let input = match payload.into_input() {
        Ok(i) => i,
        Err(message) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "validation_error", "message": message })),
            )
                .into_response();
        }
    };

    let repo = ClientRepository::new((*state.db).clone());

    match repo.update(id, &input).await {
        Ok(c) => {
            audit_trail::record(
                &state,
                Some(auth.user_id()),
                AuditAction::ClientUpdate,
                None,
                Some("clients"),
                Some(id),
            )
            .await;

            (StatusCode::OK, Json(ClientResponse::from(c))).into_response()
        }
        Err(e) => client_error_response(&e),
    }
}

/// DELETE `/clients/{id}` - Remove a client.
async fn delete_client(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ClientRepository::new((*state.db).clone());

    match repo.delete(id).await {
        Ok(()) => {
            audit_trail::record(
                &state,
                Some(auth.user_id()),
                AuditAction::ClientDelete,
                None,
                Some("clients"),
                Some(id),
            )
            .await;

            (
                StatusCode::OK,
                Json(json!({ "message": "Cliente eliminado correctamente" })),
            )
                .into_response()
        }
        Err(e) => client_error_response(&e),
    }
}

fn client_error_response(e: &ClientError) -> axum::response::Response {
    match e {
        ClientError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Cliente no encontrado"
            })),
        )
            .into_response(),
        ClientError::DuplicateEmail(_) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "duplicate_email",
                "message": "Ya existe un cliente con ese correo."
            })),
        )
            .into_response(),
        ClientError::DuplicatePhone(_) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "duplicate_phone",
                "message": "Ya existe un cliente con ese teléfono."
            })),
        )
            .into_response(),
        ClientError::Database(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "internal_error",
                "message": "An error occurred"
            })),
        )
            .into_response(),
    }
}
