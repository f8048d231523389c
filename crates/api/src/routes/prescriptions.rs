//! Prescription routes: issuance and read paths.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, audit_trail, middleware::AuthUser, middleware::require_role};
use botica_core::audit::AuditAction;
use botica_core::prescription::{
    CreatePrescriptionInput, PrescriptionItemInput, PrescriptionService,
    service::ALLOWED_ISSUER_ROLES,
};
use botica_db::repositories::prescription::{
    PrescriptionError, PrescriptionRepository, PrescriptionWithItems,
};

/// Creates the prescription routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/prescriptions", get(list_prescriptions))
        .route("/prescriptions", post(create_prescription))
        .route("/prescriptions/{id}", get(get_prescription))
        .route("/prescriptions/{id}", delete(delete_prescription))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for issuing a prescription.
#[derive(Debug, Deserialize)]
pub struct CreatePrescriptionRequest {
    /// Client the prescription belongs to.
    pub client_id: Uuid,
    /// Optional prescribing doctor name.
    pub doctor: Option<String>,
    /// Optional notes.
    pub notes: Option<String>,
    /// Prescribed medicines.
    pub medicines: Vec<PrescriptionItemRequest>,
}

/// One prescribed medicine line.
#[derive(Debug, Deserialize)]
pub struct PrescriptionItemRequest {
    /// Prescribed medicine.
    pub medicine_id: Uuid,
    /// Prescribed units.
    pub quantity: i32,
}

/// Response for a prescription line item.
#[derive(Debug, Serialize)]
pub struct PrescriptionItemResponse {
    /// Line item ID.
    pub id: Uuid,
    /// Medicine ID.
    pub medicine_id: Uuid,
    /// Medicine display name.
    pub medicine_name: String,
    /// Prescribed units.
    pub quantity: i32,
}

/// Response for a prescription with its items.
#[derive(Debug, Serialize)]
pub struct PrescriptionResponse {
    /// Prescription ID.
    pub id: Uuid,
    /// Client ID.
    pub client_id: Uuid,
    /// Issuing user ID.
    pub issued_by: Uuid,
    /// Prescribing doctor name.
    pub doctor: Option<String>,
    /// Notes.
    pub notes: Option<String>,
    /// Issue timestamp.
    pub issued_at: String,
    /// Line items.
    pub items: Vec<PrescriptionItemResponse>,
}

/// Response for a prescription list row.
#[derive(Debug, Serialize)]
pub struct PrescriptionListItem {
    /// Prescription ID.
    pub id: Uuid,
    /// Client ID.
    pub client_id: Uuid,
    /// Client display name.
    pub client_name: Option<String>,
    /// Prescribing doctor name.
    pub doctor: Option<String>,
    /// Issue timestamp.
    pub issued_at: String,
}

fn prescription_response(result: PrescriptionWithItems) -> PrescriptionResponse {
    PrescriptionResponse {
        id: result.prescription.id,
        client_id: result.prescription.client_id,
        issued_by: result.prescription.issued_by,
        doctor: result.prescription.doctor,
        notes: result.prescription.notes,
        issued_at: result.prescription.issued_at.to_rfc3339(),
        items: result
            .items
            .into_iter()
            .map(|i| PrescriptionItemResponse {
                id: i.item.id,
                medicine_id: i.item.medicine_id,
                medicine_name: i.medicine_name,
                quantity: i.item.quantity,
            })
            .collect(),
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/prescriptions` - List prescriptions with client names.
async fn list_prescriptions(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    let repo = PrescriptionRepository::new((*state.db).clone());

    match repo.list().await {
        Ok(rows) => {
            let items: Vec<PrescriptionListItem> = rows
                .into_iter()
                .map(|(p, client)| PrescriptionListItem {
                    id: p.id,
                    client_id: p.client_id,
                    client_name: client.map(|c| c.name),
                    doctor: p.doctor,
                    issued_at: p.issued_at.to_rfc3339(),
                })
                .collect();

            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list prescriptions");
            prescription_error_response(&e)
        }
    }
}

/// GET `/prescriptions/{id}` - Get a prescription with its items.
async fn get_prescription(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = PrescriptionRepository::new((*state.db).clone());

    match repo.get(id).await {
        Ok(result) => (StatusCode::OK, Json(prescription_response(result))).into_response(),
        Err(e) => prescription_error_response(&e),
    }
}

/// POST `/prescriptions` - Issue a prescription (admin/pharmacist only).
async fn create_prescription(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreatePrescriptionRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, ALLOWED_ISSUER_ROLES) {
        return response;
    }

    let input = CreatePrescriptionInput {
        client_id: payload.client_id.into(),
        issued_by: auth.user_id().into(),
        issuer_role: auth.role().to_string(),
        doctor: payload.doctor,
        notes: payload.notes,
        items: payload
            .medicines
            .iter()
            .map(|m| PrescriptionItemInput {
                medicine_id: m.medicine_id.into(),
                quantity: m.quantity,
            })
            .collect(),
    };

    if let Err(e) = PrescriptionService::validate(&input) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": e.to_string()
            })),
        )
            .into_response();
    }

    let repo = PrescriptionRepository::new((*state.db).clone());

    match repo.create(&input).await {
        Ok(result) => {
            info!(
                prescription_id = %result.prescription.id,
                client_id = %result.prescription.client_id,
                items = result.items.len(),
                "Prescription issued"
            );

            audit_trail::record(
                &state,
                Some(auth.user_id()),
                AuditAction::PrescriptionCreate,
                Some(format!("Receta con {} medicamentos", result.items.len())),
                Some("prescriptions"),
                Some(result.prescription.id),
            )
            .await;

            (
                StatusCode::CREATED,
                Json(json!({
                    "message": "Receta creada exitosamente",
                    "prescription": prescription_response(result)
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create prescription");
            prescription_error_response(&e)
        }
    }
}

/// DELETE `/prescriptions/{id}` - Remove a prescription (admin only).
async fn delete_prescription(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, &["admin"]) {
        return response;
    }

    let repo = PrescriptionRepository::new((*state.db).clone());

    match repo.delete(id).await {
        Ok(()) => {
            info!(prescription_id = %id, "Prescription deleted");

            audit_trail::record(
                &state,
                Some(auth.user_id()),
                AuditAction::PrescriptionDelete,
                None,
                Some("prescriptions"),
                Some(id),
            )
            .await;

            (
                StatusCode::OK,
                Json(json!({ "message": "Receta eliminada correctamente" })),
            )
                .into_response()
        }
        Err(e) => prescription_error_response(&e),
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn prescription_error_response(e: &PrescriptionError) -> axum::response::Response {
    match e {
        PrescriptionError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Receta no encontrada"
            })),
        )
            .into_response(),
        PrescriptionError::ClientNotFound(id) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "client_not_found",
                "message": format!("Cliente no encontrado: {id}")
            })),
        )
            .into_response(),
        PrescriptionError::MedicineNotFound(id) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "medicine_not_found",
                "message": format!("Medicamento no encontrado: {id}")
            })),
        )
            .into_response(),
        PrescriptionError::Database(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "internal_error",
                "message": "An error occurred"
            })),
        )
            .into_response(),
    }
}
