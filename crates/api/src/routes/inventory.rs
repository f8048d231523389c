//! Inventory routes: medicine CRUD, stock alerts, and restocks.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, audit_trail, middleware::AuthUser};
use botica_core::audit::AuditAction;
use botica_core::inventory::{
    self, AlertKind, DEFAULT_EXPIRY_WINDOW_DAYS, DEFAULT_LOW_STOCK_THRESHOLD, MedicineDraft,
    MedicineUpdate,
};
use botica_db::repositories::medicine::{MedicineError, MedicineFilter, MedicineRepository};
use botica_db::entities::medicine;

/// Creates the inventory routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/inventory", get(list_medicines))
        .route("/inventory", post(create_medicine))
        .route("/inventory/alerts", get(alerts))
        .route("/inventory/stats", get(stats))
        .route("/inventory/categories", get(categories))
        .route("/inventory/{id}", get(get_medicine))
        .route("/inventory/{id}", put(update_medicine))
        .route("/inventory/{id}", delete(delete_medicine))
        .route("/inventory/{id}/restock", post(restock_medicine))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing medicines.
#[derive(Debug, Deserialize)]
pub struct ListMedicinesQuery {
    /// Filter by exact category.
    pub category: Option<String>,
    /// Substring match on name or description.
    pub search: Option<String>,
}

/// Query parameters for the alerts endpoint.
#[derive(Debug, Deserialize)]
pub struct AlertsQuery {
    /// Low-stock threshold (default 10).
    pub threshold: Option<i32>,
    /// Expiry look-ahead in days (default 30).
    pub days_ahead: Option<u64>,
}

/// Request body for creating a medicine.
#[derive(Debug, Deserialize)]
pub struct CreateMedicineRequest {
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Initial on-hand quantity.
    pub stock: i32,
    /// Unit price as a decimal string.
    pub price: String,
    /// Lot expiration date (YYYY-MM-DD).
    pub expiration_date: NaiveDate,
    /// Lot number.
    pub lot: String,
    /// Optional category.
    pub category: Option<String>,
    /// Optional barcode; generated when absent.
    pub barcode: Option<String>,
}

/// Request body for updating a medicine. Absent fields stay unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateMedicineRequest {
    /// New display name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New on-hand quantity.
    pub stock: Option<i32>,
    /// New unit price as a decimal string.
    pub price: Option<String>,
    /// New expiration date.
    pub expiration_date: Option<NaiveDate>,
    /// New lot number.
    pub lot: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New barcode.
    pub barcode: Option<String>,
}

/// Request body for restocking a medicine.
#[derive(Debug, Deserialize)]
pub struct RestockRequest {
    /// Units to add.
    pub quantity: i32,
}

/// Response for a medicine.
#[derive(Debug, Serialize)]
pub struct MedicineResponse {
    /// Medicine ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// On-hand quantity.
    pub stock: i32,
    /// Unit price.
    pub price: String,
    /// Expiration date.
    pub expiration_date: String,
    /// Lot number.
    pub lot: String,
    /// Category.
    pub category: Option<String>,
    /// Barcode.
    pub barcode: String,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

/// Response for an alert row: a medicine plus its alert classification.
#[derive(Debug, Serialize)]
pub struct AlertResponse {
    /// The affected medicine.
    #[serde(flatten)]
    pub medicine: MedicineResponse,
    /// Why the medicine is alerting.
    pub alert_type: AlertKind,
}

impl From<medicine::Model> for MedicineResponse {
    fn from(m: medicine::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            stock: m.stock,
            price: m.price.to_string(),
            expiration_date: m.expiration_date.to_string(),
            lot: m.lot_number,
            category: m.category,
            barcode: m.barcode,
            created_at: m.created_at.to_rfc3339(),
            updated_at: m.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/inventory` - List medicines with optional filters.
async fn list_medicines(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListMedicinesQuery>,
) -> impl IntoResponse {
    let repo = MedicineRepository::new((*state.db).clone());

    let filter = MedicineFilter {
        category: query.category,
        search: query.search,
    };

    match repo.list(filter).await {
        Ok(medicines) => {
            let items: Vec<MedicineResponse> =
                medicines.into_iter().map(MedicineResponse::from).collect();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list medicines");
            medicine_error_response(&e)
        }
    }
}

/// GET `/inventory/{id}` - Get one medicine.
async fn get_medicine(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = MedicineRepository::new((*state.db).clone());

    match repo.find_by_id(id).await {
        Ok(m) => (StatusCode::OK, Json(MedicineResponse::from(m))).into_response(),
        Err(e) => medicine_error_response(&e),
    }
}

/// POST `/inventory` - Create a medicine.
async fn create_medicine(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateMedicineRequest>,
) -> impl IntoResponse {
    let Ok(price) = Decimal::from_str(&payload.price) else {
        return validation_error("Formato de precio inválido.");
    };

    let draft = MedicineDraft {
        name: payload.name,
        description: payload.description,
        stock: payload.stock,
        price,
        expiration_date: payload.expiration_date,
        lot_number: payload.lot,
        category: payload.category,
        barcode: payload.barcode,
    };

    if let Err(e) = inventory::validate_draft(&draft, Utc::now().date_naive()) {
        return validation_error(&e.to_string());
    }

    let repo = MedicineRepository::new((*state.db).clone());

    match repo.create(&draft).await {
        Ok(m) => {
            info!(medicine_id = %m.id, name = %m.name, "Medicine created");

            audit_trail::record(
                &state,
                Some(auth.user_id()),
                AuditAction::MedicineCreate,
                Some(format!("{} (lote {})", m.name, m.lot_number)),
                Some("medicine"),
                Some(m.id),
            )
            .await;

            (StatusCode::CREATED, Json(MedicineResponse::from(m))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create medicine");
            medicine_error_response(&e)
        }
    }
}

/// PUT `/inventory/{id}` - Update a medicine.
async fn update_medicine(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMedicineRequest>,
) -> impl IntoResponse {
    let price = match payload.price.as_deref().map(Decimal::from_str) {
        None => None,
        Some(Ok(p)) => Some(p),
        Some(Err(_)) => return validation_error("Formato de precio inválido."),
    };

    let update = MedicineUpdate {
        name: payload.name,
        description: payload.description,
        stock: payload.stock,
        price,
        expiration_date: payload.expiration_date,
        lot_number: payload.lot,
        category: payload.category,
        barcode: payload.barcode,
    };

    if update.is_empty() {
        return validation_error("No se proporcionaron campos para actualizar.");
    }

    if let Err(e) = inventory::validate_update(&update, Utc::now().date_naive()) {
        return validation_error(&e.to_string());
    }

    let repo = MedicineRepository::new((*state.db).clone());

    match repo.update(id, &update).await {
        Ok(m) => {
            info!(medicine_id = %id, "Medicine updated");

            audit_trail::record(
                &state,
                Some(auth.user_id()),
                AuditAction::MedicineUpdate,
                None,
                Some("medicine"),
                Some(id),
            )
            .await;

            (StatusCode::OK, Json(MedicineResponse::from(m))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to update medicine");
            medicine_error_response(&e)
        }
    }
}

/// DELETE `/inventory/{id}` - Delete a medicine no sale references.
async fn delete_medicine(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = MedicineRepository::new((*state.db).clone());

    match repo.delete(id).await {
        Ok(()) => {
            info!(medicine_id = %id, "Medicine deleted");

            audit_trail::record(
                &state,
                Some(auth.user_id()),
                AuditAction::MedicineDelete,
                None,
                Some("medicine"),
                Some(id),
            )
            .await;

            (
                StatusCode::OK,
                Json(json!({ "message": "Medicamento eliminado correctamente." })),
            )
                .into_response()
        }
        Err(e) => medicine_error_response(&e),
    }
}

/// POST `/inventory/{id}/restock` - Add stock from an intake.
async fn restock_medicine(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RestockRequest>,
) -> impl IntoResponse {
    if payload.quantity <= 0 {
        return validation_error(
            &botica_core::inventory::InventoryError::InvalidRestockQuantity.to_string(),
        );
    }

    let repo = MedicineRepository::new((*state.db).clone());

    match repo.restock(id, payload.quantity).await {
        Ok(m) => {
            info!(medicine_id = %id, quantity = payload.quantity, "Stock added");

            audit_trail::record(
                &state,
                Some(auth.user_id()),
                AuditAction::MedicineRestock,
                Some(format!("+{} {}", payload.quantity, m.name)),
                Some("medicine"),
                Some(id),
            )
            .await;

            (StatusCode::OK, Json(MedicineResponse::from(m))).into_response()
        }
        Err(e) => medicine_error_response(&e),
    }
}

/// GET `/inventory/alerts` - Low-stock and near-expiration medicines.
async fn alerts(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<AlertsQuery>,
) -> impl IntoResponse {
    let threshold = query.threshold.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD);
    let days_ahead = query.days_ahead.unwrap_or(DEFAULT_EXPIRY_WINDOW_DAYS);
    let today = Utc::now().date_naive();
    let cutoff = inventory::alerts::expiry_cutoff(today, days_ahead);

    let repo = MedicineRepository::new((*state.db).clone());

    match repo.alerts(threshold, cutoff).await {
        Ok(medicines) => {
            let items: Vec<AlertResponse> = medicines
                .into_iter()
                .filter_map(|m| {
                    inventory::alerts::classify(
                        m.stock,
                        m.expiration_date,
                        today,
                        threshold,
                        days_ahead,
                    )
                    .map(|alert_type| AlertResponse {
                        medicine: MedicineResponse::from(m),
                        alert_type,
                    })
                })
                .collect();

            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to compute alerts");
            medicine_error_response(&e)
        }
    }
}

/// GET `/inventory/stats` - Aggregate inventory statistics.
async fn stats(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    let today = Utc::now().date_naive();
    let cutoff = inventory::alerts::expiry_cutoff(today, DEFAULT_EXPIRY_WINDOW_DAYS);

    let repo = MedicineRepository::new((*state.db).clone());

    match repo.stats(DEFAULT_LOW_STOCK_THRESHOLD, cutoff).await {
        Ok(s) => (
            StatusCode::OK,
            Json(json!({
                "total_products": s.total_products,
                "total_stock": s.total_stock,
                "categories_count": s.categories_count,
                "total_value": s.total_value.to_string(),
                "low_stock_count": s.low_stock_count,
                "expiring_soon_count": s.expiring_soon_count
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to compute inventory stats");
            medicine_error_response(&e)
        }
    }
}

/// GET `/inventory/categories` - Distinct categories in use.
async fn categories(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    let repo = MedicineRepository::new((*state.db).clone());

    match repo.categories().await {
        Ok(list) => (StatusCode::OK, Json(list)).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list categories");
            medicine_error_response(&e)
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn validation_error(message: &str) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "validation_error",
            "message": message
        })),
    )
        .into_response()
}

fn medicine_error_response(e: &MedicineError) -> axum::response::Response {
    match e {
        MedicineError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Medicamento no encontrado."
            })),
        )
            .into_response(),
        MedicineError::DuplicateBarcode(_) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "duplicate_barcode",
                "message": "Ya existe un medicamento con ese código de barras."
            })),
        )
            .into_response(),
        MedicineError::ReferencedBySales(_) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "referenced_by_sales",
                "message": "El medicamento tiene ventas asociadas y no puede eliminarse."
            })),
        )
            .into_response(),
        MedicineError::InsufficientStock { name, available, .. } => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "insufficient_stock",
                "message": format!("Stock insuficiente para \"{name}\". Stock disponible: {available}")
            })),
        )
            .into_response(),
        MedicineError::Database(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "internal_error",
                "message": "An error occurred"
            })),
        )
            .into_response(),
    }
}
