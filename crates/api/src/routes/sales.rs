//! Sales routes: point-of-sale listing, creation, and cancellation.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, audit_trail, middleware::AuthUser, middleware::require_role};
use botica_core::audit::AuditAction;
use botica_core::sale::{
    CreateSaleInput as CoreSaleInput, MedicineSnapshot, SaleError as CoreSaleError,
    SaleItemInput as CoreItemInput, SaleService,
};
use botica_db::entities::{sales, sea_orm_active_enums::SaleStatus};
use botica_db::repositories::medicine::MedicineRepository;
use botica_db::repositories::sale::{
    CreateSaleInput, SaleError, SaleItemInput, SaleRepository, SaleWithItems,
};
use botica_shared::types::MedicineId;

/// Creates the sales routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sales", get(list_sales))
        .route("/sales", post(create_sale))
        .route("/sales/{id}", get(get_sale))
        .route("/sales/{id}/cancel", post(cancel_sale))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a sale.
#[derive(Debug, Deserialize)]
pub struct CreateSaleRequest {
    /// Optional client the sale is attributed to.
    pub client_id: Option<Uuid>,
    /// Payment method (e.g. "efectivo", "tarjeta").
    pub payment_method: String,
    /// Basket line items.
    pub items: Vec<SaleItemRequest>,
}

/// One requested basket line.
#[derive(Debug, Deserialize)]
pub struct SaleItemRequest {
    /// Medicine to sell.
    pub medicine_id: Uuid,
    /// Units requested.
    pub quantity: i32,
}

/// Response for a sale line item.
#[derive(Debug, Serialize)]
pub struct SaleItemResponse {
    /// Line item ID.
    pub id: Uuid,
    /// Medicine ID.
    pub medicine_id: Uuid,
    /// Medicine display name.
    pub medicine_name: String,
    /// Units sold.
    pub quantity: i32,
    /// Unit price captured at sale time.
    pub unit_price: String,
    /// Line subtotal.
    pub total_price: String,
}

/// Response for a sale with its items.
#[derive(Debug, Serialize)]
pub struct SaleResponse {
    /// Sale ID.
    pub id: Uuid,
    /// User who rang up the sale.
    pub user_id: Uuid,
    /// Client, when attributed.
    pub client_id: Option<Uuid>,
    /// Sale total.
    pub total: String,
    /// Payment method.
    pub payment_method: String,
    /// Sale status.
    pub status: String,
    /// Created at timestamp.
    pub created_at: String,
    /// Cancellation timestamp, when cancelled.
    pub cancelled_at: Option<String>,
    /// Line items.
    pub items: Vec<SaleItemResponse>,
}

/// Response for a sale list row (without items).
#[derive(Debug, Serialize)]
pub struct SaleListItem {
    /// Sale ID.
    pub id: Uuid,
    /// User who rang up the sale.
    pub user_id: Uuid,
    /// Client, when attributed.
    pub client_id: Option<Uuid>,
    /// Sale total.
    pub total: String,
    /// Payment method.
    pub payment_method: String,
    /// Sale status.
    pub status: String,
    /// Created at timestamp.
    pub created_at: String,
}

fn status_to_string(status: &SaleStatus) -> String {
    match status {
        SaleStatus::Completed => "completed".to_string(),
        SaleStatus::Cancelled => "cancelled".to_string(),
    }
}

fn sale_response(result: SaleWithItems) -> SaleResponse {
    SaleResponse {
        id: result.sale.id,
        user_id: result.sale.user_id,
        client_id: result.sale.client_id,
        total: result.sale.total.to_string(),
        payment_method: result.sale.payment_method,
        status: status_to_string(&result.sale.status),
        created_at: result.sale.created_at.to_rfc3339(),
        cancelled_at: result.sale.cancelled_at.map(|t| t.to_rfc3339()),
        items: result
            .items
            .into_iter()
            .map(|i| SaleItemResponse {
                id: i.item.id,
                medicine_id: i.item.medicine_id,
                medicine_name: i.medicine_name,
                quantity: i.item.quantity,
                unit_price: i.item.unit_price.to_string(),
                total_price: i.item.total_price.to_string(),
            })
            .collect(),
    }
}

fn sale_list_item(sale: sales::Model) -> SaleListItem {
    SaleListItem {
        id: sale.id,
        user_id: sale.user_id,
        client_id: sale.client_id,
        total: sale.total.to_string(),
        payment_method: sale.payment_method,
        status: status_to_string(&sale.status),
        created_at: sale.created_at.to_rfc3339(),
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/sales` - List sales, newest first.
async fn list_sales(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    let repo = SaleRepository::new((*state.db).clone());

    match repo.list_sales().await {
        Ok(sales) => {
            let items: Vec<SaleListItem> = sales.into_iter().map(sale_list_item).collect();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list sales");
            sale_error_response(&e)
        }
    }
}

/// GET `/sales/{id}` - Get a sale with its items.
async fn get_sale(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = SaleRepository::new((*state.db).clone());

    match repo.get_sale(id).await {
        Ok(result) => (StatusCode::OK, Json(sale_response(result))).into_response(),
        Err(e) => sale_error_response(&e),
    }
}

/// POST `/sales` - Create a sale.
///
/// Validation and pricing run against an unlocked read first so bad baskets
/// fail fast; the repository then re-checks every line under a row lock
/// inside the commit transaction, which is the authoritative decision.
async fn create_sale(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateSaleRequest>,
) -> impl IntoResponse {
    let medicine_repo = MedicineRepository::new((*state.db).clone());

    // Observe current stock and prices for validation.
    let mut snapshots: HashMap<Uuid, MedicineSnapshot> = HashMap::new();
    for item in &payload.items {
        if snapshots.contains_key(&item.medicine_id) {
            continue;
        }
        match medicine_repo.find_by_id(item.medicine_id).await {
            Ok(m) => {
                snapshots.insert(
                    m.id,
                    MedicineSnapshot {
                        id: MedicineId::from_uuid(m.id),
                        name: m.name,
                        stock: m.stock,
                        price: m.price,
                    },
                );
            }
            Err(botica_db::repositories::medicine::MedicineError::NotFound(id)) => {
                return (
                    StatusCode::NOT_FOUND,
                    Json(json!({
                        "error": "medicine_not_found",
                        "message": format!("Producto con ID {id} no encontrado")
                    })),
                )
                    .into_response();
            }
            Err(e) => {
                error!(error = %e, "Failed to read medicine for sale");
                return internal_error();
            }
        }
    }

    let core_input = CoreSaleInput {
        user_id: auth.user_id().into(),
        client_id: payload.client_id.map(Into::into),
        payment_method: payload.payment_method.clone(),
        items: payload
            .items
            .iter()
            .map(|i| CoreItemInput {
                medicine_id: MedicineId::from_uuid(i.medicine_id),
                quantity: i.quantity,
            })
            .collect(),
    };

    let lookup = |id: MedicineId| {
        snapshots
            .get(&id.into_inner())
            .cloned()
            .ok_or(CoreSaleError::MedicineNotFound(id))
    };

    if let Err(e) = SaleService::validate_and_price(&core_input, lookup) {
        return core_sale_error_response(&e);
    }

    // Authoritative locked re-check and commit.
    let repo = SaleRepository::new((*state.db).clone());
    let input = CreateSaleInput {
        user_id: auth.user_id(),
        client_id: payload.client_id,
        payment_method: payload.payment_method,
        items: payload
            .items
            .iter()
            .map(|i| SaleItemInput {
                medicine_id: i.medicine_id,
                quantity: i.quantity,
            })
            .collect(),
    };

    match repo.create_sale(input).await {
        Ok(result) => {
            info!(
                sale_id = %result.sale.id,
                total = %result.sale.total,
                items = result.items.len(),
                "Sale created"
            );

            audit_trail::record(
                &state,
                Some(auth.user_id()),
                AuditAction::SaleCreate,
                Some(format!(
                    "Venta registrada - Total: {} - Productos: {}",
                    result.sale.total,
                    result.items.len()
                )),
                Some("sales"),
                Some(result.sale.id),
            )
            .await;

            (StatusCode::CREATED, Json(sale_response(result))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create sale");
            sale_error_response(&e)
        }
    }
}

/// POST `/sales/{id}/cancel` - Cancel a sale and restore stock (admin only).
async fn cancel_sale(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, &["admin"]) {
        return response;
    }

    let repo = SaleRepository::new((*state.db).clone());

    match repo.cancel_sale(id).await {
        Ok(result) => {
            info!(sale_id = %id, "Sale cancelled, stock restored");

            audit_trail::record(
                &state,
                Some(auth.user_id()),
                AuditAction::SaleCancel,
                Some(format!("Factura {id} cancelada")),
                Some("sales"),
                Some(id),
            )
            .await;

            (StatusCode::OK, Json(sale_response(result))).into_response()
        }
        Err(e) => sale_error_response(&e),
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn core_sale_error_response(e: &CoreSaleError) -> axum::response::Response {
    let status = match e {
        CoreSaleError::MedicineNotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_REQUEST,
    };
    let code = match e {
        CoreSaleError::EmptySale => "empty_sale",
        CoreSaleError::InvalidQuantity { .. } => "invalid_quantity",
        CoreSaleError::MissingPaymentMethod => "missing_payment_method",
        CoreSaleError::MedicineNotFound(_) => "medicine_not_found",
        CoreSaleError::InsufficientStock { .. } => "insufficient_stock",
    };

    (
        status,
        Json(json!({ "error": code, "message": e.to_string() })),
    )
        .into_response()
}

fn sale_error_response(e: &SaleError) -> axum::response::Response {
    match e {
        SaleError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Factura no encontrada."
            })),
        )
            .into_response(),
        SaleError::MedicineNotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "medicine_not_found",
                "message": format!("Producto con ID {id} no encontrado")
            })),
        )
            .into_response(),
        SaleError::InsufficientStock { name, available, .. } => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "insufficient_stock",
                "message": format!("Stock insuficiente para \"{name}\". Stock disponible: {available}")
            })),
        )
            .into_response(),
        SaleError::AlreadyCancelled(_) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "already_cancelled",
                "message": "La factura ya está cancelada."
            })),
        )
            .into_response(),
        SaleError::Database(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "internal_error",
                "message": "An error occurred"
            })),
        )
            .into_response(),
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
