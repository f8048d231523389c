//! Dashboard statistics route.
//!
//! Everything here is computed on demand; nothing is cached or stored.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use serde_json::{Value, json};
use uuid::Uuid;

use chrono::Utc;

use crate::error::ApiError;
use crate::{AppState, middleware::AuthUser};
use botica_core::inventory::{
    DEFAULT_EXPIRY_WINDOW_DAYS, DEFAULT_LOW_STOCK_THRESHOLD, alerts::expiry_cutoff,
};
use botica_db::repositories::audit::AuditRepository;
use botica_db::repositories::medicine::MedicineRepository;
use botica_db::repositories::sale::SaleRepository;
use botica_shared::AppError;

const RECENT_ACTIVITY_LIMIT: u64 = 5;

/// Creates the dashboard routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard_stats))
}

/// One recent-activity row from the audit log.
#[derive(Debug, Serialize)]
pub struct RecentActivity {
    /// Audit entry ID.
    pub id: Uuid,
    /// Action tag.
    pub action: String,
    /// Acting user display name, "Sistema" for system actions.
    pub user_name: String,
    /// Entry timestamp.
    pub created_at: String,
}

/// GET `/dashboard` - Today's sales, stock alerts, and recent activity.
async fn dashboard_stats(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Value>, ApiError> {
    let sale_repo = SaleRepository::new((*state.db).clone());
    let medicine_repo = MedicineRepository::new((*state.db).clone());
    let audit_repo = AuditRepository::new((*state.db).clone());

    let summary = sale_repo
        .today_summary()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let products_sold = sale_repo
        .products_sold_today()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let clients_served = sale_repo
        .clients_served_today()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let low_stock = medicine_repo
        .low_stock(DEFAULT_LOW_STOCK_THRESHOLD)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .len();

    let cutoff = expiry_cutoff(Utc::now().date_naive(), DEFAULT_EXPIRY_WINDOW_DAYS);
    let expiring_soon = medicine_repo
        .expiring_soon(cutoff)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .len();

    let recent: Vec<RecentActivity> = audit_repo
        .recent(RECENT_ACTIVITY_LIMIT)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .into_iter()
        .map(|(entry, user)| RecentActivity {
            id: entry.id,
            action: entry.action,
            user_name: user.map_or_else(|| "Sistema".to_string(), |u| u.name),
            created_at: entry.created_at.to_rfc3339(),
        })
        .collect();

    Ok(Json(json!({
        "daily_sales": summary.total_sales.to_string(),
        "sales_count": summary.total_transactions,
        "products_sold": products_sold,
        "clients_served": clients_served,
        "low_stock_count": low_stock,
        "expiring_soon_count": expiring_soon,
        "recent_activities": recent
    })))
}
