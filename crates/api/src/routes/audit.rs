//! Audit log read routes (admin only).

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser, middleware::require_role};
use botica_db::repositories::audit::{AuditFilter, AuditRepository};
use botica_shared::types::{PageRequest, PageResponse};

/// Creates the audit routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/audit", get(list_audit))
}

/// Query parameters for reading the audit log.
#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    /// Filter by acting user.
    pub user_id: Option<Uuid>,
    /// Substring match on the action tag.
    pub action: Option<String>,
    /// Filter by target table.
    pub target_table: Option<String>,
    /// Entries on or after this date (YYYY-MM-DD).
    pub date_from: Option<NaiveDate>,
    /// Entries on or before this date (YYYY-MM-DD).
    pub date_to: Option<NaiveDate>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size.
    pub limit: Option<u32>,
}

/// Response for one audit entry.
#[derive(Debug, Serialize)]
pub struct AuditEntryResponse {
    /// Entry ID.
    pub id: Uuid,
    /// Acting user ID, when attributed.
    pub user_id: Option<Uuid>,
    /// Acting user display name, "Sistema" for system actions.
    pub user_name: String,
    /// Action tag.
    pub action: String,
    /// Free-form details.
    pub details: Option<String>,
    /// Target table.
    pub target_table: Option<String>,
    /// Target row ID.
    pub target_id: Option<Uuid>,
    /// Entry timestamp.
    pub created_at: String,
}

/// GET `/audit` - Read the audit log with filters and pagination.
async fn list_audit(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<AuditQuery>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, &["admin"]) {
        return response;
    }

    let filter = AuditFilter {
        user_id: query.user_id,
        action: query.action,
        target_table: query.target_table,
        date_from: query.date_from.map(start_of_day),
        date_to: query.date_to.map(end_of_day),
    };

    let page = PageRequest {
        page: query.page.unwrap_or(1),
        per_page: query.limit.unwrap_or(50).min(100),
    };

    let repo = AuditRepository::new((*state.db).clone());

    match repo.list(&filter, &page).await {
        Ok((entries, total)) => {
            let items: Vec<AuditEntryResponse> = entries
                .into_iter()
                .map(|(entry, user)| AuditEntryResponse {
                    id: entry.id,
                    user_id: entry.user_id,
                    user_name: user.map_or_else(|| "Sistema".to_string(), |u| u.name),
                    action: entry.action,
                    details: entry.details,
                    target_table: entry.target_table,
                    target_id: entry.target_id,
                    created_at: entry.created_at.to_rfc3339(),
                })
                .collect();

            let response = PageResponse::new(items, page.page, page.per_page, total);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to read audit log");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response()
        }
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc()
}

fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(23, 59, 59).unwrap_or_default().and_utc()
}
