//! Reporting and backup management routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde_json::json;
use tracing::{error, info};

use crate::{AppState, audit_trail, middleware::AuthUser, middleware::require_role};
use botica_core::audit::AuditAction;
use botica_db::BackupError;
use botica_db::repositories::sale::SaleRepository;

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/sales-summary", get(sales_summary))
        .route("/reports/backup", post(create_backup))
        .route("/reports/backup", get(list_backups))
        .route("/reports/backup/{filename}", delete(delete_backup))
}

/// GET `/reports/sales-summary` - Today's totals by payment method.
async fn sales_summary(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    let repo = SaleRepository::new((*state.db).clone());

    match repo.today_summary().await {
        Ok(summary) => {
            let by_method: Vec<serde_json::Value> = summary
                .by_payment_method
                .iter()
                .map(|(method, total)| {
                    json!({ "payment_method": method, "total": total.to_string() })
                })
                .collect();

            (
                StatusCode::OK,
                Json(json!({
                    "total_sales": summary.total_sales.to_string(),
                    "total_transactions": summary.total_transactions,
                    "by_payment_method": by_method
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to build sales summary");
            internal_error()
        }
    }
}

/// POST `/reports/backup` - Run a database backup (admin only).
async fn create_backup(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, &["admin"]) {
        return response;
    }

    match state.backup.create().await {
        Ok(file) => {
            info!(file = %file.filename, "Backup created");

            audit_trail::record(
                &state,
                Some(auth.user_id()),
                AuditAction::BackupCreate,
                Some(file.filename.clone()),
                None,
                None,
            )
            .await;

            (StatusCode::CREATED, Json(file)).into_response()
        }
        Err(e) => backup_error_response(&e),
    }
}

/// GET `/reports/backup` - List backup files (admin only).
async fn list_backups(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, &["admin"]) {
        return response;
    }

    match state.backup.list().await {
        Ok(files) => (StatusCode::OK, Json(files)).into_response(),
        Err(e) => backup_error_response(&e),
    }
}

/// DELETE `/reports/backup/{filename}` - Delete one backup file (admin only).
async fn delete_backup(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(filename): Path<String>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, &["admin"]) {
        return response;
    }

    match state.backup.delete(&filename).await {
        Ok(()) => {
            audit_trail::record(
                &state,
                Some(auth.user_id()),
                AuditAction::BackupDelete,
                Some(filename.clone()),
                None,
                None,
            )
            .await;

            (
                StatusCode::OK,
                Json(json!({ "message": "Backup eliminado correctamente" })),
            )
                .into_response()
        }
        Err(e) => backup_error_response(&e),
    }
}

fn backup_error_response(e: &BackupError) -> axum::response::Response {
    match e {
        BackupError::AlreadyRunning => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "backup_in_progress",
                "message": "A backup is already in progress"
            })),
        )
            .into_response(),
        BackupError::InvalidFilename(_) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_filename",
                "message": "Invalid backup filename"
            })),
        )
            .into_response(),
        BackupError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Backup file not found"
            })),
        )
            .into_response(),
        BackupError::DumpFailed(_) | BackupError::Io(_) => {
            error!(error = %e, "Backup operation failed");
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
