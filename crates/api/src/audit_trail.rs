//! Best-effort audit recording for route handlers.
//!
//! Audit appends are fire-and-forget relative to the action they describe: a
//! failed append is logged to the operator console and swallowed so it never
//! blocks or rolls back the primary action.

use tracing::warn;
use uuid::Uuid;

use crate::AppState;
use botica_core::audit::AuditAction;
use botica_db::AuditRepository;

/// Records an audit entry, swallowing failures.
pub async fn record(
    state: &AppState,
    user_id: Option<Uuid>,
    action: AuditAction,
    details: Option<String>,
    target_table: Option<&str>,
    target_id: Option<Uuid>,
) {
    let repo = AuditRepository::new((*state.db).clone());

    if let Err(e) = repo
        .record(
            user_id,
            action.as_str(),
            details.as_deref(),
            target_table,
            target_id,
        )
        .await
    {
        warn!(
            action = action.as_str(),
            error = %e,
            "Failed to record audit entry"
        );
    }
}
