//! Audit recorder: append-only log of state-changing actions.
//!
//! Entries are never updated or deleted through normal operation. Call sites
//! treat appends as best-effort: a failed append is logged and swallowed so
//! it never blocks the action it describes.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use botica_shared::types::PageRequest;

use crate::entities::{audit_log, users};

/// Filter options for reading the audit log.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    /// Filter by acting user.
    pub user_id: Option<Uuid>,
    /// Case-sensitive substring match on the action tag.
    pub action: Option<String>,
    /// Filter by target table.
    pub target_table: Option<String>,
    /// Entries at or after this instant.
    pub date_from: Option<DateTime<Utc>>,
    /// Entries at or before this instant.
    pub date_to: Option<DateTime<Utc>>,
}

/// Audit repository: append and filtered read paths.
#[derive(Debug, Clone)]
pub struct AuditRepository {
    db: DatabaseConnection,
}

impl AuditRepository {
    /// Creates a new audit repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Appends one audit entry with a server-generated timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn record(
        &self,
        user_id: Option<Uuid>,
        action: &str,
        details: Option<&str>,
        target_table: Option<&str>,
        target_id: Option<Uuid>,
    ) -> Result<audit_log::Model, DbErr> {
        let entry = audit_log::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            action: Set(action.to_string()),
            details: Set(details.map(String::from)),
            target_table: Set(target_table.map(String::from)),
            target_id: Set(target_id),
            created_at: Set(Utc::now().into()),
        };

        entry.insert(&self.db).await
    }

    /// Reads audit entries newest-first with filters and pagination.
    ///
    /// Returns the page of entries (with acting user rows where available)
    /// and the total matching count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &AuditFilter,
        page: &PageRequest,
    ) -> Result<(Vec<(audit_log::Model, Option<users::Model>)>, u64), DbErr> {
        let mut query = audit_log::Entity::find();

        if let Some(user_id) = filter.user_id {
            query = query.filter(audit_log::Column::UserId.eq(user_id));
        }
        if let Some(action) = &filter.action {
            query = query.filter(audit_log::Column::Action.contains(action.clone()));
        }
        if let Some(table) = &filter.target_table {
            query = query.filter(audit_log::Column::TargetTable.eq(table.clone()));
        }
        if let Some(from) = filter.date_from {
            query = query.filter(audit_log::Column::CreatedAt.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(audit_log::Column::CreatedAt.lte(to));
        }

        let total = query.clone().count(&self.db).await?;

        let entries = query
            .find_also_related(users::Entity)
            .order_by_desc(audit_log::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((entries, total))
    }

    /// The most recent entries, for the dashboard activity feed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn recent(
        &self,
        limit: u64,
    ) -> Result<Vec<(audit_log::Model, Option<users::Model>)>, DbErr> {
        audit_log::Entity::find()
            .find_also_related(users::Entity)
            .order_by_desc(audit_log::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
    }
}
