//! Role repository: roles and their permission sets.
//!
//! Role writes touch two tables (roles + permissions) and always run in one
//! transaction. Deleting a role cascades to its permissions through the
//! schema's foreign key.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{permissions, roles};

/// Error types for role operations.
#[derive(Debug, thiserror::Error)]
pub enum RoleError {
    /// Role not found.
    #[error("Role not found: {0}")]
    NotFound(Uuid),

    /// Another role already uses this name.
    #[error("El nombre del rol ya está en uso.")]
    DuplicateName(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// A role with its permission action strings.
#[derive(Debug, Clone)]
pub struct RoleWithPermissions {
    /// Role row.
    pub role: roles::Model,
    /// Permission actions owned by the role.
    pub permissions: Vec<permissions::Model>,
}

/// Role repository for role and permission management.
#[derive(Debug, Clone)]
pub struct RoleRepository {
    db: DatabaseConnection,
}

impl RoleRepository {
    /// Creates a new role repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all roles with their permissions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<RoleWithPermissions>, RoleError> {
        let roles = roles::Entity::find()
            .order_by_asc(roles::Column::Name)
            .all(&self.db)
            .await?;

        let all_permissions = permissions::Entity::find().all(&self.db).await?;

        Ok(roles
            .into_iter()
            .map(|role| {
                let permissions = all_permissions
                    .iter()
                    .filter(|p| p.role_id == role.id)
                    .cloned()
                    .collect();
                RoleWithPermissions { role, permissions }
            })
            .collect())
    }

    /// Gets a role with its permissions.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the role does not exist.
    pub async fn get(&self, id: Uuid) -> Result<RoleWithPermissions, RoleError> {
        let role = roles::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(RoleError::NotFound(id))?;

        let permissions = permissions::Entity::find()
            .filter(permissions::Column::RoleId.eq(id))
            .all(&self.db)
            .await?;

        Ok(RoleWithPermissions { role, permissions })
    }

    /// Creates a role with its permission set in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateName` if the name is taken.
    pub async fn create(
        &self,
        name: &str,
        actions: &[String],
    ) -> Result<RoleWithPermissions, RoleError> {
        let taken = roles::Entity::find()
            .filter(roles::Column::Name.eq(name))
            .count(&self.db)
            .await?;
        if taken > 0 {
            return Err(RoleError::DuplicateName(name.to_string()));
        }

        let txn = self.db.begin().await?;

        let role = roles::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        let mut created = Vec::with_capacity(actions.len());
        for action in actions {
            let permission = permissions::ActiveModel {
                id: Set(Uuid::new_v4()),
                role_id: Set(role.id),
                action: Set(action.clone()),
            }
            .insert(&txn)
            .await?;
            created.push(permission);
        }

        txn.commit().await?;

        Ok(RoleWithPermissions {
            role,
            permissions: created,
        })
    }

    /// Rewrites a role's name and permission set in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the role does not exist or `DuplicateName` if
    /// the new name collides with another role.
    pub async fn update(
        &self,
        id: Uuid,
        name: &str,
        actions: &[String],
    ) -> Result<RoleWithPermissions, RoleError> {
        let existing = roles::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(RoleError::NotFound(id))?;

        let collision = roles::Entity::find()
            .filter(roles::Column::Name.eq(name))
            .filter(roles::Column::Id.ne(id))
            .count(&self.db)
            .await?;
        if collision > 0 {
            return Err(RoleError::DuplicateName(name.to_string()));
        }

        let txn = self.db.begin().await?;

        permissions::Entity::delete_many()
            .filter(permissions::Column::RoleId.eq(id))
            .exec(&txn)
            .await?;

        let mut active: roles::ActiveModel = existing.into();
        active.name = Set(name.to_string());
        let role = active.update(&txn).await?;

        let mut created = Vec::with_capacity(actions.len());
        for action in actions {
            let permission = permissions::ActiveModel {
                id: Set(Uuid::new_v4()),
                role_id: Set(id),
                action: Set(action.clone()),
            }
            .insert(&txn)
            .await?;
            created.push(permission);
        }

        txn.commit().await?;

        Ok(RoleWithPermissions {
            role,
            permissions: created,
        })
    }

    /// Deletes a role; its permissions cascade.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the role does not exist.
    pub async fn delete(&self, id: Uuid) -> Result<(), RoleError> {
        let existing = roles::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(RoleError::NotFound(id))?;

        roles::Entity::delete_by_id(existing.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
