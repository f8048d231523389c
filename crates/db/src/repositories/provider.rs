//! Provider repository for supplier records.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::providers;

/// Error types for provider operations.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Provider not found.
    #[error("Proveedor no encontrado")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Fields for creating or replacing a provider.
#[derive(Debug, Clone)]
pub struct ProviderInput {
    /// Company name.
    pub name: String,
    /// Optional contact person.
    pub contact_name: Option<String>,
    /// Optional email.
    pub email: Option<String>,
    /// Optional phone.
    pub phone: Option<String>,
}

/// Provider repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ProviderRepository {
    db: DatabaseConnection,
}

impl ProviderRepository {
    /// Creates a new provider repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists providers by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<providers::Model>, ProviderError> {
        let providers = providers::Entity::find()
            .order_by_asc(providers::Column::Name)
            .all(&self.db)
            .await?;
        Ok(providers)
    }

    /// Finds a provider by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the provider does not exist.
    pub async fn find_by_id(&self, id: Uuid) -> Result<providers::Model, ProviderError> {
        providers::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ProviderError::NotFound(id))
    }

    /// Creates a provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: &ProviderInput) -> Result<providers::Model, ProviderError> {
        let now = Utc::now().into();
        let row = providers::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name.clone()),
            contact_name: Set(input.contact_name.clone()),
            email: Set(input.email.clone()),
            phone: Set(input.phone.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(row.insert(&self.db).await?)
    }

    /// Replaces a provider's fields.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the provider does not exist.
    pub async fn update(
        &self,
        id: Uuid,
        input: &ProviderInput,
    ) -> Result<providers::Model, ProviderError> {
        let existing = self.find_by_id(id).await?;

        let mut active: providers::ActiveModel = existing.into();
        active.name = Set(input.name.clone());
        active.contact_name = Set(input.contact_name.clone());
        active.email = Set(input.email.clone());
        active.phone = Set(input.phone.clone());
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a provider.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the provider does not exist.
    pub async fn delete(&self, id: Uuid) -> Result<(), ProviderError> {
        let existing = self.find_by_id(id).await?;
        providers::Entity::delete_by_id(existing.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
