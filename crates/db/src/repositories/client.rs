//! Client repository for pharmacy client records.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::clients;

/// Error types for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Client not found.
    #[error("Cliente no encontrado")]
    NotFound(Uuid),

    /// Another client already uses this email.
    #[error("Ya existe un cliente con ese correo.")]
    DuplicateEmail(String),

    /// Another client already uses this phone number.
    #[error("Ya existe un cliente con ese teléfono.")]
    DuplicatePhone(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Fields for creating or replacing a client.
#[derive(Debug, Clone)]
pub struct ClientInput {
    /// Display name.
    pub name: String,
    /// Optional email, unique when present.
    pub email: Option<String>,
    /// Optional phone, unique when present.
    pub phone: Option<String>,
    /// Optional national ID.
    pub cedula: Option<String>,
    /// Optional tax registry number.
    pub rnc: Option<String>,
    /// Optional address.
    pub address: Option<String>,
}

/// Client repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    db: DatabaseConnection,
}

impl ClientRepository {
    /// Creates a new client repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists clients by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<clients::Model>, ClientError> {
        let clients = clients::Entity::find()
            .order_by_asc(clients::Column::Name)
            .all(&self.db)
            .await?;
        Ok(clients)
    }

    /// Finds a client by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the client does not exist.
    pub async fn find_by_id(&self, id: Uuid) -> Result<clients::Model, ClientError> {
        clients::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ClientError::NotFound(id))
    }

    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateEmail` or `DuplicatePhone` on contact collisions.
    pub async fn create(&self, input: &ClientInput) -> Result<clients::Model, ClientError> {
        self.check_unique_contacts(input, None).await?;

        let now = Utc::now().into();
        let row = clients::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name.clone()),
            email: Set(input.email.clone()),
            phone: Set(input.phone.clone()),
            cedula: Set(input.cedula.clone()),
            rnc: Set(input.rnc.clone()),
            address: Set(input.address.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(row.insert(&self.db).await?)
    }

    /// Replaces a client's fields.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a contact collision error.
    pub async fn update(
        &self,
        id: Uuid,
        input: &ClientInput,
    ) -> Result<clients::Model, ClientError> {
        let existing = self.find_by_id(id).await?;
        self.check_unique_contacts(input, Some(id)).await?;

        let mut active: clients::ActiveModel = existing.into();
        active.name = Set(input.name.clone());
        active.email = Set(input.email.clone());
        active.phone = Set(input.phone.clone());
        active.cedula = Set(input.cedula.clone());
        active.rnc = Set(input.rnc.clone());
        active.address = Set(input.address.clone());
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a client.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the client does not exist.
    pub async fn delete(&self, id: Uuid) -> Result<(), ClientError> {
        let existing = self.find_by_id(id).await?;
        clients::Entity::delete_by_id(existing.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Rejects email/phone values already used by another client.
    async fn check_unique_contacts(
        &self,
        input: &ClientInput,
        exclude: Option<Uuid>,
    ) -> Result<(), ClientError> {
        if let Some(email) = &input.email {
            let mut query =
                clients::Entity::find().filter(clients::Column::Email.eq(email.clone()));
            if let Some(id) = exclude {
                query = query.filter(clients::Column::Id.ne(id));
            }
            if query.count(&self.db).await? > 0 {
                return Err(ClientError::DuplicateEmail(email.clone()));
            }
        }

        if let Some(phone) = &input.phone {
            let mut query =
                clients::Entity::find().filter(clients::Column::Phone.eq(phone.clone()));
            if let Some(id) = exclude {
                query = query.filter(clients::Column::Id.ne(id));
            }
            if query.count(&self.db).await? > 0 {
                return Err(ClientError::DuplicatePhone(phone.clone()));
            }
        }

        Ok(())
    }
}
