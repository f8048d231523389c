//! User repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{roles, users};

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by email, with the user's role.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<(users::Model, Option<roles::Model>)>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .find_also_related(roles::Entity)
            .one(&self.db)
            .await
    }

    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role_id: Uuid,
    ) -> Result<users::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            role_id: Set(role_id),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        user.insert(&self.db).await
    }

    /// Lists users with their roles, by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<(users::Model, Option<roles::Model>)>, DbErr> {
        users::Entity::find()
            .find_also_related(roles::Entity)
            .order_by_asc(users::Column::Name)
            .all(&self.db)
            .await
    }

    /// Deactivates a user account. Returns false when the user is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn deactivate(&self, id: Uuid) -> Result<bool, DbErr> {
        let Some(user) = users::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(false);
        };

        let mut active: users::ActiveModel = user.into();
        active.is_active = Set(false);
        active.updated_at = Set(chrono::Utc::now().into());
        active.update(&self.db).await?;

        Ok(true)
    }

    /// Checks if an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_exists(&self, email: &str) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }
}
