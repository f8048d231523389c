//! Medicine repository: the authoritative stock ledger.
//!
//! All stock movements go through this repository. The read-check-decrement
//! path used by sales takes a row lock (`SELECT ... FOR UPDATE`) inside the
//! caller's transaction so concurrent sales over the same lot serialize
//! instead of overselling.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use botica_core::inventory::{MedicineDraft, MedicineUpdate, generate_barcode};

use crate::entities::{medicine, sale_items};

/// Error types for stock ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum MedicineError {
    /// Medicine not found.
    #[error("Medicine not found: {0}")]
    NotFound(Uuid),

    /// Another medicine already uses this barcode.
    #[error("Ya existe un medicamento con ese código de barras.")]
    DuplicateBarcode(String),

    /// The medicine is referenced by at least one sale and cannot be deleted.
    #[error("Medicine {0} is referenced by sales and cannot be deleted")]
    ReferencedBySales(Uuid),

    /// Requested quantity exceeds on-hand stock.
    #[error("Stock insuficiente para \"{name}\". Stock disponible: {available}")]
    InsufficientStock {
        /// Medicine ID.
        medicine_id: Uuid,
        /// Medicine display name.
        name: String,
        /// Units requested.
        requested: i32,
        /// Units on hand under lock.
        available: i32,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Filter options for listing medicines.
#[derive(Debug, Clone, Default)]
pub struct MedicineFilter {
    /// Filter by exact category.
    pub category: Option<String>,
    /// Substring match on name or description.
    pub search: Option<String>,
}

/// Aggregate inventory statistics.
#[derive(Debug, Clone)]
pub struct InventoryStats {
    /// Number of distinct stock-keeping units.
    pub total_products: u64,
    /// Total units on hand across all medicines.
    pub total_stock: i64,
    /// Number of distinct categories in use.
    pub categories_count: u64,
    /// Total value of stock on hand (`sum of stock * price`).
    pub total_value: Decimal,
    /// Medicines at or below the low-stock threshold.
    pub low_stock_count: u64,
    /// Medicines expiring within the look-ahead window.
    pub expiring_soon_count: u64,
}

/// Medicine repository for stock ledger and CRUD operations.
#[derive(Debug, Clone)]
pub struct MedicineRepository {
    db: DatabaseConnection,
}

impl MedicineRepository {
    /// Creates a new medicine repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists medicines with optional category and search filters, by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, filter: MedicineFilter) -> Result<Vec<medicine::Model>, MedicineError> {
        let mut query = medicine::Entity::find();

        if let Some(category) = filter.category {
            query = query.filter(medicine::Column::Category.eq(category));
        }

        if let Some(search) = filter.search {
            let pattern = format!("%{search}%");
            query = query.filter(
                Condition::any()
                    .add(medicine::Column::Name.like(pattern.clone()))
                    .add(medicine::Column::Description.like(pattern)),
            );
        }

        let medicines = query
            .order_by_asc(medicine::Column::Name)
            .all(&self.db)
            .await?;

        Ok(medicines)
    }

    /// Finds a medicine by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the medicine does not exist.
    pub async fn find_by_id(&self, id: Uuid) -> Result<medicine::Model, MedicineError> {
        medicine::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(MedicineError::NotFound(id))
    }

    /// Creates a medicine from a validated draft.
    ///
    /// A barcode is generated when the draft does not carry one.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateBarcode` if the barcode is already in use.
    pub async fn create(&self, draft: &MedicineDraft) -> Result<medicine::Model, MedicineError> {
        let barcode = match &draft.barcode {
            Some(b) => b.clone(),
            None => generate_barcode(Utc::now()),
        };

        let existing = medicine::Entity::find()
            .filter(medicine::Column::Barcode.eq(barcode.clone()))
            .count(&self.db)
            .await?;
        if existing > 0 {
            return Err(MedicineError::DuplicateBarcode(barcode));
        }

        let now = Utc::now().into();
        let row = medicine::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(draft.name.clone()),
            description: Set(draft.description.clone()),
            stock: Set(draft.stock),
            price: Set(draft.price),
            expiration_date: Set(draft.expiration_date),
            lot_number: Set(draft.lot_number.clone()),
            category: Set(draft.category.clone()),
            barcode: Set(barcode),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(row.insert(&self.db).await?)
    }

    /// Applies a validated partial update.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the medicine does not exist and
    /// `DuplicateBarcode` if a new barcode collides with another medicine.
    pub async fn update(
        &self,
        id: Uuid,
        update: &MedicineUpdate,
    ) -> Result<medicine::Model, MedicineError> {
        let existing = self.find_by_id(id).await?;

        if let Some(barcode) = &update.barcode {
            let collision = medicine::Entity::find()
                .filter(medicine::Column::Barcode.eq(barcode.clone()))
                .filter(medicine::Column::Id.ne(id))
                .count(&self.db)
                .await?;
            if collision > 0 {
                return Err(MedicineError::DuplicateBarcode(barcode.clone()));
            }
        }

        let mut active: medicine::ActiveModel = existing.into();

        if let Some(name) = &update.name {
            active.name = Set(name.clone());
        }
        if let Some(description) = &update.description {
            active.description = Set(Some(description.clone()));
        }
        if let Some(stock) = update.stock {
            active.stock = Set(stock);
        }
        if let Some(price) = update.price {
            active.price = Set(price);
        }
        if let Some(expiration) = update.expiration_date {
            active.expiration_date = Set(expiration);
        }
        if let Some(lot) = &update.lot_number {
            active.lot_number = Set(lot.clone());
        }
        if let Some(category) = &update.category {
            active.category = Set(Some(category.clone()));
        }
        if let Some(barcode) = &update.barcode {
            active.barcode = Set(barcode.clone());
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a medicine that no sale references.
    ///
    /// # Errors
    ///
    /// Returns `ReferencedBySales` when sale items reference the medicine;
    /// sold medicines stay on the books.
    pub async fn delete(&self, id: Uuid) -> Result<(), MedicineError> {
        self.find_by_id(id).await?;

        let references = sale_items::Entity::find()
            .filter(sale_items::Column::MedicineId.eq(id))
            .count(&self.db)
            .await?;
        if references > 0 {
            return Err(MedicineError::ReferencedBySales(id));
        }

        medicine::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    /// Returns the current on-hand quantity.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the medicine does not exist.
    pub async fn available(&self, id: Uuid) -> Result<i32, MedicineError> {
        Ok(self.find_by_id(id).await?.stock)
    }

    /// Re-reads a medicine under a row lock and decrements its stock.
    ///
    /// Must run inside the same transaction as the sale insert: the
    /// `FOR UPDATE` lock serializes concurrent sales on the row, and the
    /// decrement rolls back with the rest of the transaction on failure.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the medicine does not exist, or
    /// `InsufficientStock` when `quantity` exceeds the locked row's stock.
    pub async fn reserve_and_decrement(
        txn: &DatabaseTransaction,
        id: Uuid,
        quantity: i32,
    ) -> Result<medicine::Model, MedicineError> {
        let locked = medicine::Entity::find_by_id(id)
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or(MedicineError::NotFound(id))?;

        if locked.stock < quantity {
            return Err(MedicineError::InsufficientStock {
                medicine_id: id,
                name: locked.name,
                requested: quantity,
                available: locked.stock,
            });
        }

        let new_stock = locked.stock - quantity;
        let mut active: medicine::ActiveModel = locked.into();
        active.stock = Set(new_stock);
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(txn).await?)
    }

    /// Increments stock by a restock/intake. No upper bound is enforced.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the medicine does not exist.
    pub async fn restock(&self, id: Uuid, quantity: i32) -> Result<medicine::Model, MedicineError> {
        let updated = medicine::Entity::update_many()
            .col_expr(
                medicine::Column::Stock,
                Expr::col(medicine::Column::Stock).add(quantity),
            )
            .col_expr(medicine::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(medicine::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if updated.rows_affected == 0 {
            return Err(MedicineError::NotFound(id));
        }

        self.find_by_id(id).await
    }

    /// Restores stock inside a transaction (sale cancellation path).
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the medicine does not exist.
    pub async fn restore_stock(
        txn: &DatabaseTransaction,
        id: Uuid,
        quantity: i32,
    ) -> Result<(), MedicineError> {
        let updated = medicine::Entity::update_many()
            .col_expr(
                medicine::Column::Stock,
                Expr::col(medicine::Column::Stock).add(quantity),
            )
            .col_expr(medicine::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(medicine::Column::Id.eq(id))
            .exec(txn)
            .await?;

        if updated.rows_affected == 0 {
            return Err(MedicineError::NotFound(id));
        }
        Ok(())
    }

    /// Medicines at or below the low-stock threshold, lowest stock first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn low_stock(&self, threshold: i32) -> Result<Vec<medicine::Model>, MedicineError> {
        let medicines = medicine::Entity::find()
            .filter(medicine::Column::Stock.lte(threshold))
            .order_by_asc(medicine::Column::Stock)
            .all(&self.db)
            .await?;
        Ok(medicines)
    }

    /// Medicines expiring on or before the cutoff date, soonest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn expiring_soon(
        &self,
        cutoff: NaiveDate,
    ) -> Result<Vec<medicine::Model>, MedicineError> {
        let medicines = medicine::Entity::find()
            .filter(medicine::Column::ExpirationDate.lte(cutoff))
            .order_by_asc(medicine::Column::ExpirationDate)
            .all(&self.db)
            .await?;
        Ok(medicines)
    }

    /// Medicines matching either alert condition, for the alerts endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn alerts(
        &self,
        threshold: i32,
        cutoff: NaiveDate,
    ) -> Result<Vec<medicine::Model>, MedicineError> {
        let medicines = medicine::Entity::find()
            .filter(
                Condition::any()
                    .add(medicine::Column::Stock.lte(threshold))
                    .add(medicine::Column::ExpirationDate.lte(cutoff)),
            )
            .order_by_asc(medicine::Column::ExpirationDate)
            .order_by_asc(medicine::Column::Stock)
            .all(&self.db)
            .await?;
        Ok(medicines)
    }

    /// Aggregate inventory statistics for the stats endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn stats(
        &self,
        low_stock_threshold: i32,
        expiry_cutoff: NaiveDate,
    ) -> Result<InventoryStats, MedicineError> {
        let medicines = medicine::Entity::find().all(&self.db).await?;

        let mut total_stock: i64 = 0;
        let mut total_value = Decimal::ZERO;
        let mut low_stock_count: u64 = 0;
        let mut expiring_soon_count: u64 = 0;
        let mut categories = std::collections::HashSet::new();

        for m in &medicines {
            total_stock += i64::from(m.stock);
            total_value += m.price * Decimal::from(m.stock);
            if m.stock <= low_stock_threshold {
                low_stock_count += 1;
            }
            if m.expiration_date <= expiry_cutoff {
                expiring_soon_count += 1;
            }
            if let Some(category) = &m.category {
                categories.insert(category.clone());
            }
        }

        Ok(InventoryStats {
            total_products: medicines.len() as u64,
            total_stock,
            categories_count: categories.len() as u64,
            total_value,
            low_stock_count,
            expiring_soon_count,
        })
    }

    /// Distinct categories in use, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn categories(&self) -> Result<Vec<String>, MedicineError> {
        let rows: Vec<Option<String>> = medicine::Entity::find()
            .select_only()
            .column(medicine::Column::Category)
            .distinct()
            .filter(medicine::Column::Category.is_not_null())
            .order_by_asc(medicine::Column::Category)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().flatten().collect())
    }
}
