//! Sale repository: the transactional write path for point-of-sale.
//!
//! A sale is committed in a single database transaction: every line item
//! decrements stock through the locked ledger operation, then the sale row
//! and its items are inserted. Any failure rolls the whole sale back, so
//! partial decrements never survive.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{medicine, sale_items, sales, sea_orm_active_enums::SaleStatus};
use crate::repositories::medicine::{MedicineError, MedicineRepository};

/// Error types for sale operations.
#[derive(Debug, thiserror::Error)]
pub enum SaleError {
    /// Sale not found.
    #[error("Sale not found: {0}")]
    NotFound(Uuid),

    /// A basket line referenced a missing medicine.
    #[error("Producto con ID {0} no encontrado")]
    MedicineNotFound(Uuid),

    /// A basket line exceeded the locked row's stock.
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

    /// The sale is already cancelled.
    #[error("La factura ya está cancelada.")]
    AlreadyCancelled(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<MedicineError> for SaleError {
    fn from(err: MedicineError) -> Self {
        match err {
            MedicineError::NotFound(id) => Self::MedicineNotFound(id),
            MedicineError::InsufficientStock {
                medicine_id,
                name,
                requested,
                available,
            } => Self::InsufficientStock {
                medicine_id,
                name,
                requested,
                available,
            },
            MedicineError::Database(e) => Self::Database(e),
            // Barcode and delete guards cannot surface on the sale path.
            other => Self::Database(DbErr::Custom(other.to_string())),
        }
    }
}

/// Input for creating a sale.
#[derive(Debug, Clone)]
pub struct CreateSaleInput {
    /// User ringing up the sale.
    pub user_id: Uuid,
    /// Optional client the sale is attributed to.
    pub client_id: Option<Uuid>,
    /// Payment method.
    pub payment_method: String,
    /// Requested line items, in basket order.
    pub items: Vec<SaleItemInput>,
}

/// One requested line item.
#[derive(Debug, Clone, Copy)]
pub struct SaleItemInput {
    /// Medicine being sold.
    pub medicine_id: Uuid,
    /// Units requested.
    pub quantity: i32,
}

/// A sale with its line items.
#[derive(Debug, Clone)]
pub struct SaleWithItems {
    /// Sale header.
    pub sale: sales::Model,
    /// Line items with medicine names captured at read time.
    pub items: Vec<SaleItemWithName>,
}

/// A sale line item with the medicine's display name.
#[derive(Debug, Clone)]
pub struct SaleItemWithName {
    /// Line item row.
    pub item: sale_items::Model,
    /// Medicine display name.
    pub medicine_name: String,
}

/// Today's sales summary grouped by payment method.
#[derive(Debug, Clone)]
pub struct SalesSummary {
    /// Total of non-cancelled sales today.
    pub total_sales: Decimal,
    /// Number of non-cancelled sales today.
    pub total_transactions: u64,
    /// Per-payment-method totals, sorted by method name.
    pub by_payment_method: Vec<(String, Decimal)>,
}

/// Sale repository for the transactional write path and read paths.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    db: DatabaseConnection,
}

impl SaleRepository {
    /// Creates a new sale repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Commits a sale: locked stock decrements, sale row, and line items in
    /// one transaction.
    ///
    /// Unit prices are captured from the locked medicine rows at commit time;
    /// the total is the exact sum of line subtotals.
    ///
    /// # Errors
    ///
    /// Returns `MedicineNotFound` or `InsufficientStock` (both roll the
    /// transaction back) or a database error.
    pub async fn create_sale(&self, input: CreateSaleInput) -> Result<SaleWithItems, SaleError> {
        let txn = self.db.begin().await?;

        // Lock rows in medicine-id order so two baskets holding the same
        // medicines in different order cannot deadlock. Line items are still
        // persisted in basket order.
        let mut lock_order: Vec<usize> = (0..input.items.len()).collect();
        lock_order.sort_by_key(|&i| input.items[i].medicine_id);

        let mut priced: Vec<Option<(medicine::Model, i32, Decimal)>> =
            (0..input.items.len()).map(|_| None).collect();
        let mut total = Decimal::ZERO;

        for &i in &lock_order {
            let item = &input.items[i];
            let locked =
                MedicineRepository::reserve_and_decrement(&txn, item.medicine_id, item.quantity)
                    .await?;

            let subtotal = locked.price * Decimal::from(item.quantity);
            total += subtotal;
            priced[i] = Some((locked, item.quantity, subtotal));
        }

        let now = Utc::now().into();
        let sale_id = Uuid::new_v4();

        let sale = sales::ActiveModel {
            id: Set(sale_id),
            user_id: Set(input.user_id),
            client_id: Set(input.client_id),
            total: Set(total),
            payment_method: Set(input.payment_method.clone()),
            status: Set(SaleStatus::Completed),
            created_at: Set(now),
            cancelled_at: Set(None),
        }
        .insert(&txn)
        .await?;

        let mut items = Vec::with_capacity(priced.len());
        for (medicine_row, quantity, subtotal) in priced.into_iter().flatten() {
            let item = sale_items::ActiveModel {
                id: Set(Uuid::new_v4()),
                sale_id: Set(sale_id),
                medicine_id: Set(medicine_row.id),
                quantity: Set(quantity),
                unit_price: Set(medicine_row.price),
                total_price: Set(subtotal),
            }
            .insert(&txn)
            .await?;

            items.push(SaleItemWithName {
                item,
                medicine_name: medicine_row.name,
            });
        }

        txn.commit().await?;

        Ok(SaleWithItems { sale, items })
    }

    /// Lists sales, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_sales(&self) -> Result<Vec<sales::Model>, SaleError> {
        let sales = sales::Entity::find()
            .order_by_desc(sales::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(sales)
    }

    /// Gets a sale with its line items and medicine names.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the sale does not exist.
    pub async fn get_sale(&self, sale_id: Uuid) -> Result<SaleWithItems, SaleError> {
        let sale = sales::Entity::find_by_id(sale_id)
            .one(&self.db)
            .await?
            .ok_or(SaleError::NotFound(sale_id))?;

        let items = self.load_items(sale_id).await?;

        Ok(SaleWithItems { sale, items })
    }

    /// Cancels a sale and restores the stock of every line item, in one
    /// transaction. Cancelling twice is rejected.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `AlreadyCancelled`.
    pub async fn cancel_sale(&self, sale_id: Uuid) -> Result<SaleWithItems, SaleError> {
        let txn = self.db.begin().await?;

        let sale = sales::Entity::find_by_id(sale_id)
            .one(&txn)
            .await?
            .ok_or(SaleError::NotFound(sale_id))?;

        if sale.status == SaleStatus::Cancelled {
            return Err(SaleError::AlreadyCancelled(sale_id));
        }

        let items = sale_items::Entity::find()
            .filter(sale_items::Column::SaleId.eq(sale_id))
            .all(&txn)
            .await?;

        for item in &items {
            MedicineRepository::restore_stock(&txn, item.medicine_id, item.quantity).await?;
        }

        let mut active: sales::ActiveModel = sale.into();
        active.status = Set(SaleStatus::Cancelled);
        active.cancelled_at = Set(Some(Utc::now().into()));
        let cancelled = active.update(&txn).await?;

        txn.commit().await?;

        let items = self.load_items(sale_id).await?;
        Ok(SaleWithItems {
            sale: cancelled,
            items,
        })
    }

    /// Today's non-cancelled sales summarized by payment method.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn today_summary(&self) -> Result<SalesSummary, SaleError> {
        let today_start = Utc::now()
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .unwrap_or_default()
            .and_utc();

        let sales = sales::Entity::find()
            .filter(sales::Column::CreatedAt.gte(today_start))
            .filter(sales::Column::Status.ne(SaleStatus::Cancelled))
            .all(&self.db)
            .await?;

        let mut total_sales = Decimal::ZERO;
        let mut by_method = std::collections::BTreeMap::<String, Decimal>::new();

        for sale in &sales {
            total_sales += sale.total;
            *by_method.entry(sale.payment_method.clone()).or_default() += sale.total;
        }

        Ok(SalesSummary {
            total_sales,
            total_transactions: sales.len() as u64,
            by_payment_method: by_method.into_iter().collect(),
        })
    }

    /// Units sold today across all non-cancelled sales.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn products_sold_today(&self) -> Result<i64, SaleError> {
        let today_start = Utc::now()
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .unwrap_or_default()
            .and_utc();

        let rows: Vec<(sale_items::Model, Option<sales::Model>)> = sale_items::Entity::find()
            .find_also_related(sales::Entity)
            .filter(sales::Column::CreatedAt.gte(today_start))
            .filter(sales::Column::Status.ne(SaleStatus::Cancelled))
            .all(&self.db)
            .await?;

        Ok(rows.iter().map(|(item, _)| i64::from(item.quantity)).sum())
    }

    /// Distinct clients served today (sales with a client attached).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn clients_served_today(&self) -> Result<u64, SaleError> {
        let today_start = Utc::now()
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .unwrap_or_default()
            .and_utc();

        let sales = sales::Entity::find()
            .filter(sales::Column::CreatedAt.gte(today_start))
            .filter(sales::Column::Status.ne(SaleStatus::Cancelled))
            .all(&self.db)
            .await?;

        let clients: std::collections::HashSet<Uuid> =
            sales.iter().filter_map(|s| s.client_id).collect();
        Ok(clients.len() as u64)
    }

    /// Loads line items for a sale with medicine names.
    async fn load_items(&self, sale_id: Uuid) -> Result<Vec<SaleItemWithName>, SaleError> {
        let rows: Vec<(sale_items::Model, Option<medicine::Model>)> = sale_items::Entity::find()
            .find_also_related(medicine::Entity)
            .filter(sale_items::Column::SaleId.eq(sale_id))
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(item, med)| SaleItemWithName {
                medicine_name: med.map(|m| m.name).unwrap_or_default(),
                item,
            })
            .collect())
    }
}
