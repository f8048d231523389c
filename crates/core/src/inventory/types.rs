//! Types for inventory intake and updates.

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Fields for creating a medicine.
#[derive(Debug, Clone)]
pub struct MedicineDraft {
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Initial on-hand quantity.
    pub stock: i32,
    /// Unit price.
    pub price: Decimal,
    /// Expiration date of the lot.
    pub expiration_date: NaiveDate,
    /// Lot number.
    pub lot_number: String,
    /// Optional category.
    pub category: Option<String>,
    /// Optional barcode; generated when absent.
    pub barcode: Option<String>,
}

/// Partial fields for updating a medicine. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct MedicineUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New on-hand quantity.
    pub stock: Option<i32>,
    /// New unit price.
    pub price: Option<Decimal>,
    /// New expiration date.
    pub expiration_date: Option<NaiveDate>,
    /// New lot number.
    pub lot_number: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New barcode.
    pub barcode: Option<String>,
}

impl MedicineUpdate {
    /// Returns true when no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.stock.is_none()
            && self.price.is_none()
            && self.expiration_date.is_none()
            && self.lot_number.is_none()
            && self.category.is_none()
            && self.barcode.is_none()
    }
}
