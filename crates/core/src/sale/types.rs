//! Types for sale validation and pricing.

use botica_shared::types::{ClientId, MedicineId, UserId};
use rust_decimal::Decimal;

/// One requested line item in a sale basket.
#[derive(Debug, Clone)]
pub struct SaleItemInput {
    /// Medicine being sold.
    pub medicine_id: MedicineId,
    /// Units requested. Must be positive.
    pub quantity: i32,
}

/// Input for creating a sale.
#[derive(Debug, Clone)]
pub struct CreateSaleInput {
    /// User ringing up the sale.
    pub user_id: UserId,
    /// Optional client the sale is attributed to (walk-in sales have none).
    pub client_id: Option<ClientId>,
    /// Payment method (e.g. "efectivo", "tarjeta").
    pub payment_method: String,
    /// Requested line items, in basket order.
    pub items: Vec<SaleItemInput>,
}

/// Observed state of a medicine at pricing time.
///
/// Produced by the lookup injected into [`super::SaleService::validate_and_price`].
#[derive(Debug, Clone)]
pub struct MedicineSnapshot {
    /// Medicine ID.
    pub id: MedicineId,
    /// Display name, used in error messages.
    pub name: String,
    /// On-hand quantity at observation time.
    pub stock: i32,
    /// Current unit price.
    pub price: Decimal,
}

/// A validated, priced line item ready to persist.
#[derive(Debug, Clone)]
pub struct PricedItem {
    /// Medicine being sold.
    pub medicine_id: MedicineId,
    /// Medicine display name at sale time.
    pub name: String,
    /// Units sold.
    pub quantity: i32,
    /// Unit price captured at sale time.
    pub unit_price: Decimal,
    /// `quantity * unit_price`.
    pub subtotal: Decimal,
}

/// A fully priced sale basket.
#[derive(Debug, Clone)]
pub struct PricedSale {
    /// Priced line items, in basket order.
    pub items: Vec<PricedItem>,
    /// Sum of all line item subtotals.
    pub total: Decimal,
}
