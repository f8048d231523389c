//! Point-of-sale basket validation and pricing.
//!
//! The sale service validates a basket of line items against observed stock,
//! captures the unit price at sale time, and computes the total. The
//! authoritative stock check happens again inside the database transaction
//! with a row lock; the logic here rejects baskets that cannot succeed and
//! produces the priced line items to persist.

pub mod error;
pub mod service;
pub mod types;

pub use error::SaleError;
pub use service::SaleService;
pub use types::{CreateSaleInput, MedicineSnapshot, PricedItem, PricedSale, SaleItemInput};
