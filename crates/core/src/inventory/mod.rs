//! Medicine validation and stock/expiry alert rules.

pub mod alerts;
pub mod error;
pub mod types;
pub mod validation;

pub use alerts::{AlertKind, DEFAULT_EXPIRY_WINDOW_DAYS, DEFAULT_LOW_STOCK_THRESHOLD};
pub use error::InventoryError;
pub use types::{MedicineDraft, MedicineUpdate};
pub use validation::{generate_barcode, validate_draft, validate_update};
