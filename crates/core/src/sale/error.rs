//! Sale validation errors.

use botica_shared::types::MedicineId;
use thiserror::Error;

/// Errors produced while validating and pricing a sale basket.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SaleError {
    /// The basket has no line items.
    #[error("No hay productos en la venta.")]
    EmptySale,

    /// A line item requested a non-positive quantity.
    #[error("La cantidad debe ser mayor que cero.")]
    InvalidQuantity {
        /// The offending medicine.
        medicine_id: MedicineId,
        /// The rejected quantity.
        quantity: i32,
    },

    /// No payment method was supplied.
    #[error("El método de pago es requerido.")]
    MissingPaymentMethod,

    /// A referenced medicine does not exist.
    #[error("Producto con ID {0} no encontrado")]
    MedicineNotFound(MedicineId),

    /// Requested quantity exceeds on-hand stock.
    #[error("Stock insuficiente para \"{name}\". Stock disponible: {available}")]
    InsufficientStock {
        /// Medicine display name.
        name: String,
        /// Units requested.
        requested: i32,
        /// Units available when observed.
        available: i32,
    },
}
