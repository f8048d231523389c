//! Inventory validation errors.
//!
//! Messages are the user-facing Spanish texts shown in the point-of-sale UI.

use thiserror::Error;

/// Errors produced while validating medicine intake or updates.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InventoryError {
    /// Name or lot number missing.
    #[error("El nombre y el lote son requeridos.")]
    MissingNameOrLot,

    /// Negative stock supplied.
    #[error("El stock no puede ser negativo.")]
    NegativeStock,

    /// Negative price supplied.
    #[error("El precio no puede ser negativo.")]
    NegativePrice,

    /// Expiration date earlier than today.
    #[error("La fecha de expiración no puede ser anterior a hoy.")]
    ExpirationInPast,

    /// A restock must add at least one unit.
    #[error("La cantidad debe ser mayor que cero.")]
    InvalidRestockQuantity,
}
