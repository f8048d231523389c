//! Prescription validation errors.

use botica_shared::types::MedicineId;
use thiserror::Error;

/// Errors produced while validating a prescription.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PrescriptionError {
    /// The issuing user's role is not allowed to issue prescriptions.
    #[error("El rol \"{0}\" no puede emitir recetas.")]
    RoleNotAllowed(String),

    /// The prescription has no line items.
    #[error("Debe incluir al menos un medicamento")]
    EmptyPrescription,

    /// A line item requested a non-positive quantity.
    #[error("La cantidad debe ser mayor que cero.")]
    InvalidQuantity {
        /// The offending medicine.
        medicine_id: MedicineId,
        /// The rejected quantity.
        quantity: i32,
    },
}
