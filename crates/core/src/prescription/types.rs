//! Types for prescription issuance.

use botica_shared::types::{ClientId, MedicineId, UserId};

/// One prescribed medicine line.
#[derive(Debug, Clone)]
pub struct PrescriptionItemInput {
    /// Prescribed medicine.
    pub medicine_id: MedicineId,
    /// Prescribed units. Must be positive.
    pub quantity: i32,
}

/// Input for issuing a prescription.
#[derive(Debug, Clone)]
pub struct CreatePrescriptionInput {
    /// Client the prescription belongs to.
    pub client_id: ClientId,
    /// User issuing the prescription.
    pub issued_by: UserId,
    /// Role name of the issuing user, checked against the allowed-issuer set.
    pub issuer_role: String,
    /// Optional prescribing doctor name.
    pub doctor: Option<String>,
    /// Optional free-form notes.
    pub notes: Option<String>,
    /// Prescribed line items, in order.
    pub items: Vec<PrescriptionItemInput>,
}
