//! Prescription issuance rules.
//!
//! A prescription records what was prescribed to a client, not what was
//! dispensed. Issuing one never touches stock; dispensing happens through a
//! subsequent sale.

pub mod error;
pub mod service;
pub mod types;

pub use error::PrescriptionError;
pub use service::PrescriptionService;
pub use types::{CreatePrescriptionInput, PrescriptionItemInput};
