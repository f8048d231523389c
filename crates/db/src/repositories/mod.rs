//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod audit;
pub mod client;
pub mod medicine;
pub mod prescription;
pub mod provider;
pub mod role;
pub mod sale;
pub mod session;
pub mod user;

pub use audit::{AuditFilter, AuditRepository};
pub use client::{ClientError, ClientInput, ClientRepository};
pub use medicine::{InventoryStats, MedicineError, MedicineFilter, MedicineRepository};
pub use prescription::{PrescriptionError, PrescriptionRepository, PrescriptionWithItems};
pub use provider::{ProviderError, ProviderInput, ProviderRepository};
pub use role::{RoleError, RoleRepository, RoleWithPermissions};
pub use sale::{
    CreateSaleInput, SaleError, SaleItemInput, SaleRepository, SaleWithItems, SalesSummary,
};
pub use session::SessionRepository;
pub use user::UserRepository;
