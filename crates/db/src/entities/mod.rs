//! `SeaORM` entity definitions for the Botica schema.

pub mod audit_log;
pub mod clients;
pub mod medicine;
pub mod permissions;
pub mod prescription_medicines;
pub mod prescriptions;
pub mod providers;
pub mod roles;
pub mod sale_items;
pub mod sales;
pub mod sea_orm_active_enums;
pub mod sessions;
pub mod users;
