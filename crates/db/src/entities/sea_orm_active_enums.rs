//! `SeaORM` active enums mapped to Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sale lifecycle status.
///
/// A sale is created in its terminal `completed` state; the only transition is
/// an administrative cancellation that restores stock.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "sale_status")]
pub enum SaleStatus {
    /// Committed sale.
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Cancelled by an administrator; stock restored.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}
