//! `SeaORM` Entity for the medicine table (stock-keeping units).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "medicine")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// On-hand quantity. Guarded by `CHECK (stock >= 0)` in the schema.
    pub stock: i32,
    pub price: Decimal,
    pub expiration_date: Date,
    pub lot_number: String,
    pub category: Option<String>,
    #[sea_orm(unique)]
    pub barcode: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sale_items::Entity")]
    SaleItems,
    #[sea_orm(has_many = "super::prescription_medicines::Entity")]
    PrescriptionMedicines,
}

impl Related<super::sale_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SaleItems.def()
    }
}

impl Related<super::prescription_medicines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PrescriptionMedicines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
