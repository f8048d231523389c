//! Prescription repository: transactional issuance and read paths.
//!
//! A prescription and its line items are written in one transaction; a
//! missing client or medicine rolls everything back so orphan prescription
//! rows never persist. Issuing a prescription never touches stock.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use uuid::Uuid;

use botica_core::prescription::CreatePrescriptionInput;

use crate::entities::{clients, medicine, prescription_medicines, prescriptions};

/// Error types for prescription operations.
#[derive(Debug, thiserror::Error)]
pub enum PrescriptionError {
    /// Prescription not found.
    #[error("Receta no encontrada")]
    NotFound(Uuid),

    /// The referenced client does not exist.
    #[error("Cliente no encontrado: {0}")]
    ClientNotFound(Uuid),

    /// A line referenced a missing medicine.
    #[error("Medicamento no encontrado: {0}")]
    MedicineNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// A prescription with its line items.
#[derive(Debug, Clone)]
pub struct PrescriptionWithItems {
    /// Prescription header.
    pub prescription: prescriptions::Model,
    /// Line items with medicine names.
    pub items: Vec<PrescriptionItemWithName>,
}

/// A prescription line item with the medicine's display name.
#[derive(Debug, Clone)]
pub struct PrescriptionItemWithName {
    /// Line item row.
    pub item: prescription_medicines::Model,
    /// Medicine display name.
    pub medicine_name: String,
}

/// Prescription repository.
#[derive(Debug, Clone)]
pub struct PrescriptionRepository {
    db: DatabaseConnection,
}

impl PrescriptionRepository {
    /// Creates a new prescription repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Issues a prescription with its line items in one transaction.
    ///
    /// The input must already have passed
    /// [`botica_core::prescription::PrescriptionService::validate`]; this
    /// method adds the existence checks that need the database.
    ///
    /// # Errors
    ///
    /// Returns `ClientNotFound` or `MedicineNotFound`; either rolls the whole
    /// prescription back.
    pub async fn create(
        &self,
        input: &CreatePrescriptionInput,
    ) -> Result<PrescriptionWithItems, PrescriptionError> {
        let client_id = input.client_id.into_inner();

        let txn = self.db.begin().await?;

        clients::Entity::find_by_id(client_id)
            .one(&txn)
            .await?
            .ok_or(PrescriptionError::ClientNotFound(client_id))?;

        let now = Utc::now().into();
        let prescription_id = Uuid::new_v4();

        let prescription = prescriptions::ActiveModel {
            id: Set(prescription_id),
            client_id: Set(client_id),
            issued_by: Set(input.issued_by.into_inner()),
            doctor: Set(input.doctor.clone()),
            notes: Set(input.notes.clone()),
            issued_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let mut items = Vec::with_capacity(input.items.len());
        for line in &input.items {
            let medicine_id = line.medicine_id.into_inner();

            let med = medicine::Entity::find_by_id(medicine_id)
                .one(&txn)
                .await?
                .ok_or(PrescriptionError::MedicineNotFound(medicine_id))?;

            let item = prescription_medicines::ActiveModel {
                id: Set(Uuid::new_v4()),
                prescription_id: Set(prescription_id),
                medicine_id: Set(medicine_id),
                quantity: Set(line.quantity),
            }
            .insert(&txn)
            .await?;

            items.push(PrescriptionItemWithName {
                item,
                medicine_name: med.name,
            });
        }

        txn.commit().await?;

        Ok(PrescriptionWithItems {
            prescription,
            items,
        })
    }

    /// Lists prescriptions with client names, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
    ) -> Result<Vec<(prescriptions::Model, Option<clients::Model>)>, PrescriptionError> {
        let rows = prescriptions::Entity::find()
            .find_also_related(clients::Entity)
            .order_by_desc(prescriptions::Column::IssuedAt)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Gets a prescription with its line items.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the prescription does not exist.
    pub async fn get(&self, id: Uuid) -> Result<PrescriptionWithItems, PrescriptionError> {
        let prescription = prescriptions::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(PrescriptionError::NotFound(id))?;

        let rows: Vec<(prescription_medicines::Model, Option<medicine::Model>)> =
            prescription_medicines::Entity::find()
                .find_also_related(medicine::Entity)
                .filter(prescription_medicines::Column::PrescriptionId.eq(id))
                .all(&self.db)
                .await?;

        let items = rows
            .into_iter()
            .map(|(item, med)| PrescriptionItemWithName {
                medicine_name: med.map(|m| m.name).unwrap_or_default(),
                item,
            })
            .collect();

        Ok(PrescriptionWithItems {
            prescription,
            items,
        })
    }

    /// Deletes a prescription; line items cascade.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the prescription does not exist.
    pub async fn delete(&self, id: Uuid) -> Result<(), PrescriptionError> {
        let existing = prescriptions::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(PrescriptionError::NotFound(id))?;

        prescriptions::Entity::delete_by_id(existing.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
