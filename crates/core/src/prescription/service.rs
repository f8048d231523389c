//! Prescription service for issuance validation.

use super::error::PrescriptionError;
use super::types::CreatePrescriptionInput;

/// Roles allowed to issue prescriptions.
///
/// The original system shipped two divergent rule sets for this check; this
/// implementation standardizes on admins and pharmacists.
pub const ALLOWED_ISSUER_ROLES: &[&str] = &["admin", "pharmacist"];

/// Prescription service for issuance validation.
///
/// Pure business logic: role gating and shape validation. Existence checks for
/// the client and each medicine happen inside the repository transaction so a
/// missing reference rolls the whole prescription back.
pub struct PrescriptionService;

impl PrescriptionService {
    /// Returns true if the given role name may issue prescriptions.
    #[must_use]
    pub fn is_allowed_issuer(role: &str) -> bool {
        ALLOWED_ISSUER_ROLES.contains(&role)
    }

    /// Validates a prescription before persisting.
    ///
    /// Checks, in order:
    /// 1. The issuer's role is in the allowed-issuer set
    /// 2. The prescription has at least one line item
    /// 3. Every line item quantity is positive
    ///
    /// # Errors
    ///
    /// Returns `PrescriptionError` if validation fails.
    pub fn validate(input: &CreatePrescriptionInput) -> Result<(), PrescriptionError> {
        if !Self::is_allowed_issuer(&input.issuer_role) {
            return Err(PrescriptionError::RoleNotAllowed(input.issuer_role.clone()));
        }

        if input.items.is_empty() {
            return Err(PrescriptionError::EmptyPrescription);
        }

        for item in &input.items {
            if item.quantity <= 0 {
                return Err(PrescriptionError::InvalidQuantity {
                    medicine_id: item.medicine_id,
                    quantity: item.quantity,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prescription::types::PrescriptionItemInput;
    use botica_shared::types::{ClientId, MedicineId, UserId};
    use rstest::rstest;

    fn make_input(role: &str, quantities: &[i32]) -> CreatePrescriptionInput {
        CreatePrescriptionInput {
            client_id: ClientId::new(),
            issued_by: UserId::new(),
            issuer_role: role.to_string(),
            doctor: Some("Dra. Peralta".to_string()),
            notes: None,
            items: quantities
                .iter()
                .map(|&quantity| PrescriptionItemInput {
                    medicine_id: MedicineId::new(),
                    quantity,
                })
                .collect(),
        }
    }

    #[rstest]
    #[case("admin", true)]
    #[case("pharmacist", true)]
    #[case("cashier", false)]
    #[case("viewer", false)]
    #[case("", false)]
    fn test_allowed_issuers(#[case] role: &str, #[case] allowed: bool) {
        assert_eq!(PrescriptionService::is_allowed_issuer(role), allowed);
    }

    #[test]
    fn test_valid_prescription_passes() {
        let input = make_input("pharmacist", &[1, 2]);
        assert!(PrescriptionService::validate(&input).is_ok());
    }

    #[test]
    fn test_disallowed_role_rejected() {
        let input = make_input("cashier", &[1]);
        assert_eq!(
            PrescriptionService::validate(&input).unwrap_err(),
            PrescriptionError::RoleNotAllowed("cashier".to_string())
        );
    }

    #[test]
    fn test_empty_prescription_rejected() {
        let input = make_input("admin", &[]);
        assert_eq!(
            PrescriptionService::validate(&input).unwrap_err(),
            PrescriptionError::EmptyPrescription
        );
    }

    #[test]
    fn test_non_positive_quantity_rejected() {
        let input = make_input("admin", &[1, 0]);
        assert!(matches!(
            PrescriptionService::validate(&input),
            Err(PrescriptionError::InvalidQuantity { quantity: 0, .. })
        ));
    }

    #[test]
    fn test_role_check_runs_before_shape_checks() {
        // An empty prescription from a disallowed role reports the role error.
        let input = make_input("cashier", &[]);
        assert!(matches!(
            PrescriptionService::validate(&input),
            Err(PrescriptionError::RoleNotAllowed(_))
        ));
    }
}
