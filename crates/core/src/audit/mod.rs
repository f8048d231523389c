//! Audit action tags.
//!
//! Every state-changing action records one of these tags in the audit log,
//! attributed to the acting user (or to the system when no actor exists).

use std::fmt;

/// Action tag recorded with each audit log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditAction {
    /// Successful login.
    Login,
    /// Sale committed.
    SaleCreate,
    /// Sale cancelled, stock restored.
    SaleCancel,
    /// Medicine created via inventory intake.
    MedicineCreate,
    /// Medicine fields updated.
    MedicineUpdate,
    /// Medicine removed from inventory.
    MedicineDelete,
    /// Stock incremented by a restock.
    MedicineRestock,
    /// Prescription issued.
    PrescriptionCreate,
    /// Prescription removed.
    PrescriptionDelete,
    /// Client created.
    ClientCreate,
    /// Client updated.
    ClientUpdate,
    /// Client removed.
    ClientDelete,
    /// Provider created.
    ProviderCreate,
    /// Provider updated.
    ProviderUpdate,
    /// Provider removed.
    ProviderDelete,
    /// Role created with its permissions.
    RoleCreate,
    /// Role and its permissions rewritten.
    RoleUpdate,
    /// Role deleted (permissions cascade).
    RoleDelete,
    /// User account created.
    UserCreate,
    /// User account deactivated.
    UserDeactivate,
    /// Database backup created.
    BackupCreate,
    /// Backup file deleted.
    BackupDelete,
}

impl AuditAction {
    /// Returns the stable tag stored in the `audit_log.action` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "LOGIN",
            Self::SaleCreate => "SALE_CREATE",
            Self::SaleCancel => "SALE_CANCEL",
            Self::MedicineCreate => "MEDICINE_CREATE",
            Self::MedicineUpdate => "MEDICINE_UPDATE",
            Self::MedicineDelete => "MEDICINE_DELETE",
            Self::MedicineRestock => "MEDICINE_RESTOCK",
            Self::PrescriptionCreate => "PRESCRIPTION_CREATE",
            Self::PrescriptionDelete => "PRESCRIPTION_DELETE",
            Self::ClientCreate => "CLIENT_CREATE",
            Self::ClientUpdate => "CLIENT_UPDATE",
            Self::ClientDelete => "CLIENT_DELETE",
            Self::ProviderCreate => "PROVIDER_CREATE",
            Self::ProviderUpdate => "PROVIDER_UPDATE",
            Self::ProviderDelete => "PROVIDER_DELETE",
            Self::RoleCreate => "ROLE_CREATE",
            Self::RoleUpdate => "ROLE_UPDATE",
            Self::RoleDelete => "ROLE_DELETE",
            Self::UserCreate => "USER_CREATE",
            Self::UserDeactivate => "USER_DEACTIVATE",
            Self::BackupCreate => "BACKUP_CREATE",
            Self::BackupDelete => "BACKUP_DELETE",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_are_upper_snake() {
        for action in [
            AuditAction::Login,
            AuditAction::SaleCreate,
            AuditAction::RoleDelete,
            AuditAction::BackupCreate,
        ] {
            let tag = action.as_str();
            assert!(!tag.is_empty());
            assert!(
                tag.chars().all(|c| c.is_ascii_uppercase() || c == '_'),
                "tag {tag} is not UPPER_SNAKE"
            );
        }
    }

    #[test]
    fn test_display_matches_tag() {
        assert_eq!(AuditAction::SaleCancel.to_string(), "SALE_CANCEL");
    }
}
