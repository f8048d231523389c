//! Medicine intake and update validation.

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use rust_decimal::Decimal;

use super::error::InventoryError;
use super::types::{MedicineDraft, MedicineUpdate};

/// Validates a new medicine before intake.
///
/// `today` is the validation date; expiration dates before it are rejected
/// (a same-day expiration is accepted).
///
/// # Errors
///
/// Returns `InventoryError` if validation fails.
pub fn validate_draft(draft: &MedicineDraft, today: NaiveDate) -> Result<(), InventoryError> {
    if draft.name.trim().is_empty() || draft.lot_number.trim().is_empty() {
        return Err(InventoryError::MissingNameOrLot);
    }
    if draft.stock < 0 {
        return Err(InventoryError::NegativeStock);
    }
    if draft.price < Decimal::ZERO {
        return Err(InventoryError::NegativePrice);
    }
    if draft.expiration_date < today {
        return Err(InventoryError::ExpirationInPast);
    }
    Ok(())
}

/// Validates the set fields of a medicine update.
///
/// Unset fields are left alone; set fields follow the same rules as intake.
///
/// # Errors
///
/// Returns `InventoryError` if any supplied field is invalid.
pub fn validate_update(update: &MedicineUpdate, today: NaiveDate) -> Result<(), InventoryError> {
    if let Some(stock) = update.stock {
        if stock < 0 {
            return Err(InventoryError::NegativeStock);
        }
    }
    if let Some(price) = update.price {
        if price < Decimal::ZERO {
            return Err(InventoryError::NegativePrice);
        }
    }
    if let Some(expiration) = update.expiration_date {
        if expiration < today {
            return Err(InventoryError::ExpirationInPast);
        }
    }
    Ok(())
}

const BARCODE_SUFFIX_LEN: usize = 6;

/// Generates a barcode for a medicine created without one.
///
/// Format: `MED-<unix millis>-<6 random uppercase alphanumerics>`, matching
/// the codes already circulating on printed labels.
#[must_use]
pub fn generate_barcode(now: DateTime<Utc>) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..BARCODE_SUFFIX_LEN)
        .map(|_| {
            let c = rng.sample(rand::distr::Alphanumeric) as char;
            c.to_ascii_uppercase()
        })
        .collect();

    format!("MED-{}-{}", now.timestamp_millis(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn draft() -> MedicineDraft {
        MedicineDraft {
            name: "Amoxicilina 500mg".to_string(),
            description: None,
            stock: 40,
            price: dec!(12.50),
            expiration_date: NaiveDate::from_ymd_opt(2099, 1, 1).unwrap(),
            lot_number: "L-2042".to_string(),
            category: Some("Antibióticos".to_string()),
            barcode: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
    }

    #[test]
    fn test_valid_draft_passes() {
        assert!(validate_draft(&draft(), today()).is_ok());
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut d = draft();
        d.name = "   ".to_string();
        assert_eq!(
            validate_draft(&d, today()).unwrap_err(),
            InventoryError::MissingNameOrLot
        );
    }

    #[test]
    fn test_blank_lot_rejected() {
        let mut d = draft();
        d.lot_number = String::new();
        assert_eq!(
            validate_draft(&d, today()).unwrap_err(),
            InventoryError::MissingNameOrLot
        );
    }

    #[test]
    fn test_negative_stock_rejected_with_spanish_message() {
        let mut d = draft();
        d.stock = -1;
        let err = validate_draft(&d, today()).unwrap_err();
        assert_eq!(err, InventoryError::NegativeStock);
        assert_eq!(err.to_string(), "El stock no puede ser negativo.");
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut d = draft();
        d.price = dec!(-0.01);
        assert_eq!(
            validate_draft(&d, today()).unwrap_err(),
            InventoryError::NegativePrice
        );
    }

    #[test]
    fn test_past_expiration_rejected_today_allowed() {
        let mut d = draft();
        d.expiration_date = today();
        assert!(validate_draft(&d, today()).is_ok());

        d.expiration_date = today().pred_opt().unwrap();
        assert_eq!(
            validate_draft(&d, today()).unwrap_err(),
            InventoryError::ExpirationInPast
        );
    }

    #[test]
    fn test_update_ignores_unset_fields() {
        let update = MedicineUpdate::default();
        assert!(update.is_empty());
        assert!(validate_update(&update, today()).is_ok());
    }

    #[test]
    fn test_update_checks_set_fields() {
        let update = MedicineUpdate {
            stock: Some(-5),
            ..MedicineUpdate::default()
        };
        assert_eq!(
            validate_update(&update, today()).unwrap_err(),
            InventoryError::NegativeStock
        );
    }

    #[test]
    fn test_barcode_format() {
        let now = Utc::now();
        let barcode = generate_barcode(now);
        let parts: Vec<&str> = barcode.split('-').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "MED");
        assert_eq!(parts[1], now.timestamp_millis().to_string());
        assert_eq!(parts[2].len(), BARCODE_SUFFIX_LEN);
        assert!(parts[2].chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }
}
