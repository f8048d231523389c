//! Sale service for basket validation and pricing.

use rust_decimal::Decimal;

use super::error::SaleError;
use super::types::{CreateSaleInput, MedicineSnapshot, PricedItem, PricedSale};

/// Sale service for basket validation and pricing.
///
/// This service contains pure business logic with no database dependencies.
/// The caller injects a medicine lookup; persistence and the locked stock
/// re-check happen in the repository layer.
pub struct SaleService;

impl SaleService {
    /// Validate and price a sale basket before persisting.
    ///
    /// Performs all validation and pricing steps:
    /// 1. Rejects empty baskets and missing payment methods
    /// 2. Rejects zero or negative quantities
    /// 3. Resolves each medicine through the injected lookup
    /// 4. Rejects quantities exceeding the observed stock
    /// 5. Captures the unit price at sale time and computes subtotals
    /// 6. Sums the basket total
    ///
    /// The stock check here is advisory: the repository re-checks under a row
    /// lock inside the sale transaction, so a basket that passes here can
    /// still fail at commit time if a concurrent sale drained the stock.
    ///
    /// # Errors
    ///
    /// Returns `SaleError` if validation fails.
    pub fn validate_and_price<L>(
        input: &CreateSaleInput,
        medicine_lookup: L,
    ) -> Result<PricedSale, SaleError>
    where
        L: Fn(botica_shared::types::MedicineId) -> Result<MedicineSnapshot, SaleError>,
    {
        if input.items.is_empty() {
            return Err(SaleError::EmptySale);
        }
        if input.payment_method.trim().is_empty() {
            return Err(SaleError::MissingPaymentMethod);
        }

        let mut items = Vec::with_capacity(input.items.len());
        let mut total = Decimal::ZERO;

        for item in &input.items {
            if item.quantity <= 0 {
                return Err(SaleError::InvalidQuantity {
                    medicine_id: item.medicine_id,
                    quantity: item.quantity,
                });
            }

            let medicine = medicine_lookup(item.medicine_id)?;

            if medicine.stock < item.quantity {
                return Err(SaleError::InsufficientStock {
                    name: medicine.name,
                    requested: item.quantity,
                    available: medicine.stock,
                });
            }

            let subtotal = medicine.price * Decimal::from(item.quantity);
            total += subtotal;

            items.push(PricedItem {
                medicine_id: medicine.id,
                name: medicine.name,
                quantity: item.quantity,
                unit_price: medicine.price,
                subtotal,
            });
        }

        Ok(PricedSale { items, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use botica_shared::types::{MedicineId, UserId};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn make_input(items: Vec<(MedicineId, i32)>) -> CreateSaleInput {
        CreateSaleInput {
            user_id: UserId::new(),
            client_id: None,
            payment_method: "efectivo".to_string(),
            items: items
                .into_iter()
                .map(|(medicine_id, quantity)| super::super::types::SaleItemInput {
                    medicine_id,
                    quantity,
                })
                .collect(),
        }
    }

    fn shelf(entries: &[(MedicineId, &str, i32, Decimal)]) -> HashMap<MedicineId, MedicineSnapshot> {
        entries
            .iter()
            .map(|(id, name, stock, price)| {
                (
                    *id,
                    MedicineSnapshot {
                        id: *id,
                        name: (*name).to_string(),
                        stock: *stock,
                        price: *price,
                    },
                )
            })
            .collect()
    }

    fn lookup_in(
        shelf: HashMap<MedicineId, MedicineSnapshot>,
    ) -> impl Fn(MedicineId) -> Result<MedicineSnapshot, SaleError> {
        move |id| shelf.get(&id).cloned().ok_or(SaleError::MedicineNotFound(id))
    }

    #[test]
    fn test_prices_basket_and_sums_total() {
        let amoxicillin = MedicineId::new();
        let ibuprofen = MedicineId::new();
        let shelf = shelf(&[
            (amoxicillin, "Amoxicilina 500mg", 20, dec!(12.50)),
            (ibuprofen, "Ibuprofeno 400mg", 8, dec!(4.75)),
        ]);

        let input = make_input(vec![(amoxicillin, 2), (ibuprofen, 3)]);
        let priced = SaleService::validate_and_price(&input, lookup_in(shelf)).unwrap();

        assert_eq!(priced.items.len(), 2);
        assert_eq!(priced.items[0].subtotal, dec!(25.00));
        assert_eq!(priced.items[1].subtotal, dec!(14.25));
        assert_eq!(priced.total, dec!(39.25));
    }

    #[test]
    fn test_captures_price_at_sale_time() {
        let id = MedicineId::new();
        let shelf = shelf(&[(id, "Loratadina", 5, dec!(3.10))]);

        let input = make_input(vec![(id, 1)]);
        let priced = SaleService::validate_and_price(&input, lookup_in(shelf)).unwrap();

        assert_eq!(priced.items[0].unit_price, dec!(3.10));
    }

    #[test]
    fn test_empty_basket_rejected() {
        let input = make_input(vec![]);
        let result = SaleService::validate_and_price(&input, |id| {
            Err(SaleError::MedicineNotFound(id))
        });
        assert_eq!(result.unwrap_err(), SaleError::EmptySale);
    }

    #[test]
    fn test_missing_payment_method_rejected() {
        let id = MedicineId::new();
        let shelf = shelf(&[(id, "Paracetamol", 5, dec!(1.00))]);
        let mut input = make_input(vec![(id, 1)]);
        input.payment_method = "  ".to_string();

        let result = SaleService::validate_and_price(&input, lookup_in(shelf));
        assert_eq!(result.unwrap_err(), SaleError::MissingPaymentMethod);
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let id = MedicineId::new();
        let shelf = shelf(&[(id, "Paracetamol", 5, dec!(1.00))]);
        let input = make_input(vec![(id, 0)]);

        let result = SaleService::validate_and_price(&input, lookup_in(shelf));
        assert!(matches!(result, Err(SaleError::InvalidQuantity { .. })));
    }

    #[test]
    fn test_unknown_medicine_rejected() {
        let known = MedicineId::new();
        let unknown = MedicineId::new();
        let shelf = shelf(&[(known, "Paracetamol", 5, dec!(1.00))]);
        let input = make_input(vec![(known, 1), (unknown, 1)]);

        let result = SaleService::validate_and_price(&input, lookup_in(shelf));
        assert_eq!(result.unwrap_err(), SaleError::MedicineNotFound(unknown));
    }

    #[test]
    fn test_insufficient_stock_rejected() {
        let id = MedicineId::new();
        let shelf = shelf(&[(id, "Amoxicilina 500mg", 2, dec!(12.50))]);
        let input = make_input(vec![(id, 3)]);

        let result = SaleService::validate_and_price(&input, lookup_in(shelf));
        match result {
            Err(SaleError::InsufficientStock {
                name,
                requested,
                available,
            }) => {
                assert_eq!(name, "Amoxicilina 500mg");
                assert_eq!(requested, 3);
                assert_eq!(available, 2);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
    }

    #[test]
    fn test_quantity_equal_to_stock_allowed() {
        let id = MedicineId::new();
        let shelf = shelf(&[(id, "Omeprazol", 3, dec!(10.00))]);
        let input = make_input(vec![(id, 3)]);

        let priced = SaleService::validate_and_price(&input, lookup_in(shelf)).unwrap();
        assert_eq!(priced.total, dec!(30.00));
    }

    proptest! {
        /// For any valid basket, the total equals the sum of line subtotals
        /// and every subtotal equals quantity times unit price.
        #[test]
        fn prop_total_is_sum_of_subtotals(
            lines in proptest::collection::vec((1i32..100, 1i64..100_000), 1..10)
        ) {
            let entries: Vec<(MedicineId, String, i32, Decimal)> = lines
                .iter()
                .map(|(qty, cents)| {
                    (MedicineId::new(), format!("med-{cents}"), *qty, Decimal::new(*cents, 2))
                })
                .collect();

            let shelf: HashMap<MedicineId, MedicineSnapshot> = entries
                .iter()
                .map(|(id, name, qty, price)| {
                    (*id, MedicineSnapshot {
                        id: *id,
                        name: name.clone(),
                        stock: *qty,
                        price: *price,
                    })
                })
                .collect();

            let input = make_input(entries.iter().map(|(id, _, qty, _)| (*id, *qty)).collect());
            let priced = SaleService::validate_and_price(&input, lookup_in(shelf)).unwrap();

            let expected: Decimal = priced.items.iter().map(|i| i.subtotal).sum();
            prop_assert_eq!(priced.total, expected);

            for item in &priced.items {
                prop_assert_eq!(item.subtotal, item.unit_price * Decimal::from(item.quantity));
            }
        }
    }
}
