//! Money calculation for order totals using rust_decimal for precision
//!
//! All arithmetic is done on `Decimal` internally, then converted to `f64`
//! for storage/serialization with half-up rounding to 2 decimal places.

use rust_decimal::prelude::*;
use shared::models::order::LineItem;

use super::OrderError;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed unit price per item
const MAX_UNIT_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line item
const MAX_QUANTITY: i32 = 999;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Derived monetary fields of an order.
///
/// Invariant: `total == subtotal + delivery_fee`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub total: f64,
}

/// Validate a f64 value is finite (not NaN, not Infinity)
#[inline]
fn require_finite(value: f64, field_name: &str) -> Result<(), OrderError> {
    if !value.is_finite() {
        return Err(OrderError::InvalidLineItem(format!(
            "{} must be a finite number, got {}",
            field_name, value
        )));
    }
    Ok(())
}

/// Validate a line item before pricing
pub fn validate_line_item(item: &LineItem) -> Result<(), OrderError> {
    require_finite(item.unit_price, "unit price")?;
    if item.unit_price < 0.0 {
        return Err(OrderError::InvalidLineItem(format!(
            "unit price must be non-negative, got {}",
            item.unit_price
        )));
    }
    if item.unit_price > MAX_UNIT_PRICE {
        return Err(OrderError::InvalidLineItem(format!(
            "unit price exceeds maximum allowed ({}), got {}",
            MAX_UNIT_PRICE, item.unit_price
        )));
    }

    if item.quantity <= 0 {
        return Err(OrderError::InvalidLineItem(format!(
            "quantity must be positive, got {}",
            item.quantity
        )));
    }
    if item.quantity > MAX_QUANTITY {
        return Err(OrderError::InvalidLineItem(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, item.quantity
        )));
    }

    Ok(())
}

/// Compute order totals from line items.
///
/// `subtotal = Σ(unit_price × quantity)`; `total = subtotal + delivery_fee`.
/// Pickup orders carry no delivery fee regardless of the configured value.
///
/// Pure and deterministic: no side effects, same inputs always produce the
/// same totals.
pub fn compute_totals(
    line_items: &[LineItem],
    delivery_fee: f64,
    pickup: bool,
) -> Result<Totals, OrderError> {
    let mut subtotal = Decimal::ZERO;
    for item in line_items {
        validate_line_item(item)?;
        subtotal += to_decimal(item.unit_price) * Decimal::from(item.quantity);
    }

    let fee = if pickup {
        Decimal::ZERO
    } else {
        to_decimal(delivery_fee)
    };
    let total = subtotal + fee;

    Ok(Totals {
        subtotal: to_f64(subtotal),
        delivery_fee: to_f64(fee),
        total: to_f64(total),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: f64, qty: i32) -> LineItem {
        LineItem {
            id: "item".to_string(),
            name: "Item".to_string(),
            unit_price: price,
            quantity: qty,
            special_instructions: None,
            image_url: None,
        }
    }

    #[test]
    fn test_spec_scenario() {
        // items [{price:10,qty:2},{price:5,qty:1}], fee 3.99
        let totals = compute_totals(&[item(10.0, 2), item(5.0, 1)], 3.99, false).unwrap();
        assert_eq!(totals.subtotal, 25.0);
        assert_eq!(totals.delivery_fee, 3.99);
        assert_eq!(totals.total, 28.99);
    }

    #[test]
    fn test_pickup_forces_zero_fee() {
        let totals = compute_totals(&[item(10.0, 2)], 3.99, true).unwrap();
        assert_eq!(totals.delivery_fee, 0.0);
        assert_eq!(totals.total, totals.subtotal);
        assert_eq!(totals.total, 20.0);
    }

    #[test]
    fn test_total_invariant_holds() {
        let totals = compute_totals(&[item(8.5, 3), item(2.25, 2)], 2.5, false).unwrap();
        assert_eq!(totals.total, totals.subtotal + totals.delivery_fee);
    }

    #[test]
    fn test_empty_items_produce_zero_subtotal() {
        let totals = compute_totals(&[], 3.99, false).unwrap();
        assert_eq!(totals.subtotal, 0.0);
        assert_eq!(totals.total, 3.99);
    }

    #[test]
    fn test_decimal_precision() {
        // Classic floating point trap: 0.1 + 0.2 != 0.3 in f64
        let totals = compute_totals(&[item(0.1, 1), item(0.2, 1)], 0.0, false).unwrap();
        assert_eq!(totals.subtotal, 0.3);

        // 100 items at 0.01 sum to exactly 1.00
        let totals = compute_totals(&[item(0.01, 100)], 0.0, false).unwrap();
        assert_eq!(totals.subtotal, 1.0);
    }

    #[test]
    fn test_negative_price_rejected() {
        let err = compute_totals(&[item(-1.0, 1)], 0.0, false).unwrap_err();
        assert!(matches!(err, OrderError::InvalidLineItem(_)));
    }

    #[test]
    fn test_zero_and_negative_quantity_rejected() {
        assert!(matches!(
            compute_totals(&[item(10.0, 0)], 0.0, false),
            Err(OrderError::InvalidLineItem(_))
        ));
        assert!(matches!(
            compute_totals(&[item(10.0, -3)], 0.0, false),
            Err(OrderError::InvalidLineItem(_))
        ));
    }

    #[test]
    fn test_non_finite_price_rejected() {
        assert!(compute_totals(&[item(f64::NAN, 1)], 0.0, false).is_err());
        assert!(compute_totals(&[item(f64::INFINITY, 1)], 0.0, false).is_err());
    }

    #[test]
    fn test_bounds_rejected() {
        assert!(compute_totals(&[item(MAX_UNIT_PRICE + 1.0, 1)], 0.0, false).is_err());
        assert!(compute_totals(&[item(10.0, MAX_QUANTITY + 1)], 0.0, false).is_err());
    }

    #[test]
    fn test_zero_price_item_is_valid() {
        // Promotional freebies are legitimate line items
        let totals = compute_totals(&[item(0.0, 1), item(9.0, 1)], 1.0, false).unwrap();
        assert_eq!(totals.subtotal, 9.0);
        assert_eq!(totals.total, 10.0);
    }
}
