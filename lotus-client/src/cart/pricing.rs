//! Order total calculation
//!
//! Pure computation from cart lines and an optional voucher. No
//! network calls, no lifecycle: totals are recomputed from scratch on
//! every call and never cached across mutations. Uses rust_decimal
//! internally, stores as f64.

use rust_decimal::prelude::*;
use shared::models::{DiscountType, Voucher};

use super::CartItem;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
#[inline]
fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Computed order totals
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    /// Sum of quantity × unit price over all lines
    pub subtotal: f64,
    /// Voucher discount actually applied
    pub discount: f64,
    /// `max(0, subtotal - discount)`
    pub total: f64,
}

/// Compute totals for the given lines and optional voucher
///
/// PERCENT vouchers discount `subtotal × value / 100`, capped by
/// `max_discount_amount` when that is > 0. FIXED vouchers discount the
/// flat amount. The total never goes below zero.
pub fn compute_totals(items: &[CartItem], voucher: Option<&Voucher>) -> Totals {
    let subtotal = items.iter().fold(Decimal::ZERO, |acc, item| {
        acc + to_decimal(item.unit_price) * Decimal::from(item.quantity)
    });

    let discount = match voucher {
        None => Decimal::ZERO,
        Some(v) => match v.discount_type {
            DiscountType::Percent => {
                let raw = subtotal * to_decimal(v.discount_value) / Decimal::ONE_HUNDRED;
                let cap = to_decimal(v.max_discount_amount);
                if cap > Decimal::ZERO { raw.min(cap) } else { raw }
            }
            DiscountType::Fixed => to_decimal(v.discount_value),
        },
    };

    let total = (subtotal - discount).max(Decimal::ZERO);

    Totals {
        subtotal: to_f64(subtotal),
        discount: to_f64(discount),
        total: to_f64(total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::ItemKind;

    fn line(id: &str, unit_price: f64, quantity: i32) -> CartItem {
        CartItem {
            kind: ItemKind::Menu,
            id: id.to_string(),
            name: id.to_string(),
            image: None,
            unit_price,
            quantity,
        }
    }

    fn voucher(discount_type: DiscountType, value: f64, cap: f64) -> Voucher {
        Voucher {
            id: "v-1".to_string(),
            code: "TEST".to_string(),
            discount_type,
            discount_value: value,
            max_discount_amount: cap,
            min_order_amount: 0.0,
            usage_limit: 0,
            usage_limit_per_user: 0,
        }
    }

    #[test]
    fn test_subtotal_without_voucher() {
        let items = vec![line("pho", 50_000.0, 2), line("cafe", 30_000.0, 1)];
        let totals = compute_totals(&items, None);
        assert_eq!(totals.subtotal, 130_000.0);
        assert_eq!(totals.discount, 0.0);
        assert_eq!(totals.total, 130_000.0);
    }

    #[test]
    fn test_percent_discount_is_capped() {
        // 10% of 1,000,000 would be 100,000 but the cap wins
        let items = vec![line("banquet", 1_000_000.0, 1)];
        let v = voucher(DiscountType::Percent, 10.0, 50_000.0);
        let totals = compute_totals(&items, Some(&v));
        assert_eq!(totals.discount, 50_000.0);
        assert_eq!(totals.total, 950_000.0);
    }

    #[test]
    fn test_percent_discount_uncapped_when_cap_is_zero() {
        let items = vec![line("banquet", 1_000_000.0, 1)];
        let v = voucher(DiscountType::Percent, 10.0, 0.0);
        let totals = compute_totals(&items, Some(&v));
        assert_eq!(totals.discount, 100_000.0);
        assert_eq!(totals.total, 900_000.0);
    }

    #[test]
    fn test_fixed_discount_clamps_at_zero() {
        let items = vec![line("soup", 15_000.0, 1)];
        let v = voucher(DiscountType::Fixed, 20_000.0, 0.0);
        let totals = compute_totals(&items, Some(&v));
        assert_eq!(totals.subtotal, 15_000.0);
        assert_eq!(totals.discount, 20_000.0);
        assert_eq!(totals.total, 0.0);
    }

    #[test]
    fn test_empty_cart() {
        let totals = compute_totals(&[], None);
        assert_eq!(totals, Totals::default());
    }
}
