//! Voucher Model

use serde::{Deserialize, Serialize};

/// Discount calculation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountType {
    /// Percentage of the subtotal, optionally capped
    Percent,
    /// Fixed amount off
    Fixed,
}

/// Discount voucher
///
/// `max_discount_amount` of 0 means uncapped; `usage_limit` and
/// `usage_limit_per_user` of 0 mean unlimited. A voucher attached to a
/// draft whose subtotal drops below `min_order_amount` stays attached
/// and is surfaced as ineligible by the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voucher {
    pub id: String,
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    #[serde(default)]
    pub max_discount_amount: f64,
    #[serde(default)]
    pub min_order_amount: f64,
    #[serde(default)]
    pub usage_limit: i32,
    #[serde(default)]
    pub usage_limit_per_user: i32,
}

impl Voucher {
    /// Whether the voucher may be applied to an order of the given
    /// subtotal. Eligibility is advisory; the cart never auto-detaches.
    pub fn is_eligible(&self, subtotal: f64) -> bool {
        subtotal >= self.min_order_amount
    }
}
