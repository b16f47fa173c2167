//! Derived money fields.
//!
//! Every create and update recomputes these from the final field values of
//! the request; client-supplied `remaining_amount` / `profit` are never read.

use crate::models::order::OrderStatus;

/// Balance still owed by the buyer, never negative.
pub fn compute_remaining(reported_amount: i64, shipping_fee: i64, deposit_amount: i64) -> i64 {
    reported_amount
        .saturating_add(shipping_fee)
        .saturating_sub(deposit_amount)
        .max(0)
}

/// Reported amount minus what the goods and domestic shipping cost the shop.
pub fn compute_margin(reported_amount: i64, capital: i64, domestic_shipping_fee: i64) -> i64 {
    reported_amount.saturating_sub(capital.saturating_add(domestic_shipping_fee))
}

/// Profit of a shop order; a cancelled order earns nothing.
pub fn compute_profit(
    reported_amount: i64,
    capital: i64,
    domestic_shipping_fee: i64,
    status: OrderStatus,
) -> i64 {
    if status == OrderStatus::Cancelled {
        0
    } else {
        compute_margin(reported_amount, capital, domestic_shipping_fee)
    }
}
