use serde::{Deserialize, Serialize};

use crate::models::order::OrderStatus;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CustomerOrderTotals {
    pub count: i64,
    pub reported_amount: i64,
    pub deposit_amount: i64,
    pub remaining_amount: i64,
    pub quantity: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ShopOrderTotals {
    pub count: i64,
    pub capital: i64,
    pub profit: i64,
}

/// Dashboard summary for a period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statistics {
    pub period: String,
    pub customer_orders: CustomerOrderTotals,
    pub shop_orders: ShopOrderTotals,
    pub customer_orders_by_status: Vec<StatusCount>,
    pub shop_orders_by_status: Vec<StatusCount>,
    pub unique_customers: i64,
}

/// Charity share: a tenth of the profit on delivered orders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CharityReport {
    pub period: String,
    pub delivered_orders: i64,
    pub total_profit: i64,
    pub charity_amount: i64,
}

impl CharityReport {
    pub const SHARE_DIVISOR: i64 = 10;

    pub fn new(period: String, delivered_orders: i64, total_profit: i64) -> Self {
        Self {
            period,
            delivered_orders,
            total_profit,
            charity_amount: total_profit / Self::SHARE_DIVISOR,
        }
    }
}

/// Fill in zero counts so every status is reported, in lifecycle order.
pub fn complete_status_counts(rows: Vec<(OrderStatus, i64)>) -> Vec<StatusCount> {
    OrderStatus::ALL
        .into_iter()
        .map(|status| StatusCount {
            status,
            count: rows
                .iter()
                .filter(|(row_status, _)| *row_status == status)
                .map(|(_, count)| *count)
                .sum(),
        })
        .collect()
}
