use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{AppError, Result};
use crate::models::order::{OrderInput, OrderPair, OrderStatus, Priority};
use crate::pricing;

pub const DEFAULT_INVENTORY_STATUS: &str = "in_stock";

/// A stock line waiting to be sold.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InventoryItem {
    pub id: i64,
    pub stt: i64,
    pub product_image: Option<String>,
    pub order_code: String,
    pub quantity: i64,
    pub capital: i64,
    pub reported_amount: i64,
    pub profit: i64,
    pub shipping_fee: i64,
    pub domestic_shipping_fee: i64,
    pub status: String,
    pub priority: Priority,
    pub note: String,
    pub sync_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryInput {
    pub product_image: Option<String>,
    pub order_code: String,
    pub quantity: i64,
    pub capital: i64,
    pub reported_amount: i64,
    pub shipping_fee: i64,
    pub domestic_shipping_fee: i64,
    pub status: String,
    pub priority: Priority,
    pub note: String,
}

impl Default for InventoryInput {
    fn default() -> Self {
        Self {
            product_image: None,
            order_code: String::new(),
            quantity: 0,
            capital: 0,
            reported_amount: 0,
            shipping_fee: 0,
            domestic_shipping_fee: 0,
            status: DEFAULT_INVENTORY_STATUS.to_string(),
            priority: Priority::Normal,
            note: String::new(),
        }
    }
}

impl InventoryInput {
    pub fn normalized(mut self) -> Self {
        self.order_code = self.order_code.trim().to_string();
        self.note = self.note.trim().to_string();
        self.status = match self.status.trim() {
            "" => DEFAULT_INVENTORY_STATUS.to_string(),
            status => status.to_string(),
        };
        self.product_image = self
            .product_image
            .map(|image| image.trim().to_string())
            .filter(|image| !image.is_empty());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.order_code.trim().is_empty() {
            return Err(AppError::validation("Order code is required"));
        }
        for (value, field) in [
            (self.quantity, "Quantity"),
            (self.capital, "Capital"),
            (self.reported_amount, "Reported amount"),
            (self.shipping_fee, "Shipping fee"),
            (self.domestic_shipping_fee, "Domestic shipping fee"),
        ] {
            if value < 0 {
                return Err(AppError::validation(format!("{field} must not be negative")));
            }
        }
        Ok(())
    }

    /// Expected margin once the line sells; zero until a price is reported.
    pub fn profit(&self) -> i64 {
        if self.reported_amount > 0 {
            pricing::compute_margin(self.reported_amount, self.capital, self.domestic_shipping_fee)
        } else {
            0
        }
    }
}

/// Payload for selling an inventory line into a new order pair.
///
/// Pricing and product fields left out fall back to the inventory item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SellInput {
    pub buyer_name: String,
    pub buyer_phone: String,
    pub buyer_address: String,
    pub order_code: Option<String>,
    pub quantity: Option<i64>,
    pub reported_amount: Option<i64>,
    pub deposit_amount: i64,
    pub capital: Option<i64>,
    pub shipping_fee: Option<i64>,
    pub domestic_shipping_fee: Option<i64>,
    pub product_image: Option<String>,
    pub priority: Option<Priority>,
    pub sync_id: Option<String>,
}

impl SellInput {
    pub fn quantity(&self) -> i64 {
        self.quantity.unwrap_or(1)
    }

    /// Check the requested quantity against what is on hand.
    pub fn check_quantity(&self, item: &InventoryItem) -> Result<()> {
        let quantity = self.quantity();
        if quantity <= 0 {
            return Err(AppError::validation("Quantity sold must be greater than 0"));
        }
        if quantity > item.quantity {
            return Err(AppError::validation(format!(
                "Only {} left in stock for {}",
                item.quantity, item.order_code
            )));
        }
        Ok(())
    }

    /// Build the order payload for the new pair; a sale always starts as not placed.
    pub fn into_order_input(self, item: &InventoryItem) -> OrderInput {
        let quantity = self.quantity();
        OrderInput {
            product_image: self.product_image.or_else(|| item.product_image.clone()),
            buyer_name: self.buyer_name,
            buyer_phone: self.buyer_phone,
            buyer_address: self.buyer_address,
            order_code: self
                .order_code
                .filter(|code| !code.trim().is_empty())
                .unwrap_or_else(|| item.order_code.clone()),
            quantity,
            reported_amount: self.reported_amount.unwrap_or(item.reported_amount),
            deposit_amount: self.deposit_amount,
            shipping_fee: self.shipping_fee.unwrap_or(item.shipping_fee),
            domestic_shipping_fee: self
                .domestic_shipping_fee
                .unwrap_or(item.domestic_shipping_fee),
            capital: self.capital.unwrap_or(item.capital),
            status: OrderStatus::NotPlaced,
            priority: self.priority.unwrap_or(item.priority),
            sync_id: self.sync_id,
        }
        .normalized()
    }
}

/// Outcome of a sale: the decremented stock line and the pair it produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleResult {
    pub inventory_item: InventoryItem,
    pub pair: OrderPair,
}
