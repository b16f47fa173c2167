use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{AppError, Result};
use crate::pricing;

/// Order status, shared by both tabs of a linked pair.
///
/// Stored and serialized with the snake_case names; the shop's original
/// Vietnamese labels are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(try_from = "String", into = "&'static str")]
#[sqlx(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    NotPlaced,
    Placed,
    WarehousedAbroad,
    ReceivedByShop,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::NotPlaced,
        OrderStatus::Placed,
        OrderStatus::WarehousedAbroad,
        OrderStatus::ReceivedByShop,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::NotPlaced => "not_placed",
            OrderStatus::Placed => "placed",
            OrderStatus::WarehousedAbroad => "warehoused_abroad",
            OrderStatus::ReceivedByShop => "received_by_shop",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Label shown in the shop's dashboard.
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::NotPlaced => "chưa lên đơn",
            OrderStatus::Placed => "đã lên đơn",
            OrderStatus::WarehousedAbroad => "nhập kho Trung",
            OrderStatus::ReceivedByShop => "Shop nhận hàng",
            OrderStatus::Delivered => "Giao khách",
            OrderStatus::Cancelled => "Huỷ đơn",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s || status.label() == s)
            .ok_or_else(|| AppError::validation(format!("Unknown order status: {s}")))
    }
}

impl TryFrom<String> for OrderStatus {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<OrderStatus> for &'static str {
    fn from(status: OrderStatus) -> Self {
        status.as_str()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(try_from = "String", into = "&'static str")]
#[sqlx(rename_all = "snake_case")]
pub enum Priority {
    Urgent,
    #[default]
    Normal,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Urgent => "urgent",
            Priority::Normal => "normal",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::Urgent => "Gấp",
            Priority::Normal => "Bình thường",
        }
    }
}

impl FromStr for Priority {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        [Priority::Urgent, Priority::Normal]
            .into_iter()
            .find(|priority| priority.as_str() == s || priority.label() == s)
            .ok_or_else(|| AppError::validation(format!("Unknown priority: {s}")))
    }
}

impl TryFrom<String> for Priority {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Priority> for &'static str {
    fn from(priority: Priority) -> Self {
        priority.as_str()
    }
}

/// Which tab of a linked pair a record lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Customer-facing tab.
    #[serde(alias = "tab1")]
    Customer,
    /// Shop/internal tab.
    #[serde(alias = "tab2")]
    Shop,
}

/// Customer-facing view of an order ("tab1").
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CustomerOrder {
    pub id: i64,
    pub stt: i64,
    pub product_image: Option<String>,
    pub buyer_name: String,
    pub buyer_phone: String,
    pub buyer_address: String,
    pub order_code: String,
    pub quantity: i64,
    pub reported_amount: i64,
    pub deposit_amount: i64,
    pub shipping_fee: i64,
    pub domestic_shipping_fee: i64,
    pub remaining_amount: i64,
    pub status: OrderStatus,
    pub priority: Priority,
    pub sync_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Shop/internal view of an order ("tab2").
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShopOrder {
    pub id: i64,
    pub stt: i64,
    pub product_image: Option<String>,
    pub buyer_name: String,
    pub buyer_phone: String,
    pub buyer_address: String,
    pub order_code: String,
    pub reported_amount: i64,
    pub capital: i64,
    pub profit: i64,
    pub shipping_fee: i64,
    pub domestic_shipping_fee: i64,
    pub status: OrderStatus,
    pub priority: Priority,
    pub sync_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Order form payload as submitted from either tab.
///
/// Carries the shared fields plus the side-specific fields of both tabs;
/// `remaining_amount` and `profit` are not accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderInput {
    pub product_image: Option<String>,
    pub buyer_name: String,
    pub buyer_phone: String,
    pub buyer_address: String,
    pub order_code: String,
    pub quantity: i64,
    pub reported_amount: i64,
    pub deposit_amount: i64,
    pub shipping_fee: i64,
    pub domestic_shipping_fee: i64,
    pub capital: i64,
    pub status: OrderStatus,
    pub priority: Priority,
    /// Correlation id chosen by the client. On create it makes retries
    /// idempotent; on update it links a record that has none yet.
    pub sync_id: Option<String>,
}

impl OrderInput {
    /// Trim free-text fields and drop empty optional values.
    pub fn normalized(mut self) -> Self {
        self.buyer_name = self.buyer_name.trim().to_string();
        self.buyer_phone = self.buyer_phone.trim().to_string();
        self.buyer_address = self.buyer_address.trim().to_string();
        self.order_code = self.order_code.trim().to_string();
        self.product_image = self
            .product_image
            .map(|image| image.trim().to_string())
            .filter(|image| !image.is_empty());
        self.sync_id = self
            .sync_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.buyer_name.trim().is_empty() {
            return Err(AppError::validation("Buyer name is required"));
        }
        if self.order_code.trim().is_empty() {
            return Err(AppError::validation("Order code is required"));
        }
        if self.quantity < 0 {
            return Err(AppError::validation("Quantity must not be negative"));
        }
        if self.reported_amount <= 0 {
            return Err(AppError::validation("Reported amount must be greater than 0"));
        }
        for (value, field) in [
            (self.deposit_amount, "Deposit amount"),
            (self.shipping_fee, "Shipping fee"),
            (self.domestic_shipping_fee, "Domestic shipping fee"),
            (self.capital, "Capital"),
        ] {
            if value < 0 {
                return Err(AppError::validation(format!("{field} must not be negative")));
            }
        }
        Ok(())
    }

    pub fn customer_draft(&self) -> CustomerOrderDraft {
        CustomerOrderDraft {
            shared: SharedFields::from(self),
            quantity: self.quantity,
            deposit_amount: self.deposit_amount,
        }
    }

    pub fn shop_draft(&self) -> ShopOrderDraft {
        ShopOrderDraft {
            shared: SharedFields::from(self),
            capital: self.capital,
        }
    }
}

/// Fields both tabs of a linked pair keep identical.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedFields {
    pub product_image: Option<String>,
    pub buyer_name: String,
    pub buyer_phone: String,
    pub buyer_address: String,
    pub order_code: String,
    pub reported_amount: i64,
    pub shipping_fee: i64,
    pub domestic_shipping_fee: i64,
    pub status: OrderStatus,
    pub priority: Priority,
}

impl From<&OrderInput> for SharedFields {
    fn from(input: &OrderInput) -> Self {
        Self {
            product_image: input.product_image.clone(),
            buyer_name: input.buyer_name.clone(),
            buyer_phone: input.buyer_phone.clone(),
            buyer_address: input.buyer_address.clone(),
            order_code: input.order_code.clone(),
            reported_amount: input.reported_amount,
            shipping_fee: input.shipping_fee,
            domestic_shipping_fee: input.domestic_shipping_fee,
            status: input.status,
            priority: input.priority,
        }
    }
}

/// Values written to a customer order row, apart from identity columns.
#[derive(Debug, Clone)]
pub struct CustomerOrderDraft {
    pub shared: SharedFields,
    pub quantity: i64,
    pub deposit_amount: i64,
}

impl CustomerOrderDraft {
    pub fn remaining_amount(&self) -> i64 {
        pricing::compute_remaining(
            self.shared.reported_amount,
            self.shared.shipping_fee,
            self.deposit_amount,
        )
    }
}

/// Values written to a shop order row, apart from identity columns.
#[derive(Debug, Clone)]
pub struct ShopOrderDraft {
    pub shared: SharedFields,
    pub capital: i64,
}

impl ShopOrderDraft {
    pub fn profit(&self) -> i64 {
        pricing::compute_profit(
            self.shared.reported_amount,
            self.capital,
            self.shared.domestic_shipping_fee,
            self.shared.status,
        )
    }
}

impl CustomerOrder {
    /// Apply another tab's shared fields, keeping this row's quantity and deposit.
    pub fn with_shared(&self, shared: SharedFields) -> CustomerOrderDraft {
        CustomerOrderDraft {
            shared,
            quantity: self.quantity,
            deposit_amount: self.deposit_amount,
        }
    }
}

impl ShopOrder {
    /// Apply another tab's shared fields, keeping this row's capital.
    pub fn with_shared(&self, shared: SharedFields) -> ShopOrderDraft {
        ShopOrderDraft {
            shared,
            capital: self.capital,
        }
    }
}

/// Both records of a linked pair after a create or update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPair {
    pub sync_id: String,
    pub customer_order: CustomerOrder,
    pub shop_order: ShopOrder,
}

/// Whatever exists of a pair for a given `sync_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairView {
    pub sync_id: String,
    pub customer_order: Option<CustomerOrder>,
    pub shop_order: Option<ShopOrder>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedPair {
    pub customer_order_id: Option<i64>,
    pub shop_order_id: Option<i64>,
}
