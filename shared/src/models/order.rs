//! Order Model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Order status
///
/// Transition table:
///
/// | from      | to                    |
/// |-----------|-----------------------|
/// | pending   | active, cancelled     |
/// | active    | completed, cancelled  |
/// | completed | (terminal)            |
/// | cancelled | (terminal)            |
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Created, awaiting payment
    #[default]
    Pending,
    /// Paid, rental running
    Active,
    /// Rental returned
    Completed,
    /// Cancelled by customer, shop or failed payment
    Cancelled,
}

impl OrderStatus {
    /// Parse from database string value (lowercase)
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Database string representation (lowercase)
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// No transition leaves a terminal status
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Does an order in this status hold its units against availability?
    pub fn holds_stock(&self) -> bool {
        matches!(self, Self::Pending | Self::Active)
    }

    /// Is `self -> next` an edge of the transition table?
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Active)
                | (Self::Pending, Self::Cancelled)
                | (Self::Active, Self::Completed)
                | (Self::Active, Self::Cancelled)
        )
    }

    /// Plan a move to `next`.
    ///
    /// Re-applying the current status is `Unchanged`, never an error.
    pub fn plan_transition(self, next: OrderStatus) -> Result<StatusChange, InvalidTransition> {
        if self == next {
            return Ok(StatusChange::Unchanged(self));
        }
        if self.can_transition_to(next) {
            Ok(StatusChange::Changed {
                from: self,
                to: next,
            })
        } else {
            Err(InvalidTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_db())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db(s).ok_or_else(|| UnknownOrderStatus(s.to_string()))
    }
}

/// Outcome of [`OrderStatus::plan_transition`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    Unchanged(OrderStatus),
    Changed { from: OrderStatus, to: OrderStatus },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot move order from {from} to {to}")]
pub struct InvalidTransition {
    pub from: OrderStatus,
    pub to: OrderStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown order status: {0}")]
pub struct UnknownOrderStatus(pub String);

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Order {
    pub id: Uuid,
    /// Customer who placed the order
    pub user_id: Uuid,
    pub shop_id: Uuid,
    /// Sum of line item `price_at_time_of_order * quantity`, whole currency units
    pub total_price: i64,
    pub status: OrderStatus,
    /// First rented day (inclusive)
    pub start_date: NaiveDate,
    /// Last rented day (inclusive)
    pub end_date: NaiveDate,
    /// Gateway channel code (e.g. "BRIVA", "QRIS")
    pub payment_method: String,
    /// Gateway transaction reference, set once the transaction is created
    pub payment_reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Order line item
///
/// Prices are snapshots taken when the order was placed; later product
/// price changes never touch them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    /// Effective daily rate at order time
    pub daily_price: i64,
    /// Price of one unit for the whole rental period
    pub price_at_time_of_order: i64,
}

impl OrderItem {
    /// `price_at_time_of_order * quantity`, `None` on overflow
    pub fn line_total(&self) -> Option<i64> {
        self.price_at_time_of_order
            .checked_mul(i64::from(self.quantity))
    }
}

/// Shop summary embedded in an order history entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShopSummary {
    pub shop_name: String,
    pub shop_address: String,
    pub shop_phone_number: String,
    pub shop_profile_image_url: String,
}

/// Product summary embedded in an order history item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductSummary {
    pub name: String,
    pub image_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderHistoryItem {
    pub product: ProductSummary,
    pub quantity: i32,
    pub price_at_time_of_order: i64,
}

/// One entry of a customer's order history (`GET /orders/me`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderHistory {
    pub id: Uuid,
    pub shop: ShopSummary,
    pub total_price: i64,
    pub status: OrderStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub payment_method: String,
    pub items: Vec<OrderHistoryItem>,
}
