use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::money::format_cents;
use crate::pagination::Pagination;

/// Lifecycle states of an order. Only a cashier changes them.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    /// Placed by the customer and waiting for review.
    #[default]
    Pending,
    /// Payment verified, stock deducted and a bill issued.
    Approved,
    /// Payment rejected by the cashier.
    Declined,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Approved => "APPROVED",
            OrderStatus::Declined => "DECLINED",
        }
    }

    /// Whether a cashier may move an order from `self` to `next`.
    ///
    /// Only pending orders are approved or declined; any order may be reset
    /// to pending.
    pub fn can_become(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, _) | (_, OrderStatus::Pending)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a status string is not one of PENDING, APPROVED or DECLINED.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid status. Must be PENDING, APPROVED, or DECLINED")]
pub struct InvalidOrderStatus(pub String);

impl FromStr for OrderStatus {
    type Err = InvalidOrderStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(OrderStatus::Pending),
            "APPROVED" => Ok(OrderStatus::Approved),
            "DECLINED" => Ok(OrderStatus::Declined),
            _ => Err(InvalidOrderStatus(value.to_string())),
        }
    }
}

/// Changes refused because of the order's current status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderStateError {
    #[error("Cannot change order {order_id} from {from} to {to}")]
    IllegalStatusChange {
        order_id: i32,
        from: OrderStatus,
        to: OrderStatus,
    },
    #[error("Order {order_id} is {status} and can no longer be edited")]
    NotEditable { order_id: i32, status: OrderStatus },
}

/// One product line of an order.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: i32,
    /// Always at least one.
    pub quantity: i32,
}

impl OrderItem {
    pub fn new(product_id: i32, quantity: i32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// A checkout record, called a "payment" in the cashier views.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique identifier, also used as the payment id.
    pub id: i32,
    pub username: String,
    /// Line items in the order the customer placed them.
    pub items: Vec<OrderItem>,
    pub subtotal_cents: i64,
    /// File name of the uploaded payment slip.
    pub payslip_path: Option<String>,
    pub status: OrderStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Order {
    pub fn subtotal_formatted(&self) -> String {
        format_cents(self.subtotal_cents)
    }

    /// Product ids joined with commas, the legacy wire format.
    pub fn product_ids_joined(&self) -> String {
        join_items(&self.items, |item| item.product_id)
    }

    /// Quantities joined with commas, aligned with [`Order::product_ids_joined`].
    pub fn quantities_joined(&self) -> String {
        join_items(&self.items, |item| item.quantity)
    }
}

fn join_items(items: &[OrderItem], field: impl Fn(&OrderItem) -> i32) -> String {
    items
        .iter()
        .map(|item| field(item).to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Payload required to place a new order. New orders are always PENDING.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub username: String,
    pub items: Vec<OrderItem>,
    pub subtotal_cents: i64,
    pub payslip_path: Option<String>,
    /// Timestamp captured when the order payload was created.
    pub created_at: NaiveDateTime,
}

impl NewOrder {
    pub fn new(username: impl Into<String>, items: Vec<OrderItem>, subtotal_cents: i64) -> Self {
        Self {
            username: username.into(),
            items,
            subtotal_cents,
            payslip_path: None,
            created_at: chrono::Local::now().naive_utc(),
        }
    }

    pub fn with_payslip_path(mut self, payslip_path: impl Into<String>) -> Self {
        self.payslip_path = Some(payslip_path.into());
        self
    }
}

/// New contents for a pending order. The owner and status are not editable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderUpdate {
    pub items: Vec<OrderItem>,
    pub subtotal_cents: i64,
    /// Replacement payslip; `None` keeps the stored one.
    pub payslip_path: Option<String>,
}

/// Query definition used to list orders, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderListQuery {
    pub username: Option<String>,
    pub status: Option<OrderStatus>,
    pub pagination: Option<Pagination>,
}

impl OrderListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only orders placed by `username`.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Filter the results by the provided status.
    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Order counts shown on the cashier dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub total_orders: i64,
    pub pending_orders: i64,
    pub approved_orders: i64,
    pub declined_orders: i64,
}

impl OrderSummary {
    pub fn record(&mut self, status: OrderStatus, count: i64) {
        self.total_orders += count;
        match status {
            OrderStatus::Pending => self.pending_orders += count,
            OrderStatus::Approved => self.approved_orders += count,
            OrderStatus::Declined => self.declined_orders += count,
        }
    }
}
