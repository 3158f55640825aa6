use std::str::FromStr;

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::order::{
    NewOrder as DomainNewOrder, Order as DomainOrder, OrderItem as DomainOrderItem, OrderStatus,
};
use crate::repository::errors::RepositoryError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::orders)]
pub struct Order {
    pub id: i32,
    pub username: String,
    pub subtotal_cents: i64,
    pub payslip_path: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::order_items, belongs_to(Order))]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub position: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::orders)]
pub struct NewOrder<'a> {
    pub username: &'a str,
    pub subtotal_cents: i64,
    pub payslip_path: Option<&'a str>,
    pub status: &'a str,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::order_items)]
pub struct NewOrderItem {
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub position: i32,
}

impl Order {
    /// Combine the row with its line items, which must already be sorted by position.
    pub fn into_domain(self, items: Vec<OrderItem>) -> Result<DomainOrder, RepositoryError> {
        let status = OrderStatus::from_str(&self.status)
            .map_err(|_| RepositoryError::InvalidData(format!("order status `{}`", self.status)))?;

        Ok(DomainOrder {
            id: self.id,
            username: self.username,
            items: items.into_iter().map(DomainOrderItem::from).collect(),
            subtotal_cents: self.subtotal_cents,
            payslip_path: self.payslip_path,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl From<OrderItem> for DomainOrderItem {
    fn from(value: OrderItem) -> Self {
        Self {
            product_id: value.product_id,
            quantity: value.quantity,
        }
    }
}

impl<'a> From<&'a DomainNewOrder> for NewOrder<'a> {
    fn from(value: &'a DomainNewOrder) -> Self {
        Self {
            username: value.username.as_str(),
            subtotal_cents: value.subtotal_cents,
            payslip_path: value.payslip_path.as_deref(),
            status: OrderStatus::Pending.as_str(),
            created_at: value.created_at,
            updated_at: value.created_at,
        }
    }
}

impl NewOrderItem {
    pub fn from_domain(order_id: i32, position: usize, value: &DomainOrderItem) -> Self {
        Self {
            order_id,
            product_id: value.product_id,
            quantity: value.quantity,
            position: position as i32,
        }
    }
}
