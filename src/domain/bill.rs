use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::customer_payment::CustomerPayment;
use crate::domain::money::format_cents;
use crate::domain::order::Order;
use crate::domain::product::Product;

/// Hide all but the last four characters of an account number.
pub fn mask_account_number(account_number: &str) -> String {
    let count = account_number.chars().count();
    if count <= 4 {
        return account_number.to_string();
    }
    let tail: String = account_number.chars().skip(count - 4).collect();
    format!("****{tail}")
}

/// Immutable invoice snapshot issued when an order is approved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: i32,
    /// Order the bill was issued for. At most one bill exists per payment id.
    pub payment_id: i32,
    pub order_id: i32,
    pub username: String,
    /// Product names joined with ", ".
    pub product_names: String,
    /// Quantities joined with ",", aligned with `product_names`.
    pub product_quantities: String,
    pub subtotal_cents: i64,
    pub total_cents: i64,
    pub bank_name: String,
    #[serde(skip_serializing)]
    pub bank_account_number: String,
    pub created_at: NaiveDateTime,
}

impl Bill {
    pub fn masked_account_number(&self) -> String {
        mask_account_number(&self.bank_account_number)
    }

    pub fn subtotal_formatted(&self) -> String {
        format_cents(self.subtotal_cents)
    }

    pub fn total_formatted(&self) -> String {
        format_cents(self.total_cents)
    }

    /// Pair every product name with its quantity for rendering.
    pub fn lines(&self) -> Vec<(String, String)> {
        self.product_names
            .split(", ")
            .zip(self.product_quantities.split(','))
            .map(|(name, quantity)| (name.to_string(), quantity.to_string()))
            .collect()
    }
}

/// Payload required to store a bill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBill {
    pub payment_id: i32,
    pub order_id: i32,
    pub username: String,
    pub product_names: String,
    pub product_quantities: String,
    pub subtotal_cents: i64,
    pub total_cents: i64,
    pub bank_name: String,
    pub bank_account_number: String,
    pub created_at: NaiveDateTime,
}

impl NewBill {
    /// Snapshot `order` together with the customer's bank details.
    ///
    /// Product names are resolved through `products`; ids missing from the map
    /// are rendered as `Unknown Product`.
    pub fn snapshot(
        order: &Order,
        products: &HashMap<i32, Product>,
        payment: &CustomerPayment,
        now: NaiveDateTime,
    ) -> Self {
        let product_names = order
            .items
            .iter()
            .map(|item| {
                products
                    .get(&item.product_id)
                    .map(|product| product.name.as_str())
                    .unwrap_or("Unknown Product")
            })
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            payment_id: order.id,
            order_id: order.id,
            username: order.username.clone(),
            product_names,
            product_quantities: order.quantities_joined(),
            subtotal_cents: order.subtotal_cents,
            total_cents: order.subtotal_cents,
            bank_name: payment.bank_name.clone(),
            bank_account_number: payment.account_number.clone(),
            created_at: now,
        }
    }
}
