use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::bill::{Bill as DomainBill, NewBill as DomainNewBill};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::bills)]
pub struct Bill {
    pub id: i32,
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

#[derive(Insertable)]
#[diesel(table_name = crate::schema::bills)]
pub struct NewBill<'a> {
    pub payment_id: i32,
    pub order_id: i32,
    pub username: &'a str,
    pub product_names: &'a str,
    pub product_quantities: &'a str,
    pub subtotal_cents: i64,
    pub total_cents: i64,
    pub bank_name: &'a str,
    pub bank_account_number: &'a str,
    pub created_at: NaiveDateTime,
}

impl From<Bill> for DomainBill {
    fn from(value: Bill) -> Self {
        Self {
            id: value.id,
            payment_id: value.payment_id,
            order_id: value.order_id,
            username: value.username,
            product_names: value.product_names,
            product_quantities: value.product_quantities,
            subtotal_cents: value.subtotal_cents,
            total_cents: value.total_cents,
            bank_name: value.bank_name,
            bank_account_number: value.bank_account_number,
            created_at: value.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewBill> for NewBill<'a> {
    fn from(value: &'a DomainNewBill) -> Self {
        Self {
            payment_id: value.payment_id,
            order_id: value.order_id,
            username: value.username.as_str(),
            product_names: value.product_names.as_str(),
            product_quantities: value.product_quantities.as_str(),
            subtotal_cents: value.subtotal_cents,
            total_cents: value.total_cents,
            bank_name: value.bank_name.as_str(),
            bank_account_number: value.bank_account_number.as_str(),
            created_at: value.created_at,
        }
    }
}
