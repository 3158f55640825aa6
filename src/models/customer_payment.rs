use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::customer_payment::{
    CustomerPayment as DomainCustomerPayment, NewCustomerPayment as DomainNewCustomerPayment,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::customer_payments)]
pub struct CustomerPayment {
    pub id: i32,
    pub username: String,
    pub bank_name: String,
    pub account_holder_name: String,
    pub account_number: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::customer_payments)]
pub struct NewCustomerPayment<'a> {
    pub username: &'a str,
    pub bank_name: &'a str,
    pub account_holder_name: &'a str,
    pub account_number: &'a str,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<CustomerPayment> for DomainCustomerPayment {
    fn from(value: CustomerPayment) -> Self {
        Self {
            id: value.id,
            username: value.username,
            bank_name: value.bank_name,
            account_holder_name: value.account_holder_name,
            account_number: value.account_number,
            is_active: value.is_active,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewCustomerPayment> for NewCustomerPayment<'a> {
    fn from(value: &'a DomainNewCustomerPayment) -> Self {
        Self {
            username: value.username.as_str(),
            bank_name: value.bank_name.as_str(),
            account_holder_name: value.account_holder_name.as_str(),
            account_number: value.account_number.as_str(),
            created_at: value.created_at,
            updated_at: value.created_at,
        }
    }
}
