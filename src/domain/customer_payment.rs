use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Bank transfer details a customer supplied at checkout.
///
/// Rows accumulate over time; the newest active one is used for billing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
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

/// Payload required to store a new set of bank details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomerPayment {
    pub username: String,
    pub bank_name: String,
    pub account_holder_name: String,
    pub account_number: String,
    pub created_at: NaiveDateTime,
}

impl NewCustomerPayment {
    pub fn new(
        username: impl Into<String>,
        bank_name: impl Into<String>,
        account_holder_name: impl Into<String>,
        account_number: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            bank_name: bank_name.into(),
            account_holder_name: account_holder_name.into(),
            account_number: account_number.into(),
            created_at: chrono::Local::now().naive_utc(),
        }
    }
}
