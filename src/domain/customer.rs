use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Domain representation of a shopper account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customer {
    /// Login name, unique across customers.
    pub username: String,
    /// bcrypt hash of the password. Never serialized.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Primary email address stored in lowercase for comparisons.
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Payload required to register a new customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl NewCustomer {
    /// Build a new customer payload while normalising the email to lowercase.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
            email: email.into().to_lowercase(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}
