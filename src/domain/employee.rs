use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Back-office roles. Each role unlocks its own set of operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmployeeType {
    Cashier,
    StoreManager,
    ItAssistant,
    DeliveryCoordinator,
}

impl EmployeeType {
    pub const ALL: [EmployeeType; 4] = [
        EmployeeType::Cashier,
        EmployeeType::StoreManager,
        EmployeeType::ItAssistant,
        EmployeeType::DeliveryCoordinator,
    ];

    /// Value stored in the database and carried in session identities.
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeType::Cashier => "CASHIER",
            EmployeeType::StoreManager => "STORE_MANAGER",
            EmployeeType::ItAssistant => "IT_ASSISTANT",
            EmployeeType::DeliveryCoordinator => "DELIVERY_COORDINATOR",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            EmployeeType::Cashier => "Cashier",
            EmployeeType::StoreManager => "Store Manager",
            EmployeeType::ItAssistant => "IT Assistant",
            EmployeeType::DeliveryCoordinator => "Delivery Coordinator",
        }
    }
}

impl fmt::Display for EmployeeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a known employee type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown employee type `{0}`")]
pub struct UnknownEmployeeType(pub String);

impl FromStr for EmployeeType {
    type Err = UnknownEmployeeType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_uppercase();
        EmployeeType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| UnknownEmployeeType(value.to_string()))
    }
}

/// Domain representation of a staff account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Employee {
    pub empid: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub employee_type: EmployeeType,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Payload required to create an employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub empid: String,
    pub password_hash: String,
    pub employee_type: EmployeeType,
}

impl NewEmployee {
    pub fn new(
        empid: impl Into<String>,
        password_hash: impl Into<String>,
        employee_type: EmployeeType,
    ) -> Self {
        Self {
            empid: empid.into(),
            password_hash: password_hash.into(),
            employee_type,
        }
    }
}
