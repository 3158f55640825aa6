//! Request-scoped identities carried in the signed session cookie.

use serde::Serialize;

use crate::domain::employee::EmployeeType;

const CUSTOMER_PREFIX: &str = "customer:";
const EMPLOYEE_PREFIX: &str = "employee:";

/// A logged-in shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedCustomer {
    pub username: String,
}

/// A logged-in staff member together with their role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedEmployee {
    pub empid: String,
    pub employee_type: EmployeeType,
}

impl AuthenticatedEmployee {
    pub fn has_role(&self, role: EmployeeType) -> bool {
        self.employee_type == role
    }
}

/// Either kind of identity, as encoded in the identity cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionIdentity {
    Customer(AuthenticatedCustomer),
    Employee(AuthenticatedEmployee),
}

impl SessionIdentity {
    /// Encode the identity as the opaque id stored by the identity middleware.
    ///
    /// Customers become `customer:<username>`, employees become
    /// `employee:<TYPE>:<empid>`.
    pub fn encode(&self) -> String {
        match self {
            SessionIdentity::Customer(customer) => {
                format!("{CUSTOMER_PREFIX}{}", customer.username)
            }
            SessionIdentity::Employee(employee) => format!(
                "{EMPLOYEE_PREFIX}{}:{}",
                employee.employee_type.as_str(),
                employee.empid
            ),
        }
    }

    /// Parse an identity id produced by [`SessionIdentity::encode`].
    pub fn decode(value: &str) -> Option<Self> {
        if let Some(username) = value.strip_prefix(CUSTOMER_PREFIX) {
            if username.is_empty() {
                return None;
            }
            return Some(SessionIdentity::Customer(AuthenticatedCustomer {
                username: username.to_string(),
            }));
        }

        let rest = value.strip_prefix(EMPLOYEE_PREFIX)?;
        let (kind, empid) = rest.split_once(':')?;
        if empid.is_empty() {
            return None;
        }
        let employee_type = kind.parse::<EmployeeType>().ok()?;
        Some(SessionIdentity::Employee(AuthenticatedEmployee {
            empid: empid.to_string(),
            employee_type,
        }))
    }
}
