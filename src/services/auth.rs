//! Customer and employee authentication.

use crate::domain::auth::{AuthenticatedCustomer, AuthenticatedEmployee};
use crate::domain::customer::{Customer, NewCustomer};
use crate::forms::auth::{EmployeeLoginForm, LoginForm, SignupForm};
use crate::repository::{CustomerReader, CustomerWriter, EmployeeReader};
use crate::services::{ServiceError, ServiceResult};

const INVALID_CUSTOMER_CREDENTIALS: &str = "Invalid username or password";
const INVALID_EMPLOYEE_CREDENTIALS: &str = "Invalid employee ID or password";

/// Greeting data returned after a successful customer login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerLogin {
    pub identity: AuthenticatedCustomer,
    pub first_name: String,
}

/// Verify a customer's credentials. Only active accounts may log in.
pub fn login_customer<R>(repo: &R, form: &LoginForm) -> ServiceResult<CustomerLogin>
where
    R: CustomerReader + ?Sized,
{
    let username = form.username.trim();
    if username.is_empty() || form.password.is_empty() {
        return Err(ServiceError::Form(INVALID_CUSTOMER_CREDENTIALS.to_string()));
    }

    let customer = repo
        .get_customer_by_username(username)
        .map_err(ServiceError::from)?
        .filter(|customer| customer.is_active)
        .ok_or_else(|| ServiceError::Form(INVALID_CUSTOMER_CREDENTIALS.to_string()))?;

    if !password_matches(&form.password, &customer.password_hash) {
        log::info!("Rejected login for customer {username}");
        return Err(ServiceError::Form(INVALID_CUSTOMER_CREDENTIALS.to_string()));
    }

    Ok(CustomerLogin {
        identity: AuthenticatedCustomer {
            username: customer.username,
        },
        first_name: customer.first_name,
    })
}

/// Register a customer account with a bcrypt hashed password.
pub fn signup_customer<R>(repo: &R, form: SignupForm, password_cost: u32) -> ServiceResult<Customer>
where
    R: CustomerReader + CustomerWriter + ?Sized,
{
    let payload = form
        .into_payload()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    if repo
        .get_customer_by_username(&payload.username)
        .map_err(ServiceError::from)?
        .is_some()
    {
        return Err(ServiceError::Form("Username already exists".to_string()));
    }

    if repo
        .get_customer_by_email(&payload.email)
        .map_err(ServiceError::from)?
        .is_some()
    {
        return Err(ServiceError::Form("Email already exists".to_string()));
    }

    let password_hash = bcrypt::hash(&payload.password, password_cost).map_err(|err| {
        log::error!("Failed to hash password: {err}");
        ServiceError::Internal(err.to_string())
    })?;

    let new_customer = NewCustomer::new(
        payload.username,
        password_hash,
        payload.email,
        payload.first_name,
        payload.last_name,
    );

    let customer = repo
        .create_customer(&new_customer)
        .map_err(ServiceError::from)?;
    log::info!("Registered customer {}", customer.username);
    Ok(customer)
}

/// Verify an employee's credentials and the role they chose on the login form.
pub fn login_employee<R>(repo: &R, form: &EmployeeLoginForm) -> ServiceResult<AuthenticatedEmployee>
where
    R: EmployeeReader + ?Sized,
{
    let requested_type = form
        .requested_type()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let empid = form.empid.trim();
    let employee = repo
        .get_employee_by_id(empid)
        .map_err(ServiceError::from)?
        .filter(|employee| employee.is_active)
        .ok_or_else(|| ServiceError::Form(INVALID_EMPLOYEE_CREDENTIALS.to_string()))?;

    if !password_matches(&form.password, &employee.password_hash) {
        log::info!("Rejected login for employee {empid}");
        return Err(ServiceError::Form(INVALID_EMPLOYEE_CREDENTIALS.to_string()));
    }

    if employee.employee_type != requested_type {
        return Err(ServiceError::Form(
            "Employee type mismatch. Please select the correct employee type.".to_string(),
        ));
    }

    Ok(AuthenticatedEmployee {
        empid: employee.empid,
        employee_type: employee.employee_type,
    })
}

/// Re-read the employee behind a session so deactivation and role changes
/// take effect before the cookie expires. `None` means the session no longer
/// grants access.
pub fn current_employee<R>(
    repo: &R,
    session: &AuthenticatedEmployee,
) -> ServiceResult<Option<AuthenticatedEmployee>>
where
    R: EmployeeReader + ?Sized,
{
    let employee = repo
        .get_employee_by_id(&session.empid)
        .map_err(ServiceError::from)?;

    Ok(employee
        .filter(|employee| employee.is_active)
        .map(|employee| AuthenticatedEmployee {
            empid: employee.empid,
            employee_type: employee.employee_type,
        }))
}

fn password_matches(password: &str, hash: &str) -> bool {
    match bcrypt::verify(password, hash) {
        Ok(matches) => matches,
        Err(err) => {
            log::warn!("Stored password hash could not be verified: {err}");
            false
        }
    }
}
