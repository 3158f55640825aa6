use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::employee::EmployeeType;
use crate::forms::sanitize_inline_text;

const USERNAME_MIN_LEN: u64 = 3;
const USERNAME_MAX_LEN: u64 = 50;
const NAME_MAX_LEN: u64 = 100;
const PASSWORD_MIN_LEN: u64 = 6;
const PASSWORD_MAX_LEN: u64 = 72;

pub type AuthFormResult<T> = Result<T, AuthFormError>;

#[derive(Debug, Error)]
pub enum AuthFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Username may only contain letters, digits, '.', '_' and '-'")]
    InvalidUsername,
    #[error("Employee type mismatch. Please select the correct employee type.")]
    UnknownEmployeeType,
}

/// Customer login form. `returnUrl` is echoed back by the login page.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    #[validate(length(min = 1, max = USERNAME_MAX_LEN))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
    #[serde(default)]
    pub return_url: Option<String>,
}

impl LoginForm {
    /// Local path to continue to after a successful login.
    ///
    /// Only same-site absolute paths are honoured; anything else falls back to
    /// the shop.
    pub fn redirect_target(&self) -> String {
        match self.return_url.as_deref().map(str::trim) {
            Some(url) if url.starts_with('/') && !url.starts_with("//") => url.to_string(),
            _ => "/shopping".to_string(),
        }
    }
}

/// Sanitized credentials accepted by the signup flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupPayload {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    #[validate(length(min = USERNAME_MIN_LEN, max = USERNAME_MAX_LEN))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub first_name: String,
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub last_name: String,
    #[validate(length(min = PASSWORD_MIN_LEN, max = PASSWORD_MAX_LEN))]
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    pub fn into_payload(self) -> AuthFormResult<SignupPayload> {
        if self.password != self.confirm_password {
            return Err(AuthFormError::PasswordMismatch);
        }
        self.validate()?;

        let username = self.username.trim().to_string();
        if !username
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-'))
        {
            return Err(AuthFormError::InvalidUsername);
        }

        Ok(SignupPayload {
            username,
            password: self.password,
            email: self.email.trim().to_lowercase(),
            first_name: sanitize_inline_text(&self.first_name),
            last_name: sanitize_inline_text(&self.last_name),
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct EmployeeLoginForm {
    #[validate(length(min = 1, max = USERNAME_MAX_LEN))]
    pub empid: String,
    #[validate(length(min = 1))]
    pub password: String,
    /// Role the employee claims to log in as.
    #[serde(rename = "type")]
    pub employee_type: String,
}

impl EmployeeLoginForm {
    pub fn requested_type(&self) -> AuthFormResult<EmployeeType> {
        self.employee_type
            .parse()
            .map_err(|_| AuthFormError::UnknownEmployeeType)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(password: &str, confirm: &str) -> SignupForm {
        SignupForm {
            username: " alice ".to_string(),
            email: "Alice@Example.com".to_string(),
            first_name: "  Alice ".to_string(),
            last_name: "Perera".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn signup_normalises_fields() {
        let payload = signup("secret1", "secret1").into_payload().unwrap();
        assert_eq!(payload.username, "alice");
        assert_eq!(payload.email, "alice@example.com");
        assert_eq!(payload.first_name, "Alice");
    }

    #[test]
    fn signup_rejects_mismatched_passwords() {
        let err = signup("secret1", "secret2").into_payload().unwrap_err();
        assert_eq!(err.to_string(), "Passwords do not match");
    }

    #[test]
    fn signup_rejects_short_passwords() {
        let err = signup("abc", "abc").into_payload().unwrap_err();
        assert!(matches!(err, AuthFormError::Validation(_)));
    }

    #[test]
    fn signup_rejects_path_characters_in_username() {
        let mut form = signup("secret1", "secret1");
        form.username = "../alice".to_string();
        assert!(matches!(
            form.into_payload(),
            Err(AuthFormError::InvalidUsername)
        ));
    }

    #[test]
    fn redirect_target_ignores_external_urls() {
        let mut form = LoginForm {
            username: "alice".to_string(),
            password: "secret".to_string(),
            return_url: Some("/shopping/product/3".to_string()),
        };
        assert_eq!(form.redirect_target(), "/shopping/product/3");

        form.return_url = Some("//evil.example.com".to_string());
        assert_eq!(form.redirect_target(), "/shopping");

        form.return_url = None;
        assert_eq!(form.redirect_target(), "/shopping");
    }

    #[test]
    fn employee_type_is_parsed_case_insensitively() {
        let form = EmployeeLoginForm {
            empid: "EMP001".to_string(),
            password: "pw".to_string(),
            employee_type: "cashier".to_string(),
        };
        assert_eq!(form.requested_type().unwrap(), EmployeeType::Cashier);
    }
}
