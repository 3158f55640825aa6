use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use serde::Deserialize;
use thiserror::Error;

use crate::domain::customer_payment::NewCustomerPayment;
use crate::domain::money::parse_cents;
use crate::domain::order::{NewOrder, OrderItem, OrderUpdate};
use crate::forms::{non_blank, sanitize_inline_text};

/// Largest payment slip accepted, in bytes.
pub const MAX_PAYSLIP_BYTES: usize = 10 * 1024 * 1024;

pub type CheckoutFormResult<T> = Result<T, CheckoutFormError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutFormError {
    #[error("No file uploaded")]
    NoFile,
    #[error("Invalid file type. Only PNG, JPG, and PDF files are allowed")]
    InvalidFileType,
    #[error("File size must be less than 10MB")]
    FileTooLarge,
    #[error("Bank name is required")]
    MissingBankName,
    #[error("Account holder name is required")]
    MissingAccountHolder,
    #[error("Account number is required")]
    MissingAccountNumber,
    #[error("Product IDs are required")]
    MissingProductIds,
    #[error("Product quantities are required")]
    MissingQuantities,
    #[error("Product IDs and quantities must have the same length")]
    LengthMismatch,
    #[error("Invalid product ID: {0}")]
    InvalidProductId(String),
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),
    #[error("Subtotal is required")]
    MissingSubtotal,
    #[error("Invalid subtotal format")]
    InvalidSubtotal,
    #[error("Username is required")]
    MissingUsername,
}

/// Payment slip upload. The file is kept in a temporary location until the
/// service moves it into the payslip directory.
#[derive(MultipartForm)]
pub struct PaymentSlipForm {
    #[multipart(limit = "16MiB")]
    pub payment_slip: TempFile,
}

impl PaymentSlipForm {
    /// Check type and size and pick the stored file extension.
    pub fn extension(&self) -> CheckoutFormResult<&'static str> {
        let file = &self.payment_slip;
        if file.size == 0 {
            return Err(CheckoutFormError::NoFile);
        }

        let extension = match file.content_type.as_ref().map(|mime| mime.essence_str()) {
            Some("image/png") => ".png",
            Some("image/jpeg") => match original_extension(file.file_name.as_deref()) {
                Some(ext) if ext == ".jpeg" => ".jpeg",
                _ => ".jpg",
            },
            Some("application/pdf") => ".pdf",
            _ => return Err(CheckoutFormError::InvalidFileType),
        };

        if file.size > MAX_PAYSLIP_BYTES {
            return Err(CheckoutFormError::FileTooLarge);
        }

        Ok(extension)
    }
}

fn original_extension(file_name: Option<&str>) -> Option<String> {
    let (_, ext) = file_name?.rsplit_once('.')?;
    Some(format!(".{}", ext.to_ascii_lowercase()))
}

/// Bank details entered at checkout.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetailsForm {
    #[serde(default)]
    pub bank_name: String,
    #[serde(default)]
    pub account_holder_name: String,
    #[serde(default)]
    pub account_number: String,
}

impl PaymentDetailsForm {
    pub fn into_new_payment(self, username: &str) -> CheckoutFormResult<NewCustomerPayment> {
        let bank_name = sanitize_inline_text(&self.bank_name);
        if bank_name.is_empty() {
            return Err(CheckoutFormError::MissingBankName);
        }
        let account_holder_name = sanitize_inline_text(&self.account_holder_name);
        if account_holder_name.is_empty() {
            return Err(CheckoutFormError::MissingAccountHolder);
        }
        let account_number = sanitize_inline_text(&self.account_number);
        if account_number.is_empty() {
            return Err(CheckoutFormError::MissingAccountNumber);
        }

        Ok(NewCustomerPayment::new(
            username,
            bank_name,
            account_holder_name,
            account_number,
        ))
    }
}

/// Order submitted from the checkout page. Line items arrive as two aligned
/// comma-separated lists.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderForm {
    #[serde(default)]
    pub product_ids: String,
    #[serde(default)]
    pub product_quantities: String,
    #[serde(default)]
    pub subtotal: String,
    #[serde(default)]
    pub payslip_location_path: Option<String>,
    #[serde(flatten)]
    pub payment: PaymentDetailsForm,
}

impl PlaceOrderForm {
    /// Parse the order and the bank details submitted with it.
    pub fn into_order(self, username: &str) -> CheckoutFormResult<(NewOrder, NewCustomerPayment)> {
        let items = parse_line_items(&self.product_ids, &self.product_quantities)?;
        let subtotal_cents = parse_subtotal(&self.subtotal)?;
        let payment = self.payment.into_new_payment(username)?;

        let mut order = NewOrder::new(username, items, subtotal_cents);
        if let Some(path) = non_blank(self.payslip_location_path.as_deref()) {
            order = order.with_payslip_path(path);
        }

        Ok((order, payment))
    }
}

/// Order created through the REST API on behalf of a customer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub product_ids: String,
    #[serde(default)]
    pub product_quantities: String,
    #[serde(default)]
    pub subtotal: String,
    #[serde(default)]
    pub payslip_location_path: Option<String>,
}

impl CreateOrderRequest {
    pub fn into_new_order(self) -> CheckoutFormResult<NewOrder> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(CheckoutFormError::MissingUsername);
        }
        let items = parse_line_items(&self.product_ids, &self.product_quantities)?;
        let subtotal_cents = parse_subtotal(&self.subtotal)?;

        let mut order = NewOrder::new(username, items, subtotal_cents);
        if let Some(path) = non_blank(self.payslip_location_path.as_deref()) {
            order = order.with_payslip_path(path);
        }
        Ok(order)
    }
}

/// Replacement contents for a pending order sent through the REST API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    #[serde(default)]
    pub product_ids: String,
    #[serde(default)]
    pub product_quantities: String,
    #[serde(default)]
    pub subtotal: String,
    #[serde(default)]
    pub payslip_location_path: Option<String>,
}

impl UpdateOrderRequest {
    pub fn into_order_update(self) -> CheckoutFormResult<OrderUpdate> {
        Ok(OrderUpdate {
            items: parse_line_items(&self.product_ids, &self.product_quantities)?,
            subtotal_cents: parse_subtotal(&self.subtotal)?,
            payslip_path: non_blank(self.payslip_location_path.as_deref()),
        })
    }
}

/// Pair up comma-separated product ids and quantities.
pub fn parse_line_items(product_ids: &str, quantities: &str) -> CheckoutFormResult<Vec<OrderItem>> {
    if product_ids.trim().is_empty() {
        return Err(CheckoutFormError::MissingProductIds);
    }
    if quantities.trim().is_empty() {
        return Err(CheckoutFormError::MissingQuantities);
    }

    let ids: Vec<&str> = product_ids.split(',').map(str::trim).collect();
    let quantities: Vec<&str> = quantities.split(',').map(str::trim).collect();
    if ids.len() != quantities.len() {
        return Err(CheckoutFormError::LengthMismatch);
    }

    ids.into_iter()
        .zip(quantities)
        .map(|(id, quantity)| {
            let product_id = id
                .parse::<i32>()
                .ok()
                .filter(|id| *id > 0)
                .ok_or_else(|| CheckoutFormError::InvalidProductId(id.to_string()))?;
            let quantity = quantity
                .parse::<i32>()
                .ok()
                .filter(|quantity| *quantity >= 1)
                .ok_or_else(|| CheckoutFormError::InvalidQuantity(quantity.to_string()))?;
            Ok(OrderItem::new(product_id, quantity))
        })
        .collect()
}

fn parse_subtotal(subtotal: &str) -> CheckoutFormResult<i64> {
    if subtotal.trim().is_empty() {
        return Err(CheckoutFormError::MissingSubtotal);
    }
    parse_cents(subtotal).ok_or(CheckoutFormError::InvalidSubtotal)
}
