//! Customer checkout: payment slips, bank details, orders and bills.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::auth::AuthenticatedCustomer;
use crate::domain::bill::Bill;
use crate::domain::customer_payment::CustomerPayment;
use crate::domain::order::{Order, OrderListQuery, OrderStatus};
use crate::domain::product::Product;
use crate::forms::checkout::{PaymentDetailsForm, PaymentSlipForm, PlaceOrderForm};
use crate::repository::{CustomerReader, CustomerWriter, OrderReader, OrderWriter, ProductReader};
use crate::services::{ServiceError, ServiceResult};

/// Store an uploaded payment slip and return its generated file name.
pub fn upload_payment_slip(
    user: &AuthenticatedCustomer,
    form: PaymentSlipForm,
    payslip_dir: &Path,
) -> ServiceResult<String> {
    let extension = form
        .extension()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let file_name = format!("{}_{}{}", Uuid::new_v4(), user.username, extension);

    fs::create_dir_all(payslip_dir).map_err(|err| {
        log::error!("Failed to create payslip directory {}: {err}", payslip_dir.display());
        ServiceError::Internal(err.to_string())
    })?;
    fs::copy(form.payment_slip.file.path(), payslip_dir.join(&file_name)).map_err(|err| {
        log::error!("Failed to store payment slip {file_name}: {err}");
        ServiceError::Internal(err.to_string())
    })?;

    log::info!("Stored payment slip {file_name} for {}", user.username);
    Ok(file_name)
}

pub fn save_payment_details<R>(
    repo: &R,
    user: &AuthenticatedCustomer,
    form: PaymentDetailsForm,
) -> ServiceResult<CustomerPayment>
where
    R: CustomerWriter + ?Sized,
{
    let details = form
        .into_new_payment(&user.username)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.save_payment_details(&details)
        .map_err(ServiceError::from)
}

/// Save the bank details and the PENDING order together.
pub fn place_order<R>(
    repo: &R,
    user: &AuthenticatedCustomer,
    form: PlaceOrderForm,
) -> ServiceResult<Order>
where
    R: OrderWriter + ?Sized,
{
    let (new_order, payment) = form
        .into_order(&user.username)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let order = repo
        .place_order(&new_order, &payment)
        .map_err(ServiceError::from)?;
    log::info!("Order {} placed by {}", order.id, user.username);
    Ok(order)
}

/// One line of an order as shown in the customer's history.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineView {
    pub product_id: i32,
    pub name: String,
    pub quantity: i32,
    pub stock_quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderHistoryView {
    pub payment_id: i32,
    pub items: Vec<OrderLineView>,
    /// `Name (Stock: n)` entries joined with ", ".
    pub product_summary: String,
    pub subtotal: String,
    pub order_status: OrderStatus,
    pub payslip_location_path: Option<String>,
    pub created_at: NaiveDateTime,
}

/// The customer's orders, newest first, with current product names and stock.
pub fn load_order_history<R>(
    repo: &R,
    user: &AuthenticatedCustomer,
) -> ServiceResult<Vec<OrderHistoryView>>
where
    R: OrderReader + ProductReader + ?Sized,
{
    let (_, orders) = repo
        .list_orders(OrderListQuery::new().username(&user.username))
        .map_err(ServiceError::from)?;

    let products = load_products_for(repo, &orders)?;

    Ok(orders
        .into_iter()
        .map(|order| {
            let items: Vec<OrderLineView> = order
                .items
                .iter()
                .map(|item| match products.get(&item.product_id) {
                    Some(product) => OrderLineView {
                        product_id: item.product_id,
                        name: product.name.clone(),
                        quantity: item.quantity,
                        stock_quantity: product.stock_quantity,
                    },
                    None => OrderLineView {
                        product_id: item.product_id,
                        name: format!("Unknown Product (ID: {})", item.product_id),
                        quantity: item.quantity,
                        stock_quantity: 0,
                    },
                })
                .collect();

            let product_summary = items
                .iter()
                .map(|line| {
                    if products.contains_key(&line.product_id) {
                        format!("{} (Stock: {})", line.name, line.stock_quantity)
                    } else {
                        line.name.clone()
                    }
                })
                .collect::<Vec<_>>()
                .join(", ");

            OrderHistoryView {
                payment_id: order.id,
                items,
                product_summary,
                subtotal: order.subtotal_formatted(),
                order_status: order.status,
                payslip_location_path: order.payslip_path,
                created_at: order.created_at,
            }
        })
        .collect())
}

/// Look up every product referenced by `orders` in one query.
pub(crate) fn load_products_for<R>(repo: &R, orders: &[Order]) -> ServiceResult<HashMap<i32, Product>>
where
    R: ProductReader + ?Sized,
{
    let mut ids: Vec<i32> = orders
        .iter()
        .flat_map(|order| order.items.iter().map(|item| item.product_id))
        .collect();
    ids.sort_unstable();
    ids.dedup();

    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    Ok(repo
        .get_products_by_ids(&ids)
        .map_err(ServiceError::from)?
        .into_iter()
        .map(|product| (product.id, product))
        .collect())
}

/// Bill fields exposed to customers and cashiers. The account number is masked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillView {
    pub id: i32,
    pub payment_id: i32,
    pub product_names: String,
    pub product_quantities: String,
    pub subtotal: String,
    pub total: String,
    pub bank_name: String,
    pub masked_account_number: String,
    pub created_at: NaiveDateTime,
}

impl From<&Bill> for BillView {
    fn from(bill: &Bill) -> Self {
        Self {
            id: bill.id,
            payment_id: bill.payment_id,
            product_names: bill.product_names.clone(),
            product_quantities: bill.product_quantities.clone(),
            subtotal: bill.subtotal_formatted(),
            total: bill.total_formatted(),
            bank_name: bill.bank_name.clone(),
            masked_account_number: bill.masked_account_number(),
            created_at: bill.created_at,
        }
    }
}

/// Bill of one of the customer's approved orders.
pub fn load_bill<R>(repo: &R, user: &AuthenticatedCustomer, payment_id: i32) -> ServiceResult<Bill>
where
    R: OrderReader + ?Sized,
{
    let order = repo
        .get_order_by_id(payment_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    if order.username != user.username {
        return Err(ServiceError::Unauthorized);
    }

    if order.status != OrderStatus::Approved {
        return Err(ServiceError::Form(
            "Bill not available for non-approved orders".to_string(),
        ));
    }

    repo.get_bill_by_payment_id(payment_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)
}

/// Bank details shown pre-filled at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetailsView {
    pub bank_name: String,
    pub account_holder_name: String,
    pub account_number: String,
}

impl From<CustomerPayment> for PaymentDetailsView {
    fn from(payment: CustomerPayment) -> Self {
        Self {
            bank_name: payment.bank_name,
            account_holder_name: payment.account_holder_name,
            account_number: payment.account_number,
        }
    }
}

pub fn latest_payment_details<R>(
    repo: &R,
    user: &AuthenticatedCustomer,
) -> ServiceResult<Option<PaymentDetailsView>>
where
    R: CustomerReader + ?Sized,
{
    Ok(repo
        .get_latest_payment_details(&user.username)
        .map_err(ServiceError::from)?
        .map(PaymentDetailsView::from))
}
