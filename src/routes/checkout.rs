use actix_multipart::form::MultipartForm;
use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, Responder, get, post, web};
use serde_json::json;
use tera::{Context, Tera};

use crate::config::ServerConfig;
use crate::domain::auth::AuthenticatedCustomer;
use crate::forms::checkout::{PaymentDetailsForm, PaymentSlipForm, PlaceOrderForm};
use crate::repository::DieselRepository;
use crate::routes::{json_error, json_ok, service_error_response};
use crate::services::checkout::{self, BillView};
use crate::services::ServiceError;

#[post("/upload-payment-slip")]
pub async fn upload_payment_slip(
    customer: AuthenticatedCustomer,
    server_config: web::Data<ServerConfig>,
    MultipartForm(form): MultipartForm<PaymentSlipForm>,
) -> impl Responder {
    match checkout::upload_payment_slip(&customer, form, &server_config.payslip_dir) {
        Ok(filename) => json_ok(
            "Payment slip uploaded successfully",
            json!({ "filename": filename }),
        ),
        Err(err) => service_error_response(err, "Failed to upload file"),
    }
}

#[post("/save-payment-details")]
pub async fn save_payment_details(
    customer: AuthenticatedCustomer,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<PaymentDetailsForm>,
) -> impl Responder {
    match checkout::save_payment_details(repo.get_ref(), &customer, form) {
        Ok(_) => json_ok("Payment details saved successfully", json!({})),
        Err(err) => service_error_response(err, "Failed to save payment details"),
    }
}

#[post("/place-order")]
pub async fn place_order(
    customer: AuthenticatedCustomer,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<PlaceOrderForm>,
) -> impl Responder {
    match checkout::place_order(repo.get_ref(), &customer, form) {
        Ok(order) => json_ok("Order placed successfully", json!({ "paymentId": order.id })),
        Err(err) => service_error_response(err, "Failed to place order"),
    }
}

#[get("/orders")]
pub async fn list_my_orders(
    customer: AuthenticatedCustomer,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match checkout::load_order_history(repo.get_ref(), &customer) {
        Ok(orders) => json_ok(
            "Orders retrieved successfully",
            json!({ "count": orders.len(), "orders": orders }),
        ),
        Err(err) => service_error_response(err, "Failed to load orders"),
    }
}

fn bill_error(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::NotFound => json_error(StatusCode::NOT_FOUND, "Bill not found"),
        ServiceError::Unauthorized => json_error(StatusCode::FORBIDDEN, "Unauthorized access"),
        other => service_error_response(other, "Failed to retrieve bill"),
    }
}

#[get("/get-order-bill/{payment_id}")]
pub async fn get_order_bill(
    payment_id: web::Path<i32>,
    customer: AuthenticatedCustomer,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match checkout::load_bill(repo.get_ref(), &customer, payment_id.into_inner()) {
        Ok(bill) => json_ok("Bill retrieved", json!({ "data": BillView::from(&bill) })),
        Err(err) => bill_error(err),
    }
}

/// Invoice rendered as a standalone HTML attachment.
#[get("/download-bill/{payment_id}")]
pub async fn download_bill(
    payment_id: web::Path<i32>,
    customer: AuthenticatedCustomer,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let bill = match checkout::load_bill(repo.get_ref(), &customer, payment_id.into_inner()) {
        Ok(bill) => bill,
        Err(err) => return bill_error(err),
    };

    let mut context = Context::new();
    context.insert("bill", &BillView::from(&bill));
    context.insert("lines", &bill.lines());
    context.insert("customer", &customer);

    match tera.render("bills/invoice.html", &context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"bill_{}.html\"", bill.id),
            ))
            .body(body),
        Err(err) => {
            log::error!("Failed to render bill {}: {err}", bill.id);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate bill")
        }
    }
}

#[get("/get-customer-payment-details")]
pub async fn get_customer_payment_details(
    customer: AuthenticatedCustomer,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match checkout::latest_payment_details(repo.get_ref(), &customer) {
        Ok(Some(details)) => json_ok("Payment details retrieved", json!({ "data": details })),
        Ok(None) => json_ok("No payment details found", json!({ "data": null })),
        Err(err) => service_error_response(err, "Failed to load payment details"),
    }
}
