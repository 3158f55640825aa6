use actix_files::NamedFile;
use actix_web::http::StatusCode;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpRequest, HttpResponse, Responder, delete, get, post, web};
use serde::Deserialize;
use serde_json::json;

use crate::config::ServerConfig;
use crate::domain::auth::AuthenticatedEmployee;
use crate::repository::DieselRepository;
use crate::routes::{json_error, json_ok, service_error_response};
use crate::services::{ServiceError, payments};

const PAYMENT_NOT_FOUND: &str = "Payment not found";

#[derive(Debug, Deserialize)]
pub struct StatusParams {
    pub status: String,
}

#[get("/api/payments")]
pub async fn list_payments(
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match payments::list_payments(repo.get_ref(), &user) {
        Ok(cards) => json_ok("Payments retrieved successfully", json!({ "payments": cards })),
        Err(err) => service_error_response(err, "Failed to fetch payments"),
    }
}

#[post("/api/payments/{payment_id}/status")]
pub async fn update_payment_status(
    payment_id: web::Path<i32>,
    params: web::Query<StatusParams>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match payments::update_payment_status(
        repo.get_ref(),
        &user,
        payment_id.into_inner(),
        &params.status,
    ) {
        Ok(order) => json_ok(
            "Payment status updated successfully",
            json!({ "newStatus": order.status }),
        ),
        Err(ServiceError::NotFound) => json_error(StatusCode::NOT_FOUND, PAYMENT_NOT_FOUND),
        Err(err) => service_error_response(err, "Failed to update payment status"),
    }
}

#[get("/api/payments/{payment_id}/stock-check")]
pub async fn check_stock(
    payment_id: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match payments::check_stock(repo.get_ref(), &user, payment_id.into_inner()) {
        Ok(check) => json_ok(
            &check.message,
            json!({ "stockDetails": check.stock_details, "canApprove": check.can_approve }),
        ),
        Err(ServiceError::NotFound) => json_error(StatusCode::NOT_FOUND, PAYMENT_NOT_FOUND),
        Err(err) => service_error_response(err, "Failed to check stock availability"),
    }
}

#[get("/api/order-summary")]
pub async fn order_summary(
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match payments::order_summary(repo.get_ref(), &user) {
        Ok(summary) => json_ok("Order summary retrieved", json!({ "summary": summary })),
        Err(err) => service_error_response(err, "Failed to fetch order summary"),
    }
}

#[delete("/api/payments/{payment_id}")]
pub async fn delete_payment(
    payment_id: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match payments::delete_payment(repo.get_ref(), &user, payment_id.into_inner()) {
        Ok(message) => json_ok(&message, json!({})),
        Err(ServiceError::NotFound) => json_error(StatusCode::NOT_FOUND, "Order not found"),
        Err(err) => service_error_response(err, "Failed to delete order"),
    }
}

/// Uploaded payment slip, shown inline to cashiers.
#[get("/payslips/{file_name}")]
pub async fn serve_payslip(
    req: HttpRequest,
    file_name: web::Path<String>,
    user: AuthenticatedEmployee,
    server_config: web::Data<ServerConfig>,
) -> HttpResponse {
    let file_name = file_name.into_inner();
    let path = match payments::payslip_path(&user, &server_config.payslip_dir, &file_name) {
        Ok(path) => path,
        Err(ServiceError::Unauthorized) => return HttpResponse::Forbidden().finish(),
        Err(ServiceError::NotFound) => return HttpResponse::NotFound().finish(),
        Err(ServiceError::Form(_)) => return HttpResponse::BadRequest().finish(),
        Err(err) => {
            log::error!("Failed to resolve payslip {file_name}: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    match NamedFile::open(&path) {
        Ok(file) => file
            .set_content_disposition(ContentDisposition {
                disposition: DispositionType::Inline,
                parameters: vec![DispositionParam::Filename(file_name)],
            })
            .into_response(&req),
        Err(err) => {
            log::error!("Failed to open payslip {}: {err}", path.display());
            HttpResponse::InternalServerError().finish()
        }
    }
}
