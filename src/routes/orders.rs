use actix_web::http::StatusCode;
use actix_web::{Responder, delete, get, post, put, web};
use serde_json::json;

use crate::domain::auth::AuthenticatedEmployee;
use crate::forms::checkout::{CreateOrderRequest, UpdateOrderRequest};
use crate::repository::DieselRepository;
use crate::routes::{json_error, json_ok, json_success, service_error_response};
use crate::services::{ServiceError, orders};

#[get("/api/orders")]
pub async fn list_orders(
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match orders::list_orders(repo.get_ref(), &user) {
        Ok(orders) => json_ok(
            "Orders retrieved successfully",
            json!({ "count": orders.len(), "data": orders }),
        ),
        Err(err) => service_error_response(err, "Failed to retrieve orders"),
    }
}

#[get("/api/orders/count")]
pub async fn count_orders(
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match orders::count_orders(repo.get_ref(), &user) {
        Ok(count) => json_ok("Order count retrieved successfully", json!({ "count": count })),
        Err(err) => service_error_response(err, "Failed to retrieve order count"),
    }
}

#[get("/api/orders/user/{username}")]
pub async fn list_orders_by_user(
    username: web::Path<String>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let username = username.into_inner();
    match orders::list_orders_by_user(repo.get_ref(), &user, &username) {
        Ok(orders) => json_ok(
            &format!("Orders retrieved successfully for user: {username}"),
            json!({ "count": orders.len(), "data": orders }),
        ),
        Err(err) => service_error_response(
            err,
            &format!("Failed to retrieve orders for user: {username}"),
        ),
    }
}

#[get("/api/orders/status/{status}")]
pub async fn list_orders_by_status(
    status: web::Path<String>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let status = status.into_inner();
    match orders::list_orders_by_status(repo.get_ref(), &user, &status) {
        Ok(orders) => json_ok(
            &format!("Orders retrieved successfully for status: {status}"),
            json!({ "count": orders.len(), "data": orders }),
        ),
        Err(err) => service_error_response(
            err,
            &format!("Failed to retrieve orders for status: {status}"),
        ),
    }
}

#[get("/api/orders/{order_id:\\d+}")]
pub async fn get_order(
    order_id: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let order_id = order_id.into_inner();
    match orders::get_order(repo.get_ref(), &user, order_id) {
        Ok(order) => json_ok("Order retrieved successfully", json!({ "data": order })),
        Err(ServiceError::NotFound) => json_error(
            StatusCode::NOT_FOUND,
            &format!("Order not found with ID: {order_id}"),
        ),
        Err(err) => service_error_response(err, "Failed to retrieve order"),
    }
}

#[post("/api/orders")]
pub async fn create_order(
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
    web::Json(request): web::Json<CreateOrderRequest>,
) -> impl Responder {
    match orders::create_order(repo.get_ref(), &user, request) {
        Ok(order) => json_success(
            StatusCode::CREATED,
            "Order created successfully",
            json!({ "data": order }),
        ),
        Err(err) => service_error_response(err, "Failed to create order"),
    }
}

#[put("/api/orders/{order_id:\\d+}")]
pub async fn update_order(
    order_id: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
    web::Json(request): web::Json<UpdateOrderRequest>,
) -> impl Responder {
    let order_id = order_id.into_inner();
    match orders::update_order(repo.get_ref(), &user, order_id, request) {
        Ok(order) => json_ok("Order updated successfully", json!({ "data": order })),
        Err(ServiceError::NotFound) => json_error(
            StatusCode::NOT_FOUND,
            &format!("Order not found with ID: {order_id}"),
        ),
        Err(err) => service_error_response(err, "Failed to update order"),
    }
}

#[delete("/api/orders/{order_id:\\d+}")]
pub async fn delete_order(
    order_id: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let order_id = order_id.into_inner();
    match orders::delete_order(repo.get_ref(), &user, order_id) {
        Ok(()) => json_ok("Order deleted successfully", json!({})),
        Err(ServiceError::NotFound) => json_error(
            StatusCode::NOT_FOUND,
            &format!("Order not found with ID: {order_id}"),
        ),
        Err(err) => service_error_response(err, "Failed to delete order"),
    }
}
