use actix_multipart::form::MultipartForm;
use actix_web::http::StatusCode;
use actix_web::{Responder, delete, get, post, put, web};
use serde_json::json;

use crate::domain::auth::AuthenticatedEmployee;
use crate::forms::products::{ProductForm, StockForm, UploadProductsForm};
use crate::repository::DieselRepository;
use crate::routes::{json_error, json_ok, json_success, service_error_response};
use crate::services::{ServiceError, products};

const PRODUCT_NOT_FOUND: &str = "Product not found";

#[get("/api/products")]
pub async fn list_products(
    params: web::Query<products::ManageProductsQuery>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match products::list_products(repo.get_ref(), &user, params.into_inner()) {
        Ok(page) => json_ok("Products retrieved successfully", json!({ "products": page })),
        Err(err) => service_error_response(err, "Failed to list products"),
    }
}

#[post("/api/products")]
pub async fn create_product(
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ProductForm>,
) -> impl Responder {
    match products::create_product(repo.get_ref(), &user, form) {
        Ok(product) => json_success(
            StatusCode::CREATED,
            &format!("Product '{}' added successfully!", product.name),
            json!({ "product": product }),
        ),
        Err(err) => service_error_response(err, "Failed to add product"),
    }
}

#[put("/api/products/{product_id}")]
pub async fn update_product(
    product_id: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ProductForm>,
) -> impl Responder {
    match products::update_product(repo.get_ref(), &user, product_id.into_inner(), form) {
        Ok(product) => json_ok(
            &format!("Product '{}' updated successfully!", product.name),
            json!({ "product": product }),
        ),
        Err(ServiceError::NotFound) => json_error(StatusCode::NOT_FOUND, PRODUCT_NOT_FOUND),
        Err(err) => service_error_response(err, "Failed to update product"),
    }
}

#[delete("/api/products/{product_id}")]
pub async fn delete_product(
    product_id: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match products::delete_product(repo.get_ref(), &user, product_id.into_inner()) {
        Ok(product) => json_ok(
            &format!("Product '{}' deleted successfully!", product.name),
            json!({}),
        ),
        Err(ServiceError::NotFound) => json_error(StatusCode::NOT_FOUND, PRODUCT_NOT_FOUND),
        Err(err) => service_error_response(err, "Failed to delete product"),
    }
}

#[post("/api/products/{product_id}/stock")]
pub async fn update_stock(
    product_id: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<StockForm>,
) -> impl Responder {
    match products::update_stock(repo.get_ref(), &user, product_id.into_inner(), form) {
        Ok(product) => json_ok(
            &format!("Stock updated for '{}'", product.name),
            json!({ "product": product }),
        ),
        Err(ServiceError::NotFound) => json_error(StatusCode::NOT_FOUND, PRODUCT_NOT_FOUND),
        Err(err) => service_error_response(err, "Failed to update stock"),
    }
}

#[post("/api/products/upload")]
pub async fn upload_products(
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
    MultipartForm(form): MultipartForm<UploadProductsForm>,
) -> impl Responder {
    match products::import_products(repo.get_ref(), &user, form) {
        Ok(count) => json_ok(
            &format!("Successfully imported {count} products."),
            json!({ "count": count }),
        ),
        Err(err) => service_error_response(err, "Failed to import products"),
    }
}

#[post("/api/products/clear-all")]
pub async fn clear_all_products(
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match products::clear_all_products(repo.get_ref(), &user) {
        Ok(count) => json_ok(
            &format!("Successfully deleted {count} products."),
            json!({ "count": count }),
        ),
        Err(err) => service_error_response(err, "Failed to clear products"),
    }
}

#[get("/api/categories")]
pub async fn list_categories(
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match products::list_categories(repo.get_ref(), &user) {
        Ok(categories) => json_ok(
            "Categories retrieved successfully",
            json!({ "categories": categories }),
        ),
        Err(err) => service_error_response(err, "Failed to list categories"),
    }
}
