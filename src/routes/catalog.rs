use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use serde_json::json;
use tera::Tera;

use crate::domain::auth::AuthenticatedCustomer;
use crate::repository::DieselRepository;
use crate::routes::{base_context, json_ok, render_template, service_error_response};
use crate::services::{ServiceError, catalog};

#[get("/")]
pub async fn show_index() -> impl Responder {
    crate::routes::redirect("/shopping")
}

#[get("/shopping")]
pub async fn show_shopping(
    params: web::Query<catalog::ShoppingQuery>,
    customer: Option<AuthenticatedCustomer>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match catalog::load_shopping_page(repo.get_ref(), params.into_inner()) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, "shopping");
            context.insert("customer", &customer);
            context.insert("products", &data.products);
            context.insert("categories", &data.categories);
            context.insert("selected_category", &data.selected_category);
            context.insert("search", &data.search);
            render_template(&tera, "shopping/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to load the shop page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/shopping/product/{product_id}")]
pub async fn show_product(
    product_id: web::Path<i32>,
    customer: Option<AuthenticatedCustomer>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match catalog::load_product_page(repo.get_ref(), product_id.into_inner()) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, "shopping");
            context.insert("customer", &customer);
            context.insert("product", &data.product);
            context.insert("related_products", &data.related);
            render_template(&tera, "shopping/product.html", &context)
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to load product page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Body is a JSON array of product ids.
#[post("/api/products/stock-status")]
pub async fn stock_status(
    repo: web::Data<DieselRepository>,
    web::Json(product_ids): web::Json<Vec<i32>>,
) -> impl Responder {
    match catalog::stock_status(repo.get_ref(), &product_ids) {
        Ok(status) => json_ok("Stock status retrieved", json!({ "stockStatus": status })),
        Err(err) => service_error_response(err, "Failed to get stock status"),
    }
}
