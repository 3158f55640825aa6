use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, delete, get, patch, post, put, web};
use serde_json::json;

use crate::domain::auth::AuthenticatedEmployee;
use crate::forms::delivery::{DeliveryPersonForm, SearchQuery};
use crate::repository::DieselRepository;
use crate::routes::{json_error, json_ok, service_error_response};
use crate::services::{ServiceError, delivery_persons};

fn person_not_found(id: i32) -> HttpResponse {
    json_error(
        StatusCode::NOT_FOUND,
        &format!("Delivery person not found with ID: {id}"),
    )
}

#[get("/api/delivery-persons")]
pub async fn list_delivery_persons(
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delivery_persons::list_delivery_persons(repo.get_ref(), &user) {
        Ok(persons) => HttpResponse::Ok().json(persons),
        Err(err) => service_error_response(err, "Failed to retrieve delivery persons"),
    }
}

#[get("/api/delivery-persons/active")]
pub async fn list_active_delivery_persons(
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delivery_persons::list_active_delivery_persons(repo.get_ref(), &user) {
        Ok(persons) => HttpResponse::Ok().json(persons),
        Err(err) => service_error_response(err, "Failed to retrieve active delivery persons"),
    }
}

#[get("/api/delivery-persons/vehicle-type/{vehicle_type}")]
pub async fn list_by_vehicle_type(
    vehicle_type: web::Path<String>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delivery_persons::list_by_vehicle_type(repo.get_ref(), &user, &vehicle_type) {
        Ok(persons) => HttpResponse::Ok().json(persons),
        Err(err) => service_error_response(
            err,
            "Failed to retrieve delivery persons by vehicle type",
        ),
    }
}

#[get("/api/delivery-persons/search")]
pub async fn search_delivery_persons(
    params: web::Query<SearchQuery>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delivery_persons::search_delivery_persons(repo.get_ref(), &user, &params) {
        Ok(persons) => HttpResponse::Ok().json(persons),
        Err(err) => service_error_response(err, "Failed to search delivery persons"),
    }
}

#[get("/api/delivery-persons/{id:\\d+}")]
pub async fn get_delivery_person(
    id: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let id = id.into_inner();
    match delivery_persons::get_delivery_person(repo.get_ref(), &user, id) {
        Ok(person) => HttpResponse::Ok().json(person),
        Err(ServiceError::NotFound) => person_not_found(id),
        Err(err) => service_error_response(err, "Failed to retrieve delivery person"),
    }
}

#[post("/api/delivery-persons")]
pub async fn create_delivery_person(
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<DeliveryPersonForm>,
) -> impl Responder {
    match delivery_persons::create_delivery_person(repo.get_ref(), &user, form) {
        Ok(person) => HttpResponse::Created().json(person),
        Err(err) => service_error_response(err, "Failed to create delivery person"),
    }
}

#[put("/api/delivery-persons/{id:\\d+}")]
pub async fn update_delivery_person(
    id: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<DeliveryPersonForm>,
) -> impl Responder {
    let id = id.into_inner();
    match delivery_persons::update_delivery_person(repo.get_ref(), &user, id, form) {
        Ok(person) => HttpResponse::Ok().json(person),
        Err(ServiceError::NotFound) => person_not_found(id),
        Err(err) => service_error_response(err, "Failed to update delivery person"),
    }
}

#[delete("/api/delivery-persons/{id:\\d+}")]
pub async fn soft_delete_delivery_person(
    id: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let id = id.into_inner();
    match delivery_persons::soft_delete_delivery_person(repo.get_ref(), &user, id) {
        Ok(_) => json_ok("Delivery person soft deleted successfully", json!({})),
        Err(ServiceError::NotFound) => person_not_found(id),
        Err(err) => service_error_response(err, "Failed to delete delivery person"),
    }
}

#[delete("/api/delivery-persons/{id:\\d+}/hard")]
pub async fn hard_delete_delivery_person(
    id: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let id = id.into_inner();
    match delivery_persons::hard_delete_delivery_person(repo.get_ref(), &user, id) {
        Ok(()) => json_ok("Delivery person permanently deleted successfully", json!({})),
        Err(ServiceError::NotFound) => person_not_found(id),
        Err(err) => service_error_response(err, "Failed to permanently delete delivery person"),
    }
}

#[patch("/api/delivery-persons/{id:\\d+}/activate")]
pub async fn activate_delivery_person(
    id: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let id = id.into_inner();
    match delivery_persons::activate_delivery_person(repo.get_ref(), &user, id) {
        Ok(person) => json_ok(
            "Delivery person activated successfully",
            json!({ "deliveryPerson": person }),
        ),
        Err(ServiceError::NotFound) => person_not_found(id),
        Err(err) => service_error_response(err, "Failed to activate delivery person"),
    }
}

#[patch("/api/delivery-persons/{id:\\d+}/deactivate")]
pub async fn deactivate_delivery_person(
    id: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let id = id.into_inner();
    match delivery_persons::deactivate_delivery_person(repo.get_ref(), &user, id) {
        Ok(person) => json_ok(
            "Delivery person deactivated successfully",
            json!({ "deliveryPerson": person }),
        ),
        Err(ServiceError::NotFound) => person_not_found(id),
        Err(err) => service_error_response(err, "Failed to deactivate delivery person"),
    }
}
