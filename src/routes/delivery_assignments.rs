use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, delete, get, post, put, web};
use serde_json::json;

use crate::domain::auth::AuthenticatedEmployee;
use crate::domain::delivery_assignment::DeliveryAssignment;
use crate::forms::delivery::{
    CancelRequest, CreateAssignmentRequest, DateRangeQuery, NoteRequest, OverdueQuery,
    ReassignRequest, SearchQuery, UpdateNotesRequest,
};
use crate::repository::DieselRepository;
use crate::routes::{json_error, json_ok, json_success, service_error_response};
use crate::services::{ServiceError, ServiceResult, delivery_assignments};

/// Envelope shared by every state change.
fn changed(result: ServiceResult<DeliveryAssignment>, message: &str, action: &str) -> HttpResponse {
    match result {
        Ok(assignment) => json_ok(message, json!({ "assignment": assignment })),
        Err(err) => service_error_response(err, action),
    }
}

fn listed(result: ServiceResult<Vec<DeliveryAssignment>>, action: &str) -> HttpResponse {
    match result {
        Ok(assignments) => HttpResponse::Ok().json(assignments),
        Err(err) => service_error_response(err, action),
    }
}

#[get("/api/delivery-assignments")]
pub async fn list_assignments(
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    listed(
        delivery_assignments::list_assignments(repo.get_ref(), &user),
        "Failed to retrieve delivery assignments",
    )
}

#[post("/api/delivery-assignments")]
pub async fn create_assignment(
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
    web::Json(request): web::Json<CreateAssignmentRequest>,
) -> impl Responder {
    match delivery_assignments::create_assignment(repo.get_ref(), &user, request) {
        Ok(assignment) => json_success(
            StatusCode::CREATED,
            "Assignment created successfully",
            json!({ "assignment": assignment }),
        ),
        Err(err) => service_error_response(err, "Failed to create assignment"),
    }
}

#[get("/api/delivery-assignments/{id:\\d+}")]
pub async fn get_assignment(
    id: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delivery_assignments::get_assignment(repo.get_ref(), &user, id.into_inner()) {
        Ok(assignment) => HttpResponse::Ok().json(assignment),
        Err(ServiceError::NotFound) => json_error(StatusCode::NOT_FOUND, "Assignment not found"),
        Err(err) => service_error_response(err, "Failed to retrieve assignment"),
    }
}

#[get("/api/delivery-assignments/delivery-person/{person_id:\\d+}")]
pub async fn assignments_for_person(
    person_id: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    listed(
        delivery_assignments::assignments_for_person(repo.get_ref(), &user, person_id.into_inner()),
        "Failed to retrieve assignments for delivery person",
    )
}

#[get("/api/delivery-assignments/delivery-person/{person_id:\\d+}/active")]
pub async fn active_assignments_for_person(
    person_id: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    listed(
        delivery_assignments::active_assignments_for_person(
            repo.get_ref(),
            &user,
            person_id.into_inner(),
        ),
        "Failed to retrieve active assignments for delivery person",
    )
}

#[get("/api/delivery-assignments/delivery-person/{person_id:\\d+}/stats")]
pub async fn person_stats(
    person_id: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delivery_assignments::person_stats(repo.get_ref(), &user, person_id.into_inner()) {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(err) => service_error_response(err, "Failed to retrieve delivery person statistics"),
    }
}

#[get("/api/delivery-assignments/order/{order_id:\\d+}")]
pub async fn assignment_for_order(
    order_id: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delivery_assignments::assignment_for_order(repo.get_ref(), &user, order_id.into_inner()) {
        Ok(assignment) => HttpResponse::Ok().json(assignment),
        Err(ServiceError::NotFound) => json_error(
            StatusCode::NOT_FOUND,
            "No assignment found for this order",
        ),
        Err(err) => service_error_response(err, "Failed to retrieve assignment for order"),
    }
}

#[get("/api/delivery-assignments/order/{order_id:\\d+}/has-assignment")]
pub async fn has_assignment(
    order_id: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delivery_assignments::has_assignment(repo.get_ref(), &user, order_id.into_inner()) {
        Ok(found) => HttpResponse::Ok().json(json!({ "hasAssignment": found })),
        Err(err) => service_error_response(err, "Failed to check assignment"),
    }
}

#[get("/api/delivery-assignments/status/{status}")]
pub async fn assignments_by_status(
    status: web::Path<String>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    listed(
        delivery_assignments::assignments_by_status(repo.get_ref(), &user, &status),
        "Failed to retrieve assignments by status",
    )
}

#[put("/api/delivery-assignments/{id:\\d+}/pickup")]
pub async fn mark_picked_up(
    id: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
    body: Option<web::Json<NoteRequest>>,
) -> impl Responder {
    let request = body.map(web::Json::into_inner).unwrap_or_default();
    changed(
        delivery_assignments::mark_picked_up(repo.get_ref(), &user, id.into_inner(), request),
        "Assignment marked as picked up",
        "Failed to mark assignment as picked up",
    )
}

#[put("/api/delivery-assignments/{id:\\d+}/deliver")]
pub async fn mark_delivered(
    id: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
    body: Option<web::Json<NoteRequest>>,
) -> impl Responder {
    let request = body.map(web::Json::into_inner).unwrap_or_default();
    changed(
        delivery_assignments::mark_delivered(repo.get_ref(), &user, id.into_inner(), request),
        "Assignment marked as delivered",
        "Failed to mark assignment as delivered",
    )
}

#[put("/api/delivery-assignments/{id:\\d+}/cancel")]
pub async fn cancel_assignment(
    id: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
    body: Option<web::Json<CancelRequest>>,
) -> impl Responder {
    let request = body.map(web::Json::into_inner).unwrap_or_default();
    changed(
        delivery_assignments::cancel_assignment(repo.get_ref(), &user, id.into_inner(), request),
        "Assignment cancelled successfully",
        "Failed to cancel assignment",
    )
}

#[put("/api/delivery-assignments/{id:\\d+}/reassign")]
pub async fn reassign(
    id: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
    web::Json(request): web::Json<ReassignRequest>,
) -> impl Responder {
    changed(
        delivery_assignments::reassign(repo.get_ref(), &user, id.into_inner(), request),
        "Assignment reassigned successfully",
        "Failed to reassign assignment",
    )
}

#[put("/api/delivery-assignments/{id:\\d+}/notes")]
pub async fn update_notes(
    id: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
    web::Json(request): web::Json<UpdateNotesRequest>,
) -> impl Responder {
    changed(
        delivery_assignments::update_notes(repo.get_ref(), &user, id.into_inner(), request),
        "Notes updated successfully",
        "Failed to update notes",
    )
}

#[delete("/api/delivery-assignments/{id:\\d+}")]
pub async fn delete_assignment(
    id: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delivery_assignments::delete_assignment(repo.get_ref(), &user, id.into_inner()) {
        Ok(_) => json_ok("Assignment deleted successfully", json!({})),
        Err(err) => service_error_response(err, "Failed to delete assignment"),
    }
}

#[get("/api/delivery-assignments/overdue")]
pub async fn overdue_assignments(
    params: web::Query<OverdueQuery>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    listed(
        delivery_assignments::overdue_assignments(repo.get_ref(), &user, &params),
        "Failed to retrieve overdue assignments",
    )
}

#[get("/api/delivery-assignments/date-range")]
pub async fn assignments_in_range(
    params: web::Query<DateRangeQuery>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    listed(
        delivery_assignments::assignments_in_range(repo.get_ref(), &user, &params),
        "Failed to retrieve assignments by date range",
    )
}

#[get("/api/delivery-assignments/search")]
pub async fn search_assignments(
    params: web::Query<SearchQuery>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    listed(
        delivery_assignments::search_assignments(repo.get_ref(), &user, &params),
        "Failed to search assignments",
    )
}

#[get("/api/delivery-assignments/stats")]
pub async fn assignment_stats(
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delivery_assignments::assignment_stats(repo.get_ref(), &user) {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(err) => service_error_response(err, "Failed to retrieve assignment statistics"),
    }
}

#[get("/api/delivery-assignments/available-delivery-persons")]
pub async fn available_delivery_persons(
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delivery_assignments::available_delivery_persons(repo.get_ref(), &user) {
        Ok(persons) => HttpResponse::Ok().json(persons),
        Err(err) => service_error_response(err, "Failed to retrieve available delivery persons"),
    }
}
