use std::collections::HashMap;
use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::http::{StatusCode, header};
use actix_web::{FromRequest, HttpRequest, HttpResponse, web};
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use serde::Serialize;
use serde_json::{Map, Value, json};
use tera::{Context, Tera};

use crate::domain::auth::{AuthenticatedCustomer, AuthenticatedEmployee, SessionIdentity};
use crate::domain::delivery_assignment::TransitionErrorKind;
use crate::domain::money::format_cents;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::auth::current_employee;

pub mod auth;
pub mod catalog;
pub mod checkout;
pub mod delivery_assignments;
pub mod delivery_persons;
pub mod orders;
pub mod payments;
pub mod products;

const NOT_LOGGED_IN: &str = "User not logged in";

fn session_identity(req: &HttpRequest) -> Option<SessionIdentity> {
    let identity = req.get_identity().ok()?;
    let id = identity.id().ok()?;
    SessionIdentity::decode(&id)
}

fn not_logged_in() -> actix_web::Error {
    InternalError::from_response(
        NOT_LOGGED_IN,
        json_error(StatusCode::UNAUTHORIZED, NOT_LOGGED_IN),
    )
    .into()
}

impl FromRequest for AuthenticatedCustomer {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(match session_identity(req) {
            Some(SessionIdentity::Customer(customer)) => Ok(customer),
            _ => Err(not_logged_in()),
        })
    }
}

impl FromRequest for AuthenticatedEmployee {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(employee_from_session(req))
    }
}

/// The session employee as currently stored. Deactivated or removed accounts
/// are treated as logged out.
fn employee_from_session(req: &HttpRequest) -> Result<AuthenticatedEmployee, actix_web::Error> {
    let Some(SessionIdentity::Employee(session)) = session_identity(req) else {
        return Err(not_logged_in());
    };

    let Some(repo) = req.app_data::<web::Data<DieselRepository>>() else {
        log::error!("Employee session cannot be verified without a repository");
        return Err(internal_error());
    };

    match current_employee(repo.get_ref(), &session) {
        Ok(Some(employee)) => Ok(employee),
        Ok(None) => {
            log::info!("Session of employee {} is no longer valid", session.empid);
            Err(not_logged_in())
        }
        Err(err) => {
            log::error!("Failed to verify session of employee {}: {err}", session.empid);
            Err(internal_error())
        }
    }
}

fn internal_error() -> actix_web::Error {
    InternalError::from_response(
        "internal error",
        json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
    )
    .into()
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

#[derive(Serialize)]
struct Alert {
    level: &'static str,
    message: String,
}

/// Template context with the pending flash messages under `alerts`.
pub fn base_context(flash_messages: &IncomingFlashMessages, current_page: &str) -> Context {
    let alerts: Vec<Alert> = flash_messages
        .iter()
        .map(|message| Alert {
            level: match message.level() {
                Level::Error => "danger",
                Level::Warning => "warning",
                Level::Success => "success",
                _ => "info",
            },
            message: message.content().to_string(),
        })
        .collect();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_page", current_page);
    context
}

/// `{{ product.price_cents | cents }}` renders `1547` as `15.47`.
fn cents_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let cents = value
        .as_i64()
        .ok_or_else(|| tera::Error::msg("Filter `cents` expects an integer"))?;
    Ok(Value::String(format_cents(cents)))
}

/// Load every template under `pattern` and register the shared filters.
pub fn build_templates(pattern: &str) -> tera::Result<Tera> {
    let mut tera = Tera::new(pattern)?;
    tera.register_filter("cents", cents_filter);
    Ok(tera)
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// `{"success": true, "message": ..}` merged with the fields of `payload`.
pub fn json_success(status: StatusCode, message: &str, payload: Value) -> HttpResponse {
    let mut body = Map::new();
    body.insert("success".to_string(), Value::Bool(true));
    body.insert("message".to_string(), Value::String(message.to_string()));
    if let Value::Object(fields) = payload {
        body.extend(fields);
    }
    HttpResponse::build(status).json(Value::Object(body))
}

pub fn json_ok(message: &str, payload: Value) -> HttpResponse {
    json_success(StatusCode::OK, message, payload)
}

pub fn json_error(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(json!({
        "success": false,
        "message": message,
    }))
}

/// Translate a service failure into the JSON envelope.
///
/// `action` describes what was attempted and is used as the client message
/// for internal failures, whose details only go to the log.
pub fn service_error_response(err: ServiceError, action: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => json_error(StatusCode::FORBIDDEN, "Access denied"),
        ServiceError::NotFound => json_error(StatusCode::NOT_FOUND, "Not found"),
        ServiceError::Form(message) => json_error(StatusCode::BAD_REQUEST, &message),
        ServiceError::Conflict(message) => json_error(StatusCode::CONFLICT, &message),
        ServiceError::Transition(err) => {
            let kind = match err.kind() {
                TransitionErrorKind::BadReference => "bad_reference",
                TransitionErrorKind::IllegalState => "illegal_state",
            };
            HttpResponse::Conflict().json(json!({
                "success": false,
                "message": err.to_string(),
                "error": kind,
            }))
        }
        ServiceError::Internal(message) => {
            log::error!("{action}: {message}");
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": action,
                "error": "internal_error",
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;

    use super::*;
    use crate::domain::delivery_assignment::TransitionError;

    async fn body_json(response: HttpResponse) -> Value {
        let bytes = to_bytes(response.into_body()).await.unwrap_or_default();
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    }

    #[actix_web::test]
    async fn success_envelope_flattens_the_payload() {
        let response = json_ok("Orders retrieved successfully", json!({ "count": 2 }));
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Orders retrieved successfully");
        assert_eq!(body["count"], 2);
    }

    #[actix_web::test]
    async fn transition_errors_carry_their_kind() {
        let response = service_error_response(
            ServiceError::Transition(TransitionError::DeliveryPersonNotFound(3)),
            "Failed to reassign",
        );
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = body_json(response).await;
        assert_eq!(body["error"], "bad_reference");
        assert_eq!(body["message"], "Delivery person not found with ID: 3");
    }

    #[actix_web::test]
    async fn internal_errors_hide_details() {
        let response = service_error_response(
            ServiceError::Internal("disk I/O error".to_string()),
            "Failed to place order",
        );
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Failed to place order");
    }

    #[test]
    fn cents_filter_formats_integers() {
        let mut tera = Tera::default();
        tera.register_filter("cents", cents_filter);
        tera.add_raw_template("price", "{{ price | cents }}").unwrap();

        let mut context = Context::new();
        context.insert("price", &1547);
        assert_eq!(tera.render("price", &context).unwrap(), "15.47");
    }

    #[test]
    fn form_and_conflict_map_to_client_errors() {
        assert_eq!(
            service_error_response(ServiceError::Form("bad".into()), "x").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            service_error_response(ServiceError::Conflict("taken".into()), "x").status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            service_error_response(ServiceError::Unauthorized, "x").status(),
            StatusCode::FORBIDDEN
        );
    }
}
