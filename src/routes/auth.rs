use actix_identity::Identity;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::config::ServerConfig;
use crate::domain::auth::{AuthenticatedEmployee, SessionIdentity};
use crate::domain::employee::EmployeeType;
use crate::forms::auth::{EmployeeLoginForm, LoginForm, SignupForm};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, auth};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPageQuery {
    pub return_url: Option<String>,
}

fn remember(req: &HttpRequest, identity: SessionIdentity) -> Result<(), HttpResponse> {
    Identity::login(&req.extensions(), identity.encode())
        .map(|_| ())
        .map_err(|err| {
            log::error!("Failed to store session identity: {err}");
            HttpResponse::InternalServerError().finish()
        })
}

#[get("/login")]
pub async fn show_login(
    params: web::Query<LoginPageQuery>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = base_context(&flash_messages, "login");
    context.insert("return_url", &params.return_url);
    render_template(&tera, "auth/login.html", &context)
}

#[post("/login")]
pub async fn login(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    match auth::login_customer(repo.get_ref(), &form) {
        Ok(login) => {
            if let Err(response) = remember(&req, SessionIdentity::Customer(login.identity)) {
                return response;
            }
            FlashMessage::success(format!("Welcome back, {}!", login.first_name)).send();
            redirect(&form.redirect_target())
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/login")
        }
        Err(err) => {
            log::error!("Failed to log in customer: {err}");
            FlashMessage::error("Login failed. Please try again.").send();
            redirect("/login")
        }
    }
}

#[get("/signup")]
pub async fn show_signup(
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(&flash_messages, "signup");
    render_template(&tera, "auth/signup.html", &context)
}

#[post("/signup")]
pub async fn signup(
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<SignupForm>,
) -> impl Responder {
    match auth::signup_customer(repo.get_ref(), form, server_config.password_cost) {
        Ok(_) => {
            FlashMessage::success("Account created successfully! Please login.").send();
            redirect("/login")
        }
        Err(ServiceError::Form(message) | ServiceError::Conflict(message)) => {
            FlashMessage::error(message).send();
            redirect("/signup")
        }
        Err(err) => {
            log::error!("Failed to register customer: {err}");
            FlashMessage::error("Registration failed. Please try again.").send();
            redirect("/signup")
        }
    }
}

#[post("/logout")]
pub async fn logout(identity: Option<Identity>) -> impl Responder {
    if let Some(identity) = identity {
        identity.logout();
    }
    FlashMessage::info("You have been logged out successfully.").send();
    redirect("/login")
}

#[get("/employee/login")]
pub async fn show_employee_login(
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = base_context(&flash_messages, "employee_login");
    let employee_types: Vec<(&str, &str)> = EmployeeType::ALL
        .iter()
        .map(|kind| (kind.as_str(), kind.display_name()))
        .collect();
    context.insert("employee_types", &employee_types);
    render_template(&tera, "employee/login.html", &context)
}

#[post("/employee/login")]
pub async fn employee_login(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<EmployeeLoginForm>,
) -> impl Responder {
    match auth::login_employee(repo.get_ref(), &form) {
        Ok(employee) => {
            let greeting = format!(
                "Welcome, {} ({})!",
                employee.empid,
                employee.employee_type.display_name()
            );
            if let Err(response) = remember(&req, SessionIdentity::Employee(employee)) {
                return response;
            }
            FlashMessage::success(greeting).send();
            redirect("/employee/dashboard")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/employee/login")
        }
        Err(err) => {
            log::error!("Failed to log in employee: {err}");
            FlashMessage::error("Login failed. Please try again.").send();
            redirect("/employee/login")
        }
    }
}

#[post("/employee/logout")]
pub async fn employee_logout(identity: Option<Identity>) -> impl Responder {
    if let Some(identity) = identity {
        identity.logout();
    }
    FlashMessage::info("You have been logged out successfully.").send();
    redirect("/employee/login")
}

#[get("/employee/dashboard")]
pub async fn show_employee_dashboard(
    employee: Option<AuthenticatedEmployee>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let Some(employee) = employee else {
        return redirect("/employee/login");
    };

    let mut context = base_context(&flash_messages, "dashboard");
    context.insert("employee", &employee);
    context.insert("role_name", employee.employee_type.display_name());
    render_template(&tera, "employee/dashboard.html", &context)
}
