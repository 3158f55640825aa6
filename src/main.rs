use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use dotenvy::dotenv;

use smartcart::config::ServerConfig;
use smartcart::db::{establish_connection_pool, run_migrations};
use smartcart::repository::DieselRepository;
use smartcart::routes::auth::{
    employee_login, employee_logout, login, logout, show_employee_dashboard, show_employee_login,
    show_login, show_signup, signup,
};
use smartcart::routes::build_templates;
use smartcart::routes::catalog::{show_index, show_product, show_shopping, stock_status};
use smartcart::routes::checkout::{
    download_bill, get_customer_payment_details, get_order_bill, list_my_orders, place_order,
    save_payment_details, upload_payment_slip,
};
use smartcart::routes::delivery_assignments::{
    active_assignments_for_person, assignment_for_order, assignment_stats, assignments_by_status,
    assignments_for_person, assignments_in_range, available_delivery_persons, cancel_assignment,
    create_assignment, delete_assignment, get_assignment, has_assignment, list_assignments,
    mark_delivered, mark_picked_up, overdue_assignments, person_stats, reassign,
    search_assignments, update_notes,
};
use smartcart::routes::delivery_persons::{
    activate_delivery_person, create_delivery_person, deactivate_delivery_person,
    get_delivery_person, hard_delete_delivery_person, list_active_delivery_persons,
    list_by_vehicle_type, list_delivery_persons, search_delivery_persons,
    soft_delete_delivery_person, update_delivery_person,
};
use smartcart::routes::orders::{
    count_orders, create_order, delete_order, get_order, list_orders, list_orders_by_status,
    list_orders_by_user, update_order,
};
use smartcart::routes::payments::{
    check_stock, delete_payment, list_payments, order_summary, serve_payslip,
    update_payment_status,
};
use smartcart::routes::products::{
    clear_all_products, create_product, delete_product, list_categories, list_products,
    update_product, update_stock, upload_products,
};
use smartcart::services::seed::seed_sample_data;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let server_config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let secret_key = match &server_config.secret {
        Some(secret) => match Key::try_from(secret.as_bytes()) {
            Ok(key) => key,
            Err(e) => {
                log::error!("SECRET_KEY must be at least 64 bytes long: {e}");
                std::process::exit(1);
            }
        },
        None => {
            log::warn!("SECRET_KEY not set, sessions will not survive a restart");
            Key::generate()
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    match run_migrations(&pool) {
        Ok(applied) => log::info!("Applied {applied} pending migrations"),
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    }

    let repo = DieselRepository::new(pool);

    if server_config.seed_data {
        match seed_sample_data(&repo, server_config.password_cost) {
            Ok(report) => log::info!(
                "Sample data ready: {} products and {} employees inserted",
                report.products,
                report.employees
            ),
            Err(e) => log::error!("Failed to seed sample data: {e}"),
        }
    }

    if let Err(e) = std::fs::create_dir_all(&server_config.payslip_dir) {
        log::error!(
            "Failed to create payslip directory {}: {e}",
            server_config.payslip_dir.display()
        );
        std::process::exit(1);
    }

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = match build_templates("templates/**/*") {
        Ok(t) => t,
        Err(e) => {
            log::error!("Parsing error(s): {e}");
            std::process::exit(1);
        }
    };

    let address = server_config.address.clone();
    let port = server_config.port;
    let domain = server_config.domain.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(domain.clone()))
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            // Storefront and sessions
            .service(show_index)
            .service(show_shopping)
            .service(show_product)
            .service(stock_status)
            .service(show_login)
            .service(login)
            .service(show_signup)
            .service(signup)
            .service(logout)
            .service(show_employee_login)
            .service(employee_login)
            .service(employee_logout)
            .service(show_employee_dashboard)
            // Checkout
            .service(upload_payment_slip)
            .service(save_payment_details)
            .service(place_order)
            .service(list_my_orders)
            .service(get_order_bill)
            .service(download_bill)
            .service(get_customer_payment_details)
            // Store manager
            .service(list_products)
            .service(create_product)
            .service(upload_products)
            .service(clear_all_products)
            .service(update_product)
            .service(delete_product)
            .service(update_stock)
            .service(list_categories)
            // Cashier
            .service(list_payments)
            .service(update_payment_status)
            .service(check_stock)
            .service(order_summary)
            .service(delete_payment)
            .service(serve_payslip)
            .service(list_orders)
            .service(count_orders)
            .service(list_orders_by_user)
            .service(list_orders_by_status)
            .service(get_order)
            .service(create_order)
            .service(update_order)
            .service(delete_order)
            // Delivery coordinator
            .service(list_delivery_persons)
            .service(list_active_delivery_persons)
            .service(list_by_vehicle_type)
            .service(search_delivery_persons)
            .service(get_delivery_person)
            .service(create_delivery_person)
            .service(update_delivery_person)
            .service(soft_delete_delivery_person)
            .service(hard_delete_delivery_person)
            .service(activate_delivery_person)
            .service(deactivate_delivery_person)
            .service(list_assignments)
            .service(create_assignment)
            .service(overdue_assignments)
            .service(assignments_in_range)
            .service(search_assignments)
            .service(assignment_stats)
            .service(available_delivery_persons)
            .service(assignments_by_status)
            .service(assignments_for_person)
            .service(active_assignments_for_person)
            .service(person_stats)
            .service(assignment_for_order)
            .service(has_assignment)
            .service(get_assignment)
            .service(mark_picked_up)
            .service(mark_delivered)
            .service(cancel_assignment)
            .service(reassign)
            .service(update_notes)
            .service(delete_assignment)
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind((address, port))?
    .run()
    .await
}
