//! Helpers for integration tests.

use smartcart::db::{DbPool, establish_connection_pool, run_migrations};
use smartcart::domain::auth::AuthenticatedEmployee;
use smartcart::domain::customer::NewCustomer;
use smartcart::domain::customer_payment::NewCustomerPayment;
use smartcart::domain::employee::EmployeeType;
use smartcart::domain::product::{NewProduct, Product};
use smartcart::repository::{CustomerWriter, DieselRepository, ProductWriter};

/// Temporary database used in integration tests.
pub struct TestDb {
    filename: String,
    pool: DbPool,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        std::fs::remove_file(filename).ok(); // Clean up old DB

        let pool =
            establish_connection_pool(filename).expect("Failed to establish SQLite connection.");
        run_migrations(&pool).expect("Migrations failed");
        TestDb {
            filename: filename.to_string(),
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        std::fs::remove_file(&self.filename).ok();
        std::fs::remove_file(format!("{}-shm", &self.filename)).ok();
        std::fs::remove_file(format!("{}-wal", &self.filename)).ok();
    }
}

pub fn employee(employee_type: EmployeeType) -> AuthenticatedEmployee {
    AuthenticatedEmployee {
        empid: "EMP001".to_string(),
        employee_type,
    }
}

pub fn product(repo: &DieselRepository, name: &str, price_cents: i64, stock: i32) -> Product {
    repo.create_product(&NewProduct::new(name, price_cents, "Pantry").with_stock(stock))
        .expect("create product")
}

/// Register `username` and store a set of bank details for them.
pub fn customer_with_payment(repo: &DieselRepository, username: &str) {
    repo.create_customer(&NewCustomer::new(
        username,
        "hash",
        format!("{username}@example.com"),
        "Test",
        "Customer",
    ))
    .expect("create customer");
    repo.save_payment_details(&NewCustomerPayment::new(
        username,
        "City Bank",
        "Test Customer",
        "1234567890",
    ))
    .expect("save payment details");
}
