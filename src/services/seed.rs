//! Sample catalog and staff accounts for fresh databases.

use crate::domain::employee::{EmployeeType, NewEmployee};
use crate::domain::product::{NewProduct, ProductListQuery};
use crate::repository::{EmployeeReader, EmployeeWriter, ProductReader, ProductWriter};
use crate::services::{ServiceError, ServiceResult};

/// `(name, description, price in cents, category)`
const SAMPLE_PRODUCTS: &[(&str, &str, i64, &str)] = &[
    ("Fresh Tomatoes", "Organic vine-ripened tomatoes", 290, "Fresh Produce"),
    ("Green Broccoli", "Fresh broccoli florets", 150, "Fresh Produce"),
    ("Fresh Spinach", "Organic baby spinach leaves", 390, "Fresh Produce"),
    ("Cherry Tomatoes", "Sweet cherry tomatoes", 250, "Fresh Produce"),
    ("Mixed Nuts", "Premium mixed nuts", 450, "Fresh Produce"),
    ("Fresh Salmon", "Atlantic salmon fillet", 1299, "Meat & Seafood"),
    ("Chicken Breast", "Free-range chicken breast", 899, "Meat & Seafood"),
    ("Ground Beef", "Premium ground beef", 699, "Meat & Seafood"),
    ("Artisan Bread", "Fresh baked artisan bread", 399, "Bakery"),
    ("Croissants", "Buttery French croissants", 450, "Bakery"),
    ("Chocolate Cake", "Rich chocolate cake", 1599, "Bakery"),
    ("Fresh Milk", "Whole milk 1 gallon", 349, "Dairy"),
    ("Greek Yogurt", "Creamy Greek yogurt", 499, "Dairy"),
    ("Cheddar Cheese", "Aged cheddar cheese", 599, "Dairy"),
    ("Free Range Eggs", "Farm fresh eggs", 399, "Dairy"),
    ("Orange Juice", "Fresh squeezed orange juice", 499, "Beverages"),
    ("Green Tea", "Premium green tea", 299, "Beverages"),
    ("Coffee Beans", "Arabica coffee beans", 899, "Beverages"),
    ("Organic Chips", "Sea salt potato chips", 399, "Snacks"),
    ("Dark Chocolate", "Premium dark chocolate", 699, "Snacks"),
];

/// `(empid, password, role)`
const SAMPLE_EMPLOYEES: &[(&str, &str, EmployeeType)] = &[
    ("EMP001", "password123", EmployeeType::Cashier),
    ("EMP002", "password123", EmployeeType::Cashier),
    ("MGR001", "manager123", EmployeeType::StoreManager),
    ("IT001", "itadmin123", EmployeeType::ItAssistant),
    ("DEL001", "delivery123", EmployeeType::DeliveryCoordinator),
];

/// Number of rows inserted by [`seed_sample_data`].
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub products: usize,
    pub employees: usize,
}

/// Fill the catalog and the staff table when they are empty. Tables that
/// already hold rows are left alone.
pub fn seed_sample_data<R>(repo: &R, password_cost: u32) -> ServiceResult<SeedReport>
where
    R: ProductReader + ProductWriter + EmployeeReader + EmployeeWriter + ?Sized,
{
    let mut report = SeedReport::default();

    let (product_count, _) = repo
        .list_products(ProductListQuery::new().paginate(1, 1))
        .map_err(ServiceError::from)?;
    if product_count == 0 {
        let products: Vec<NewProduct> = SAMPLE_PRODUCTS
            .iter()
            .enumerate()
            .map(|(index, (name, description, price_cents, category))| {
                NewProduct::new(*name, *price_cents, *category)
                    .with_description(*description)
                    .with_stock(15 + (index % 20) as i32)
            })
            .collect();
        report.products = repo
            .create_products(&products)
            .map_err(ServiceError::from)?;
        log::info!("Initialized {} sample products", report.products);
    } else {
        log::info!("Products already exist, skipping sample catalog");
    }

    if repo.count_employees().map_err(ServiceError::from)? == 0 {
        for (empid, password, employee_type) in SAMPLE_EMPLOYEES {
            let hash = bcrypt::hash(password, password_cost)
                .map_err(|err| ServiceError::Internal(err.to_string()))?;
            repo.create_employee(&NewEmployee::new(*empid, hash, *employee_type))
                .map_err(ServiceError::from)?;
            report.employees += 1;
        }
        log::info!("Initialized {} sample employees", report.employees);
    } else {
        log::info!("Employees already exist, skipping sample staff");
    }

    Ok(report)
}
