use crate::db::{DbConnection, DbPool};
use crate::domain::{
    bill::Bill,
    customer::{Customer, NewCustomer},
    customer_payment::{CustomerPayment, NewCustomerPayment},
    delivery_assignment::{
        AssignmentListQuery, AssignmentStats, DeliveryAssignment, NewDeliveryAssignment,
    },
    delivery_person::{
        DeliveryPerson, DeliveryPersonListQuery, NewDeliveryPerson, UpdateDeliveryPerson,
    },
    employee::{Employee, NewEmployee},
    order::{NewOrder, Order, OrderListQuery, OrderStatus, OrderSummary, OrderUpdate},
    product::{NewProduct, Product, ProductListQuery, UpdateProduct},
};

pub mod customer;
pub mod delivery_assignment;
pub mod delivery_person;
pub mod employee;
pub mod errors;
pub mod order;
pub mod product;

#[cfg(test)]
pub mod mock;

pub use errors::{RepositoryError, RepositoryResult};

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Character used to escape LIKE wildcards in [`contains_pattern`].
const LIKE_ESCAPE: char = '\\';

/// LIKE pattern matching `term` anywhere, with `%` and `_` taken literally.
/// Pair it with `.escape(LIKE_ESCAPE)`.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Read-only operations over the product catalog.
pub trait ProductReader {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
    /// Products for the given ids; unknown ids are skipped.
    fn get_products_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<Product>>;
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
    /// Distinct category names in alphabetical order.
    fn list_categories(&self) -> RepositoryResult<Vec<String>>;
}

/// Write operations over the product catalog.
pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
    fn create_products(&self, new_products: &[NewProduct]) -> RepositoryResult<usize>;
    fn update_product(&self, product_id: i32, updates: &UpdateProduct)
    -> RepositoryResult<Product>;
    fn set_product_stock(&self, product_id: i32, stock_quantity: i32)
    -> RepositoryResult<Product>;
    fn delete_product(&self, product_id: i32) -> RepositoryResult<()>;
    fn delete_all_products(&self) -> RepositoryResult<usize>;
}

/// Read-only operations over customer accounts and their bank details.
pub trait CustomerReader {
    fn get_customer_by_username(&self, username: &str) -> RepositoryResult<Option<Customer>>;
    fn get_customer_by_email(&self, email: &str) -> RepositoryResult<Option<Customer>>;
    /// Most recently saved active bank details of `username`.
    fn get_latest_payment_details(
        &self,
        username: &str,
    ) -> RepositoryResult<Option<CustomerPayment>>;
}

/// Write operations over customer accounts and their bank details.
pub trait CustomerWriter {
    fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<Customer>;
    fn save_payment_details(
        &self,
        details: &NewCustomerPayment,
    ) -> RepositoryResult<CustomerPayment>;
}

pub trait EmployeeReader {
    fn get_employee_by_id(&self, empid: &str) -> RepositoryResult<Option<Employee>>;
    fn count_employees(&self) -> RepositoryResult<usize>;
}

pub trait EmployeeWriter {
    fn create_employee(&self, new_employee: &NewEmployee) -> RepositoryResult<Employee>;
}

/// Read-only operations over orders and the bills issued for them.
pub trait OrderReader {
    fn get_order_by_id(&self, id: i32) -> RepositoryResult<Option<Order>>;
    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<Order>)>;
    fn order_summary(&self) -> RepositoryResult<OrderSummary>;
    fn get_bill_by_payment_id(&self, payment_id: i32) -> RepositoryResult<Option<Bill>>;
}

/// Write operations over orders.
pub trait OrderWriter {
    /// Insert a PENDING order with its line items.
    fn create_order(&self, new_order: &NewOrder) -> RepositoryResult<Order>;
    /// Save the customer's bank details and insert the order in one transaction.
    fn place_order(
        &self,
        new_order: &NewOrder,
        payment: &NewCustomerPayment,
    ) -> RepositoryResult<Order>;
    /// Deduct stock, issue the bill and mark the order APPROVED atomically.
    ///
    /// Refusals are reported as [`RepositoryError::Approval`] and leave the
    /// database untouched.
    fn approve_order(&self, order_id: i32) -> RepositoryResult<(Order, Bill)>;
    /// Plain status write used for PENDING and DECLINED.
    fn set_order_status(&self, order_id: i32, status: OrderStatus) -> RepositoryResult<Order>;
    /// Replace the line items, subtotal and payslip of a PENDING order.
    fn update_order(&self, order_id: i32, update: &OrderUpdate) -> RepositoryResult<Order>;
    /// Remove the order, its line items and its delivery assignment.
    fn delete_order(&self, order_id: i32) -> RepositoryResult<()>;
}

pub trait DeliveryPersonReader {
    fn get_delivery_person_by_id(&self, id: i32) -> RepositoryResult<Option<DeliveryPerson>>;
    fn list_delivery_persons(
        &self,
        query: DeliveryPersonListQuery,
    ) -> RepositoryResult<Vec<DeliveryPerson>>;
}

pub trait DeliveryPersonWriter {
    fn create_delivery_person(
        &self,
        new_person: &NewDeliveryPerson,
    ) -> RepositoryResult<DeliveryPerson>;
    fn update_delivery_person(
        &self,
        id: i32,
        updates: &UpdateDeliveryPerson,
    ) -> RepositoryResult<DeliveryPerson>;
    /// Remove the row for good. Fails while assignments still reference it.
    fn delete_delivery_person(&self, id: i32) -> RepositoryResult<()>;
}

pub trait DeliveryAssignmentReader {
    fn get_assignment_by_id(&self, id: i32) -> RepositoryResult<Option<DeliveryAssignment>>;
    fn get_assignment_by_order_id(
        &self,
        order_id: i32,
    ) -> RepositoryResult<Option<DeliveryAssignment>>;
    fn list_assignments(
        &self,
        query: AssignmentListQuery,
    ) -> RepositoryResult<Vec<DeliveryAssignment>>;
    fn assignment_stats(&self) -> RepositoryResult<AssignmentStats>;
}

pub trait DeliveryAssignmentWriter {
    /// Validate the order and the courier and insert an ASSIGNED row.
    ///
    /// Failed checks are reported as [`RepositoryError::Transition`].
    fn create_assignment(
        &self,
        new_assignment: &NewDeliveryAssignment,
    ) -> RepositoryResult<DeliveryAssignment>;
    /// Persist `next` only if the stored row still matches `current`, judged by
    /// its status and last update time.
    fn save_assignment(
        &self,
        current: &DeliveryAssignment,
        next: &DeliveryAssignment,
    ) -> RepositoryResult<DeliveryAssignment>;
}
