//! Cashier review of submitted payments.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::approval::{ApprovalError, StockDetail, stock_details, validate_stock};
use crate::domain::auth::AuthenticatedEmployee;
use crate::domain::employee::EmployeeType;
use crate::domain::money::format_cents;
use crate::domain::order::{Order, OrderListQuery, OrderStatus, OrderSummary};
use crate::repository::{CustomerReader, OrderReader, OrderWriter, ProductReader};
use crate::services::checkout::{BillView, PaymentDetailsView, load_products_for};
use crate::services::{ServiceError, ServiceResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentItemView {
    pub product_id: i32,
    pub name: String,
    pub price: String,
    pub quantity: i32,
    pub stock_quantity: i32,
    pub subtotal: String,
}

/// Everything a cashier needs to review one order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCard {
    pub payment_id: i32,
    pub username: String,
    pub subtotal: String,
    pub order_status: OrderStatus,
    pub created_at: NaiveDateTime,
    pub items: Vec<PaymentItemView>,
    pub customer_payment_details: Option<PaymentDetailsView>,
    pub payslip_location_path: Option<String>,
    pub bill: Option<BillView>,
}

/// All orders as payment cards, newest first.
pub fn list_payments<R>(repo: &R, user: &AuthenticatedEmployee) -> ServiceResult<Vec<PaymentCard>>
where
    R: OrderReader + ProductReader + CustomerReader + ?Sized,
{
    if !user.has_role(EmployeeType::Cashier) {
        return Err(ServiceError::Unauthorized);
    }

    let (_, orders) = repo
        .list_orders(OrderListQuery::new())
        .map_err(ServiceError::from)?;
    let products = load_products_for(repo, &orders)?;

    let mut bank_details: HashMap<String, Option<PaymentDetailsView>> = HashMap::new();
    let mut cards = Vec::with_capacity(orders.len());

    for order in orders {
        if !bank_details.contains_key(&order.username) {
            let details = repo
                .get_latest_payment_details(&order.username)
                .map_err(ServiceError::from)?
                .map(PaymentDetailsView::from);
            bank_details.insert(order.username.clone(), details);
        }

        let bill = if order.status == OrderStatus::Approved {
            repo.get_bill_by_payment_id(order.id)
                .map_err(ServiceError::from)?
                .as_ref()
                .map(BillView::from)
        } else {
            None
        };

        let items = order
            .items
            .iter()
            .filter_map(|item| {
                products.get(&item.product_id).map(|product| PaymentItemView {
                    product_id: product.id,
                    name: product.name.clone(),
                    price: format_cents(product.price_cents),
                    quantity: item.quantity,
                    stock_quantity: product.stock_quantity,
                    subtotal: format_cents(product.price_cents * i64::from(item.quantity)),
                })
            })
            .collect();

        cards.push(PaymentCard {
            payment_id: order.id,
            subtotal: order.subtotal_formatted(),
            order_status: order.status,
            created_at: order.created_at,
            items,
            customer_payment_details: bank_details.get(&order.username).cloned().flatten(),
            payslip_location_path: order.payslip_path,
            bill,
            username: order.username,
        });
    }

    Ok(cards)
}

/// Move an order to `status`. Approval deducts stock and issues the bill.
pub fn update_payment_status<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    payment_id: i32,
    status: &str,
) -> ServiceResult<Order>
where
    R: OrderWriter + ?Sized,
{
    if !user.has_role(EmployeeType::Cashier) {
        return Err(ServiceError::Unauthorized);
    }

    let status = status
        .parse::<OrderStatus>()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let order = match status {
        OrderStatus::Approved => {
            let (order, bill) = repo.approve_order(payment_id).map_err(|err| {
                log::warn!("Approval of order {payment_id} refused: {err}");
                ServiceError::from(err)
            })?;
            log::info!(
                "Order {payment_id} approved by {}, bill {} issued",
                user.empid,
                bill.id
            );
            order
        }
        other => {
            let order = repo
                .set_order_status(payment_id, other)
                .map_err(ServiceError::from)?;
            log::info!("Order {payment_id} set to {other} by {}", user.empid);
            order
        }
    };

    Ok(order)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockCheck {
    pub stock_details: Vec<StockDetail>,
    pub can_approve: bool,
    pub message: String,
}

/// Whether the order could be approved right now. Nothing is written.
pub fn check_stock<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    payment_id: i32,
) -> ServiceResult<StockCheck>
where
    R: OrderReader + ProductReader + ?Sized,
{
    if !user.has_role(EmployeeType::Cashier) {
        return Err(ServiceError::Unauthorized);
    }

    let order = repo
        .get_order_by_id(payment_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;
    let products = load_products_for(repo, std::slice::from_ref(&order))?;

    let verdict = if order.items.is_empty() {
        Err(ApprovalError::EmptyOrder(order.id))
    } else {
        validate_stock(&order.items, &products).map(|_| ())
    };

    Ok(StockCheck {
        stock_details: stock_details(&order.items, &products),
        can_approve: verdict.is_ok(),
        message: match verdict {
            Ok(()) => "All products have sufficient stock".to_string(),
            Err(err) => err.to_string(),
        },
    })
}

pub fn order_summary<R>(repo: &R, user: &AuthenticatedEmployee) -> ServiceResult<OrderSummary>
where
    R: OrderReader + ?Sized,
{
    if !user.has_role(EmployeeType::Cashier) {
        return Err(ServiceError::Unauthorized);
    }

    repo.order_summary().map_err(ServiceError::from)
}

/// Delete an order together with its delivery assignment and return the
/// confirmation shown to the cashier.
pub fn delete_payment<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    payment_id: i32,
) -> ServiceResult<String>
where
    R: OrderReader + OrderWriter + ?Sized,
{
    if !user.has_role(EmployeeType::Cashier) {
        return Err(ServiceError::Unauthorized);
    }

    let order = repo
        .get_order_by_id(payment_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    repo.delete_order(order.id).map_err(ServiceError::from)?;
    log::info!("Order {} deleted by {}", order.id, user.empid);

    Ok(format!(
        "Order deleted successfully: Order #{} (Customer: {})",
        order.id, order.username
    ))
}

/// Resolve a stored payslip for viewing. Only bare file names are accepted.
pub fn payslip_path(
    user: &AuthenticatedEmployee,
    payslip_dir: &Path,
    file_name: &str,
) -> ServiceResult<PathBuf> {
    if !user.has_role(EmployeeType::Cashier) {
        return Err(ServiceError::Unauthorized);
    }

    if file_name.is_empty()
        || file_name.contains('/')
        || file_name.contains('\\')
        || file_name.contains("..")
    {
        log::warn!("Rejected payslip request for {file_name:?} from {}", user.empid);
        return Err(ServiceError::Form("Invalid file name".to_string()));
    }

    let path = payslip_dir.join(file_name);
    if !path.is_file() {
        return Err(ServiceError::NotFound);
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::bill::Bill;
    use crate::domain::customer::Customer;
    use crate::domain::customer_payment::{CustomerPayment, NewCustomerPayment};
    use crate::domain::order::{NewOrder, OrderItem, OrderUpdate};
    use crate::domain::product::{Product, ProductListQuery};
    use crate::repository::RepositoryError;
    use crate::repository::RepositoryResult;
    use crate::repository::mock::{
        MockCustomerReader, MockOrderReader, MockOrderWriter, MockProductReader,
    };

    fn datetime() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .unwrap_or_default()
    }

    fn cashier() -> AuthenticatedEmployee {
        AuthenticatedEmployee {
            empid: "C001".to_string(),
            employee_type: EmployeeType::Cashier,
        }
    }

    fn manager() -> AuthenticatedEmployee {
        AuthenticatedEmployee {
            empid: "M001".to_string(),
            employee_type: EmployeeType::StoreManager,
        }
    }

    fn order(id: i32, username: &str, status: OrderStatus) -> Order {
        Order {
            id,
            username: username.to_string(),
            items: vec![OrderItem::new(1, 3), OrderItem::new(2, 1)],
            subtotal_cents: 2100,
            payslip_path: None,
            status,
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    fn product(id: i32, name: &str, price_cents: i64, stock_quantity: i32) -> Product {
        Product {
            id,
            name: name.to_string(),
            description: None,
            price_cents,
            image_url: None,
            category: "Dairy".to_string(),
            stock_quantity,
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    fn bank(username: &str) -> CustomerPayment {
        CustomerPayment {
            id: 1,
            username: username.to_string(),
            bank_name: "People's Bank".to_string(),
            account_holder_name: "Alice Perera".to_string(),
            account_number: "0012345678".to_string(),
            is_active: true,
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    fn bill(payment_id: i32) -> Bill {
        Bill {
            id: 9,
            payment_id,
            order_id: payment_id,
            username: "alice".to_string(),
            product_names: "Fresh Milk, Bread".to_string(),
            product_quantities: "3,1".to_string(),
            subtotal_cents: 2100,
            total_cents: 2100,
            bank_name: "People's Bank".to_string(),
            bank_account_number: "0012345678".to_string(),
            created_at: datetime(),
        }
    }

    #[test]
    fn only_cashiers_review_payments() {
        let repo = FakeRepo::new();
        assert!(matches!(
            list_payments(&repo, &manager()),
            Err(ServiceError::Unauthorized)
        ));
        assert!(matches!(
            update_payment_status(&repo, &manager(), 1, "APPROVED"),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn cards_carry_items_bank_details_and_bills() {
        let mut repo = FakeRepo::new();
        repo.order_reader.expect_list_orders().returning(|_| {
            Ok((
                2,
                vec![
                    order(2, "alice", OrderStatus::Approved),
                    order(1, "alice", OrderStatus::Pending),
                ],
            ))
        });
        repo.product_reader
            .expect_get_products_by_ids()
            .returning(|_| Ok(vec![product(1, "Fresh Milk", 450, 10), product(2, "Bread", 750, 4)]));
        repo.customer_reader
            .expect_get_latest_payment_details()
            .times(1)
            .returning(|username| Ok(Some(bank(username))));
        repo.order_reader
            .expect_get_bill_by_payment_id()
            .times(1)
            .withf(|id| *id == 2)
            .returning(|id| Ok(Some(bill(id))));

        let cards = list_payments(&repo, &cashier()).expect("cards");

        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].items[0].subtotal, "13.50");
        assert_eq!(cards[0].items[1].price, "7.50");
        assert_eq!(
            cards[0].bill.as_ref().map(|bill| bill.masked_account_number.as_str()),
            Some("****5678")
        );
        assert!(cards[1].bill.is_none());
        assert!(cards[1].customer_payment_details.is_some());
    }

    #[test]
    fn unknown_status_is_rejected() {
        let mut repo = FakeRepo::new();
        repo.order_writer.expect_set_order_status().times(0);
        repo.order_writer.expect_approve_order().times(0);

        let err = update_payment_status(&repo, &cashier(), 1, "SHIPPED").unwrap_err();

        assert!(matches!(err, ServiceError::Form(message) if message.starts_with("Invalid status")));
    }

    #[test]
    fn approving_goes_through_the_atomic_approval() {
        let mut repo = FakeRepo::new();
        repo.order_writer
            .expect_approve_order()
            .times(1)
            .withf(|id| *id == 5)
            .returning(|id| Ok((order(id, "alice", OrderStatus::Approved), bill(id))));
        repo.order_writer.expect_set_order_status().times(0);

        let updated = update_payment_status(&repo, &cashier(), 5, "approved").expect("approved");

        assert_eq!(updated.status, OrderStatus::Approved);
    }

    #[test]
    fn refused_approval_is_a_conflict() {
        let mut repo = FakeRepo::new();
        repo.order_writer.expect_approve_order().returning(|_| {
            Err(RepositoryError::Approval(ApprovalError::InsufficientStock {
                product_id: 1,
                name: "Fresh Milk".to_string(),
                requested: 3,
                available: 2,
            }))
        });

        let err = update_payment_status(&repo, &cashier(), 5, "APPROVED").unwrap_err();

        assert!(matches!(err, ServiceError::Conflict(message) if message.contains("'Fresh Milk'")));
    }

    #[test]
    fn declining_is_a_plain_status_write() {
        let mut repo = FakeRepo::new();
        repo.order_writer
            .expect_set_order_status()
            .withf(|id, status| *id == 5 && *status == OrderStatus::Declined)
            .returning(|id, status| Ok(order(id, "alice", status)));

        let updated = update_payment_status(&repo, &cashier(), 5, "DECLINED").expect("declined");

        assert_eq!(updated.status, OrderStatus::Declined);
    }

    #[test]
    fn stock_check_names_the_first_short_product() {
        let mut repo = FakeRepo::new();
        repo.order_reader
            .expect_get_order_by_id()
            .returning(|id| Ok(Some(order(id, "alice", OrderStatus::Pending))));
        repo.product_reader
            .expect_get_products_by_ids()
            .returning(|_| Ok(vec![product(1, "Fresh Milk", 450, 2), product(2, "Bread", 750, 10)]));

        let check = check_stock(&repo, &cashier(), 1).expect("check");

        assert!(!check.can_approve);
        assert_eq!(
            check.message,
            "Cannot approve payment: Insufficient stock for product 'Fresh Milk' (requested: 3, available: 2)"
        );
        assert_eq!(check.stock_details.len(), 2);
        assert!(check.stock_details[0].is_insufficient_stock);
    }

    #[test]
    fn stock_check_passes_with_enough_stock() {
        let mut repo = FakeRepo::new();
        repo.order_reader
            .expect_get_order_by_id()
            .returning(|id| Ok(Some(order(id, "alice", OrderStatus::Pending))));
        repo.product_reader
            .expect_get_products_by_ids()
            .returning(|_| Ok(vec![product(1, "Fresh Milk", 450, 5), product(2, "Bread", 750, 10)]));

        let check = check_stock(&repo, &cashier(), 1).expect("check");

        assert!(check.can_approve);
        assert_eq!(check.message, "All products have sufficient stock");
    }

    #[test]
    fn delete_reports_the_customer() {
        let mut repo = FakeRepo::new();
        repo.order_reader
            .expect_get_order_by_id()
            .returning(|id| Ok(Some(order(id, "alice", OrderStatus::Pending))));
        repo.order_writer
            .expect_delete_order()
            .times(1)
            .withf(|id| *id == 4)
            .returning(|_| Ok(()));

        let message = delete_payment(&repo, &cashier(), 4).expect("deleted");

        assert_eq!(message, "Order deleted successfully: Order #4 (Customer: alice)");
    }

    #[test]
    fn deleting_a_missing_order_is_not_found() {
        let mut repo = FakeRepo::new();
        repo.order_reader
            .expect_get_order_by_id()
            .returning(|_| Ok(None));
        repo.order_writer.expect_delete_order().times(0);

        assert!(matches!(
            delete_payment(&repo, &cashier(), 4),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn payslip_names_cannot_escape_the_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join("slip_alice.png"), b"png").expect("write");

        for name in ["../secret", "a/b.png", "a\\b.png", ""] {
            assert!(matches!(
                payslip_path(&cashier(), dir.path(), name),
                Err(ServiceError::Form(_))
            ));
        }
        assert!(matches!(
            payslip_path(&cashier(), dir.path(), "missing.png"),
            Err(ServiceError::NotFound)
        ));
        assert!(matches!(
            payslip_path(&manager(), dir.path(), "slip_alice.png"),
            Err(ServiceError::Unauthorized)
        ));
        assert_eq!(
            payslip_path(&cashier(), dir.path(), "slip_alice.png").expect("path"),
            dir.path().join("slip_alice.png")
        );
    }

    struct FakeRepo {
        customer_reader: MockCustomerReader,
        order_reader: MockOrderReader,
        order_writer: MockOrderWriter,
        product_reader: MockProductReader,
    }

    impl FakeRepo {
        fn new() -> Self {
            Self {
                customer_reader: MockCustomerReader::new(),
                order_reader: MockOrderReader::new(),
                order_writer: MockOrderWriter::new(),
                product_reader: MockProductReader::new(),
            }
        }
    }

    impl CustomerReader for FakeRepo {
        fn get_customer_by_username(&self, username: &str) -> RepositoryResult<Option<Customer>> {
            self.customer_reader.get_customer_by_username(username)
        }

        fn get_customer_by_email(&self, email: &str) -> RepositoryResult<Option<Customer>> {
            self.customer_reader.get_customer_by_email(email)
        }

        fn get_latest_payment_details(
            &self,
            username: &str,
        ) -> RepositoryResult<Option<CustomerPayment>> {
            self.customer_reader.get_latest_payment_details(username)
        }
    }

    impl OrderReader for FakeRepo {
        fn get_order_by_id(&self, id: i32) -> RepositoryResult<Option<Order>> {
            self.order_reader.get_order_by_id(id)
        }

        fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<Order>)> {
            self.order_reader.list_orders(query)
        }

        fn order_summary(&self) -> RepositoryResult<OrderSummary> {
            self.order_reader.order_summary()
        }

        fn get_bill_by_payment_id(&self, payment_id: i32) -> RepositoryResult<Option<Bill>> {
            self.order_reader.get_bill_by_payment_id(payment_id)
        }
    }

    impl OrderWriter for FakeRepo {
        fn create_order(&self, new_order: &NewOrder) -> RepositoryResult<Order> {
            self.order_writer.create_order(new_order)
        }

        fn place_order(
            &self,
            new_order: &NewOrder,
            payment: &NewCustomerPayment,
        ) -> RepositoryResult<Order> {
            self.order_writer.place_order(new_order, payment)
        }

        fn approve_order(&self, order_id: i32) -> RepositoryResult<(Order, Bill)> {
            self.order_writer.approve_order(order_id)
        }

        fn set_order_status(&self, order_id: i32, status: OrderStatus) -> RepositoryResult<Order> {
            self.order_writer.set_order_status(order_id, status)
        }

        fn update_order(&self, order_id: i32, update: &OrderUpdate) -> RepositoryResult<Order> {
            self.order_writer.update_order(order_id, update)
        }

        fn delete_order(&self, order_id: i32) -> RepositoryResult<()> {
            self.order_writer.delete_order(order_id)
        }
    }

    impl ProductReader for FakeRepo {
        fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>> {
            self.product_reader.get_product_by_id(id)
        }

        fn get_products_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<Product>> {
            self.product_reader.get_products_by_ids(ids)
        }

        fn list_products(
            &self,
            query: ProductListQuery,
        ) -> RepositoryResult<(usize, Vec<Product>)> {
            self.product_reader.list_products(query)
        }

        fn list_categories(&self) -> RepositoryResult<Vec<String>> {
            self.product_reader.list_categories()
        }
    }
}
