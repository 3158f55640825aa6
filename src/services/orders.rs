//! Order REST resource used by cashiers and back-office tools.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::auth::AuthenticatedEmployee;
use crate::domain::employee::EmployeeType;
use crate::domain::order::{Order, OrderItem, OrderListQuery, OrderStatus};
use crate::forms::checkout::{CreateOrderRequest, UpdateOrderRequest};
use crate::repository::{OrderReader, OrderWriter};
use crate::services::{ServiceError, ServiceResult};

/// Order as exposed by the REST API. The legacy comma-joined fields are kept
/// next to the typed line items.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: i32,
    pub username: String,
    pub items: Vec<OrderItem>,
    pub product_ids: String,
    pub product_quantities: String,
    pub subtotal: String,
    pub payslip_location_path: Option<String>,
    pub order_status: OrderStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<Order> for OrderView {
    fn from(order: Order) -> Self {
        Self {
            product_ids: order.product_ids_joined(),
            product_quantities: order.quantities_joined(),
            subtotal: order.subtotal_formatted(),
            id: order.id,
            username: order.username,
            items: order.items,
            payslip_location_path: order.payslip_path,
            order_status: order.status,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

fn list<R>(repo: &R, user: &AuthenticatedEmployee, query: OrderListQuery) -> ServiceResult<Vec<OrderView>>
where
    R: OrderReader + ?Sized,
{
    if !user.has_role(EmployeeType::Cashier) {
        return Err(ServiceError::Unauthorized);
    }

    let (_, orders) = repo.list_orders(query).map_err(ServiceError::from)?;
    Ok(orders.into_iter().map(OrderView::from).collect())
}

pub fn list_orders<R>(repo: &R, user: &AuthenticatedEmployee) -> ServiceResult<Vec<OrderView>>
where
    R: OrderReader + ?Sized,
{
    list(repo, user, OrderListQuery::new())
}

pub fn list_orders_by_user<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    username: &str,
) -> ServiceResult<Vec<OrderView>>
where
    R: OrderReader + ?Sized,
{
    list(repo, user, OrderListQuery::new().username(username))
}

pub fn list_orders_by_status<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    status: &str,
) -> ServiceResult<Vec<OrderView>>
where
    R: OrderReader + ?Sized,
{
    if !user.has_role(EmployeeType::Cashier) {
        return Err(ServiceError::Unauthorized);
    }

    let status = status
        .parse::<OrderStatus>()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    list(repo, user, OrderListQuery::new().status(status))
}

pub fn get_order<R>(repo: &R, user: &AuthenticatedEmployee, order_id: i32) -> ServiceResult<OrderView>
where
    R: OrderReader + ?Sized,
{
    if !user.has_role(EmployeeType::Cashier) {
        return Err(ServiceError::Unauthorized);
    }

    repo.get_order_by_id(order_id)
        .map_err(ServiceError::from)?
        .map(OrderView::from)
        .ok_or(ServiceError::NotFound)
}

/// Total number of orders.
pub fn count_orders<R>(repo: &R, user: &AuthenticatedEmployee) -> ServiceResult<i64>
where
    R: OrderReader + ?Sized,
{
    if !user.has_role(EmployeeType::Cashier) {
        return Err(ServiceError::Unauthorized);
    }

    Ok(repo.order_summary().map_err(ServiceError::from)?.total_orders)
}

/// Insert a PENDING order without touching bank details.
pub fn create_order<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    request: CreateOrderRequest,
) -> ServiceResult<OrderView>
where
    R: OrderWriter + ?Sized,
{
    if !user.has_role(EmployeeType::Cashier) {
        return Err(ServiceError::Unauthorized);
    }

    let new_order = request
        .into_new_order()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let order = repo.create_order(&new_order).map_err(ServiceError::from)?;
    log::info!("Order {} created for {} by {}", order.id, order.username, user.empid);
    Ok(OrderView::from(order))
}

/// Replace the line items, subtotal and payslip of a PENDING order. The status
/// only changes through the payment review.
pub fn update_order<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    order_id: i32,
    request: UpdateOrderRequest,
) -> ServiceResult<OrderView>
where
    R: OrderWriter + ?Sized,
{
    if !user.has_role(EmployeeType::Cashier) {
        return Err(ServiceError::Unauthorized);
    }

    let update = request
        .into_order_update()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let order = repo
        .update_order(order_id, &update)
        .map_err(ServiceError::from)?;
    log::info!("Order {} updated by {}", order.id, user.empid);
    Ok(OrderView::from(order))
}

pub fn delete_order<R>(repo: &R, user: &AuthenticatedEmployee, order_id: i32) -> ServiceResult<()>
where
    R: OrderReader + OrderWriter + ?Sized,
{
    if !user.has_role(EmployeeType::Cashier) {
        return Err(ServiceError::Unauthorized);
    }

    if repo
        .get_order_by_id(order_id)
        .map_err(ServiceError::from)?
        .is_none()
    {
        return Err(ServiceError::NotFound);
    }

    repo.delete_order(order_id).map_err(ServiceError::from)?;
    log::info!("Order {order_id} deleted by {}", user.empid);
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::bill::Bill;
    use crate::domain::customer_payment::NewCustomerPayment;
    use crate::domain::order::{NewOrder, OrderStateError, OrderSummary, OrderUpdate};
    use crate::repository::{RepositoryError, RepositoryResult};
    use crate::repository::mock::{MockOrderReader, MockOrderWriter};

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

    fn order(id: i32, status: OrderStatus) -> Order {
        Order {
            id,
            username: "alice".to_string(),
            items: vec![OrderItem::new(1, 3), OrderItem::new(2, 1)],
            subtotal_cents: 1250,
            payslip_path: None,
            status,
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    #[test]
    fn views_keep_the_joined_fields() {
        let view = OrderView::from(order(1, OrderStatus::Pending));

        assert_eq!(view.product_ids, "1,2");
        assert_eq!(view.product_quantities, "3,1");
        assert_eq!(view.subtotal, "12.50");
    }

    #[test]
    fn status_filter_is_validated() {
        let mut repo = FakeRepo::new();
        repo.order_reader.expect_list_orders().times(0);

        let err = list_orders_by_status(&repo, &cashier(), "LOST").unwrap_err();

        assert!(matches!(err, ServiceError::Form(_)));
    }

    #[test]
    fn status_filter_reaches_the_query() {
        let mut repo = FakeRepo::new();
        repo.order_reader
            .expect_list_orders()
            .withf(|query| query.status == Some(OrderStatus::Approved))
            .returning(|_| Ok((1, vec![order(3, OrderStatus::Approved)])));

        let orders = list_orders_by_status(&repo, &cashier(), "approved").expect("orders");

        assert_eq!(orders.len(), 1);
    }

    #[test]
    fn count_uses_the_summary_total() {
        let mut repo = FakeRepo::new();
        repo.order_reader.expect_order_summary().returning(|| {
            Ok(OrderSummary {
                total_orders: 7,
                pending_orders: 4,
                approved_orders: 2,
                declined_orders: 1,
            })
        });

        assert_eq!(count_orders(&repo, &cashier()).expect("count"), 7);
    }

    #[test]
    fn create_validates_the_request() {
        let mut repo = FakeRepo::new();
        repo.order_writer
            .expect_create_order()
            .times(1)
            .withf(|new_order| new_order.username == "bob" && new_order.subtotal_cents == 500)
            .returning(|_| Ok(order(8, OrderStatus::Pending)));

        let request = CreateOrderRequest {
            username: "bob".to_string(),
            product_ids: "1".to_string(),
            product_quantities: "2".to_string(),
            subtotal: "5".to_string(),
            payslip_location_path: None,
        };

        let created = create_order(&repo, &cashier(), request).expect("created");

        assert_eq!(created.id, 8);
        assert_eq!(created.order_status, OrderStatus::Pending);
    }

    fn update_request(product_ids: &str, quantities: &str) -> UpdateOrderRequest {
        UpdateOrderRequest {
            product_ids: product_ids.to_string(),
            product_quantities: quantities.to_string(),
            subtotal: "7.50".to_string(),
            payslip_location_path: None,
        }
    }

    #[test]
    fn update_replaces_the_contents() {
        let mut repo = FakeRepo::new();
        repo.order_writer
            .expect_update_order()
            .times(1)
            .withf(|order_id, update| {
                *order_id == 4
                    && update.items == vec![OrderItem::new(2, 3)]
                    && update.subtotal_cents == 750
            })
            .returning(|order_id, update| {
                let mut updated = order(order_id, OrderStatus::Pending);
                updated.items = update.items.clone();
                updated.subtotal_cents = update.subtotal_cents;
                Ok(updated)
            });

        let view = update_order(&repo, &cashier(), 4, update_request("2", "3")).expect("updated");

        assert_eq!(view.product_quantities, "3");
        assert_eq!(view.subtotal, "7.50");
    }

    #[test]
    fn update_rejects_misaligned_lines() {
        let mut repo = FakeRepo::new();
        repo.order_writer.expect_update_order().times(0);

        let err = update_order(&repo, &cashier(), 4, update_request("1,2", "3")).unwrap_err();

        assert!(matches!(err, ServiceError::Form(_)));
    }

    #[test]
    fn decided_orders_are_not_editable() {
        let mut repo = FakeRepo::new();
        repo.order_writer.expect_update_order().returning(|order_id, _| {
            Err(RepositoryError::OrderState(OrderStateError::NotEditable {
                order_id,
                status: OrderStatus::Approved,
            }))
        });

        let err = update_order(&repo, &cashier(), 4, update_request("2", "3")).unwrap_err();

        match err {
            ServiceError::Conflict(message) => {
                assert_eq!(message, "Order 4 is APPROVED and can no longer be edited")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn delivery_coordinators_cannot_use_the_order_api() {
        let repo = FakeRepo::new();
        let coordinator = AuthenticatedEmployee {
            empid: "D001".to_string(),
            employee_type: EmployeeType::DeliveryCoordinator,
        };

        assert!(matches!(
            list_orders(&repo, &coordinator),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn deleting_an_unknown_order_is_not_found() {
        let mut repo = FakeRepo::new();
        repo.order_reader
            .expect_get_order_by_id()
            .returning(|_| Ok(None));
        repo.order_writer.expect_delete_order().times(0);

        assert!(matches!(
            delete_order(&repo, &cashier(), 3),
            Err(ServiceError::NotFound)
        ));
    }

    struct FakeRepo {
        order_reader: MockOrderReader,
        order_writer: MockOrderWriter,
    }

    impl FakeRepo {
        fn new() -> Self {
            Self {
                order_reader: MockOrderReader::new(),
                order_writer: MockOrderWriter::new(),
            }
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
}
