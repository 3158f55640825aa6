use smartcart::domain::employee::EmployeeType;
use smartcart::domain::order::{NewOrder, OrderItem, OrderStatus};
use smartcart::forms::checkout::UpdateOrderRequest;
use smartcart::repository::{OrderReader, OrderWriter};
use smartcart::services::{ServiceError, orders, payments};

mod common;

fn update_request(product_ids: &str, quantities: &str, subtotal: &str) -> UpdateOrderRequest {
    UpdateOrderRequest {
        product_ids: product_ids.to_string(),
        product_quantities: quantities.to_string(),
        subtotal: subtotal.to_string(),
        payslip_location_path: None,
    }
}

#[test]
fn pending_orders_can_be_edited() {
    let test_db = common::TestDb::new("orders_edit_pending.db");
    let repo = test_db.repo();
    let cashier = common::employee(EmployeeType::Cashier);

    let rice = common::product(&repo, "Rice", 250, 10);
    let milk = common::product(&repo, "Milk", 199, 10);
    let order = repo
        .create_order(
            &NewOrder::new("alice", vec![OrderItem::new(rice.id, 1)], 250)
                .with_payslip_path("uploads/slip_alice.png"),
        )
        .unwrap();

    let view = orders::update_order(
        &repo,
        &cashier,
        order.id,
        update_request(&format!("{},{}", milk.id, rice.id), "2,3", "11.48"),
    )
    .unwrap();

    assert_eq!(view.product_quantities, "2,3");
    assert_eq!(view.subtotal, "11.48");
    assert_eq!(view.order_status, OrderStatus::Pending);

    let stored = repo.get_order_by_id(order.id).unwrap().unwrap();
    assert_eq!(
        stored.items,
        vec![OrderItem::new(milk.id, 2), OrderItem::new(rice.id, 3)]
    );
    assert_eq!(stored.subtotal_cents, 1148);
    assert_eq!(stored.payslip_path.as_deref(), Some("uploads/slip_alice.png"));
    assert_eq!(stored.username, "alice");
}

#[test]
fn approved_orders_cannot_be_edited() {
    let test_db = common::TestDb::new("orders_edit_approved.db");
    let repo = test_db.repo();
    let cashier = common::employee(EmployeeType::Cashier);

    common::customer_with_payment(&repo, "bob");
    let tea = common::product(&repo, "Tea", 500, 4);
    let order = repo
        .create_order(&NewOrder::new("bob", vec![OrderItem::new(tea.id, 1)], 500))
        .unwrap();
    payments::update_payment_status(&repo, &cashier, order.id, "APPROVED").unwrap();

    let err = orders::update_order(
        &repo,
        &cashier,
        order.id,
        update_request(&tea.id.to_string(), "4", "20.00"),
    )
    .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    let stored = repo.get_order_by_id(order.id).unwrap().unwrap();
    assert_eq!(stored.items, vec![OrderItem::new(tea.id, 1)]);
    assert_eq!(stored.subtotal_cents, 500);
}

#[test]
fn editing_an_unknown_order_is_not_found() {
    let test_db = common::TestDb::new("orders_edit_unknown.db");
    let repo = test_db.repo();
    let cashier = common::employee(EmployeeType::Cashier);

    let result = orders::update_order(&repo, &cashier, 9999, update_request("1", "1", "1.00"));
    assert!(matches!(result, Err(ServiceError::NotFound)));
}
