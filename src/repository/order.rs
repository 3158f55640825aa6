use std::collections::HashMap;

use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    domain::approval::{ApprovalError, validate_stock},
    domain::bill::{Bill as DomainBill, NewBill as DomainNewBill},
    domain::customer_payment::{CustomerPayment as DomainCustomerPayment, NewCustomerPayment},
    domain::order::{
        NewOrder as DomainNewOrder, Order as DomainOrder, OrderListQuery, OrderStateError,
        OrderStatus, OrderSummary, OrderUpdate,
    },
    domain::product::Product as DomainProduct,
    models::bill::{Bill as DbBill, NewBill as DbNewBill},
    models::order::{NewOrder as DbNewOrder, NewOrderItem, Order as DbOrder, OrderItem as DbOrderItem},
    models::product::Product as DbProduct,
    repository::customer::{insert_payment_details, latest_payment_details},
    repository::{DieselRepository, OrderReader, OrderWriter, RepositoryError, RepositoryResult},
    schema::{bills, delivery_assignments, order_items, orders, products},
};

fn filtered(query: &OrderListQuery) -> orders::BoxedQuery<'_, Sqlite> {
    let mut items = orders::table.into_boxed::<Sqlite>();

    if let Some(username) = query.username.as_ref() {
        items = items.filter(orders::username.eq(username));
    }

    if let Some(status) = query.status {
        items = items.filter(orders::status.eq(status.as_str()));
    }

    items
}

/// Attach line items to the given order rows, preserving their order.
fn with_items(
    conn: &mut SqliteConnection,
    rows: Vec<DbOrder>,
) -> RepositoryResult<Vec<DomainOrder>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let items = DbOrderItem::belonging_to(&rows)
        .order((order_items::order_id.asc(), order_items::position.asc()))
        .load::<DbOrderItem>(conn)?
        .grouped_by(&rows);

    rows.into_iter()
        .zip(items)
        .map(|(order, items)| order.into_domain(items))
        .collect()
}

fn load_order(conn: &mut SqliteConnection, order_id: i32) -> RepositoryResult<Option<DomainOrder>> {
    let row = orders::table
        .find(order_id)
        .first::<DbOrder>(conn)
        .optional()?;

    match row {
        Some(row) => Ok(with_items(conn, vec![row])?.pop()),
        None => Ok(None),
    }
}

fn insert_order(
    conn: &mut SqliteConnection,
    new_order: &DomainNewOrder,
) -> RepositoryResult<DomainOrder> {
    let created = diesel::insert_into(orders::table)
        .values(&DbNewOrder::from(new_order))
        .get_result::<DbOrder>(conn)?;

    let lines: Vec<NewOrderItem> = new_order
        .items
        .iter()
        .enumerate()
        .map(|(position, item)| NewOrderItem::from_domain(created.id, position, item))
        .collect();

    if !lines.is_empty() {
        diesel::insert_into(order_items::table)
            .values(&lines)
            .execute(conn)?;
    }

    load_order(conn, created.id)?.ok_or(RepositoryError::NotFound)
}

impl OrderReader for DieselRepository {
    fn get_order_by_id(&self, id: i32) -> RepositoryResult<Option<DomainOrder>> {
        let mut conn = self.conn()?;
        load_order(&mut conn, id)
    }

    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<DomainOrder>)> {
        let mut conn = self.conn()?;

        let total = filtered(&query).count().get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered(&query).order((orders::created_at.desc(), orders::id.desc()));
        if let Some(pagination) = &query.pagination {
            items = items.offset(pagination.offset()).limit(pagination.limit());
        }

        let rows = items.load::<DbOrder>(&mut conn)?;
        let orders = with_items(&mut conn, rows)?;

        Ok((total, orders))
    }

    fn order_summary(&self) -> RepositoryResult<OrderSummary> {
        let mut conn = self.conn()?;

        let counts = orders::table
            .group_by(orders::status)
            .select((orders::status, count_star()))
            .load::<(String, i64)>(&mut conn)?;

        let mut summary = OrderSummary::default();
        for (status, count) in counts {
            let status = status
                .parse::<OrderStatus>()
                .map_err(|_| RepositoryError::InvalidData(format!("order status `{status}`")))?;
            summary.record(status, count);
        }

        Ok(summary)
    }

    fn get_bill_by_payment_id(&self, payment_id: i32) -> RepositoryResult<Option<DomainBill>> {
        let mut conn = self.conn()?;
        let bill = bills::table
            .filter(bills::payment_id.eq(payment_id))
            .first::<DbBill>(&mut conn)
            .optional()?;

        Ok(bill.map(Into::into))
    }
}

impl OrderWriter for DieselRepository {
    fn create_order(&self, new_order: &DomainNewOrder) -> RepositoryResult<DomainOrder> {
        let mut conn = self.conn()?;
        conn.transaction::<_, RepositoryError, _>(|conn| insert_order(conn, new_order))
    }

    fn place_order(
        &self,
        new_order: &DomainNewOrder,
        payment: &NewCustomerPayment,
    ) -> RepositoryResult<DomainOrder> {
        let mut conn = self.conn()?;
        conn.transaction::<_, RepositoryError, _>(|conn| {
            insert_payment_details(conn, payment)?;
            insert_order(conn, new_order)
        })
    }

    fn approve_order(&self, order_id: i32) -> RepositoryResult<(DomainOrder, DomainBill)> {
        let mut conn = self.conn()?;

        // The write lock is held from the first read until commit.
        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let order = load_order(conn, order_id)?.ok_or(RepositoryError::NotFound)?;

            if order.status == OrderStatus::Approved {
                return Err(ApprovalError::AlreadyApproved(order.id).into());
            }
            if !order.status.can_become(OrderStatus::Approved) {
                return Err(OrderStateError::IllegalStatusChange {
                    order_id: order.id,
                    from: order.status,
                    to: OrderStatus::Approved,
                }
                .into());
            }
            if order.items.is_empty() {
                return Err(ApprovalError::EmptyOrder(order.id).into());
            }

            let product_ids: Vec<i32> = order.items.iter().map(|item| item.product_id).collect();
            let catalog: HashMap<i32, DomainProduct> = products::table
                .filter(products::id.eq_any(&product_ids))
                .load::<DbProduct>(conn)?
                .into_iter()
                .map(|row| (row.id, DomainProduct::from(row)))
                .collect();

            let deductions = validate_stock(&order.items, &catalog)?;
            let now = chrono::Local::now().naive_utc();

            for (product_id, quantity) in deductions {
                let updated = diesel::update(
                    products::table
                        .filter(products::id.eq(product_id))
                        .filter(products::stock_quantity.ge(quantity)),
                )
                .set((
                    products::stock_quantity.eq(products::stock_quantity - quantity),
                    products::updated_at.eq(now),
                ))
                .execute(conn)?;

                if updated != 1 {
                    return Err(ApprovalError::StockChanged(product_id).into());
                }
            }

            let existing = bills::table
                .filter(bills::payment_id.eq(order.id))
                .first::<DbBill>(conn)
                .optional()?;

            let bill = match existing {
                Some(bill) => bill,
                None => {
                    let payment: DomainCustomerPayment = latest_payment_details(conn, &order.username)?
                        .ok_or(ApprovalError::MissingPaymentDetails)?
                        .into();
                    let new_bill = DomainNewBill::snapshot(&order, &catalog, &payment, now);
                    diesel::insert_into(bills::table)
                        .values(&DbNewBill::from(&new_bill))
                        .get_result::<DbBill>(conn)?
                }
            };

            diesel::update(orders::table.find(order.id))
                .set((
                    orders::status.eq(OrderStatus::Approved.as_str()),
                    orders::updated_at.eq(now),
                ))
                .execute(conn)?;

            let approved = load_order(conn, order.id)?.ok_or(RepositoryError::NotFound)?;
            log::info!("Approved order {} for {}", approved.id, approved.username);

            Ok((approved, bill.into()))
        })
    }

    fn set_order_status(&self, order_id: i32, status: OrderStatus) -> RepositoryResult<DomainOrder> {
        let mut conn = self.conn()?;

        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let current = orders::table
                .find(order_id)
                .select(orders::status)
                .first::<String>(conn)
                .optional()?
                .ok_or(RepositoryError::NotFound)?;
            let current = current
                .parse::<OrderStatus>()
                .map_err(|_| RepositoryError::InvalidData(format!("order status `{current}`")))?;

            if !current.can_become(status) {
                return Err(OrderStateError::IllegalStatusChange {
                    order_id,
                    from: current,
                    to: status,
                }
                .into());
            }

            diesel::update(orders::table.find(order_id))
                .set((
                    orders::status.eq(status.as_str()),
                    orders::updated_at.eq(chrono::Local::now().naive_utc()),
                ))
                .execute(conn)?;

            load_order(conn, order_id)?.ok_or(RepositoryError::NotFound)
        })
    }

    fn update_order(&self, order_id: i32, update: &OrderUpdate) -> RepositoryResult<DomainOrder> {
        let mut conn = self.conn()?;

        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let order = load_order(conn, order_id)?.ok_or(RepositoryError::NotFound)?;
            if order.status != OrderStatus::Pending {
                return Err(OrderStateError::NotEditable {
                    order_id,
                    status: order.status,
                }
                .into());
            }

            diesel::delete(order_items::table.filter(order_items::order_id.eq(order_id)))
                .execute(conn)?;

            let lines: Vec<NewOrderItem> = update
                .items
                .iter()
                .enumerate()
                .map(|(position, item)| NewOrderItem::from_domain(order_id, position, item))
                .collect();
            if !lines.is_empty() {
                diesel::insert_into(order_items::table)
                    .values(&lines)
                    .execute(conn)?;
            }

            let payslip_path = update.payslip_path.clone().or(order.payslip_path);
            diesel::update(orders::table.find(order_id))
                .set((
                    orders::subtotal_cents.eq(update.subtotal_cents),
                    orders::payslip_path.eq(payslip_path),
                    orders::updated_at.eq(chrono::Local::now().naive_utc()),
                ))
                .execute(conn)?;

            load_order(conn, order_id)?.ok_or(RepositoryError::NotFound)
        })
    }

    fn delete_order(&self, order_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        conn.transaction::<_, RepositoryError, _>(|conn| {
            diesel::delete(
                delivery_assignments::table.filter(delivery_assignments::order_id.eq(order_id)),
            )
            .execute(conn)?;

            // Line items go with the order through ON DELETE CASCADE.
            let deleted = diesel::delete(orders::table.find(order_id)).execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }

            Ok(())
        })
    }
}
