//! Stock rules applied before an order may be approved.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

use crate::domain::order::OrderItem;
use crate::domain::product::Product;

/// Reasons an approval is refused. Every variant aborts the approval as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApprovalError {
    #[error("Product with ID {0} not found")]
    ProductNotFound(i32),
    #[error("Cannot approve payment: Product '{name}' is out of stock (quantity: 0)")]
    OutOfStock { product_id: i32, name: String },
    #[error(
        "Cannot approve payment: Insufficient stock for product '{name}' (requested: {requested}, available: {available})"
    )]
    InsufficientStock {
        product_id: i32,
        name: String,
        requested: i64,
        available: i32,
    },
    #[error("Customer payment details not found")]
    MissingPaymentDetails,
    #[error("Order {0} has no line items")]
    EmptyOrder(i32),
    #[error("Order {0} is already approved")]
    AlreadyApproved(i32),
    #[error("Stock for product {0} changed while the order was being approved")]
    StockChanged(i32),
}

/// Per-product availability for one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockDetail {
    pub product_id: i32,
    pub product_name: String,
    pub requested_quantity: i64,
    pub available_stock: i32,
    pub is_out_of_stock: bool,
    pub is_insufficient_stock: bool,
}

/// Sum the quantities of lines that reference the same product.
///
/// Products keep the position of their first line. Totals are widened so that
/// repeated lines cannot overflow.
pub fn required_quantities(items: &[OrderItem]) -> Vec<(i32, i64)> {
    let mut totals: Vec<(i32, i64)> = Vec::with_capacity(items.len());
    for item in items {
        let quantity = i64::from(item.quantity);
        match totals.iter_mut().find(|(id, _)| *id == item.product_id) {
            Some((_, total)) => *total += quantity,
            None => totals.push((item.product_id, quantity)),
        }
    }
    totals
}

/// Check that every product exists and has enough stock for `items`.
///
/// Returns the quantity to deduct per product on success. The first failing
/// product, in line order, decides the error.
pub fn validate_stock(
    items: &[OrderItem],
    products: &HashMap<i32, Product>,
) -> Result<Vec<(i32, i32)>, ApprovalError> {
    let required = required_quantities(items);
    let mut deductions = Vec::with_capacity(required.len());

    for (product_id, requested) in required {
        let product = products
            .get(&product_id)
            .ok_or(ApprovalError::ProductNotFound(product_id))?;

        if product.stock_quantity <= 0 {
            return Err(ApprovalError::OutOfStock {
                product_id,
                name: product.name.clone(),
            });
        }

        match i32::try_from(requested) {
            Ok(quantity) if quantity <= product.stock_quantity => {
                deductions.push((product_id, quantity));
            }
            _ => {
                return Err(ApprovalError::InsufficientStock {
                    product_id,
                    name: product.name.clone(),
                    requested,
                    available: product.stock_quantity,
                });
            }
        }
    }

    Ok(deductions)
}

/// Availability report used by the cashier before approving. Unknown products
/// are skipped.
pub fn stock_details(items: &[OrderItem], products: &HashMap<i32, Product>) -> Vec<StockDetail> {
    required_quantities(items)
        .into_iter()
        .filter_map(|(product_id, requested)| {
            products.get(&product_id).map(|product| StockDetail {
                product_id,
                product_name: product.name.clone(),
                requested_quantity: requested,
                available_stock: product.stock_quantity,
                is_out_of_stock: product.stock_quantity <= 0,
                is_insufficient_stock: i64::from(product.stock_quantity) < requested,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn product(id: i32, name: &str, stock_quantity: i32) -> Product {
        let now = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Product {
            id,
            name: name.to_string(),
            description: None,
            price_cents: 250,
            image_url: None,
            category: "Snacks".to_string(),
            stock_quantity,
            created_at: now,
            updated_at: now,
        }
    }

    fn catalog(products: Vec<Product>) -> HashMap<i32, Product> {
        products.into_iter().map(|p| (p.id, p)).collect()
    }

    #[test]
    fn insufficient_stock_names_the_product() {
        let items = vec![OrderItem::new(1, 3), OrderItem::new(2, 1)];
        let products = catalog(vec![product(1, "Organic Chips", 2), product(2, "Green Tea", 10)]);

        let err = validate_stock(&items, &products).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Cannot approve payment: Insufficient stock for product 'Organic Chips' (requested: 3, available: 2)"
        );
    }

    #[test]
    fn zero_stock_is_reported_as_out_of_stock() {
        let items = vec![OrderItem::new(1, 1)];
        let products = catalog(vec![product(1, "Dark Chocolate", 0)]);

        let err = validate_stock(&items, &products).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Cannot approve payment: Product 'Dark Chocolate' is out of stock (quantity: 0)"
        );
    }

    #[test]
    fn missing_product_fails() {
        let items = vec![OrderItem::new(9, 1)];
        let err = validate_stock(&items, &HashMap::new()).unwrap_err();
        assert_eq!(err, ApprovalError::ProductNotFound(9));
        assert_eq!(err.to_string(), "Product with ID 9 not found");
    }

    #[test]
    fn repeated_products_are_checked_against_their_total() {
        let items = vec![OrderItem::new(1, 2), OrderItem::new(2, 1), OrderItem::new(1, 2)];
        let products = catalog(vec![product(1, "Croissants", 3), product(2, "Green Tea", 10)]);

        let err = validate_stock(&items, &products).unwrap_err();
        assert!(matches!(
            err,
            ApprovalError::InsufficientStock {
                requested: 4,
                available: 3,
                ..
            }
        ));
    }

    #[test]
    fn sufficient_stock_returns_deductions() {
        let items = vec![OrderItem::new(1, 3), OrderItem::new(2, 1)];
        let products = catalog(vec![product(1, "Organic Chips", 5), product(2, "Green Tea", 10)]);

        let deductions = validate_stock(&items, &products).unwrap();

        assert_eq!(deductions, vec![(1, 3), (2, 1)]);
    }

    #[test]
    fn repeated_lines_beyond_i32_are_insufficient() {
        let items = vec![OrderItem::new(1, i32::MAX), OrderItem::new(1, 1)];
        let products = catalog(vec![product(1, "Rice", 5)]);

        let err = validate_stock(&items, &products).unwrap_err();
        assert!(matches!(
            err,
            ApprovalError::InsufficientStock {
                requested: 2_147_483_648,
                available: 5,
                ..
            }
        ));

        let details = stock_details(&items, &products);
        assert_eq!(details[0].requested_quantity, 2_147_483_648);
        assert!(details[0].is_insufficient_stock);
    }

    #[test]
    fn stock_details_flag_shortages() {
        let items = vec![OrderItem::new(1, 3), OrderItem::new(2, 1), OrderItem::new(3, 1)];
        let products = catalog(vec![product(1, "Organic Chips", 2), product(2, "Green Tea", 0)]);

        let details = stock_details(&items, &products);

        assert_eq!(details.len(), 2);
        assert!(details[0].is_insufficient_stock);
        assert!(!details[0].is_out_of_stock);
        assert!(details[1].is_out_of_stock);
        assert_eq!(details[1].product_name, "Green Tea");
    }
}
