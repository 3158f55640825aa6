//! Public catalog pages and stock lookups.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::domain::product::{DEFAULT_CATEGORIES, Product, ProductListQuery};
use crate::repository::ProductReader;
use crate::services::{ServiceError, ServiceResult};

/// Maximum number of related products shown on a product page.
pub const RELATED_PRODUCTS_LIMIT: usize = 4;

/// Query parameters accepted by the shop page.
#[derive(Debug, Default, Deserialize)]
pub struct ShoppingQuery {
    pub category: Option<String>,
    pub search: Option<String>,
}

/// Data required to render the shop page.
pub struct ShoppingPageData {
    pub products: Vec<Product>,
    pub categories: Vec<String>,
    /// Category filter echoed back to the view when present.
    pub selected_category: Option<String>,
    /// Search term echoed back to the view when present.
    pub search: Option<String>,
}

/// Loads the shop page. Search and category filters combine.
pub fn load_shopping_page<R>(repo: &R, query: ShoppingQuery) -> ServiceResult<ShoppingPageData>
where
    R: ProductReader + ?Sized,
{
    let search = query
        .search
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());
    let selected_category = query
        .category
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    let mut list_query = ProductListQuery::new();
    if let Some(term) = search.as_ref() {
        list_query = list_query.search(term);
    }
    if let Some(category) = selected_category.as_ref() {
        list_query = list_query.category(category);
    }

    let (_, products) = repo.list_products(list_query).map_err(ServiceError::from)?;
    let categories = list_categories(repo)?;

    Ok(ShoppingPageData {
        products,
        categories,
        selected_category,
        search,
    })
}

/// Distinct categories in use, or the default list while the catalog is empty.
pub fn list_categories<R>(repo: &R) -> ServiceResult<Vec<String>>
where
    R: ProductReader + ?Sized,
{
    let categories = repo.list_categories().map_err(ServiceError::from)?;
    if categories.is_empty() {
        return Ok(DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect());
    }
    Ok(categories)
}

pub struct ProductPageData {
    pub product: Product,
    pub related: Vec<Product>,
}

/// Loads a product together with a few others from its category.
pub fn load_product_page<R>(repo: &R, product_id: i32) -> ServiceResult<ProductPageData>
where
    R: ProductReader + ?Sized,
{
    let product = repo
        .get_product_by_id(product_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let related_query = ProductListQuery::new()
        .category(product.category.clone())
        .exclude(product.id)
        .paginate(1, RELATED_PRODUCTS_LIMIT);
    let (_, related) = repo
        .list_products(related_query)
        .map_err(ServiceError::from)?;

    Ok(ProductPageData { product, related })
}

/// Availability of a single product as shown in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockStatusView {
    pub name: String,
    pub stock_quantity: i32,
    pub is_in_stock: bool,
    pub status: String,
}

impl From<&Product> for StockStatusView {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            stock_quantity: product.stock_quantity,
            is_in_stock: product.is_in_stock(),
            status: product.stock_status().to_string(),
        }
    }
}

impl StockStatusView {
    fn unknown() -> Self {
        Self {
            name: "Unknown Product".to_string(),
            stock_quantity: 0,
            is_in_stock: false,
            status: "Not Available".to_string(),
        }
    }
}

/// Availability for every requested id. Unknown ids are reported, not skipped.
pub fn stock_status<R>(repo: &R, product_ids: &[i32]) -> ServiceResult<BTreeMap<i32, StockStatusView>>
where
    R: ProductReader + ?Sized,
{
    let products: HashMap<i32, Product> = repo
        .get_products_by_ids(product_ids)
        .map_err(ServiceError::from)?
        .into_iter()
        .map(|product| (product.id, product))
        .collect();

    Ok(product_ids
        .iter()
        .map(|id| {
            let view = products
                .get(id)
                .map(StockStatusView::from)
                .unwrap_or_else(StockStatusView::unknown);
            (*id, view)
        })
        .collect())
}
