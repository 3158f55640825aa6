//! Catalog management for store managers.

use serde::Deserialize;

use crate::domain::auth::AuthenticatedEmployee;
use crate::domain::employee::EmployeeType;
use crate::domain::product::{Product, ProductListQuery};
use crate::forms::products::{ProductForm, StockForm, UploadProductsForm};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{ProductReader, ProductWriter};
use crate::services::{ServiceError, ServiceResult, catalog};

/// Query parameters accepted by the product management list.
#[derive(Debug, Default, Deserialize)]
pub struct ManageProductsQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    /// Page requested by the UI (1-based).
    pub page: Option<usize>,
}

/// Loads one page of products for the management view.
pub fn list_products<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    query: ManageProductsQuery,
) -> ServiceResult<Paginated<Product>>
where
    R: ProductReader + ?Sized,
{
    if !user.has_role(EmployeeType::StoreManager) {
        return Err(ServiceError::Unauthorized);
    }

    let page = query.page.unwrap_or(1).max(1);
    let mut list_query = ProductListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);

    if let Some(term) = query.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        list_query = list_query.search(term);
    }
    if let Some(category) = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
    {
        list_query = list_query.category(category);
    }

    let (total, items) = repo.list_products(list_query).map_err(ServiceError::from)?;

    Ok(Paginated::new(items, page, total, DEFAULT_ITEMS_PER_PAGE))
}

/// Categories offered by the product editor.
pub fn list_categories<R>(repo: &R, user: &AuthenticatedEmployee) -> ServiceResult<Vec<String>>
where
    R: ProductReader + ?Sized,
{
    if !user.has_role(EmployeeType::StoreManager) {
        return Err(ServiceError::Unauthorized);
    }

    catalog::list_categories(repo)
}

pub fn create_product<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    form: ProductForm,
) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    if !user.has_role(EmployeeType::StoreManager) {
        return Err(ServiceError::Unauthorized);
    }

    let new_product = form
        .into_new_product()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let product = repo
        .create_product(&new_product)
        .map_err(ServiceError::from)?;
    log::info!("Product {} created by {}", product.id, user.empid);
    Ok(product)
}

/// Replaces every editable field of a product.
pub fn update_product<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    product_id: i32,
    form: ProductForm,
) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    if !user.has_role(EmployeeType::StoreManager) {
        return Err(ServiceError::Unauthorized);
    }

    let updates = form
        .into_update_product()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.update_product(product_id, &updates)
        .map_err(ServiceError::from)
}

pub fn update_stock<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    product_id: i32,
    form: StockForm,
) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    if !user.has_role(EmployeeType::StoreManager) {
        return Err(ServiceError::Unauthorized);
    }

    let stock_quantity = form
        .quantity()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.set_product_stock(product_id, stock_quantity)
        .map_err(ServiceError::from)
}

/// Deletes a product and returns it so the caller can name it.
pub fn delete_product<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    product_id: i32,
) -> ServiceResult<Product>
where
    R: ProductReader + ProductWriter + ?Sized,
{
    if !user.has_role(EmployeeType::StoreManager) {
        return Err(ServiceError::Unauthorized);
    }

    let product = repo
        .get_product_by_id(product_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    repo.delete_product(product_id)
        .map_err(ServiceError::from)?;
    log::info!("Product {} deleted by {}", product_id, user.empid);
    Ok(product)
}

/// Imports products from an uploaded CSV file. Either every row is stored or none.
pub fn import_products<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    mut form: UploadProductsForm,
) -> ServiceResult<usize>
where
    R: ProductWriter + ?Sized,
{
    if !user.has_role(EmployeeType::StoreManager) {
        return Err(ServiceError::Unauthorized);
    }

    let products = form
        .into_new_products()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let created = repo
        .create_products(&products)
        .map_err(ServiceError::from)?;
    log::info!("Imported {created} products for {}", user.empid);
    Ok(created)
}

/// Removes the whole catalog and returns the number of deleted products.
pub fn clear_all_products<R>(repo: &R, user: &AuthenticatedEmployee) -> ServiceResult<usize>
where
    R: ProductWriter + ?Sized,
{
    if !user.has_role(EmployeeType::StoreManager) {
        return Err(ServiceError::Unauthorized);
    }

    let deleted = repo.delete_all_products().map_err(ServiceError::from)?;
    log::warn!("{} cleared the catalog ({deleted} products)", user.empid);
    Ok(deleted)
}
