use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    domain::product::{
        NewProduct as DomainNewProduct, Product as DomainProduct, ProductListQuery,
        UpdateProduct as DomainUpdateProduct,
    },
    models::product::{
        NewProduct as DbNewProduct, Product as DbProduct, UpdateProduct as DbUpdateProduct,
    },
    repository::{
        DieselRepository, LIKE_ESCAPE, ProductReader, ProductWriter, RepositoryError,
        RepositoryResult, contains_pattern,
    },
    schema::products,
};

type BoxedProductQuery<'a> = products::BoxedQuery<'a, Sqlite>;

fn filtered(query: &ProductListQuery) -> BoxedProductQuery<'_> {
    let mut items = products::table.into_boxed::<Sqlite>();

    if let Some(category) = query.category.as_ref() {
        items = items.filter(products::category.eq(category));
    }

    // LIKE is case-insensitive for ASCII in SQLite.
    if let Some(term) = query.search.as_ref() {
        let pattern = contains_pattern(term);
        items = items.filter(
            products::name
                .like(pattern.clone())
                .escape(LIKE_ESCAPE)
                .or(products::description.like(pattern).escape(LIKE_ESCAPE)),
        );
    }

    if let Some(exclude_id) = query.exclude_id {
        items = items.filter(products::id.ne(exclude_id));
    }

    items
}

impl ProductReader for DieselRepository {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<DomainProduct>> {
        let mut conn = self.conn()?;
        let product = products::table
            .find(id)
            .first::<DbProduct>(&mut conn)
            .optional()?;

        Ok(product.map(Into::into))
    }

    fn get_products_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<DomainProduct>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.conn()?;
        let rows = products::table
            .filter(products::id.eq_any(ids))
            .order(products::id.asc())
            .load::<DbProduct>(&mut conn)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    fn list_products(
        &self,
        query: ProductListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainProduct>)> {
        let mut conn = self.conn()?;

        let total = filtered(&query).count().get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered(&query).order(products::id.asc());
        if let Some(pagination) = &query.pagination {
            items = items.offset(pagination.offset()).limit(pagination.limit());
        }

        let rows = items.load::<DbProduct>(&mut conn)?;
        Ok((total, rows.into_iter().map(Into::into).collect()))
    }

    fn list_categories(&self) -> RepositoryResult<Vec<String>> {
        let mut conn = self.conn()?;
        let categories = products::table
            .select(products::category)
            .distinct()
            .order(products::category.asc())
            .load::<String>(&mut conn)?;

        Ok(categories)
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, new_product: &DomainNewProduct) -> RepositoryResult<DomainProduct> {
        let mut conn = self.conn()?;
        let db_new = DbNewProduct::from(new_product);

        let created = diesel::insert_into(products::table)
            .values(&db_new)
            .get_result::<DbProduct>(&mut conn)?;

        Ok(created.into())
    }

    fn create_products(&self, new_products: &[DomainNewProduct]) -> RepositoryResult<usize> {
        if new_products.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn()?;
        let rows: Vec<DbNewProduct> = new_products.iter().map(DbNewProduct::from).collect();

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let inserted = diesel::insert_into(products::table)
                .values(&rows)
                .execute(conn)?;
            Ok(inserted)
        })
    }

    fn update_product(
        &self,
        product_id: i32,
        updates: &DomainUpdateProduct,
    ) -> RepositoryResult<DomainProduct> {
        let mut conn = self.conn()?;
        let db_updates = DbUpdateProduct::from(updates);

        let updated = diesel::update(products::table.find(product_id))
            .set(&db_updates)
            .get_result::<DbProduct>(&mut conn)?;

        Ok(updated.into())
    }

    fn set_product_stock(
        &self,
        product_id: i32,
        stock_quantity: i32,
    ) -> RepositoryResult<DomainProduct> {
        let mut conn = self.conn()?;

        let updated = diesel::update(products::table.find(product_id))
            .set((
                products::stock_quantity.eq(stock_quantity),
                products::updated_at.eq(chrono::Local::now().naive_utc()),
            ))
            .get_result::<DbProduct>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_product(&self, product_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(products::table.find(product_id)).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    fn delete_all_products(&self) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let deleted = diesel::delete(products::table).execute(&mut conn)?;
        Ok(deleted)
    }
}
