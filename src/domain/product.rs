use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::money::format_cents;
use crate::pagination::Pagination;

/// Categories offered to store managers before any product defines its own.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Fresh Produce",
    "Meat & Seafood",
    "Bakery",
    "Dairy",
    "Beverages",
    "Snacks",
    "Frozen Foods",
    "Pantry",
    "Health & Beauty",
];

/// Domain representation of a product on sale.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Product {
    /// Unique identifier of the product.
    pub id: i32,
    /// Human-readable name of the product.
    pub name: String,
    /// Optional longer description shown to customers.
    pub description: Option<String>,
    /// Price represented in cents.
    pub price_cents: i64,
    /// Optional image shown in the catalog.
    pub image_url: Option<String>,
    /// Category label used for browsing.
    pub category: String,
    /// Units currently in stock. Never negative.
    pub stock_quantity: i32,
    /// Timestamp for when the product record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the product record.
    pub updated_at: NaiveDateTime,
}

impl Product {
    pub fn is_in_stock(&self) -> bool {
        self.stock_quantity > 0
    }

    /// Customer-facing availability label.
    pub fn stock_status(&self) -> &'static str {
        if self.is_in_stock() {
            "Available"
        } else {
            "Not Available"
        }
    }

    pub fn price_formatted(&self) -> String {
        format_cents(self.price_cents)
    }
}

/// Payload required to insert a new product.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub image_url: Option<String>,
    pub category: String,
    pub stock_quantity: i32,
    /// Timestamp captured when the product payload was created.
    pub updated_at: NaiveDateTime,
}

impl NewProduct {
    /// Build a new product payload with no stock and the current timestamp.
    pub fn new(name: impl Into<String>, price_cents: i64, category: impl Into<String>) -> Self {
        let now = chrono::Local::now().naive_utc();
        Self {
            name: name.into(),
            description: None,
            price_cents,
            image_url: None,
            category: category.into(),
            stock_quantity: 0,
            updated_at: now,
        }
    }

    /// Attach a descriptive text to the product payload.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// Set the initial stock. Negative values are clamped to zero.
    pub fn with_stock(mut self, stock_quantity: i32) -> Self {
        self.stock_quantity = stock_quantity.max(0);
        self
    }
}

/// Replacement data applied when a store manager edits a product.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateProduct {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub image_url: Option<String>,
    pub category: String,
    pub stock_quantity: i32,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

impl UpdateProduct {
    pub fn new(name: impl Into<String>, price_cents: i64, category: impl Into<String>) -> Self {
        let now = chrono::Local::now().naive_utc();
        Self {
            name: name.into(),
            description: None,
            price_cents,
            image_url: None,
            category: category.into(),
            stock_quantity: 0,
            updated_at: now,
        }
    }

    /// Update the product description, using `None` to clear an existing value.
    pub fn description(mut self, description: Option<impl Into<String>>) -> Self {
        self.description = description.map(|value| value.into());
        self
    }

    /// Update the image URL, using `None` to clear an existing value.
    pub fn image_url(mut self, image_url: Option<impl Into<String>>) -> Self {
        self.image_url = image_url.map(|value| value.into());
        self
    }

    pub fn stock_quantity(mut self, stock_quantity: i32) -> Self {
        self.stock_quantity = stock_quantity.max(0);
        self
    }
}

/// Query definition used to list catalog products.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductListQuery {
    /// Optional exact category filter.
    pub category: Option<String>,
    /// Optional case-insensitive search applied to the name or description.
    pub search: Option<String>,
    /// Product id excluded from the results.
    pub exclude_id: Option<i32>,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl ProductListQuery {
    /// Construct a query that targets every product.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter the results by an exact category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Filter the results by a search term applied to the name or description.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn exclude(mut self, product_id: i32) -> Self {
        self.exclude_id = Some(product_id);
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
