use std::io::{Read, Seek};

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use csv::Trim;
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::money::parse_cents;
use crate::domain::product::{NewProduct, UpdateProduct};
use crate::forms::{non_blank, sanitize_inline_text, sanitize_multiline_text};

/// Maximum allowed length for a product name.
const NAME_MAX_LEN: usize = 255;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

const CATEGORY_MAX_LEN_VALIDATOR: u64 = 100;
const DESCRIPTION_MAX_LEN_VALIDATOR: u64 = 2048;
const IMAGE_URL_MAX_LEN_VALIDATOR: u64 = 1024;

/// Result type returned by the product form helpers.
pub type ProductFormResult<T> = Result<T, ProductFormError>;

/// Errors that can occur while processing product forms.
#[derive(Debug, Error)]
pub enum ProductFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("Product name is required")]
    EmptyName,
    #[error("Valid price is required")]
    InvalidPrice,
    #[error("Category is required")]
    EmptyCategory,
    #[error("Stock quantity cannot be negative")]
    NegativeStock,
    #[error("row {row} is missing a product name")]
    UploadMissingName { row: usize },
    #[error("row {row} has invalid price `{value}`")]
    UploadInvalidPrice { row: usize, value: String },
    #[error("row {row} is missing a category")]
    UploadMissingCategory { row: usize },
    #[error("row {row} has invalid stock quantity `{value}`")]
    UploadInvalidStock { row: usize, value: String },
    /// The uploaded CSV did not contain any usable products.
    #[error("upload contains no products")]
    EmptyUpload,
    #[error("Error reading csv file")]
    FileRead(#[from] std::io::Error),
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Payload of the add and edit product forms.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    #[validate(length(max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
    #[validate(length(max = DESCRIPTION_MAX_LEN_VALIDATOR))]
    #[serde(default)]
    pub description: Option<String>,
    /// Decimal price such as `4.99`. JSON numbers are accepted too.
    #[serde(deserialize_with = "string_or_number")]
    pub price: String,
    #[validate(length(max = IMAGE_URL_MAX_LEN_VALIDATOR))]
    #[serde(default)]
    pub image_url: Option<String>,
    #[validate(length(max = CATEGORY_MAX_LEN_VALIDATOR))]
    pub category: String,
    #[serde(default)]
    pub stock_quantity: Option<i32>,
}

/// Sanitized product fields shared by the create and update conversions.
struct ProductFields {
    name: String,
    description: Option<String>,
    price_cents: i64,
    image_url: Option<String>,
    category: String,
    stock_quantity: i32,
}

impl ProductForm {
    /// Validates and sanitizes the payload into a domain `NewProduct`.
    pub fn into_new_product(self) -> ProductFormResult<NewProduct> {
        let fields = self.sanitize()?;

        let mut new_product = NewProduct::new(fields.name, fields.price_cents, fields.category)
            .with_stock(fields.stock_quantity);
        if let Some(description) = fields.description {
            new_product = new_product.with_description(description);
        }
        if let Some(image_url) = fields.image_url {
            new_product = new_product.with_image_url(image_url);
        }
        Ok(new_product)
    }

    /// Validates and sanitizes the payload into a full `UpdateProduct`.
    pub fn into_update_product(self) -> ProductFormResult<UpdateProduct> {
        let fields = self.sanitize()?;

        Ok(
            UpdateProduct::new(fields.name, fields.price_cents, fields.category)
                .description(fields.description)
                .image_url(fields.image_url)
                .stock_quantity(fields.stock_quantity),
        )
    }

    fn sanitize(self) -> ProductFormResult<ProductFields> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(ProductFormError::EmptyName);
        }

        let price_cents = parse_cents(&self.price)
            .filter(|cents| *cents > 0)
            .ok_or(ProductFormError::InvalidPrice)?;

        let category = sanitize_inline_text(&self.category);
        if category.is_empty() {
            return Err(ProductFormError::EmptyCategory);
        }

        let stock_quantity = self.stock_quantity.unwrap_or(0);
        if stock_quantity < 0 {
            return Err(ProductFormError::NegativeStock);
        }

        Ok(ProductFields {
            name,
            description: self
                .description
                .as_deref()
                .map(sanitize_multiline_text)
                .filter(|value| !value.is_empty()),
            price_cents,
            image_url: non_blank(self.image_url.as_deref()),
            category,
            stock_quantity,
        })
    }
}

/// Stock-only update.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockForm {
    pub stock_quantity: i32,
}

impl StockForm {
    pub fn quantity(&self) -> ProductFormResult<i32> {
        if self.stock_quantity < 0 {
            return Err(ProductFormError::NegativeStock);
        }
        Ok(self.stock_quantity)
    }
}

#[derive(MultipartForm)]
/// Multipart form for uploading a CSV file with new products.
pub struct UploadProductsForm {
    #[multipart(limit = "10MB")]
    /// Columns: `name,description,price,category,stock_quantity,image_url`.
    pub csv: TempFile,
}

impl UploadProductsForm {
    /// Parse the uploaded CSV file into a list of [`NewProduct`] records.
    pub fn into_new_products(&mut self) -> ProductFormResult<Vec<NewProduct>> {
        self.csv.file.rewind()?;
        parse_products(self.csv.file.by_ref())
    }
}

#[derive(Deserialize)]
struct ProductCsvRow {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    price: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    stock_quantity: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
}

fn parse_products<R: Read>(reader: R) -> ProductFormResult<Vec<NewProduct>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut products = Vec::new();

    for (index, row) in csv_reader.deserialize::<ProductCsvRow>().enumerate() {
        let row_number = index + 2; // header is row 1
        let record = row?;

        let name = non_blank(record.name.as_deref())
            .ok_or(ProductFormError::UploadMissingName { row: row_number })?;

        let raw_price = record.price.unwrap_or_default();
        let price_cents = parse_cents(&raw_price)
            .filter(|cents| *cents > 0)
            .ok_or_else(|| ProductFormError::UploadInvalidPrice {
                row: row_number,
                value: raw_price.clone(),
            })?;

        let category = non_blank(record.category.as_deref())
            .ok_or(ProductFormError::UploadMissingCategory { row: row_number })?;

        let stock_quantity = match non_blank(record.stock_quantity.as_deref()) {
            Some(value) => match value.parse::<i32>() {
                Ok(stock) if stock >= 0 => stock,
                _ => {
                    return Err(ProductFormError::UploadInvalidStock {
                        row: row_number,
                        value,
                    });
                }
            },
            None => 0,
        };

        let mut product = NewProduct::new(name, price_cents, category).with_stock(stock_quantity);
        if let Some(description) = record
            .description
            .as_deref()
            .map(sanitize_multiline_text)
            .filter(|value| !value.is_empty())
        {
            product = product.with_description(description);
        }
        if let Some(image_url) = non_blank(record.image_url.as_deref()) {
            product = product.with_image_url(image_url);
        }

        products.push(product);
    }

    if products.is_empty() {
        return Err(ProductFormError::EmptyUpload);
    }

    Ok(products)
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(value) => value,
        Raw::Integer(value) => value.to_string(),
        Raw::Float(value) => format!("{value:.2}"),
    })
}
