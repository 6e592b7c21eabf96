//! Product Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;
use validator::Validate;

use super::category::Category;

pub type ProductId = Thing;

/// A single (name, value) specification pair, ordered as supplied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specification {
    pub name: String,
    pub value: String,
}

/// Product document as stored
///
/// `category` is a record link; SKU uniqueness is backed by a unique index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<f64>,
    pub image_url: String,
    #[serde(default)]
    pub images: Vec<String>,
    /// Record link to category
    pub category: Thing,
    pub brand: String,
    pub sku: String,
    #[serde(default)]
    pub inventory: i64,
    #[serde(default)]
    pub specifications: Vec<Specification>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: i64,
    #[serde(default)]
    pub free_shipping: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub on_sale: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create payload (wire format)
///
/// Images, specifications and flags default when omitted; rating and
/// review count are server-owned and start at zero.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    pub description: String,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: f64,
    #[validate(range(min = 0.0, message = "compareAtPrice must not be negative"))]
    pub compare_at_price: Option<f64>,
    pub image_url: String,
    #[serde(default)]
    pub images: Vec<String>,
    /// Category id, either "category:xyz" or the bare key
    pub category: String,
    pub brand: String,
    pub sku: String,
    #[serde(default)]
    #[validate(range(min = 0, message = "inventory must not be negative"))]
    pub inventory: i64,
    #[serde(default)]
    pub specifications: Vec<Specification>,
    #[serde(default)]
    pub free_shipping: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub on_sale: bool,
}

/// Partial update payload (wire format)
///
/// Fields left out of the request are left untouched by the merge.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: Option<f64>,
    #[validate(range(min = 0.0, message = "compareAtPrice must not be negative"))]
    pub compare_at_price: Option<f64>,
    pub image_url: Option<String>,
    pub images: Option<Vec<String>>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub sku: Option<String>,
    #[validate(range(min = 0, message = "inventory must not be negative"))]
    pub inventory: Option<i64>,
    pub specifications: Option<Vec<Specification>>,
    #[validate(range(min = 0.0, max = 5.0, message = "rating must be between 0 and 5"))]
    pub rating: Option<f64>,
    #[validate(range(min = 0, message = "reviewCount must not be negative"))]
    pub review_count: Option<i64>,
    pub free_shipping: Option<bool>,
    pub featured: Option<bool>,
    pub on_sale: Option<bool>,
}

/// Denormalized category reference carried on product responses
#[derive(Debug, Clone, Serialize)]
pub struct CategoryBrief {
    pub id: Option<String>,
    pub name: String,
    pub slug: String,
}

/// Product response (wire format) with the category joined
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<f64>,
    pub image_url: String,
    pub images: Vec<String>,
    /// `null` when the linked category no longer resolves
    pub category: Option<CategoryBrief>,
    pub brand: String,
    pub sku: String,
    pub inventory: i64,
    pub specifications: Vec<Specification>,
    pub rating: f64,
    pub review_count: i64,
    pub free_shipping: bool,
    pub featured: bool,
    pub on_sale: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductView {
    pub fn from_parts(product: Product, category: Option<&Category>) -> Self {
        Self {
            id: product.id.as_ref().map(|t| t.to_string()),
            name: product.name,
            description: product.description,
            price: product.price,
            compare_at_price: product.compare_at_price,
            image_url: product.image_url,
            images: product.images,
            category: category.map(|c| CategoryBrief {
                id: c.id.as_ref().map(|t| t.to_string()),
                name: c.name.clone(),
                slug: c.slug.clone(),
            }),
            brand: product.brand,
            sku: product.sku,
            inventory: product.inventory,
            specifications: product.specifications,
            rating: product.rating,
            review_count: product.review_count,
            free_shipping: product.free_shipping,
            featured: product.featured,
            on_sale: product.on_sale,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}
