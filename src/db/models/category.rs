//! Category Model

use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;
use validator::Validate;

pub type CategoryId = Thing;

/// Category document as stored
///
/// `slug` is lowercase and unique; `parent_category` forms a tree with a
/// nullable root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<CategoryId>,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Record link to the parent category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_category: Option<Thing>,
    #[serde(default = "default_true")]
    pub active: bool,
    /// Display position within listings
    #[serde(default)]
    pub order: i64,
}

fn default_true() -> bool {
    true
}

/// Create payload (wire format)
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCreate {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    /// Lowercased before it is stored
    #[validate(length(min = 1, message = "slug must not be empty"))]
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    /// Parent category id, either "category:xyz" or the bare key
    pub parent_category: Option<String>,
    pub active: Option<bool>,
    pub order: Option<i64>,
}

/// Partial update payload (wire format)
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdate {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "slug must not be empty"))]
    pub slug: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub parent_category: Option<String>,
    pub active: Option<bool>,
    pub order: Option<i64>,
}

/// Category response (wire format)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    pub id: Option<String>,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub parent_category: Option<String>,
    pub active: bool,
    pub order: i64,
}

impl From<Category> for CategoryView {
    fn from(category: Category) -> Self {
        Self {
            id: category.id.as_ref().map(|t| t.to_string()),
            name: category.name,
            slug: category.slug,
            description: category.description,
            image_url: category.image_url,
            parent_category: category.parent_category.as_ref().map(|t| t.to_string()),
            active: category.active,
            order: category.order,
        }
    }
}
