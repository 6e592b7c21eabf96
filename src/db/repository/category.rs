//! Category Repository

use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::sql::Thing;

use super::{BaseRepository, RepoError, RepoResult, make_thing, strip_table_prefix};
use crate::core::CategoryDeletePolicy;
use crate::db::models::{Category, CategoryCreate, CategoryUpdate};

const TABLE: &str = "category";

#[derive(Clone)]
pub struct CategoryRepository {
    base: BaseRepository,
}

impl CategoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All categories in display order
    pub async fn find_all(&self) -> RepoResult<Vec<Category>> {
        let mut categories: Vec<Category> = self
            .base
            .db()
            .query("SELECT * FROM category")
            .await?
            .take(0)?;
        categories.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
        Ok(categories)
    }

    /// Find category by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Category>> {
        let pure_id = strip_table_prefix(TABLE, id);
        let category: Option<Category> = self.base.db().select((TABLE, pure_id)).await?;
        Ok(category)
    }

    /// Find category by slug
    pub async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Category>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM category WHERE slug = $slug LIMIT 1")
            .bind(("slug", slug.to_string()))
            .await?;
        let categories: Vec<Category> = result.take(0)?;
        Ok(categories.into_iter().next())
    }

    /// Resolve a batch of category links, for denormalizing listings
    pub async fn find_by_ids(&self, ids: Vec<Thing>) -> RepoResult<Vec<Category>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let categories: Vec<Category> = self
            .base
            .db()
            .query("SELECT * FROM category WHERE id INSIDE $ids")
            .bind(("ids", ids))
            .await?
            .take(0)?;
        Ok(categories)
    }

    /// Create a new category; the slug is lowercased and must be unique
    pub async fn create(&self, data: CategoryCreate) -> RepoResult<Category> {
        let slug = data.slug.to_lowercase();
        if self.find_by_slug(&slug).await?.is_some() {
            return Err(RepoError::Duplicate(
                "Category with this slug already exists".to_string(),
            ));
        }

        let category = Category {
            id: None,
            name: data.name,
            slug,
            description: data.description,
            image_url: data.image_url,
            parent_category: data.parent_category.map(|p| make_thing(TABLE, &p)),
            active: data.active.unwrap_or(true),
            order: data.order.unwrap_or(0),
        };

        let created: Option<Category> = self.base.db().create(TABLE).content(category).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create category".to_string()))
    }

    /// Partial update; a changed slug is lowercased and re-checked
    pub async fn update(&self, id: &str, data: CategoryUpdate) -> RepoResult<Category> {
        let pure_id = strip_table_prefix(TABLE, id);
        let existing = self
            .find_by_id(pure_id)
            .await?
            .ok_or_else(|| RepoError::NotFound("Category not found".to_string()))?;

        let slug = data.slug.map(|s| s.to_lowercase());
        if let Some(ref new_slug) = slug
            && new_slug != &existing.slug
            && self.find_by_slug(new_slug).await?.is_some()
        {
            return Err(RepoError::Duplicate(
                "Category with this slug already exists".to_string(),
            ));
        }

        #[derive(Serialize)]
        struct CategoryUpdateDb {
            #[serde(skip_serializing_if = "Option::is_none")]
            name: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            slug: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            description: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            image_url: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            parent_category: Option<Thing>,
            #[serde(skip_serializing_if = "Option::is_none")]
            active: Option<bool>,
            #[serde(skip_serializing_if = "Option::is_none")]
            order: Option<i64>,
        }

        let update_data = CategoryUpdateDb {
            name: data.name,
            slug,
            description: data.description,
            image_url: data.image_url,
            parent_category: data.parent_category.map(|p| make_thing(TABLE, &p)),
            active: data.active,
            order: data.order,
        };

        self.base
            .db()
            .query("UPDATE $thing MERGE $data")
            .bind(("thing", make_thing(TABLE, pure_id)))
            .bind(("data", update_data))
            .await?
            .check()?;

        self.find_by_id(pure_id)
            .await?
            .ok_or_else(|| RepoError::NotFound("Category not found".to_string()))
    }

    /// Hard delete a category
    ///
    /// Under the restrict policy a category still referenced by products
    /// cannot be removed; under the orphan policy the product links are
    /// left dangling and listings render the category as null.
    pub async fn delete(&self, id: &str, policy: CategoryDeletePolicy) -> RepoResult<()> {
        let pure_id = strip_table_prefix(TABLE, id);

        if policy == CategoryDeletePolicy::Restrict {
            let mut result = self
                .base
                .db()
                .query("SELECT count() FROM product WHERE category = $cat GROUP ALL")
                .bind(("cat", make_thing(TABLE, pure_id)))
                .await?;
            let count: Option<i64> = result.take((0, "count"))?;
            if count.unwrap_or(0) > 0 {
                return Err(RepoError::Validation(
                    "Cannot delete category with products".to_string(),
                ));
            }
        }

        let deleted: Option<Category> = self.base.db().delete((TABLE, pure_id)).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound("Category not found".to_string()));
        }
        Ok(())
    }
}
