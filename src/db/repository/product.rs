//! Product Repository

use chrono::Utc;
use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::sql::Thing;

use super::{BaseRepository, RepoError, RepoResult, make_thing, strip_table_prefix};
use crate::db::models::{
    Page, Product, ProductCreate, ProductFilter, ProductSort, ProductUpdate, Specification,
};

const PRODUCT_TABLE: &str = "product";
const CATEGORY_TABLE: &str = "category";

/// One page of a filtered listing plus the total match count
#[derive(Debug)]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub total: u64,
}

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Filtered, sorted, paged listing
    ///
    /// The WHERE clause is assembled from the active filters with typed
    /// binds. Ordering and pagination happen in memory: the embedded engine
    /// mis-orders rows when WHERE, ORDER BY and LIMIT combine in one
    /// statement, and the catalog easily fits.
    pub async fn find_page(
        &self,
        filter: &ProductFilter,
        sort: ProductSort,
        page: &Page,
    ) -> RepoResult<ProductPage> {
        // A NaN price bound matches nothing; skip the round trip
        if filter.is_unsatisfiable() {
            return Ok(ProductPage {
                items: Vec::new(),
                total: 0,
            });
        }

        let mut where_parts: Vec<&str> = Vec::new();
        if filter.category.is_some() {
            where_parts.push("category = $category");
        }
        if filter.brand.is_some() {
            where_parts.push("brand = $brand");
        }
        if filter.featured.is_some() {
            where_parts.push("featured = $featured");
        }
        if filter.on_sale.is_some() {
            where_parts.push("on_sale = $on_sale");
        }
        if filter.min_price.is_some() {
            where_parts.push("price >= $min_price");
        }
        if filter.max_price.is_some() {
            where_parts.push("price <= $max_price");
        }
        if filter.in_stock {
            where_parts.push("inventory > 0");
        }

        let sql = if where_parts.is_empty() {
            "SELECT * FROM product".to_string()
        } else {
            format!("SELECT * FROM product WHERE {}", where_parts.join(" AND "))
        };

        let mut query = self.base.db().query(sql);
        if let Some(category) = &filter.category {
            query = query.bind(("category", make_thing(CATEGORY_TABLE, category)));
        }
        if let Some(brand) = &filter.brand {
            query = query.bind(("brand", brand.clone()));
        }
        if let Some(featured) = filter.featured {
            query = query.bind(("featured", featured));
        }
        if let Some(on_sale) = filter.on_sale {
            query = query.bind(("on_sale", on_sale));
        }
        if let Some(min_price) = filter.min_price {
            query = query.bind(("min_price", min_price));
        }
        if let Some(max_price) = filter.max_price {
            query = query.bind(("max_price", max_price));
        }

        let mut matched: Vec<Product> = query.await?.take(0)?;
        let total = matched.len() as u64;
        sort.apply(&mut matched);

        let items = matched
            .into_iter()
            .skip(page.skip())
            .take(page.limit as usize)
            .collect();

        Ok(ProductPage { items, total })
    }

    /// Find product by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let pure_id = strip_table_prefix(PRODUCT_TABLE, id);
        let product: Option<Product> = self.base.db().select((PRODUCT_TABLE, pure_id)).await?;
        Ok(product)
    }

    /// Find product by SKU
    pub async fn find_by_sku(&self, sku: &str) -> RepoResult<Option<Product>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM product WHERE sku = $sku LIMIT 1")
            .bind(("sku", sku.to_string()))
            .await?;
        let products: Vec<Product> = result.take(0)?;
        Ok(products.into_iter().next())
    }

    /// Create a new product
    ///
    /// Rejects a duplicate SKU before writing; the unique index backs this
    /// up against concurrent creates.
    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        if self.find_by_sku(&data.sku).await?.is_some() {
            return Err(RepoError::Duplicate(
                "Product with this SKU already exists".to_string(),
            ));
        }

        let now = Utc::now();
        let product = Product {
            id: None,
            name: data.name,
            description: data.description,
            price: data.price,
            compare_at_price: data.compare_at_price,
            image_url: data.image_url,
            images: data.images,
            category: make_thing(CATEGORY_TABLE, &data.category),
            brand: data.brand,
            sku: data.sku,
            inventory: data.inventory,
            specifications: data.specifications,
            rating: 0.0,
            review_count: 0,
            free_shipping: data.free_shipping,
            featured: data.featured,
            on_sale: data.on_sale,
            created_at: now,
            updated_at: now,
        };

        let created: Option<Product> = self
            .base
            .db()
            .create(PRODUCT_TABLE)
            .content(product)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Partial update; untouched fields survive the merge
    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let pure_id = strip_table_prefix(PRODUCT_TABLE, id);
        let existing = self
            .find_by_id(pure_id)
            .await?
            .ok_or_else(|| RepoError::NotFound("Product not found".to_string()))?;

        // A changed SKU must stay unique
        if let Some(ref sku) = data.sku
            && sku != &existing.sku
            && self.find_by_sku(sku).await?.is_some()
        {
            return Err(RepoError::Duplicate(
                "Product with this SKU already exists".to_string(),
            ));
        }

        #[derive(Serialize)]
        struct ProductUpdateDb {
            #[serde(skip_serializing_if = "Option::is_none")]
            name: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            description: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            price: Option<f64>,
            #[serde(skip_serializing_if = "Option::is_none")]
            compare_at_price: Option<f64>,
            #[serde(skip_serializing_if = "Option::is_none")]
            image_url: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            images: Option<Vec<String>>,
            #[serde(skip_serializing_if = "Option::is_none")]
            category: Option<Thing>,
            #[serde(skip_serializing_if = "Option::is_none")]
            brand: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            sku: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            inventory: Option<i64>,
            #[serde(skip_serializing_if = "Option::is_none")]
            specifications: Option<Vec<Specification>>,
            #[serde(skip_serializing_if = "Option::is_none")]
            rating: Option<f64>,
            #[serde(skip_serializing_if = "Option::is_none")]
            review_count: Option<i64>,
            #[serde(skip_serializing_if = "Option::is_none")]
            free_shipping: Option<bool>,
            #[serde(skip_serializing_if = "Option::is_none")]
            featured: Option<bool>,
            #[serde(skip_serializing_if = "Option::is_none")]
            on_sale: Option<bool>,
            updated_at: chrono::DateTime<Utc>,
        }

        let update_data = ProductUpdateDb {
            name: data.name,
            description: data.description,
            price: data.price,
            compare_at_price: data.compare_at_price,
            image_url: data.image_url,
            images: data.images,
            category: data.category.map(|c| make_thing(CATEGORY_TABLE, &c)),
            brand: data.brand,
            sku: data.sku,
            inventory: data.inventory,
            specifications: data.specifications,
            rating: data.rating,
            review_count: data.review_count,
            free_shipping: data.free_shipping,
            featured: data.featured,
            on_sale: data.on_sale,
            updated_at: Utc::now(),
        };

        self.base
            .db()
            .query("UPDATE $thing MERGE $data")
            .bind(("thing", make_thing(PRODUCT_TABLE, pure_id)))
            .bind(("data", update_data))
            .await?
            .check()?;

        self.find_by_id(pure_id)
            .await?
            .ok_or_else(|| RepoError::NotFound("Product not found".to_string()))
    }

    /// Hard delete a product
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let pure_id = strip_table_prefix(PRODUCT_TABLE, id);
        let deleted: Option<Product> = self.base.db().delete((PRODUCT_TABLE, pure_id)).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound("Product not found".to_string()));
        }
        Ok(())
    }

    /// Conditionally decrement inventory
    ///
    /// The check and the write are a single statement, so two concurrent
    /// decrements cannot interleave between them.
    pub async fn decrement_inventory(&self, id: &str, quantity: i64) -> RepoResult<Product> {
        if quantity < 0 {
            return Err(RepoError::Validation(
                "quantity must not be negative".to_string(),
            ));
        }

        let pure_id = strip_table_prefix(PRODUCT_TABLE, id);
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $thing SET inventory -= $qty, updated_at = $now \
                 WHERE inventory >= $qty RETURN AFTER",
            )
            .bind(("thing", make_thing(PRODUCT_TABLE, pure_id)))
            .bind(("qty", quantity))
            .bind(("now", Utc::now()))
            .await?;
        let updated: Vec<Product> = result.take(0)?;

        match updated.into_iter().next() {
            Some(product) => Ok(product),
            None => match self.find_by_id(pure_id).await? {
                Some(_) => Err(RepoError::InsufficientInventory),
                None => Err(RepoError::NotFound("Product not found".to_string())),
            },
        }
    }

    /// Bounded listing of featured products
    pub async fn find_featured(&self, limit: usize) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE featured = true")
            .await?
            .take(0)?;
        Ok(products.into_iter().take(limit).collect())
    }

    /// Bounded listing of discounted products
    ///
    /// The sale flag alone is not enough: without a positive compare-at
    /// price there is no discount to show.
    pub async fn find_on_sale(&self, limit: usize) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE on_sale = true")
            .await?
            .take(0)?;
        Ok(products
            .into_iter()
            .filter(|p| p.compare_at_price.is_some_and(|c| c > 0.0))
            .take(limit)
            .collect())
    }
}
