//! Database Module
//!
//! Owns the embedded SurrealDB handle and the schema definitions.

pub mod models;
pub mod repository;

use std::path::Path;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "reef";
const DATABASE: &str = "store";

/// Database service, owns the embedded SurrealDB instance
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open the on-disk store (RocksDB engine)
    pub async fn new(db_path: &Path) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        let service = Self::prepare(db).await?;
        tracing::info!(path = %db_path.display(), "Database connection established");
        Ok(service)
    }

    /// Open an in-memory store, used by the test suites
    pub async fn new_in_memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        Self::prepare(db).await
    }

    async fn prepare(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;
        define_schema(&db).await?;
        Ok(Self { db })
    }
}

/// Uniqueness constraints live in the store; everything else is schemaless
async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query("DEFINE INDEX IF NOT EXISTS product_sku ON TABLE product FIELDS sku UNIQUE")
        .await
        .and_then(|response| response.check())
        .map_err(|e| AppError::database(format!("Failed to define product_sku index: {e}")))?;
    db.query("DEFINE INDEX IF NOT EXISTS category_slug ON TABLE category FIELDS slug UNIQUE")
        .await
        .and_then(|response| response.check())
        .map_err(|e| AppError::database(format!("Failed to define category_slug index: {e}")))?;
    Ok(())
}
