//! Repository Module
//!
//! CRUD operations over the embedded document store.

pub mod category;
pub mod product;

pub use category::CategoryRepository;
pub use product::{ProductPage, ProductRepository};

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::sql::Thing;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Duplicate(String),

    #[error("Not enough inventory")]
    InsufficientInventory,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Extract the pure id if it carries a table prefix ("product:xyz" -> "xyz")
pub(crate) fn strip_table_prefix<'a>(table: &str, id: &'a str) -> &'a str {
    id.strip_prefix(table)
        .and_then(|rest| rest.strip_prefix(':'))
        .unwrap_or(id)
}

/// Build a record id from a table name and a raw or prefixed id
pub(crate) fn make_thing(table: &str, id: &str) -> Thing {
    Thing::from((table, strip_table_prefix(table, id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_table_prefix() {
        assert_eq!(strip_table_prefix("product", "product:abc"), "abc");
        assert_eq!(strip_table_prefix("product", "abc"), "abc");
        // Only the matching table prefix is stripped
        assert_eq!(strip_table_prefix("product", "category:abc"), "category:abc");
    }

    #[test]
    fn test_make_thing() {
        assert_eq!(make_thing("product", "abc").to_string(), "product:abc");
        assert_eq!(make_thing("product", "product:abc").to_string(), "product:abc");
    }
}
