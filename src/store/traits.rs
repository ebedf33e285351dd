//! Backend-agnostic `Database` trait — the persistence boundary.
//!
//! Handlers receive an `Arc<dyn Database>` and never touch SQL. Lookups
//! return `Ok(None)` for misses; only infrastructure failures are errors.

use async_trait::async_trait;

use crate::error::DatabaseError;
use crate::model::{Author, Quote, QuoteRecord};

/// Optional filter criteria for quote listings, combined with AND.
#[derive(Debug, Clone, Default)]
pub struct QuoteFilter {
    /// Exact author name.
    pub author_name: Option<String>,
    /// Minimum rating (inclusive).
    pub min_rating: Option<i64>,
}

#[async_trait]
pub trait Database: Send + Sync {
    /// Run all pending schema migrations.
    async fn init_schema(&self) -> Result<(), DatabaseError>;

    // ── Authors ─────────────────────────────────────────────────────

    /// Insert a new author and return the stored row.
    ///
    /// A duplicate name fails with [`DatabaseError::Constraint`].
    async fn insert_author(&self, name: &str) -> Result<Author, DatabaseError>;

    /// Get an author by id.
    async fn get_author(&self, id: i64) -> Result<Option<Author>, DatabaseError>;

    /// Get all authors in insertion order.
    async fn list_authors(&self) -> Result<Vec<Author>, DatabaseError>;

    // ── Quotes ──────────────────────────────────────────────────────

    /// Insert a quote for an existing author and return the stored row.
    async fn insert_quote(&self, author_id: i64, text: &str) -> Result<Quote, DatabaseError>;

    /// Get a quote with its author by quote id.
    async fn get_quote(&self, id: i64) -> Result<Option<QuoteRecord>, DatabaseError>;

    /// Get all quotes with their authors, in insertion order.
    async fn list_quotes(&self) -> Result<Vec<QuoteRecord>, DatabaseError>;

    /// Overwrite a quote's mutable fields (`author_id`, `text`, `rating`).
    async fn update_quote(&self, quote: &Quote) -> Result<(), DatabaseError>;

    /// Delete a quote by id. Returns whether a row was deleted.
    async fn delete_quote(&self, id: i64) -> Result<bool, DatabaseError>;

    /// Quotes matching the given filter, with their authors.
    async fn filter_quotes(&self, filter: &QuoteFilter) -> Result<Vec<QuoteRecord>, DatabaseError>;
}
