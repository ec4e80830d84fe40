//! The byte-level seam to the external document store

use async_trait::async_trait;

use super::document::ResourceDocument;
use super::error::IndexResult;
use super::query::{CompiledQuery, FilterExpr};

/// Operations the index layer needs from the search engine, specified at the
/// byte level: responses come back raw and are decoded by
/// [`super::parse_search_response`].
///
/// The production implementation is [`crate::typesense::TypesenseClient`];
/// tests substitute an in-memory store. The store does not enforce the
/// (pubkey, d) uniqueness constraint itself; [`super::IndexService`] upholds
/// it by convention.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert one document into the collection.
    async fn insert_document(&self, doc: &ResourceDocument) -> IndexResult<()>;

    /// Delete every document matching the filter, returning how many were
    /// removed. Zero matches is success, not an error.
    async fn delete_documents(&self, filter: &FilterExpr) -> IndexResult<u64>;

    /// Run a search and return the raw response body. An empty query text
    /// must match all documents in the collection.
    async fn search_raw(&self, query: &CompiledQuery) -> IndexResult<Vec<u8>>;

    /// Count documents matching the filter (all documents when `None`).
    async fn count_documents(&self, filter: Option<&FilterExpr>) -> IndexResult<u64>;
}
