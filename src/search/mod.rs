//! Indexing consistency and query compilation.
//!
//! This module is the core of the crate:
//!
//! - [`document`] maps between (resource, event) pairs and the flat document
//!   shape stored in the search engine.
//! - [`query`] parses the hybrid free-text/`field:value` syntax and compiles
//!   it into engine-native query + filter parameters.
//! - [`response`] turns raw search responses back into the original events,
//!   tolerating individually corrupt hits.
//! - [`service`] orchestrates create/replace/delete so the store never holds
//!   more than one current document per (pubkey, d) pair.
//! - [`store`] is the byte-level seam to the search engine; the production
//!   implementation is [`crate::typesense::TypesenseClient`].

mod document;
mod error;
mod query;
mod response;
mod service;
mod store;

pub use document::ResourceDocument;
pub use error::{IndexError, IndexResult};
pub use query::{CompiledQuery, FilterClause, FilterExpr, FilterOp, SearchQuery};
pub use response::{parse_search_response, SearchOutcome};
pub use service::{IndexService, ResourceKey};
pub use store::DocumentStore;
