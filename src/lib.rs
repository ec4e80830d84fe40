//! Typesense-backed search indexing for replaceable AMB learning-resource
//! events.
//!
//! Each logical resource is identified by its author's public key plus a
//! stable slug (the `d` tag) and arrives as an independent immutable signed
//! event. This crate keeps a Typesense collection holding at most one current
//! document per (pubkey, d) pair, compiles a hybrid free-text/`field:value`
//! query syntax into Typesense search parameters, and reconstructs the
//! original events from search hits.
//!
//! # Architecture
//!
//! ```text
//! replace/delete events ──► IndexService ──► ResourceDocument ──► DocumentStore
//! search strings ──► SearchQuery/CompiledQuery ──► DocumentStore ──► SearchOutcome
//! ```
//!
//! The relay transport that receives and authenticates events is an external
//! collaborator; it hands accepted events to [`search::IndexService`].
//!
//! # Example
//!
//! ```no_run
//! use amb_search_index::{config::Config, search::IndexService, typesense::TypesenseClient};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load()?;
//!     let client = TypesenseClient::new(&config.typesense)?;
//!     client.ensure_collection().await?;
//!
//!     let service = IndexService::new(Arc::new(client));
//!     let outcome = service.search("\"machine learning\" inLanguage:de", None).await?;
//!     println!("{} events ({} skipped)", outcome.events.len(), outcome.skipped);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod search;
pub mod typesense;

pub use config::Config;
pub use error::{AppError, Result};
pub use models::{AmbResource, Event};
pub use search::{
    CompiledQuery, DocumentStore, FilterClause, FilterExpr, FilterOp, IndexError, IndexResult,
    IndexService, ResourceDocument, ResourceKey, SearchOutcome, SearchQuery,
};
pub use typesense::TypesenseClient;
