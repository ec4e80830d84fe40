//! HTTP client for the Typesense document store

mod client;
mod schema;

pub use client::TypesenseClient;
pub use schema::{learning_resource_schema, CollectionSchema, Field};
