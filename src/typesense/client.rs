//! Typesense HTTP client

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use super::schema::learning_resource_schema;
use crate::config::TypesenseConfig;
use crate::error::AppError;
use crate::search::{
    CompiledQuery, DocumentStore, FilterExpr, IndexError, IndexResult, ResourceDocument,
};

const API_KEY_HEADER: &str = "X-TYPESENSE-API-KEY";

/// Match-all query text, used when a compiled query has no full-text terms.
const MATCH_ALL: &str = "*";

/// Client for one Typesense collection.
///
/// All connection parameters come from [`TypesenseConfig`]; there is no
/// process-wide state. Requests carry the API key header and honor the
/// configured connect and request timeouts. The core never retries: transport
/// failures and non-2xx responses are surfaced verbatim to the caller.
pub struct TypesenseClient {
    http: Client,
    base_url: String,
    api_key: String,
    collection: String,
    query_by: String,
}

#[derive(Debug, Deserialize)]
struct DeleteResponse {
    #[serde(default)]
    num_deleted: u64,
}

#[derive(Debug, Deserialize)]
struct FoundResponse {
    #[serde(default)]
    found: u64,
}

impl TypesenseClient {
    /// Create a client from configuration.
    pub fn new(config: &TypesenseConfig) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.host.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            collection: config.collection.clone(),
            query_by: config.query_by.join(","),
        })
    }

    /// The collection this client writes to and searches.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Probe whether the collection exists. 404 means absent; any other
    /// non-2xx status is an error.
    pub async fn collection_exists(&self) -> IndexResult<bool> {
        let url = format!("{}/collections/{}", self.base_url, self.collection);
        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        ensure_success(response).await?;
        Ok(true)
    }

    /// Create the learning-resource collection.
    pub async fn create_collection(&self) -> IndexResult<()> {
        let url = format!("{}/collections", self.base_url);
        let schema = learning_resource_schema(&self.collection);
        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&schema)
            .send()
            .await?;

        ensure_success(response).await?;
        info!(collection = %self.collection, "created collection");
        Ok(())
    }

    /// Create the collection if the probe says it is missing.
    pub async fn ensure_collection(&self) -> IndexResult<()> {
        if self.collection_exists().await? {
            debug!(collection = %self.collection, "collection already exists");
            return Ok(());
        }
        self.create_collection().await
    }

    fn documents_url(&self) -> String {
        format!("{}/collections/{}/documents", self.base_url, self.collection)
    }
}

#[async_trait]
impl DocumentStore for TypesenseClient {
    async fn insert_document(&self, doc: &ResourceDocument) -> IndexResult<()> {
        let response = self
            .http
            .post(self.documents_url())
            .header(API_KEY_HEADER, &self.api_key)
            .json(doc)
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }

    async fn delete_documents(&self, filter: &FilterExpr) -> IndexResult<u64> {
        let response = self
            .http
            .delete(self.documents_url())
            .header(API_KEY_HEADER, &self.api_key)
            .query(&[("filter_by", filter.render()?)])
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let body: DeleteResponse = serde_json::from_slice(&response.bytes().await?)?;
        Ok(body.num_deleted)
    }

    async fn search_raw(&self, query: &CompiledQuery) -> IndexResult<Vec<u8>> {
        let q = if query.query.is_empty() {
            MATCH_ALL.to_string()
        } else {
            query.query.clone()
        };
        let mut params = vec![("q", q), ("query_by", self.query_by.clone())];
        if let Some(filter_by) = &query.filter_by {
            params.push(("filter_by", filter_by.clone()));
        }

        let response = self
            .http
            .get(format!("{}/search", self.documents_url()))
            .header(API_KEY_HEADER, &self.api_key)
            .query(&params)
            .send()
            .await?;

        let response = ensure_success(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn count_documents(&self, filter: Option<&FilterExpr>) -> IndexResult<u64> {
        let mut params = vec![
            ("q", MATCH_ALL.to_string()),
            ("query_by", self.query_by.clone()),
            ("per_page", "1".to_string()),
        ];
        if let Some(filter) = filter {
            params.push(("filter_by", filter.render()?));
        }

        let response = self
            .http
            .get(format!("{}/search", self.documents_url()))
            .header(API_KEY_HEADER, &self.api_key)
            .query(&params)
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let body: FoundResponse = serde_json::from_slice(&response.bytes().await?)?;
        Ok(body.found)
    }
}

/// Turn a non-2xx response into a `Store` error carrying the status code and
/// the raw body verbatim for diagnostics.
async fn ensure_success(response: reqwest::Response) -> IndexResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(IndexError::Store {
        status: status.as_u16(),
        body,
    })
}
