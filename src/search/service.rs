//! Index synchronization and search orchestration

use dashmap::DashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::document::ResourceDocument;
use super::error::{IndexError, IndexResult};
use super::query::{FilterClause, FilterExpr, SearchQuery};
use super::response::{parse_search_response, SearchOutcome};
use super::store::DocumentStore;
use crate::models::{Event, LEARNING_RESOURCE_KIND};

/// Natural key of a replaceable resource: author pubkey plus `d` slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceKey {
    pub pub_key: String,
    pub d: String,
}

impl ResourceKey {
    pub fn new(pub_key: impl Into<String>, d: impl Into<String>) -> Self {
        Self {
            pub_key: pub_key.into(),
            d: d.into(),
        }
    }

    /// Exact-match filter selecting this key's current document.
    fn filter(&self) -> FilterExpr {
        FilterExpr::new()
            .with(FilterClause::exact("d", &self.d))
            .with(FilterClause::exact("eventPubKey", &self.pub_key))
    }
}

/// Keeps the document store holding at most one current document per
/// (pubkey, d) pair and translates searches end to end.
///
/// The store's lookup/delete/insert sequence is not atomic, so upserts and
/// deletes for the same key are serialized through a per-key mutex; writes
/// for different keys proceed concurrently. Lock entries are transient: each
/// writer evicts the entry on its way out unless another writer still holds
/// it, so the registry stays proportional to in-flight writes rather than to
/// every key ever seen. Every operation accepts an optional budget; when it
/// elapses, the in-flight store call is aborted and the operation fails with
/// [`IndexError::Timeout`].
pub struct IndexService<S: DocumentStore> {
    store: Arc<S>,
    locks: DashMap<ResourceKey, Arc<Mutex<()>>>,
    accepted_kind: u32,
}

impl<S: DocumentStore> IndexService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_accepted_kind(store, LEARNING_RESOURCE_KIND)
    }

    pub fn with_accepted_kind(store: Arc<S>, accepted_kind: u32) -> Self {
        Self {
            store,
            locks: DashMap::new(),
            accepted_kind,
        }
    }

    /// Index the latest version of a resource, replacing any document the
    /// store currently holds for its (pubkey, d) key.
    pub async fn upsert(&self, event: &Event, budget: Option<Duration>) -> IndexResult<()> {
        if event.kind != self.accepted_kind {
            return Err(IndexError::SchemaViolation(format!(
                "kind {} is not indexable, only kind {} is accepted",
                event.kind, self.accepted_kind
            )));
        }

        let doc = ResourceDocument::from_event(event)?;
        doc.check_required_fields()?;
        let key = ResourceKey::new(&event.pubkey, &doc.d);

        let lock = self.key_lock(&key);
        let result = with_budget(budget, async {
            let _guard = lock.lock().await;

            let filter = key.filter();
            if self.store.count_documents(Some(&filter)).await? > 0 {
                let removed = self.store.delete_documents(&filter).await?;
                debug!(pub_key = %key.pub_key, d = %key.d, removed, "replacing indexed document");
            }
            self.store.insert_document(&doc).await?;

            info!(pub_key = %key.pub_key, d = %key.d, event_id = %event.id, "indexed resource");
            Ok(())
        })
        .await;
        self.release_key_lock(&key, lock);
        result
    }

    /// Remove the current document for a (pubkey, d) pair. Removing a key
    /// that is not indexed succeeds and reports zero deletions.
    pub async fn delete(
        &self,
        pub_key: &str,
        d: &str,
        budget: Option<Duration>,
    ) -> IndexResult<u64> {
        let key = ResourceKey::new(pub_key, d);

        let lock = self.key_lock(&key);
        let result = with_budget(budget, async {
            let _guard = lock.lock().await;

            let removed = self.store.delete_documents(&key.filter()).await?;
            debug!(pub_key = %key.pub_key, d = %key.d, removed, "deleted indexed documents");
            Ok(removed)
        })
        .await;
        self.release_key_lock(&key, lock);
        result
    }

    /// Count indexed documents matching a filter (all documents when `None`).
    /// This is a real round trip to the store, never an approximation.
    pub async fn count(
        &self,
        filter: Option<&FilterExpr>,
        budget: Option<Duration>,
    ) -> IndexResult<u64> {
        with_budget(budget, self.store.count_documents(filter)).await
    }

    /// Parse and compile a raw search string, run it against the store, and
    /// reconstruct the original events from the hits.
    pub async fn search(
        &self,
        raw_query: &str,
        budget: Option<Duration>,
    ) -> IndexResult<SearchOutcome> {
        let compiled = SearchQuery::parse(raw_query).compile()?;
        let body = with_budget(budget, self.store.search_raw(&compiled)).await?;
        let outcome = parse_search_response(&body)?;
        debug!(
            query = %compiled.query,
            filter_by = compiled.filter_by.as_deref().unwrap_or(""),
            found = outcome.found,
            skipped = outcome.skipped,
            "search completed"
        );
        Ok(outcome)
    }

    fn key_lock(&self, key: &ResourceKey) -> Arc<Mutex<()>> {
        self.locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop this writer's handle and evict the registry entry unless another
    /// writer still holds one. The strong count is checked under the shard
    /// lock, so it races with neither `key_lock` nor a concurrent eviction.
    fn release_key_lock(&self, key: &ResourceKey, lock: Arc<Mutex<()>>) {
        drop(lock);
        self.locks
            .remove_if(key, |_, entry| Arc::strong_count(entry) == 1);
    }
}

async fn with_budget<T, F>(budget: Option<Duration>, fut: F) -> IndexResult<T>
where
    F: Future<Output = IndexResult<T>>,
{
    match budget {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| IndexError::Timeout)?,
        None => fut.await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::query::CompiledQuery;
    use async_trait::async_trait;

    struct UnreachableStore;

    /// Accepts every operation; `latency` is applied to each store call.
    struct NoopStore {
        latency: Duration,
    }

    impl NoopStore {
        fn new() -> Self {
            Self {
                latency: Duration::from_millis(0),
            }
        }

        fn with_latency(latency: Duration) -> Self {
            Self { latency }
        }
    }

    #[async_trait]
    impl DocumentStore for NoopStore {
        async fn insert_document(&self, _doc: &ResourceDocument) -> IndexResult<()> {
            tokio::time::sleep(self.latency).await;
            Ok(())
        }

        async fn delete_documents(&self, _filter: &FilterExpr) -> IndexResult<u64> {
            tokio::time::sleep(self.latency).await;
            Ok(0)
        }

        async fn search_raw(&self, _query: &CompiledQuery) -> IndexResult<Vec<u8>> {
            tokio::time::sleep(self.latency).await;
            Ok(br#"{"found":0,"hits":[]}"#.to_vec())
        }

        async fn count_documents(&self, _filter: Option<&FilterExpr>) -> IndexResult<u64> {
            tokio::time::sleep(self.latency).await;
            Ok(0)
        }
    }

    fn indexable_event(id: &str, pubkey: &str, d: &str) -> Event {
        Event {
            id: id.to_string(),
            pubkey: pubkey.to_string(),
            created_at: 100,
            kind: LEARNING_RESOURCE_KIND,
            tags: vec![vec!["d".to_string(), d.to_string()]],
            content: r#"{"type":"LearningResource","name":"Intro"}"#.to_string(),
            sig: format!("sig-{}", id),
        }
    }

    #[async_trait]
    impl DocumentStore for UnreachableStore {
        async fn insert_document(&self, _doc: &ResourceDocument) -> IndexResult<()> {
            panic!("store must not be reached");
        }

        async fn delete_documents(&self, _filter: &FilterExpr) -> IndexResult<u64> {
            panic!("store must not be reached");
        }

        async fn search_raw(&self, _query: &CompiledQuery) -> IndexResult<Vec<u8>> {
            panic!("store must not be reached");
        }

        async fn count_documents(&self, _filter: Option<&FilterExpr>) -> IndexResult<u64> {
            panic!("store must not be reached");
        }
    }

    #[tokio::test]
    async fn upsert_rejects_foreign_kinds_before_any_write() {
        let service = IndexService::new(Arc::new(UnreachableStore));
        let event = Event {
            id: "e1".to_string(),
            pubkey: "pk1".to_string(),
            created_at: 0,
            kind: 1,
            tags: vec![vec!["d".to_string(), "x".to_string()]],
            content: "{}".to_string(),
            sig: "s".to_string(),
        };

        let err = service.upsert(&event, None).await.unwrap_err();
        assert!(matches!(err, IndexError::SchemaViolation(_)));
    }

    #[tokio::test]
    async fn upsert_validates_before_any_write() {
        let service = IndexService::new(Arc::new(UnreachableStore));
        let event = Event {
            id: "e1".to_string(),
            pubkey: "pk1".to_string(),
            created_at: 0,
            kind: LEARNING_RESOURCE_KIND,
            tags: vec![vec!["d".to_string(), "x".to_string()]],
            content: r#"{"type":"LearningResource","name":""}"#.to_string(),
            sig: "s".to_string(),
        };

        let err = service.upsert(&event, None).await.unwrap_err();
        assert!(matches!(err, IndexError::SchemaViolation(_)));
    }

    #[tokio::test]
    async fn lock_registry_is_empty_after_writes_finish() {
        let service = IndexService::new(Arc::new(NoopStore::new()));

        for i in 0..4 {
            let event = indexable_event(&format!("e{}", i), "pk1", &format!("lesson-{}", i));
            service.upsert(&event, None).await.unwrap();
        }
        service.delete("pk1", "lesson-0", None).await.unwrap();

        assert!(service.locks.is_empty());
    }

    #[tokio::test]
    async fn lock_registry_is_empty_after_concurrent_writes() {
        let service = Arc::new(IndexService::new(Arc::new(NoopStore::with_latency(
            Duration::from_millis(2),
        ))));

        let mut handles = Vec::new();
        for i in 0..8 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                let event = indexable_event(&format!("e{}", i), "pk1", "lesson-1");
                service.upsert(&event, None).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert!(service.locks.is_empty());
    }

    #[tokio::test]
    async fn lock_registry_is_empty_after_a_timed_out_write() {
        let service = IndexService::new(Arc::new(NoopStore::with_latency(
            Duration::from_millis(200),
        )));

        let err = service
            .upsert(
                &indexable_event("e1", "pk1", "lesson-1"),
                Some(Duration::from_millis(10)),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, IndexError::Timeout));
        assert!(service.locks.is_empty());
    }
}
