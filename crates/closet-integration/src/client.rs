use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use closet_core::{
    merge_image_urls, ClothingItem, ClothingItemCreate, ClothingItemUpdate, ItemId, ItemsFilters,
};
use tracing::{info, warn};

use crate::backend::{CatalogBackend, HttpBackend};
use crate::cache::{Cacheable, QueryCache, QueryKey};
use crate::error::IntegrationError;
use crate::http::resolve_url;
use crate::memory::MemoryCatalog;
use crate::upload::SelectedFile;

/// A non-blocking handle to an in-flight async request.
/// Call `try_recv()` each frame to check for results without blocking the UI.
pub struct PendingRequest<T> {
    receiver: mpsc::Receiver<Result<T, IntegrationError>>,
}

impl<T> PendingRequest<T> {
    /// A request that has already completed, e.g. a cache hit
    pub fn ready(result: Result<T, IntegrationError>) -> Self {
        let (tx, rx) = mpsc::channel();
        let _ = tx.send(result);
        Self { receiver: rx }
    }

    /// Non-blocking check for the result. Returns `None` if still pending.
    pub fn try_recv(&self) -> Option<Result<T, IntegrationError>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => {
                Some(Err(IntegrationError::Network("Channel closed".into())))
            }
        }
    }

    /// Blocking wait for the result. Only for tests and startup.
    pub fn wait(self) -> Result<T, IntegrationError> {
        self.receiver.recv().map_err(|_| IntegrationError::Network("Channel closed".into()))?
    }
}

/// What a form submission saves
#[derive(Debug, Clone)]
pub enum SaveItem {
    Create(ClothingItemCreate),
    Update {
        id: ItemId,
        changes: ClothingItemUpdate,
        existing_image_urls: Vec<String>,
    },
}

/// Facade for all catalog interactions.
/// Owns a background tokio runtime and dispatches async work via channels.
pub struct CatalogClient {
    runtime: tokio::runtime::Runtime,
    backend: Arc<dyn CatalogBackend>,
    cache: Arc<QueryCache>,
    online: Arc<AtomicBool>,
    base_url: Option<String>,
}

impl CatalogClient {
    /// Client for the REST API at `base_url`
    pub fn http(base_url: &str, timeout: Duration) -> Result<Self, IntegrationError> {
        let backend = HttpBackend::new(base_url, timeout)?;
        Self::with_backend(Arc::new(backend), Some(base_url.to_string()))
    }

    /// Client over the in-memory demo wardrobe
    pub fn demo() -> Result<Self, IntegrationError> {
        Self::with_backend(Arc::new(MemoryCatalog::demo()), None)
    }

    pub fn with_backend(
        backend: Arc<dyn CatalogBackend>,
        base_url: Option<String>,
    ) -> Result<Self, IntegrationError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .map_err(|e| IntegrationError::Network(format!("Failed to create runtime: {}", e)))?;

        Ok(Self {
            runtime,
            backend,
            cache: Arc::new(QueryCache::new()),
            online: Arc::new(AtomicBool::new(false)),
            base_url,
        })
    }

    fn spawn<T, F>(&self, task: F) -> PendingRequest<T>
    where
        T: Send + 'static,
        F: Future<Output = Result<T, IntegrationError>> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let online = Arc::clone(&self.online);

        self.runtime.spawn(async move {
            let result = task.await;
            match &result {
                Ok(_) => online.store(true, Ordering::Relaxed),
                Err(e) if e.is_connectivity() => {
                    warn!("Catalog unreachable: {}", e);
                    online.store(false, Ordering::Relaxed);
                }
                Err(_) => {}
            }
            let _ = tx.send(result);
        });

        PendingRequest { receiver: rx }
    }

    /// Serve `key` from the cache, or fetch it and cache the result
    fn cached_read<T, F, Fut>(&self, key: QueryKey, fetch: F) -> PendingRequest<T>
    where
        T: Cacheable + Send + 'static,
        F: FnOnce(Arc<dyn CatalogBackend>) -> Fut,
        Fut: Future<Output = Result<T, IntegrationError>> + Send + 'static,
    {
        if let Some(hit) = self.cache.get::<T>(&key) {
            return PendingRequest::ready(Ok(hit));
        }
        let generation = self.cache.generation();
        let cache = Arc::clone(&self.cache);
        let fetching = fetch(Arc::clone(&self.backend));

        self.spawn(async move {
            let value = fetching.await?;
            cache.put_if_fresh(key, value.clone(), generation);
            Ok(value)
        })
    }

    /// List items matching the filters
    pub fn list_items(&self, filters: ItemsFilters) -> PendingRequest<Vec<ClothingItem>> {
        let key = QueryKey::list(&filters);
        self.cached_read(key, move |backend| async move { backend.list_items(&filters).await })
    }

    /// Fetch a single item
    pub fn get_item(&self, id: ItemId) -> PendingRequest<ClothingItem> {
        self.cached_read(QueryKey::item(id), move |backend| async move {
            backend.get_item(id).await
        })
    }

    /// Distinct categories for the filter menu
    pub fn list_categories(&self) -> PendingRequest<Vec<String>> {
        self.cached_read(QueryKey::categories(), |backend| async move {
            backend.list_categories().await
        })
    }

    /// Distinct brands for the filter menu
    pub fn list_brands(&self) -> PendingRequest<Vec<String>> {
        self.cached_read(QueryKey::brands(), |backend| async move {
            backend.list_brands().await
        })
    }

    /// Delete an item and invalidate everything that could show it
    pub fn delete_item(&self, id: ItemId) -> PendingRequest<()> {
        let backend = Arc::clone(&self.backend);
        let cache = Arc::clone(&self.cache);

        self.spawn(async move {
            backend.delete_item(id).await?;
            cache.invalidate_after_mutation(Some(id));
            info!("Deleted item {}", id);
            Ok(())
        })
    }

    /// Upload the selected files (if any), then create or update the item.
    /// Nothing is saved when the upload fails.
    pub fn save_item(&self, save: SaveItem, files: Vec<SelectedFile>) -> PendingRequest<ClothingItem> {
        let backend = Arc::clone(&self.backend);
        let cache = Arc::clone(&self.cache);

        self.spawn(async move {
            let mut uploaded = Vec::new();
            if !files.is_empty() {
                let mut payloads = Vec::with_capacity(files.len());
                for file in &files {
                    payloads.push(file.load().await?);
                }
                uploaded = backend.upload_images(&payloads).await?;
            }

            let saved = match save {
                SaveItem::Create(mut create) => {
                    create.image_urls = uploaded;
                    backend.create_item(&create).await?
                }
                SaveItem::Update { id, mut changes, existing_image_urls } => {
                    if !uploaded.is_empty() {
                        changes.image_urls = Some(merge_image_urls(&existing_image_urls, &uploaded));
                    }
                    backend.update_item(id, &changes).await?
                }
            };

            cache.invalidate_after_mutation(Some(saved.id));
            info!("Saved item {}", saved.id);
            Ok(saved)
        })
    }

    /// Probe the server; the result also updates `is_online`
    pub fn check_health(&self) -> PendingRequest<()> {
        let backend = Arc::clone(&self.backend);
        let online = Arc::clone(&self.online);
        self.spawn(async move {
            let result = backend.health().await;
            if result.is_err() {
                online.store(false, Ordering::Relaxed);
            }
            result
        })
    }

    /// Whether the server appears to be online (based on last request result).
    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Relaxed)
    }

    /// Whether the client runs against the in-memory catalog
    pub fn is_demo(&self) -> bool {
        self.base_url.is_none()
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Displayable URL for a stored image
    pub fn resolve_image_url(&self, url: &str) -> String {
        match &self.base_url {
            Some(base) => resolve_url(base, url),
            None => url.to_string(),
        }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use closet_core::{DraftAction, DraftField, ItemDraft};
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Semaphore;

    use crate::upload::UploadFile;

    /// Memory catalog that counts list calls and can hold them until released
    struct CountingCatalog {
        inner: MemoryCatalog,
        list_calls: AtomicUsize,
        gate: Option<Semaphore>,
    }

    impl CountingCatalog {
        fn new(gated: bool) -> Self {
            Self {
                inner: MemoryCatalog::new(),
                list_calls: AtomicUsize::new(0),
                gate: gated.then(|| Semaphore::new(0)),
            }
        }
    }

    #[async_trait]
    impl CatalogBackend for CountingCatalog {
        async fn list_items(&self, filters: &ItemsFilters) -> Result<Vec<ClothingItem>, IntegrationError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.acquire().await.unwrap().forget();
            }
            self.inner.list_items(filters).await
        }
        async fn get_item(&self, id: ItemId) -> Result<ClothingItem, IntegrationError> {
            self.inner.get_item(id).await
        }
        async fn create_item(&self, item: &ClothingItemCreate) -> Result<ClothingItem, IntegrationError> {
            self.inner.create_item(item).await
        }
        async fn update_item(
            &self,
            id: ItemId,
            changes: &ClothingItemUpdate,
        ) -> Result<ClothingItem, IntegrationError> {
            self.inner.update_item(id, changes).await
        }
        async fn delete_item(&self, id: ItemId) -> Result<(), IntegrationError> {
            self.inner.delete_item(id).await
        }
        async fn list_categories(&self) -> Result<Vec<String>, IntegrationError> {
            self.inner.list_categories().await
        }
        async fn list_brands(&self) -> Result<Vec<String>, IntegrationError> {
            self.inner.list_brands().await
        }
        async fn upload_images(&self, files: &[UploadFile]) -> Result<Vec<String>, IntegrationError> {
            self.inner.upload_images(files).await
        }
        async fn health(&self) -> Result<(), IntegrationError> {
            Ok(())
        }
    }

    fn memory_client() -> CatalogClient {
        CatalogClient::with_backend(Arc::new(MemoryCatalog::new()), None).unwrap()
    }

    fn create(name: &str) -> SaveItem {
        SaveItem::Create(ClothingItemCreate {
            name: Some(name.into()),
            ..Default::default()
        })
    }

    fn photo(name: &str) -> SelectedFile {
        SelectedFile::from_bytes(name, vec![0xFFu8, 0xD8])
    }

    #[test]
    fn test_pending_request_try_recv_none_then_result() {
        let (tx, rx) = mpsc::channel();
        let pending: PendingRequest<String> = PendingRequest { receiver: rx };

        assert!(pending.try_recv().is_none());
        tx.send(Ok("hello".to_string())).unwrap();
        assert_eq!(pending.try_recv().unwrap().unwrap(), "hello");
    }

    #[test]
    fn test_pending_request_closed_channel_is_an_error() {
        let (tx, rx) = mpsc::channel::<Result<u32, IntegrationError>>();
        let pending = PendingRequest { receiver: rx };
        drop(tx);
        assert!(matches!(pending.try_recv(), Some(Err(IntegrationError::Network(_)))));
    }

    #[test]
    fn test_ready_request() {
        let pending = PendingRequest::ready(Ok(42u32));
        assert_eq!(pending.wait().unwrap(), 42);
    }

    #[test]
    fn test_blue_shirt_without_files() {
        let client = memory_client();
        let mut draft = ItemDraft::new();
        draft.apply(DraftAction::Set(DraftField::Name, "Blue Shirt".into()));
        draft.apply(DraftAction::Set(DraftField::Category, "Tops".into()));

        let saved = client
            .save_item(SaveItem::Create(draft.to_create(None).unwrap()), Vec::new())
            .wait()
            .unwrap();
        assert_eq!(saved.name.as_deref(), Some("Blue Shirt"));
        assert_eq!(saved.category.as_deref(), Some("Tops"));
        assert!(saved.image_urls.is_empty());
        assert!(saved.tags.is_empty());
        assert!(saved.updated_at.is_none());
        assert_eq!(saved.owner, "default");
        assert!(client.is_online());
    }

    #[test]
    fn test_create_with_uploads_uses_exactly_uploaded_urls() {
        let client = memory_client();
        let saved = client
            .save_item(create("Boots"), vec![photo("left.jpg"), photo("right.jpg")])
            .wait()
            .unwrap();
        assert_eq!(saved.image_urls, vec!["/uploads/1-left.jpg", "/uploads/2-right.jpg"]);
    }

    #[test]
    fn test_edit_with_uploads_appends_after_existing() {
        let client = memory_client();
        let first = client.save_item(create("Coat"), vec![photo("front.png")]).wait().unwrap();

        let update = SaveItem::Update {
            id: first.id,
            changes: ClothingItemUpdate {
                notes: Some(Some("Relined".into())),
                ..Default::default()
            },
            existing_image_urls: first.image_urls.clone(),
        };
        let edited = client
            .save_item(update, vec![photo("back.png"), photo("tag.png")])
            .wait()
            .unwrap();
        assert_eq!(
            edited.image_urls,
            vec!["/uploads/1-front.png", "/uploads/2-back.png", "/uploads/3-tag.png"]
        );
        assert!(edited.updated_at.is_some());
    }

    #[test]
    fn test_edit_without_uploads_keeps_images() {
        let client = memory_client();
        let first = client.save_item(create("Scarf"), vec![photo("a.jpg")]).wait().unwrap();
        let update = SaveItem::Update {
            id: first.id,
            changes: ClothingItemUpdate::default(),
            existing_image_urls: first.image_urls.clone(),
        };
        let edited = client.save_item(update, Vec::new()).wait().unwrap();
        assert_eq!(edited.image_urls, first.image_urls);
    }

    #[test]
    fn test_failed_upload_saves_nothing() {
        let client = memory_client();
        let result = client
            .save_item(create("Hat"), vec![SelectedFile::from_bytes("readme.txt", vec![1u8])])
            .wait();
        assert!(matches!(result, Err(IntegrationError::Validation(_))));
        let items = client.list_items(ItemsFilters::list_default()).wait().unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_delete_removes_from_list() {
        let client = memory_client();
        let a = client.save_item(create("A"), Vec::new()).wait().unwrap();
        client.save_item(create("B"), Vec::new()).wait().unwrap();

        let before = client.list_items(ItemsFilters::list_default()).wait().unwrap();
        assert_eq!(before.len(), 2);

        client.delete_item(a.id).wait().unwrap();
        let after = client.list_items(ItemsFilters::list_default()).wait().unwrap();
        assert!(after.iter().all(|item| item.id != a.id));
        assert_eq!(after.len(), 1);

        assert!(matches!(client.get_item(a.id).wait(), Err(IntegrationError::NotFound(_))));
        assert!(matches!(client.delete_item(a.id).wait(), Err(IntegrationError::NotFound(_))));
    }

    #[test]
    fn test_three_items_newest_first() {
        let client = memory_client();
        for name in ["one", "two", "three"] {
            client.save_item(create(name), Vec::new()).wait().unwrap();
        }
        let items = client.list_items(ItemsFilters::list_default()).wait().unwrap();
        let names: Vec<_> = items.iter().map(|i| i.display_name()).collect();
        assert_eq!(names, vec!["three", "two", "one"]);
    }

    #[test]
    fn test_second_read_served_from_cache_until_mutation() {
        let counting = Arc::new(CountingCatalog::new(false));
        let client = CatalogClient::with_backend(counting.clone(), None).unwrap();

        client.list_items(ItemsFilters::dashboard()).wait().unwrap();
        client.list_items(ItemsFilters::dashboard()).wait().unwrap();
        assert_eq!(counting.list_calls.load(Ordering::SeqCst), 1);

        client.save_item(create("Parka"), Vec::new()).wait().unwrap();
        let items = client.list_items(ItemsFilters::dashboard()).wait().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(counting.list_calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_stale_read_does_not_repopulate_cache() {
        let counting = Arc::new(CountingCatalog::new(true));
        let client = CatalogClient::with_backend(counting.clone(), None).unwrap();

        let in_flight = client.list_items(ItemsFilters::list_default());
        client.save_item(create("Vest"), Vec::new()).wait().unwrap();
        if let Some(gate) = &counting.gate {
            gate.add_permits(1);
        }
        in_flight.wait().unwrap();
        assert!(!client.cache().contains(&QueryKey::list(&ItemsFilters::list_default())));
    }

    #[test]
    fn test_image_url_resolution() {
        let client = CatalogClient::with_backend(
            Arc::new(MemoryCatalog::new()),
            Some("http://localhost:8000".into()),
        )
        .unwrap();
        assert_eq!(
            client.resolve_image_url("/uploads/x.jpg"),
            "http://localhost:8000/uploads/x.jpg"
        );
        assert!(!client.is_demo());
        assert!(memory_client().is_demo());
    }

    #[test]
    fn test_health_marks_online() {
        let client = memory_client();
        assert!(!client.is_online());
        client.check_health().wait().unwrap();
        assert!(client.is_online());
    }
}
