//! The seam between the client facade and the catalog it talks to

use std::time::Duration;

use async_trait::async_trait;
use closet_core::{ClothingItem, ClothingItemCreate, ClothingItemUpdate, ItemId, ItemsFilters};

use crate::error::IntegrationError;
use crate::http::ApiHttp;
use crate::items::ItemsApi;
use crate::upload::{UploadApi, UploadFile};

/// Everything the app needs from an item catalog
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    async fn list_items(&self, filters: &ItemsFilters) -> Result<Vec<ClothingItem>, IntegrationError>;
    async fn get_item(&self, id: ItemId) -> Result<ClothingItem, IntegrationError>;
    async fn create_item(&self, item: &ClothingItemCreate) -> Result<ClothingItem, IntegrationError>;
    async fn update_item(
        &self,
        id: ItemId,
        changes: &ClothingItemUpdate,
    ) -> Result<ClothingItem, IntegrationError>;
    async fn delete_item(&self, id: ItemId) -> Result<(), IntegrationError>;
    async fn list_categories(&self) -> Result<Vec<String>, IntegrationError>;
    async fn list_brands(&self) -> Result<Vec<String>, IntegrationError>;
    async fn upload_images(&self, files: &[UploadFile]) -> Result<Vec<String>, IntegrationError>;
    async fn health(&self) -> Result<(), IntegrationError>;
}

/// Catalog served by the REST API
#[derive(Debug, Clone)]
pub struct HttpBackend {
    items: ItemsApi,
    uploads: UploadApi,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, IntegrationError> {
        Ok(Self::from_http(ApiHttp::new(base_url, timeout)?))
    }

    pub fn from_http(http: ApiHttp) -> Self {
        Self {
            items: ItemsApi::new(http.clone()),
            uploads: UploadApi::new(http),
        }
    }
}

#[async_trait]
impl CatalogBackend for HttpBackend {
    async fn list_items(&self, filters: &ItemsFilters) -> Result<Vec<ClothingItem>, IntegrationError> {
        self.items.list(filters).await
    }

    async fn get_item(&self, id: ItemId) -> Result<ClothingItem, IntegrationError> {
        self.items.get_by_id(id).await
    }

    async fn create_item(&self, item: &ClothingItemCreate) -> Result<ClothingItem, IntegrationError> {
        self.items.create(item).await
    }

    async fn update_item(
        &self,
        id: ItemId,
        changes: &ClothingItemUpdate,
    ) -> Result<ClothingItem, IntegrationError> {
        self.items.update(id, changes).await
    }

    async fn delete_item(&self, id: ItemId) -> Result<(), IntegrationError> {
        self.items.delete(id).await
    }

    async fn list_categories(&self) -> Result<Vec<String>, IntegrationError> {
        self.items.list_categories().await
    }

    async fn list_brands(&self) -> Result<Vec<String>, IntegrationError> {
        self.items.list_brands().await
    }

    async fn upload_images(&self, files: &[UploadFile]) -> Result<Vec<String>, IntegrationError> {
        self.uploads.upload_images(files).await
    }

    async fn health(&self) -> Result<(), IntegrationError> {
        self.items.health().await
    }
}
