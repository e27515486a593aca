//! Items API client: list, fetch, create, update and delete catalog items

use closet_core::{ClothingItem, ClothingItemCreate, ClothingItemUpdate, ItemId, ItemsFilters};
use reqwest::RequestBuilder;
use tracing::debug;

use crate::error::IntegrationError;
use crate::http::{expect_success, handle_response, ApiHttp};

const ITEMS_PATH: &str = "/api/items";
/// List and create live on the collection route, which has a trailing slash
const ITEMS_COLLECTION_PATH: &str = "/api/items/";
const CATEGORIES_PATH: &str = "/api/items/filters/categories";
const BRANDS_PATH: &str = "/api/items/filters/brands";
const HEALTH_PATH: &str = "/api/health";

/// API client for item CRUD
#[derive(Debug, Clone)]
pub struct ItemsApi {
    http: ApiHttp,
}

impl ItemsApi {
    pub fn new(http: ApiHttp) -> Self {
        Self { http }
    }

    /// `GET /api/items/` with every defined filter as a query parameter
    pub fn list_request(&self, filters: &ItemsFilters) -> RequestBuilder {
        self.http
            .client()
            .get(self.http.url(ITEMS_COLLECTION_PATH))
            .query(&filters.query_pairs())
    }

    fn item_url(&self, id: ItemId) -> String {
        self.http.url(&format!("{}/{}", ITEMS_PATH, id))
    }

    /// List items matching the filters
    pub async fn list(&self, filters: &ItemsFilters) -> Result<Vec<ClothingItem>, IntegrationError> {
        debug!("Listing items ({})", filters.cache_key());
        let response = self.list_request(filters).send().await?;
        handle_response(response).await
    }

    /// Get a single item
    pub async fn get_by_id(&self, id: ItemId) -> Result<ClothingItem, IntegrationError> {
        let response = self.http.client().get(self.item_url(id)).send().await?;
        handle_response(response).await
    }

    pub fn create_request(&self, item: &ClothingItemCreate) -> RequestBuilder {
        self.http.client().post(self.http.url(ITEMS_COLLECTION_PATH)).json(item)
    }

    /// Create a new item
    pub async fn create(&self, item: &ClothingItemCreate) -> Result<ClothingItem, IntegrationError> {
        let response = self.create_request(item).send().await?;
        handle_response(response).await
    }

    /// Update the provided fields of an existing item
    pub async fn update(
        &self,
        id: ItemId,
        changes: &ClothingItemUpdate,
    ) -> Result<ClothingItem, IntegrationError> {
        let response = self
            .http
            .client()
            .put(self.item_url(id))
            .json(changes)
            .send()
            .await?;
        handle_response(response).await
    }

    /// Delete an item. Deleting an unknown id is a `NotFound` error.
    pub async fn delete(&self, id: ItemId) -> Result<(), IntegrationError> {
        let response = self.http.client().delete(self.item_url(id)).send().await?;
        expect_success(response).await
    }

    /// Distinct categories in use
    pub async fn list_categories(&self) -> Result<Vec<String>, IntegrationError> {
        let response = self.http.client().get(self.http.url(CATEGORIES_PATH)).send().await?;
        handle_response(response).await
    }

    /// Distinct brands in use
    pub async fn list_brands(&self) -> Result<Vec<String>, IntegrationError> {
        let response = self.http.client().get(self.http.url(BRANDS_PATH)).send().await?;
        handle_response(response).await
    }

    /// Liveness check of the API server
    pub async fn health(&self) -> Result<(), IntegrationError> {
        let response = self.http.client().get(self.http.url(HEALTH_PATH)).send().await?;
        expect_success(response).await
    }
}
