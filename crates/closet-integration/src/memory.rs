//! In-process catalog used for demo mode and tests
//!
//! Mirrors the server's list semantics: exact-match filters, case-insensitive
//! search across name, description, brand, notes and tags, nulls sorting as
//! the largest value, and `skip`/`limit` defaulting to 0 and 100.

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use closet_core::{
    ClothingItem, ClothingItemCreate, ClothingItemUpdate, InputError, ItemId, ItemsFilters, SortBy,
    SortOrder, DEFAULT_OWNER,
};
use parking_lot::Mutex;
use tracing::debug;

use crate::backend::CatalogBackend;
use crate::error::IntegrationError;
use crate::upload::UploadFile;

const DEFAULT_LIMIT: u32 = 100;
const MAX_LIMIT: u32 = 1000;

#[derive(Debug, Default)]
struct CatalogState {
    items: Vec<ClothingItem>,
    next_id: i64,
    next_upload: u64,
    last_created: Option<DateTime<Utc>>,
}

impl CatalogState {
    /// Creation timestamps are strictly increasing so ordering by
    /// `created_at` is total
    fn stamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let stamp = match self.last_created {
            Some(last) if now <= last => last + Duration::milliseconds(1),
            _ => now,
        };
        self.last_created = Some(stamp);
        stamp
    }

    fn position(&self, id: ItemId) -> Result<usize, IntegrationError> {
        self.items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| IntegrationError::NotFound("Item not found".into()))
    }
}

/// Thread-safe catalog kept entirely in memory
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    state: Mutex<CatalogState>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog pre-filled with the given items, created in order
    pub fn with_items(items: impl IntoIterator<Item = ClothingItemCreate>) -> Self {
        let catalog = Self::new();
        for item in items {
            // Seeds that fail validation are skipped
            let _ = catalog.insert(&item);
        }
        catalog
    }

    /// A small wardrobe for running the app without a server
    pub fn demo() -> Self {
        let item = |name: &str, category: &str, brand: Option<&str>, price: Option<f64>, tags: &[&str]| {
            ClothingItemCreate {
                name: Some(name.to_string()),
                category: Some(category.to_string()),
                brand: brand.map(str::to_string),
                purchase_price: price,
                tags: tags.iter().map(|t| t.to_string()).collect(),
                ..Default::default()
            }
        };
        Self::with_items([
            ClothingItemCreate {
                purchase_date: NaiveDate::from_ymd_opt(2023, 4, 12),
                notes: Some("Dry clean only".into()),
                ..item("Wool Overcoat", "Outerwear", Some("Uniqlo"), Some(149.9), &["winter", "formal"])
            },
            item("Oxford Shirt", "Tops", Some("J.Crew"), Some(59.5), &["work", "blue"]),
            item("Selvedge Jeans", "Bottoms", Some("Levi's"), Some(98.0), &["denim"]),
            ClothingItemCreate {
                subcategory: Some("Sneakers".into()),
                ..item("Canvas Sneakers", "Shoes", Some("Converse"), Some(55.0), &["casual", "white"])
            },
            item("Linen Dress", "Dresses", None, None, &["summer"]),
            item("Leather Belt", "Accessories", Some("Uniqlo"), Some(29.9), &[]),
        ])
    }

    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&self, create: &ClothingItemCreate) -> Result<ClothingItem, IntegrationError> {
        validate_price(create.purchase_price)?;
        let mut state = self.state.lock();
        state.next_id += 1;
        let item = ClothingItem {
            id: ItemId(state.next_id),
            name: create.name.clone(),
            description: create.description.clone(),
            category: create.category.clone(),
            subcategory: create.subcategory.clone(),
            brand: create.brand.clone(),
            purchase_date: create.purchase_date,
            purchase_price: create.purchase_price,
            tags: create.tags.clone(),
            image_urls: create.image_urls.clone(),
            notes: create.notes.clone(),
            created_at: state.stamp(),
            updated_at: None,
            owner: create.owner.clone().unwrap_or_else(|| DEFAULT_OWNER.to_string()),
        };
        state.items.push(item.clone());
        Ok(item)
    }

    fn query(&self, filters: &ItemsFilters) -> Result<Vec<ClothingItem>, IntegrationError> {
        let limit = filters.limit.unwrap_or(DEFAULT_LIMIT);
        if limit == 0 || limit > MAX_LIMIT {
            return Err(IntegrationError::Validation(format!(
                "limit must be between 1 and {}",
                MAX_LIMIT
            )));
        }
        let search = filters.search.as_deref().map(str::to_lowercase);

        let state = self.state.lock();
        let mut matched: Vec<&ClothingItem> = state
            .items
            .iter()
            .filter(|item| matches_exact(&item.category, &filters.category))
            .filter(|item| matches_exact(&item.subcategory, &filters.subcategory))
            .filter(|item| matches_exact(&item.brand, &filters.brand))
            .filter(|item| filters.owner.as_ref().map_or(true, |o| &item.owner == o))
            .filter(|item| search.as_deref().map_or(true, |term| matches_search(item, term)))
            .collect();

        let sort_by = filters.effective_sort_by();
        matched.sort_by(|a, b| {
            let ordering = compare_by(a, b, sort_by);
            match filters.effective_sort_order() {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        Ok(matched
            .into_iter()
            .skip(filters.skip.unwrap_or(0) as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    fn distinct(&self, field: impl Fn(&ClothingItem) -> Option<&String>) -> Vec<String> {
        let state = self.state.lock();
        let mut values: Vec<String> = Vec::new();
        for value in state.items.iter().filter_map(|item| field(item)) {
            if !values.contains(value) {
                values.push(value.clone());
            }
        }
        values
    }
}

fn validate_price(price: Option<f64>) -> Result<(), IntegrationError> {
    match price {
        Some(p) if p < 0.0 || !p.is_finite() => Err(IntegrationError::Validation(
            "purchase_price must be a non-negative number".into(),
        )),
        _ => Ok(()),
    }
}

fn matches_exact(value: &Option<String>, wanted: &Option<String>) -> bool {
    match wanted {
        Some(wanted) => value.as_ref() == Some(wanted),
        None => true,
    }
}

fn matches_search(item: &ClothingItem, term: &str) -> bool {
    let contains = |field: &Option<String>| {
        field.as_deref().map_or(false, |v| v.to_lowercase().contains(term))
    };
    contains(&item.name)
        || contains(&item.description)
        || contains(&item.brand)
        || contains(&item.notes)
        || item.tags.join(",").to_lowercase().contains(term)
}

/// Ascending order with missing values after present ones
fn compare_nullable<T: PartialOrd>(a: Option<&T>, b: Option<&T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_by(a: &ClothingItem, b: &ClothingItem, sort_by: SortBy) -> Ordering {
    match sort_by {
        SortBy::CreatedAt => a.created_at.cmp(&b.created_at),
        SortBy::Name => compare_nullable(a.name.as_ref(), b.name.as_ref()),
        SortBy::Category => compare_nullable(a.category.as_ref(), b.category.as_ref()),
        SortBy::PurchaseDate => compare_nullable(a.purchase_date.as_ref(), b.purchase_date.as_ref()),
    }
}

#[async_trait]
impl CatalogBackend for MemoryCatalog {
    async fn list_items(&self, filters: &ItemsFilters) -> Result<Vec<ClothingItem>, IntegrationError> {
        self.query(filters)
    }

    async fn get_item(&self, id: ItemId) -> Result<ClothingItem, IntegrationError> {
        let state = self.state.lock();
        let index = state.position(id)?;
        Ok(state.items[index].clone())
    }

    async fn create_item(&self, item: &ClothingItemCreate) -> Result<ClothingItem, IntegrationError> {
        let created = self.insert(item)?;
        debug!("Created item {} in memory", created.id);
        Ok(created)
    }

    async fn update_item(
        &self,
        id: ItemId,
        changes: &ClothingItemUpdate,
    ) -> Result<ClothingItem, IntegrationError> {
        if let Some(price) = changes.purchase_price {
            validate_price(price)?;
        }
        let mut state = self.state.lock();
        let index = state.position(id)?;
        let item = &mut state.items[index];
        changes.apply_to(item);
        // Creation stamps can run ahead of the clock
        item.updated_at = Some(Utc::now().max(item.created_at));
        Ok(item.clone())
    }

    async fn delete_item(&self, id: ItemId) -> Result<(), IntegrationError> {
        let mut state = self.state.lock();
        let index = state.position(id)?;
        state.items.remove(index);
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<String>, IntegrationError> {
        Ok(self.distinct(|item| item.category.as_ref()))
    }

    async fn list_brands(&self) -> Result<Vec<String>, IntegrationError> {
        Ok(self.distinct(|item| item.brand.as_ref()))
    }

    async fn upload_images(&self, files: &[UploadFile]) -> Result<Vec<String>, IntegrationError> {
        if files.is_empty() {
            return Err(InputError::NoFiles.into());
        }
        if let Some(file) = files.iter().find(|f| !f.content_type.starts_with("image/")) {
            return Err(IntegrationError::Validation(format!(
                "File {} is not an image",
                file.file_name
            )));
        }
        let mut state = self.state.lock();
        Ok(files
            .iter()
            .map(|file| {
                state.next_upload += 1;
                format!("/uploads/{}-{}", state.next_upload, file.file_name)
            })
            .collect())
    }

    async fn health(&self) -> Result<(), IntegrationError> {
        Ok(())
    }
}
