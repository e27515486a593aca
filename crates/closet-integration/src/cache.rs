//! Query-result cache keyed by operation name and serialized parameters

use std::collections::HashMap;

use closet_core::{ClothingItem, ItemId, ItemsFilters};
use parking_lot::RwLock;
use tracing::debug;

pub const OP_LIST_ITEMS: &str = "items.list";
pub const OP_GET_ITEM: &str = "items.get";
pub const OP_CATEGORIES: &str = "items.categories";
pub const OP_BRANDS: &str = "items.brands";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    operation: &'static str,
    params: String,
}

impl QueryKey {
    pub fn new(operation: &'static str, params: impl Into<String>) -> Self {
        Self { operation, params: params.into() }
    }

    pub fn list(filters: &ItemsFilters) -> Self {
        Self::new(OP_LIST_ITEMS, filters.cache_key())
    }

    pub fn item(id: ItemId) -> Self {
        Self::new(OP_GET_ITEM, id.to_string())
    }

    pub fn categories() -> Self {
        Self::new(OP_CATEGORIES, "")
    }

    pub fn brands() -> Self {
        Self::new(OP_BRANDS, "")
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }
}

/// A cached read result
#[derive(Debug, Clone)]
pub enum CachedQuery {
    Items(Vec<ClothingItem>),
    Item(ClothingItem),
    Values(Vec<String>),
}

/// Values that can live in the cache
pub trait Cacheable: Clone {
    fn into_cached(self) -> CachedQuery;
    fn from_cached(cached: &CachedQuery) -> Option<Self>;
}

impl Cacheable for Vec<ClothingItem> {
    fn into_cached(self) -> CachedQuery {
        CachedQuery::Items(self)
    }

    fn from_cached(cached: &CachedQuery) -> Option<Self> {
        match cached {
            CachedQuery::Items(items) => Some(items.clone()),
            _ => None,
        }
    }
}

impl Cacheable for ClothingItem {
    fn into_cached(self) -> CachedQuery {
        CachedQuery::Item(self)
    }

    fn from_cached(cached: &CachedQuery) -> Option<Self> {
        match cached {
            CachedQuery::Item(item) => Some(item.clone()),
            _ => None,
        }
    }
}

impl Cacheable for Vec<String> {
    fn into_cached(self) -> CachedQuery {
        CachedQuery::Values(self)
    }

    fn from_cached(cached: &CachedQuery) -> Option<Self> {
        match cached {
            CachedQuery::Values(values) => Some(values.clone()),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<QueryKey, CachedQuery>,
    generation: u64,
}

/// Shared cache. Every invalidation bumps a generation counter; a read
/// that started under an older generation is not stored.
#[derive(Debug, Default)]
pub struct QueryCache {
    inner: RwLock<CacheInner>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current generation, taken before a fetch starts
    pub fn generation(&self) -> u64 {
        self.inner.read().generation
    }

    pub fn get<T: Cacheable>(&self, key: &QueryKey) -> Option<T> {
        self.inner.read().entries.get(key).and_then(T::from_cached)
    }

    /// Store a fetched value unless the cache was invalidated since
    /// `generation`. Returns whether it was stored.
    pub fn put_if_fresh<T: Cacheable>(&self, key: QueryKey, value: T, generation: u64) -> bool {
        let mut inner = self.inner.write();
        if inner.generation != generation {
            debug!("Dropping stale {} result", key.operation);
            return false;
        }
        inner.entries.insert(key, value.into_cached());
        true
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.inner.read().entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn invalidate(&self, key: &QueryKey) {
        let mut inner = self.inner.write();
        inner.generation += 1;
        inner.entries.remove(key);
    }

    /// Drop every entry of one operation, whatever its parameters
    pub fn invalidate_operation(&self, operation: &str) {
        let mut inner = self.inner.write();
        inner.generation += 1;
        inner.entries.retain(|key, _| key.operation != operation);
        debug!("Invalidated {}", operation);
    }

    /// Invalidation after a successful create, update or delete
    pub fn invalidate_after_mutation(&self, id: Option<ItemId>) {
        self.invalidate_operation(OP_LIST_ITEMS);
        self.invalidate_operation(OP_CATEGORIES);
        self.invalidate_operation(OP_BRANDS);
        if let Some(id) = id {
            self.invalidate(&QueryKey::item(id));
        }
    }

    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.generation += 1;
        inner.entries.clear();
    }
}
