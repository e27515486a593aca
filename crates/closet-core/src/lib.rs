//! Closet Core - domain types for the clothing tracker
//!
//! This crate has no I/O. It provides:
//! - The item read/write models and their wire formats
//! - The list filter and sort contract
//! - The tag set and the form draft reducer
//! - Input errors caught before a request is sent

pub mod draft;
pub mod error;
pub mod filters;
pub mod item;
pub mod tags;

pub use draft::{DraftAction, DraftField, ItemDraft};
pub use error::InputError;
pub use filters::{FilterChange, ItemsFilters, SortBy, SortOrder};
pub use item::{
    merge_image_urls, ClothingItem, ClothingItemCreate, ClothingItemUpdate, ItemId, CATEGORIES,
    DEFAULT_OWNER,
};
pub use tags::TagSet;
