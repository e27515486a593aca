//! Closet Integration - catalog API client
//!
//! Provides the items and upload APIs, an in-memory catalog for demo mode,
//! and a query cache behind a frame-pollable client facade.

pub mod backend;
pub mod cache;
pub mod client;
pub mod error;
pub mod http;
pub mod items;
pub mod memory;
pub mod upload;

pub use backend::{CatalogBackend, HttpBackend};
pub use cache::{QueryCache, QueryKey};
pub use client::{CatalogClient, PendingRequest, SaveItem};
pub use error::IntegrationError;
pub use http::{ApiHttp, DEFAULT_BASE_URL};
pub use memory::MemoryCatalog;
pub use upload::{FileSource, SelectedFile, UploadFile};
