pub mod api_client;
pub mod catalog_service;
pub mod prefetch_cache;

pub use api_client::ApiClient;
pub use catalog_service::CatalogService;
pub use prefetch_cache::{DetailPrefetchCache, DetailStatus, PrefetchProgress};
