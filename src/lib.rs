pub mod config;
pub mod errors;
pub mod logging;
pub mod models;
pub mod services;

pub use config::CatalogConfig;
pub use errors::{CatalogError, Result};
pub use models::{decode_detail, decode_list, GameDetail, GameSummary};
pub use services::{
    ApiClient, CatalogService, DetailPrefetchCache, DetailStatus, PrefetchProgress,
};
