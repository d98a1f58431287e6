//! The product store contract and its implementations.
//!
//! A store answers each request with exactly one success value or one error.
//! Errors keep the distinction the UI cares about: [`Error::Transport`] when the
//! store could not be reached, and [`Error::Rejected`] / [`Error::InvalidResponse`]
//! when it answered with something other than a success.
//!
//! [`Error::Transport`]: crate::errors::Error::Transport
//! [`Error::Rejected`]: crate::errors::Error::Rejected
//! [`Error::InvalidResponse`]: crate::errors::Error::InvalidResponse

/// REST client for the remote `productos` service
pub mod http;
/// Local `SQLite` store
pub mod sqlite;

use crate::config::{StoreBackend, StoreConfig};
use crate::errors::Result;
use crate::models::{Product, ProductDraft};
use async_trait::async_trait;
use std::sync::Arc;

pub use http::HttpProductStore;
pub use sqlite::SqliteProductStore;

/// Remote source of truth for products.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &'static str;

    /// Fetches the full collection, in the store's order.
    async fn list(&self) -> Result<Vec<Product>>;

    /// Saves a new product and returns it with its assigned id.
    async fn create(&self, draft: &ProductDraft) -> Result<Product>;

    /// Replaces the fields of an existing product.
    async fn update(&self, id: i64, draft: &ProductDraft) -> Result<Product>;

    /// Removes a product.
    async fn delete(&self, id: i64) -> Result<()>;
}

/// Builds the store selected by the configuration.
///
/// # Errors
/// Returns an error if the base URL is invalid or the database cannot be opened.
pub async fn connect(config: &StoreConfig) -> Result<Arc<dyn ProductStore>> {
    let store: Arc<dyn ProductStore> = match config.backend {
        StoreBackend::Http => Arc::new(HttpProductStore::new(
            &config.base_url,
            config.request_timeout(),
        )?),
        StoreBackend::Sqlite => Arc::new(SqliteProductStore::open(&config.database_url).await?),
    };
    tracing::info!("Using {} product store", store.name());
    Ok(store)
}
