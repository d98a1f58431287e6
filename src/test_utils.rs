//! Shared test utilities.
//!
//! This module provides helpers for setting up an in-memory store, a store
//! wrapper that fails on demand, and tracing output for tests.

#![allow(clippy::unwrap_used)]

use crate::{
    config::database,
    entities,
    errors::{Error, Result},
    models::{Product, ProductDraft},
    store::{ProductStore, SqliteProductStore},
};
use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Installs a test-writer subscriber once; later calls are no-ops.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with the products table.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    database::create_connection("sqlite::memory:").await
}

/// An empty store over an in-memory database.
pub async fn setup_test_store() -> Result<SqliteProductStore> {
    Ok(SqliteProductStore::new(setup_test_db().await?))
}

/// Creates a test product with sensible defaults.
///
/// # Defaults
/// * description: "test product"
/// * quantity: 1
/// * price: 10.0
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::product::Model> {
    crate::core::product::create_product(db, &ProductDraft::new(name, "test product", 1, 10.0))
        .await
}

/// The kind of failure [`FlakyStore`] injects.
#[derive(Debug, Clone, Copy)]
pub enum FailMode {
    /// The store is unreachable
    Transport,
    /// The store answers with this HTTP status
    Rejected(u16),
}

impl FailMode {
    fn into_error(self) -> Error {
        match self {
            Self::Transport => Error::Transport("connection refused (injected)".to_string()),
            Self::Rejected(status) => Error::Rejected { status },
        }
    }
}

/// Wraps a real store and fails one chosen call.
pub struct FlakyStore {
    inner: SqliteProductStore,
    armed: Mutex<Option<(usize, FailMode)>>,
    calls: Mutex<usize>,
}

impl FlakyStore {
    pub fn new(inner: SqliteProductStore) -> Self {
        Self {
            inner,
            armed: Mutex::new(None),
            calls: Mutex::new(0),
        }
    }

    /// Makes the next store call fail.
    pub fn fail_next(&self, mode: FailMode) {
        self.fail_on_call(1, mode);
    }

    /// Makes the `n`th store call from now fail (1 is the next call).
    pub fn fail_on_call(&self, n: usize, mode: FailMode) {
        *self.armed.lock().unwrap() = Some((n.max(1), mode));
    }

    /// How many calls reached this store, failed ones included.
    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    fn check(&self) -> Result<()> {
        *self.calls.lock().unwrap() += 1;
        let mut armed = self.armed.lock().unwrap();
        match *armed {
            Some((1, mode)) => {
                *armed = None;
                Err(mode.into_error())
            }
            Some((n, mode)) => {
                *armed = Some((n - 1, mode));
                Ok(())
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ProductStore for FlakyStore {
    fn name(&self) -> &'static str {
        "flaky"
    }

    async fn list(&self) -> Result<Vec<Product>> {
        self.check()?;
        self.inner.list().await
    }

    async fn create(&self, draft: &ProductDraft) -> Result<Product> {
        self.check()?;
        self.inner.create(draft).await
    }

    async fn update(&self, id: i64, draft: &ProductDraft) -> Result<Product> {
        self.check()?;
        self.inner.update(id, draft).await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.check()?;
        self.inner.delete(id).await
    }
}
