use super::ProductStore;
use crate::config::database;
use crate::core::product;
use crate::errors::Result;
use crate::models::{Product, ProductDraft};
use async_trait::async_trait;
use sea_orm::DatabaseConnection;

/// [`ProductStore`] backed by the local products table.
pub struct SqliteProductStore {
    db: DatabaseConnection,
}

impl SqliteProductStore {
    /// Wraps an open connection whose table already exists.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Connects to `database_url` and creates the table if needed.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened.
    pub async fn open(database_url: &str) -> Result<Self> {
        Ok(Self::new(database::create_connection(database_url).await?))
    }
}

#[async_trait]
impl ProductStore for SqliteProductStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn list(&self) -> Result<Vec<Product>> {
        let models = product::get_all_active_products(&self.db).await?;
        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn create(&self, draft: &ProductDraft) -> Result<Product> {
        product::create_product(&self.db, draft).await.map(Product::from)
    }

    async fn update(&self, id: i64, draft: &ProductDraft) -> Result<Product> {
        product::update_product(&self.db, id, draft)
            .await
            .map(Product::from)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        product::delete_product(&self.db, id).await.map(|_| ())
    }
}
