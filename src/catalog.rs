//! Local mirror of the product collection and the filtered view the UI renders.
//!
//! The full list is only ever replaced wholesale by a successful [`refresh`],
//! and the visible list is always recomputed from it and the current query.
//! Mutations go to the store first and then refresh; nothing is spliced into
//! the cache locally. Store calls are made without holding the state lock, so
//! two overlapping refreshes are allowed and the one that completes last wins.
//!
//! [`refresh`]: ProductCatalogView::refresh

use crate::errors::{Error, Result};
use crate::models::{Product, ProductDraft, ProductForm};
use crate::store::ProductStore;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// Why the last refresh failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadError {
    /// The store answered with an error status or an unreadable body
    BadResponse,
    /// The store could not be reached
    ConnectionFailure,
}

impl LoadError {
    /// Banner text for this failure.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::BadResponse => "Error en la respuesta del servidor.",
            Self::ConnectionFailure => "Error al conectar con la API. Verifique su conexión.",
        }
    }
}

impl From<&Error> for LoadError {
    fn from(value: &Error) -> Self {
        if value.is_bad_response() {
            Self::BadResponse
        } else {
            Self::ConnectionFailure
        }
    }
}

#[derive(Debug, Default)]
struct CatalogState {
    all: Vec<Product>,
    visible: Vec<Product>,
    query: String,
    error: Option<LoadError>,
    selected: Option<i64>,
    form: ProductForm,
}

impl CatalogState {
    fn recompute_visible(&mut self) {
        let needle = self.query.to_lowercase();
        self.visible = self
            .all
            .iter()
            .filter(|p| p.matches(&needle))
            .cloned()
            .collect();
    }

    fn clear_inputs(&mut self) {
        self.form = ProductForm::default();
        self.selected = None;
    }
}

/// The catalog the UI reads from and sends product operations to.
pub struct ProductCatalogView {
    store: Arc<dyn ProductStore>,
    state: RwLock<CatalogState>,
}

impl ProductCatalogView {
    /// Creates an empty catalog. Call [`refresh`](Self::refresh) to load it.
    #[must_use]
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self {
            store,
            state: RwLock::new(CatalogState::default()),
        }
    }

    /// Replaces the cached collection with the store's current one.
    ///
    /// On failure the cached and visible lists are left untouched and the
    /// error indicator is set.
    ///
    /// # Errors
    /// Returns the store error.
    pub async fn refresh(&self) -> Result<()> {
        debug!("Refreshing product catalog from {} store...", self.store.name());
        match self.store.list().await {
            Ok(products) => {
                let mut state = self.state.write().await;
                state.all = products;
                state.recompute_visible();
                state.error = None;
                let stale = state
                    .selected
                    .filter(|id| !state.all.iter().any(|p| p.id == *id));
                if let Some(id) = stale {
                    warn!("Selected product {} is gone from the store; clearing selection", id);
                    state.clear_inputs();
                }
                info!(
                    "Product catalog refreshed with {} items ({} visible).",
                    state.all.len(),
                    state.visible.len()
                );
                Ok(())
            }
            Err(e) => {
                error!("Failed to refresh product catalog: {}", e);
                self.state.write().await.error = Some(LoadError::from(&e));
                Err(e)
            }
        }
    }

    /// Filters the visible list by a case-insensitive substring of name or description.
    ///
    /// An empty query shows everything. No store call is made.
    pub async fn set_query(&self, text: &str) {
        let mut state = self.state.write().await;
        text.clone_into(&mut state.query);
        state.recompute_visible();
        debug!(query = text, visible = state.visible.len(), "catalog filtered");
    }

    /// Refreshes after a successful mutation. A failed refresh is already
    /// reported through the error indicator, so it does not fail the mutation.
    async fn resync(&self) {
        if let Err(e) = self.refresh().await {
            warn!("Mutation succeeded but refresh failed: {}", e);
        }
    }

    /// Saves a new product, then refreshes.
    ///
    /// # Errors
    /// Returns the store error; the cache is left unchanged.
    pub async fn create(&self, draft: &ProductDraft) -> Result<Product> {
        let created = self.store.create(draft).await.inspect_err(|e| {
            error!("Failed to create product '{}': {}", draft.name, e);
        })?;
        info!("Created product {} ('{}')", created.id, created.name);
        self.resync().await;
        Ok(created)
    }

    /// Creates a product from the manual form and clears the form on success.
    ///
    /// # Errors
    /// Returns a validation error for an incomplete form, or the store error.
    pub async fn submit_form(&self) -> Result<Product> {
        let draft = self.state.read().await.form.to_draft()?;
        let created = self.create(&draft).await?;
        self.state.write().await.clear_inputs();
        Ok(created)
    }

    /// Saves the form over the selected product.
    ///
    /// # Errors
    /// Returns [`Error::NoSelection`] without calling the store when nothing is
    /// selected, a validation error for a bad form, or the store error.
    pub async fn update_selected(&self) -> Result<Product> {
        let (id, draft) = {
            let state = self.state.read().await;
            let id = state.selected.ok_or(Error::NoSelection {
                action: "modificar",
            })?;
            (id, state.form.to_draft()?)
        };

        let updated = self.store.update(id, &draft).await.inspect_err(|e| {
            error!("Failed to update product {}: {}", id, e);
        })?;
        info!("Updated product {}", id);
        self.state.write().await.clear_inputs();
        self.resync().await;
        Ok(updated)
    }

    /// Deletes the selected product.
    ///
    /// # Errors
    /// Returns [`Error::NoSelection`] without calling the store when nothing is
    /// selected, or the store error.
    pub async fn delete_selected(&self) -> Result<i64> {
        let id = self.state.read().await.selected.ok_or(Error::NoSelection {
            action: "eliminar",
        })?;

        self.store.delete(id).await.inspect_err(|e| {
            error!("Failed to delete product {}: {}", id, e);
        })?;
        info!("Deleted product {}", id);
        self.state.write().await.clear_inputs();
        self.resync().await;
        Ok(id)
    }

    /// Selects a cached product and copies its fields into the form.
    ///
    /// Returns the selected product, or `None` if the id is not in the cache
    /// (the current selection is kept in that case).
    pub async fn select(&self, id: i64) -> Option<Product> {
        let mut state = self.state.write().await;
        let product = state.all.iter().find(|p| p.id == id).cloned()?;
        state.form = ProductForm::from_product(&product);
        state.selected = Some(id);
        debug!("Selected product {}", id);
        Some(product)
    }

    /// Empties the form and drops the selection.
    pub async fn clear_selection(&self) {
        self.state.write().await.clear_inputs();
    }

    /// Sets one form field by name. Returns `false` for an unknown field.
    pub async fn set_form_field(&self, field: &str, value: &str) -> bool {
        self.state.write().await.form.set_field(field, value)
    }

    /// Current contents of the manual form.
    pub async fn form(&self) -> ProductForm {
        self.state.read().await.form.clone()
    }

    /// Id of the selected product, if any.
    pub async fn selected(&self) -> Option<i64> {
        self.state.read().await.selected
    }

    /// The whole cached collection in store order.
    pub async fn all_products(&self) -> Vec<Product> {
        self.state.read().await.all.clone()
    }

    /// The cached products matching the current query.
    pub async fn visible_products(&self) -> Vec<Product> {
        self.state.read().await.visible.clone()
    }

    /// The current search text.
    pub async fn query(&self) -> String {
        self.state.read().await.query.clone()
    }

    /// The error indicator from the last refresh, cleared by the next success.
    pub async fn load_error(&self) -> Option<LoadError> {
        self.state.read().await.error
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{FailMode, FlakyStore, init_test_tracing, setup_test_store};

    async fn seeded_catalog() -> Result<(Arc<FlakyStore>, ProductCatalogView)> {
        init_test_tracing();
        let store = Arc::new(FlakyStore::new(setup_test_store().await?));
        store
            .create(&ProductDraft::new("Apple", "fruit", 3, 2.0))
            .await?;
        store
            .create(&ProductDraft::new("Bread", "bakery", 1, 1.5))
            .await?;
        let catalog = ProductCatalogView::new(Arc::clone(&store) as Arc<dyn ProductStore>);
        catalog.refresh().await?;
        Ok((store, catalog))
    }

    fn names(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_refresh_mirrors_store_order() -> Result<()> {
        let (store, catalog) = seeded_catalog().await?;
        assert_eq!(catalog.all_products().await, store.list().await?);
        assert_eq!(catalog.visible_products().await, catalog.all_products().await);
        assert_eq!(catalog.load_error().await, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_query_matches_name() -> Result<()> {
        let (_store, catalog) = seeded_catalog().await?;
        catalog.set_query("ap").await;
        let visible = catalog.visible_products().await;
        assert_eq!(names(&visible), vec!["Apple"]);
        assert_eq!(visible[0].description, "fruit");
        Ok(())
    }

    #[tokio::test]
    async fn test_query_matches_description() -> Result<()> {
        let (_store, catalog) = seeded_catalog().await?;
        catalog.set_query("BAK").await;
        assert_eq!(names(&catalog.visible_products().await), vec!["Bread"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_query_is_idempotent_and_empty_query_shows_all() -> Result<()> {
        let (_store, catalog) = seeded_catalog().await?;
        catalog.set_query("a").await;
        let first = catalog.visible_products().await;
        catalog.set_query("a").await;
        assert_eq!(catalog.visible_products().await, first);

        catalog.set_query("zzz").await;
        assert!(catalog.visible_products().await.is_empty());

        catalog.set_query("").await;
        assert_eq!(catalog.visible_products().await, catalog.all_products().await);
        Ok(())
    }

    #[tokio::test]
    async fn test_refresh_reapplies_query() -> Result<()> {
        let (store, catalog) = seeded_catalog().await?;
        catalog.set_query("fruit").await;
        store
            .create(&ProductDraft::new("Pear", "green fruit", 2, 1.0))
            .await?;
        catalog.refresh().await?;
        assert_eq!(
            names(&catalog.visible_products().await),
            vec!["Apple", "Pear"]
        );
        assert_eq!(catalog.query().await, "fruit");
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_cache_and_sets_indicator() -> Result<()> {
        let (store, catalog) = seeded_catalog().await?;
        catalog.set_query("ap").await;
        let all_before = catalog.all_products().await;
        let visible_before = catalog.visible_products().await;

        // A product added behind our back must not leak in through a failed refresh
        store
            .create(&ProductDraft::new("Apricot", "fruit", 1, 3.0))
            .await?;

        store.fail_next(FailMode::Transport);
        assert!(catalog.refresh().await.is_err());
        assert_eq!(catalog.all_products().await, all_before);
        assert_eq!(catalog.visible_products().await, visible_before);
        assert_eq!(
            catalog.load_error().await,
            Some(LoadError::ConnectionFailure)
        );

        store.fail_next(FailMode::Rejected(500));
        assert!(catalog.refresh().await.is_err());
        assert_eq!(catalog.load_error().await, Some(LoadError::BadResponse));
        assert_ne!(
            LoadError::BadResponse.message(),
            LoadError::ConnectionFailure.message()
        );

        catalog.refresh().await?;
        assert_eq!(catalog.load_error().await, None);
        assert_eq!(
            names(&catalog.visible_products().await),
            vec!["Apple", "Apricot"]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_create_resyncs_with_store() -> Result<()> {
        let (store, catalog) = seeded_catalog().await?;
        let created = catalog
            .create(&ProductDraft::new("Milk", "dairy", 6, 0.9))
            .await?;
        assert!(created.id > 0);
        assert_eq!(catalog.all_products().await, store.list().await?);
        assert_eq!(catalog.all_products().await.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_create_leaves_cache_unchanged() -> Result<()> {
        let (store, catalog) = seeded_catalog().await?;
        let before = catalog.all_products().await;
        store.fail_next(FailMode::Rejected(400));

        let err = catalog
            .create(&ProductDraft::new("Milk", "dairy", 6, 0.9))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Rejected { status: 400 }));
        assert_eq!(catalog.all_products().await, before);
        assert_eq!(store.list().await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_select_copies_into_form() -> Result<()> {
        let (_store, catalog) = seeded_catalog().await?;
        let bread_id = catalog.all_products().await[1].id;

        let selected = catalog.select(bread_id).await.unwrap();
        assert_eq!(selected.name, "Bread");
        assert_eq!(catalog.selected().await, Some(bread_id));
        let form = catalog.form().await;
        assert_eq!(form.name, "Bread");
        assert_eq!(form.description, "bakery");
        assert_eq!(form.price, "1.5");
        assert_eq!(form.quantity, "1");

        assert!(catalog.select(9999).await.is_none());
        assert_eq!(catalog.selected().await, Some(bread_id));

        catalog.clear_selection().await;
        assert_eq!(catalog.selected().await, None);
        assert!(catalog.form().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_refresh_drops_selection_deleted_elsewhere() -> Result<()> {
        let (store, catalog) = seeded_catalog().await?;
        let apple_id = catalog.all_products().await[0].id;
        let bread_id = catalog.all_products().await[1].id;
        catalog.select(apple_id).await.unwrap();

        // Another client removes the selected product
        store.delete(apple_id).await?;
        catalog.refresh().await?;
        assert_eq!(catalog.selected().await, None);
        assert!(catalog.form().await.is_empty());

        let calls_before = store.calls();
        let err = catalog.delete_selected().await.unwrap_err();
        assert!(matches!(err, Error::NoSelection { .. }));
        assert_eq!(store.calls(), calls_before);

        // A selection that still exists survives the refresh
        catalog.select(bread_id).await.unwrap();
        catalog.refresh().await?;
        assert_eq!(catalog.selected().await, Some(bread_id));
        assert_eq!(catalog.form().await.name, "Bread");
        Ok(())
    }

    #[tokio::test]
    async fn test_update_and_delete_require_selection() -> Result<()> {
        let (store, catalog) = seeded_catalog().await?;
        catalog.set_form_field("name", "Ghost").await;

        let calls_before = store.calls();
        let err = catalog.update_selected().await.unwrap_err();
        assert!(matches!(err, Error::NoSelection { action: "modificar" }));
        let err = catalog.delete_selected().await.unwrap_err();
        assert!(matches!(err, Error::NoSelection { action: "eliminar" }));

        assert_eq!(store.calls(), calls_before);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_selected_product() -> Result<()> {
        let (store, catalog) = seeded_catalog().await?;
        let apple_id = catalog.all_products().await[0].id;
        catalog.select(apple_id).await.unwrap();
        assert!(catalog.set_form_field("quantity", "12").await);

        let updated = catalog.update_selected().await?;
        assert_eq!(updated.quantity, 12);
        assert_eq!(catalog.all_products().await, store.list().await?);
        assert_eq!(catalog.all_products().await[0].quantity, 12);
        assert_eq!(catalog.selected().await, None);
        assert!(catalog.form().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_update_keeps_selection() -> Result<()> {
        let (store, catalog) = seeded_catalog().await?;
        let apple_id = catalog.all_products().await[0].id;
        catalog.select(apple_id).await.unwrap();
        catalog.set_form_field("quantity", "12").await;
        let before = catalog.all_products().await;

        store.fail_next(FailMode::Transport);
        let err = catalog.update_selected().await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(catalog.all_products().await, before);
        assert_eq!(catalog.selected().await, Some(apple_id));
        assert_eq!(catalog.form().await.quantity, "12");
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_selected_product() -> Result<()> {
        let (store, catalog) = seeded_catalog().await?;
        let apple_id = catalog.all_products().await[0].id;
        catalog.select(apple_id).await.unwrap();

        assert_eq!(catalog.delete_selected().await?, apple_id);
        assert_eq!(names(&catalog.all_products().await), vec!["Bread"]);
        assert_eq!(catalog.all_products().await, store.list().await?);
        assert_eq!(catalog.selected().await, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_submit_form() -> Result<()> {
        let (_store, catalog) = seeded_catalog().await?;

        let err = catalog.submit_form().await.unwrap_err();
        assert!(matches!(err, Error::Validation { field: "form", .. }));

        for (field, value) in [
            ("name", "Milk"),
            ("description", "dairy"),
            ("price", "0.95"),
            ("quantity", "6"),
        ] {
            assert!(catalog.set_form_field(field, value).await);
        }
        let created = catalog.submit_form().await?;
        assert_eq!(created.name, "Milk");
        assert!(created.active);
        assert!(catalog.form().await.is_empty());
        assert_eq!(catalog.all_products().await.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_mutation_success_with_failed_resync() -> Result<()> {
        let (store, catalog) = seeded_catalog().await?;
        store.fail_on_call(2, FailMode::Transport);

        // The create itself goes through; the follow-up refresh fails
        let created = catalog
            .create(&ProductDraft::new("Milk", "dairy", 6, 0.9))
            .await?;
        assert_eq!(created.name, "Milk");
        assert_eq!(catalog.all_products().await.len(), 2);
        assert_eq!(
            catalog.load_error().await,
            Some(LoadError::ConnectionFailure)
        );
        Ok(())
    }
}
