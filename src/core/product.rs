//! Product business logic for the local store.
//!
//! This module provides functions for creating, listing, updating, and deleting
//! products in the SQLite table. All functions validate their input before
//! touching the database and return Result types so callers can tell a bad
//! draft apart from a missing product or a database failure.

use crate::{
    entities::{Product, product},
    errors::{Error, Result},
    models::ProductDraft,
};
use sea_orm::{QueryOrder, Set, prelude::*};

fn quantity_column(draft: &ProductDraft) -> Result<i32> {
    i32::try_from(draft.quantity).map_err(|_| Error::Validation {
        field: "quantity",
        message: format!("Cantidad demasiado grande: {}", draft.quantity),
    })
}

/// Retrieves all active products in insertion order.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_all_active_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .filter(product::Column::Active.eq(true))
        .order_by_asc(product::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific product by its unique ID, active or not.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_product_by_id(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Option<product::Model>> {
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Loads a product as an `ActiveModel`, treating inactive rows as missing.
async fn find_active(db: &DatabaseConnection, product_id: i64) -> Result<product::ActiveModel> {
    let model = get_product_by_id(db, product_id)
        .await?
        .filter(|p| p.active)
        .ok_or(Error::ProductNotFound { id: product_id })?;
    Ok(model.into())
}

/// Creates a new product from a validated draft.
///
/// Name and description are trimmed before storing. The product is always
/// stored as active, whatever the draft says.
///
/// # Errors
/// Returns an error if:
/// - The name or description is empty or whitespace-only
/// - The price is negative or not finite (NaN, infinity)
/// - The database insert operation fails
pub async fn create_product(db: &DatabaseConnection, draft: &ProductDraft) -> Result<product::Model> {
    draft.validate()?;
    let quantity = quantity_column(draft)?;
    let now = chrono::Utc::now().naive_utc();

    let product = product::ActiveModel {
        name: Set(draft.name.trim().to_string()),
        description: Set(draft.description.trim().to_string()),
        quantity: Set(quantity),
        price: Set(draft.price),
        active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    product.insert(db).await.map_err(Into::into)
}

/// Replaces every editable field of an existing product.
///
/// # Errors
/// Returns an error if:
/// - The draft fails validation
/// - The product does not exist or has been deleted
/// - The database update operation fails
pub async fn update_product(
    db: &DatabaseConnection,
    product_id: i64,
    draft: &ProductDraft,
) -> Result<product::Model> {
    draft.validate()?;
    let quantity = quantity_column(draft)?;

    let mut product = find_active(db, product_id).await?;
    product.name = Set(draft.name.trim().to_string());
    product.description = Set(draft.description.trim().to_string());
    product.quantity = Set(quantity);
    product.price = Set(draft.price);
    product.updated_at = Set(chrono::Utc::now().naive_utc());

    product.update(db).await.map_err(Into::into)
}

/// Soft deletes a product by clearing its `active` flag.
///
/// # Errors
/// Returns an error if:
/// - The product does not exist or is already deleted
/// - The database update operation fails
pub async fn delete_product(db: &DatabaseConnection, product_id: i64) -> Result<product::Model> {
    let mut product = find_active(db, product_id).await?;
    product.active = Set(false);
    product.updated_at = Set(chrono::Utc::now().naive_utc());

    product.update(db).await.map_err(Into::into)
}
