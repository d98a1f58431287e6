//! Product entity - Represents one inventory item in the local store.
//!
//! Rows are never physically removed: deleting a product clears its `active`
//! flag, and inactive rows are hidden from every listing.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier assigned on insert
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the product (e.g., "Apple", "Bread")
    pub name: String,
    /// Free-text description
    pub description: String,
    /// Units in stock
    pub quantity: i32,
    /// Unit price
    pub price: f64,
    /// Cleared when the product is deleted
    pub active: bool,
    /// When the product was created
    pub created_at: DateTime,
    /// When the product was last modified
    pub updated_at: DateTime,
}

/// Products have no relations to other tables
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::Product {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            quantity: u32::try_from(model.quantity).unwrap_or_else(|_| {
                tracing::warn!(
                    "Product {} has negative quantity {} in the database; reading it as 0",
                    model.id,
                    model.quantity
                );
                0
            }),
            price: model.price,
            active: model.active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Product;

    fn row(quantity: i32) -> Model {
        let now = chrono::Utc::now().naive_utc();
        Model {
            id: 4,
            name: "Milk".to_string(),
            description: "dairy".to_string(),
            quantity,
            price: 0.95,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_row_converts_to_product() {
        let product = Product::from(row(6));
        assert_eq!(product.id, 4);
        assert_eq!(product.quantity, 6);
        assert!(product.active);
    }

    #[test]
    fn test_negative_quantity_reads_as_zero() {
        crate::test_utils::init_test_tracing();
        assert_eq!(Product::from(row(-3)).quantity, 0);
    }
}
