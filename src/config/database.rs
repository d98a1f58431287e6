//! Database configuration for the local product store.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`.
//! The products table is generated from the entity definition with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust struct.

use crate::entities::Product;
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Default location of the local database file.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/inventory.sqlite?mode=rwc";

/// Connects to the given database URL and makes sure the products table exists.
///
/// # Errors
/// Returns an error if the connection or the table creation fails.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    tracing::debug!("Connecting to local store at {}", database_url);
    let db = Database::connect(database_url).await?;
    create_tables(&db).await?;
    Ok(db)
}

/// Creates the products table if it is not there yet.
///
/// # Errors
/// Returns an error if the statement fails to execute.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut product_table = schema.create_table_from_entity(Product);
    product_table.if_not_exists();

    db.execute(builder.build(&product_table)).await?;
    Ok(())
}
