//! Core business logic - framework-agnostic product operations on the local store.

/// Product CRUD against the `products` table
pub mod product;
