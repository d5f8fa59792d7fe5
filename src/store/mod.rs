//! # Document Store
//!
//! The product collection the REST layer talks to. Handlers only see the
//! `ProductStore` trait; `InMemoryStore` is the shipped implementation,
//! optionally persisted to a JSON data file.

use std::future::Future;
use std::pin::Pin;

pub mod errors;
pub mod filter;
pub mod memory;
pub mod product;
pub mod seed;

pub use errors::{StoreError, StoreResult};
pub use filter::{CategoryStats, FilterExpr, FilterOperator, FilterSet, SortOrder, TextSearch};
pub use memory::InMemoryStore;
pub use product::{NewProduct, Product, ProductPatch};

/// Boxed future returned by store operations
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = StoreResult<T>> + Send + 'a>>;

/// Operations the catalog needs from its backing collection.
///
/// Lookups by id take the raw identifier from the request path; an id the
/// store cannot cast fails with `StoreError::MalformedId` rather than
/// reporting "no match".
pub trait ProductStore: Send + Sync {
    /// Fetch one page of matching products
    fn find<'a>(
        &'a self,
        filter: &'a FilterSet,
        sort: SortOrder,
        offset: usize,
        limit: usize,
    ) -> StoreFuture<'a, Vec<Product>>;

    /// Count all products matching the filter
    fn count<'a>(&'a self, filter: &'a FilterSet) -> StoreFuture<'a, u64>;

    /// Run a text search over name and description
    fn search<'a>(&'a self, search: &'a TextSearch, limit: usize) -> StoreFuture<'a, Vec<Product>>;

    /// Group the whole collection by category, largest group first
    fn category_stats(&self) -> StoreFuture<'_, Vec<CategoryStats>>;

    /// Fetch a product by id
    fn get<'a>(&'a self, id: &'a str) -> StoreFuture<'a, Option<Product>>;

    /// Insert a new product and return the stored document
    fn insert(&self, new: NewProduct) -> StoreFuture<'_, Product>;

    /// Apply a partial update, returning the document after the update
    fn update<'a>(&'a self, id: &'a str, patch: ProductPatch) -> StoreFuture<'a, Option<Product>>;

    /// Remove a product, returning the removed document
    fn delete<'a>(&'a self, id: &'a str) -> StoreFuture<'a, Option<Product>>;
}
