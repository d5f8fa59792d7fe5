//! # Product Handler
//!
//! Orchestrates one catalog request: translate or validate the input, issue
//! the store call, shape the response. Authorization has already happened
//! in the router's gate layer by the time any method here runs.
//!
//! Errors are never caught or downgraded here; they propagate with `?` to
//! the responder in [`super::errors`].

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::store::ProductStore;

use super::errors::{ApiError, ApiResult};
use super::parser::{parse_search, ListQuery, SEARCH_LIMIT};
use super::response::{
    ListResponse, MessageResponse, ProductResponse, SearchResponse, StatsResponse,
};
use super::validator::{validate_create, validate_update};

/// Message returned when an id lookup matches nothing
pub const PRODUCT_NOT_FOUND: &str = "Product not found";

/// Catalog operations over a product store
pub struct ProductHandler<S: ProductStore> {
    store: Arc<S>,
}

impl<S: ProductStore> Clone for ProductHandler<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: ProductStore> ProductHandler<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// List products matching the query, newest first, one page at a time.
    ///
    /// The page fetch and the total count are independent reads and run
    /// concurrently.
    pub async fn list(&self, params: &HashMap<String, String>) -> ApiResult<ListResponse> {
        let query = ListQuery::from_params(params)?;
        tracing::debug!(
            filters = query.filter.filters().len(),
            page = query.page,
            limit = query.limit,
            "Listing products"
        );

        let (items, total) = tokio::join!(
            self.store
                .find(&query.filter, query.sort, query.offset(), query.limit),
            self.store.count(&query.filter),
        );

        Ok(ListResponse::new(items?, query.page, query.limit, total?))
    }

    /// Full-text search over name and description
    pub async fn search(&self, q: Option<&str>) -> ApiResult<SearchResponse> {
        let search = parse_search(q)?;
        let items = self.store.search(&search, SEARCH_LIMIT).await?;
        Ok(SearchResponse::new(items))
    }

    /// Count and average price per category
    pub async fn stats(&self) -> ApiResult<StatsResponse> {
        let stats = self.store.category_stats().await?;
        Ok(StatsResponse::new(stats))
    }

    pub async fn get(&self, id: &str) -> ApiResult<ProductResponse> {
        let product = self.store.get(id).await?.ok_or_else(not_found)?;
        Ok(ProductResponse::new(product))
    }

    pub async fn create(&self, payload: &Value) -> ApiResult<ProductResponse> {
        let new = validate_create(payload)?;
        let product = self.store.insert(new).await?;
        tracing::info!(product_id = %product.id, category = %product.category, "Product created");
        Ok(ProductResponse::new(product))
    }

    pub async fn update(&self, id: &str, payload: &Value) -> ApiResult<ProductResponse> {
        let patch = validate_update(payload)?;
        let product = self.store.update(id, patch).await?.ok_or_else(not_found)?;
        tracing::info!(product_id = %product.id, "Product updated");
        Ok(ProductResponse::new(product))
    }

    pub async fn delete(&self, id: &str) -> ApiResult<MessageResponse> {
        let product = self.store.delete(id).await?.ok_or_else(not_found)?;
        tracing::info!(product_id = %product.id, "Product deleted");
        Ok(MessageResponse::new("Product deleted"))
    }
}

fn not_found() -> ApiError {
    ApiError::not_found(PRODUCT_NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest_api::errors::ErrorKind;
    use crate::store::{
        CategoryStats, FilterSet, InMemoryStore, NewProduct, Product, ProductPatch, SortOrder,
        StoreFuture, TextSearch,
    };
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    fn handler() -> ProductHandler<InMemoryStore> {
        ProductHandler::new(Arc::new(InMemoryStore::new()))
    }

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// Store that counts calls and never holds anything
    #[derive(Default)]
    struct CountingStore {
        calls: AtomicUsize,
    }

    impl CountingStore {
        fn touch<'a, T: Send + 'a>(&'a self, value: T) -> StoreFuture<'a, T> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move { Ok(value) })
        }
    }

    impl ProductStore for CountingStore {
        fn find<'a>(&'a self, _: &'a FilterSet, _: SortOrder, _: usize, _: usize) -> StoreFuture<'a, Vec<Product>> {
            self.touch(Vec::new())
        }
        fn count<'a>(&'a self, _: &'a FilterSet) -> StoreFuture<'a, u64> {
            self.touch(0)
        }
        fn search<'a>(&'a self, _: &'a TextSearch, _: usize) -> StoreFuture<'a, Vec<Product>> {
            self.touch(Vec::new())
        }
        fn category_stats(&self) -> StoreFuture<'_, Vec<CategoryStats>> {
            self.touch(Vec::new())
        }
        fn get<'a>(&'a self, _: &'a str) -> StoreFuture<'a, Option<Product>> {
            self.touch(None)
        }
        fn insert(&self, new: NewProduct) -> StoreFuture<'_, Product> {
            self.touch(Product::create(new, chrono::Utc::now()))
        }
        fn update<'a>(&'a self, _: &'a str, _: ProductPatch) -> StoreFuture<'a, Option<Product>> {
            self.touch(None)
        }
        fn delete<'a>(&'a self, _: &'a str) -> StoreFuture<'a, Option<Product>> {
            self.touch(None)
        }
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let handler = handler();
        let created = handler
            .create(&json!({"name": "Lamp", "price": 19.99, "category": "Home"}))
            .await
            .unwrap();
        assert!(created.success);
        assert_eq!(created.product.category, "home");

        let fetched = handler.get(&created.product.id.to_string()).await.unwrap();
        assert_eq!(fetched.product, created.product);
    }

    #[tokio::test]
    async fn test_list_reports_total_and_page() {
        let handler = handler();
        for i in 0..15 {
            handler
                .create(&json!({"name": format!("Item {}", i), "price": i, "category": "misc"}))
                .await
                .unwrap();
        }

        let page = handler
            .list(&params(&[("page", "2"), ("limit", "10")]))
            .await
            .unwrap();
        assert_eq!(page.total, 15);
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.page, 2);
    }

    #[tokio::test]
    async fn test_validation_failure_never_reaches_store() {
        let store = Arc::new(CountingStore::default());
        let handler = ProductHandler::new(Arc::clone(&store));

        let err = handler
            .create(&json!({"name": "Lamp", "price": -1, "category": "home"}))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::ValidationFailed));

        let err = handler
            .update(&Uuid::new_v4().to_string(), &json!({"colour": "red"}))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::BadRequest));

        let err = handler.search(Some("a")).await.unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::BadRequest));

        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_list_issues_fetch_and_count() {
        let store = Arc::new(CountingStore::default());
        let handler = ProductHandler::new(Arc::clone(&store));

        handler.list(&HashMap::new()).await.unwrap();
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_missing_id_is_not_found() {
        let handler = handler();
        let id = Uuid::new_v4().to_string();

        for err in [
            handler.get(&id).await.unwrap_err(),
            handler.update(&id, &json!({"price": 1})).await.unwrap_err(),
            handler.delete(&id).await.unwrap_err(),
        ] {
            assert_eq!(err.kind(), Some(ErrorKind::NotFound));
            assert_eq!(err.to_string(), PRODUCT_NOT_FOUND);
        }
    }

    #[tokio::test]
    async fn test_malformed_id_is_unclassified() {
        let err = handler().get("not-an-id").await.unwrap_err();
        assert!(matches!(err, ApiError::Store(_)));
        assert_eq!(err.kind(), None);
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let handler = handler();
        let created = handler
            .create(&json!({"name": "Lamp", "price": 1, "category": "home"}))
            .await
            .unwrap();
        let id = created.product.id.to_string();

        let deleted = handler.delete(&id).await.unwrap();
        assert_eq!(deleted.message, "Product deleted");

        let err = handler.delete(&id).await.unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::NotFound));
    }
}
