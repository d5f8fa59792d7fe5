//! # In-Memory Product Store
//!
//! A single product collection held in a `RwLock`ed map. When opened with a
//! data file, every mutation is written through to disk (temp file, then
//! rename) before it is acknowledged; a failed write rolls the change back.
//!
//! Mutations run on the blocking pool since they may touch the data file
//! while holding the write lock. Reads stay on the calling task.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use uuid::Uuid;

use super::errors::{StoreError, StoreResult};
use super::filter::{CategoryStats, FilterSet, SortOrder, TextSearch};
use super::product::{NewProduct, Product, ProductPatch};
use super::{ProductStore, StoreFuture};

/// Product collection backed by memory and an optional JSON data file
pub struct InMemoryStore {
    collection: Arc<Collection>,
}

struct Collection {
    documents: RwLock<HashMap<Uuid, Product>>,
    data_file: Option<PathBuf>,
}

impl InMemoryStore {
    /// Create an empty, memory-only store
    pub fn new() -> Self {
        Self::from_parts(HashMap::new(), None)
    }

    /// Open a store persisted at `path`, loading existing documents if the
    /// file exists
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let documents: HashMap<Uuid, Product> = if path.exists() {
            let raw = fs::read(&path)?;
            let products: Vec<Product> = serde_json::from_slice(&raw)?;
            products.into_iter().map(|p| (p.id, p)).collect()
        } else {
            HashMap::new()
        };

        tracing::debug!(path = %path.display(), documents = documents.len(), "Opened product store");

        Ok(Self::from_parts(documents, Some(path)))
    }

    fn from_parts(documents: HashMap<Uuid, Product>, data_file: Option<PathBuf>) -> Self {
        Self {
            collection: Arc::new(Collection {
                documents: RwLock::new(documents),
                data_file,
            }),
        }
    }

    /// Location of the backing data file, if any
    pub fn data_file(&self) -> Option<&Path> {
        self.collection.data_file.as_deref()
    }

    /// Number of stored products
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.collection.read()?.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.collection.read()?.is_empty())
    }

    /// Drop every document and insert `products` in order
    pub fn replace_all(&self, products: Vec<NewProduct>) -> StoreResult<Vec<Product>> {
        self.collection.replace_all(products)
    }

    /// Run a mutation on the blocking pool
    fn write_task<T, F>(&self, op: F) -> StoreFuture<'_, T>
    where
        T: Send + 'static,
        F: FnOnce(&Collection) -> StoreResult<T> + Send + 'static,
    {
        let collection = Arc::clone(&self.collection);
        Box::pin(async move {
            tokio::task::spawn_blocking(move || op(collection.as_ref())).await?
        })
    }
}

impl Collection {
    fn read(&self) -> StoreResult<RwLockReadGuard<'_, HashMap<Uuid, Product>>> {
        self.documents.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, HashMap<Uuid, Product>>> {
        self.documents.write().map_err(|_| StoreError::LockPoisoned)
    }

    /// Write the collection to the data file, oldest document first
    fn persist(&self, documents: &HashMap<Uuid, Product>) -> StoreResult<()> {
        let Some(path) = &self.data_file else {
            return Ok(());
        };

        let mut products: Vec<&Product> = documents.values().collect();
        products.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        let tmp = path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&products)?)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    fn replace_all(&self, products: Vec<NewProduct>) -> StoreResult<Vec<Product>> {
        let mut documents = self.write()?;
        let now = Utc::now();
        let inserted: Vec<Product> = products
            .into_iter()
            .map(|new| Product::create(new, now))
            .collect();

        let previous = std::mem::replace(
            &mut *documents,
            inserted.iter().map(|p| (p.id, p.clone())).collect(),
        );
        if let Err(e) = self.persist(&documents) {
            *documents = previous;
            return Err(e);
        }
        Ok(inserted)
    }

    fn find(
        &self,
        filter: &FilterSet,
        sort: SortOrder,
        offset: usize,
        limit: usize,
    ) -> StoreResult<Vec<Product>> {
        let documents = self.read()?;
        let mut matched: Vec<&Product> = documents.values().filter(|p| filter.matches(p)).collect();
        matched.sort_by(|a, b| sort.compare(a, b).then(a.id.cmp(&b.id)));

        Ok(matched
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    fn count(&self, filter: &FilterSet) -> StoreResult<u64> {
        let documents = self.read()?;
        Ok(documents.values().filter(|p| filter.matches(p)).count() as u64)
    }

    fn search(&self, search: &TextSearch, limit: usize) -> StoreResult<Vec<Product>> {
        let documents = self.read()?;
        let mut scored: Vec<(usize, &Product)> = documents
            .values()
            .map(|p| (search.score(p), p))
            .filter(|(score, _)| *score > 0)
            .collect();
        scored.sort_by(|(sa, a), (sb, b)| {
            sb.cmp(sa)
                .then(SortOrder::CreatedAtDesc.compare(a, b))
                .then(a.id.cmp(&b.id))
        });

        Ok(scored
            .into_iter()
            .take(limit)
            .map(|(_, p)| p.clone())
            .collect())
    }

    fn category_stats(&self) -> StoreResult<Vec<CategoryStats>> {
        let documents = self.read()?;
        let mut groups: BTreeMap<&str, (u64, f64)> = BTreeMap::new();
        for product in documents.values() {
            let entry = groups.entry(product.category.as_str()).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += product.price;
        }

        let mut stats: Vec<CategoryStats> = groups
            .into_iter()
            .map(|(category, (count, total))| CategoryStats {
                category: category.to_string(),
                count,
                avg_price: total / count as f64,
            })
            .collect();
        // Stable sort keeps ties in category order
        stats.sort_by(|a, b| b.count.cmp(&a.count));
        Ok(stats)
    }

    fn get(&self, id: &str) -> StoreResult<Option<Product>> {
        let id = parse_id(id)?;
        Ok(self.read()?.get(&id).cloned())
    }

    fn insert(&self, new: NewProduct) -> StoreResult<Product> {
        let product = Product::create(new, Utc::now());
        let mut documents = self.write()?;
        documents.insert(product.id, product.clone());
        if let Err(e) = self.persist(&documents) {
            documents.remove(&product.id);
            return Err(e);
        }
        Ok(product)
    }

    fn update(&self, id: &str, patch: ProductPatch) -> StoreResult<Option<Product>> {
        let id = parse_id(id)?;
        let mut documents = self.write()?;
        let Some(existing) = documents.get_mut(&id) else {
            return Ok(None);
        };

        let previous = existing.clone();
        existing.apply(patch, Utc::now());
        let updated = existing.clone();

        if let Err(e) = self.persist(&documents) {
            documents.insert(id, previous);
            return Err(e);
        }
        Ok(Some(updated))
    }

    fn delete(&self, id: &str) -> StoreResult<Option<Product>> {
        let id = parse_id(id)?;
        let mut documents = self.write()?;
        let Some(removed) = documents.remove(&id) else {
            return Ok(None);
        };

        if let Err(e) = self.persist(&documents) {
            documents.insert(id, removed);
            return Err(e);
        }
        Ok(Some(removed))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_id(id: &str) -> StoreResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| StoreError::MalformedId(id.to_string()))
}

impl ProductStore for InMemoryStore {
    fn find<'a>(
        &'a self,
        filter: &'a FilterSet,
        sort: SortOrder,
        offset: usize,
        limit: usize,
    ) -> StoreFuture<'a, Vec<Product>> {
        Box::pin(async move { self.collection.find(filter, sort, offset, limit) })
    }

    fn count<'a>(&'a self, filter: &'a FilterSet) -> StoreFuture<'a, u64> {
        Box::pin(async move { self.collection.count(filter) })
    }

    fn search<'a>(&'a self, search: &'a TextSearch, limit: usize) -> StoreFuture<'a, Vec<Product>> {
        Box::pin(async move { self.collection.search(search, limit) })
    }

    fn category_stats(&self) -> StoreFuture<'_, Vec<CategoryStats>> {
        Box::pin(async move { self.collection.category_stats() })
    }

    fn get<'a>(&'a self, id: &'a str) -> StoreFuture<'a, Option<Product>> {
        Box::pin(async move { self.collection.get(id) })
    }

    fn insert(&self, new: NewProduct) -> StoreFuture<'_, Product> {
        self.write_task(move |collection| collection.insert(new))
    }

    fn update<'a>(&'a self, id: &'a str, patch: ProductPatch) -> StoreFuture<'a, Option<Product>> {
        let id = id.to_string();
        self.write_task(move |collection| collection.update(&id, patch))
    }

    fn delete<'a>(&'a self, id: &'a str) -> StoreFuture<'a, Option<Product>> {
        let id = id.to_string();
        self.write_task(move |collection| collection.delete(&id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::filter::FilterExpr;
    use serde_json::json;
    use tempfile::TempDir;

    fn new_product(name: &str, price: f64, category: &str) -> NewProduct {
        NewProduct::new(name, None, price, category, None)
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = InMemoryStore::new();
        let inserted = store.insert(new_product("Lamp", 19.99, "Home")).await.unwrap();

        let fetched = store.get(&inserted.id.to_string()).await.unwrap();
        assert_eq!(fetched, Some(inserted));
    }

    #[tokio::test]
    async fn test_get_malformed_id_is_store_error() {
        let store = InMemoryStore::new();
        let result = store.get("not-a-uuid").await;
        assert!(matches!(result, Err(StoreError::MalformedId(_))));
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_none() {
        let store = InMemoryStore::new();
        let result = store.get(&Uuid::new_v4().to_string()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_find_filters_and_paginates() {
        let store = InMemoryStore::new();
        for i in 0..10 {
            store
                .insert(new_product(&format!("Item {}", i), i as f64, "misc"))
                .await
                .unwrap();
        }

        let filter = FilterSet::new().and(FilterExpr::gte("price", json!(4)));
        let page = store
            .find(&filter, SortOrder::CreatedAtDesc, 2, 3)
            .await
            .unwrap();
        assert_eq!(page.len(), 3);
        assert!(page.iter().all(|p| p.price >= 4.0));

        assert_eq!(store.count(&filter).await.unwrap(), 6);
    }

    #[tokio::test]
    async fn test_search_ranks_and_limits() {
        let store = InMemoryStore::new();
        store
            .insert(NewProduct::new("Gaming Mouse", Some("wireless mouse"), 79.99, "electronics", None))
            .await
            .unwrap();
        store
            .insert(NewProduct::new("Mouse Pad", None, 9.99, "electronics", None))
            .await
            .unwrap();
        store.insert(new_product("Blender", 89.99, "kitchen")).await.unwrap();

        let search = TextSearch::new("wireless mouse");
        let hits = store.search(&search, 50).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].name, "Gaming Mouse");

        let capped = store.search(&search, 1).await.unwrap();
        assert_eq!(capped.len(), 1);
    }

    #[tokio::test]
    async fn test_category_stats() {
        let store = InMemoryStore::new();
        store.insert(new_product("Laptop", 2000.0, "electronics")).await.unwrap();
        store.insert(new_product("Mouse", 80.0, "Electronics")).await.unwrap();
        store.insert(new_product("Blender", 90.0, "kitchen")).await.unwrap();

        let stats = store.category_stats().await.unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].category, "electronics");
        assert_eq!(stats[0].count, 2);
        assert_eq!(stats[0].avg_price, 1040.0);
        assert_eq!(stats[1].category, "kitchen");
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = InMemoryStore::new();
        let product = store.insert(new_product("Lamp", 19.99, "home")).await.unwrap();
        let id = product.id.to_string();

        let patch = ProductPatch {
            in_stock: Some(false),
            ..Default::default()
        };
        let updated = store.update(&id, patch).await.unwrap().unwrap();
        assert!(!updated.in_stock);
        assert_eq!(updated.created_at, product.created_at);
        assert!(updated.updated_at >= product.updated_at);

        assert!(store.delete(&id).await.unwrap().is_some());
        assert!(store.delete(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_data_file_survives_reopen() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("products.json");

        let id = {
            let store = InMemoryStore::open(&path).unwrap();
            store.insert(new_product("Lamp", 19.99, "home")).await.unwrap().id
        };

        let reopened = InMemoryStore::open(&path).unwrap();
        let fetched = reopened.get(&id.to_string()).await.unwrap();
        assert_eq!(fetched.map(|p| p.name), Some("Lamp".to_string()));
    }

    #[test]
    fn test_corrupt_data_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("products.json");
        fs::write(&path, b"{not json").unwrap();

        assert!(matches!(InMemoryStore::open(&path), Err(StoreError::Serialization(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writes_all_persist() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("products.json");
        let store = Arc::new(InMemoryStore::open(&path).unwrap());

        let tasks: Vec<_> = (0..20)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .insert(new_product(&format!("Item {}", i), i as f64, "bulk"))
                        .await
                        .unwrap()
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(store.len().unwrap(), 20);
        assert_eq!(InMemoryStore::open(&path).unwrap().len().unwrap(), 20);
    }

    #[test]
    fn test_replace_all() {
        let store = InMemoryStore::new();
        store.replace_all(vec![new_product("A1", 1.0, "a")]).unwrap();
        let inserted = store
            .replace_all(vec![new_product("B1", 1.0, "b"), new_product("B2", 2.0, "b")])
            .unwrap();

        assert_eq!(inserted.len(), 2);
        assert_eq!(store.len().unwrap(), 2);
    }
}
