use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;

use catalog_core::{Entity, ProductId};
use catalog_products::{Product, ProductRepository, RepositoryError, RepositoryResult};

/// In-memory product store.
///
/// Intended for tests/dev. Ids come from a monotonically increasing sequence
/// starting at 1 and are never reused, even after deletes.
#[derive(Debug)]
pub struct InMemoryProductRepository {
    rows: RwLock<BTreeMap<ProductId, Product>>,
    next_id: AtomicI64,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    fn allocate_id(&self) -> ProductId {
        ProductId::new(self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

impl Default for InMemoryProductRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> RepositoryError {
    RepositoryError::unavailable("lock poisoned")
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn save(&self, product: Product) -> RepositoryResult<Product> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;

        let product = match product.id() {
            Some(_) => product,
            None => product.assign_id(self.allocate_id()),
        };
        if let Some(id) = product.id() {
            // Explicit ids above the sequence must not be handed out again.
            self.next_id.fetch_max(id.get().saturating_add(1), Ordering::SeqCst);
            rows.insert(id, product.clone());
        }
        Ok(product)
    }

    async fn find_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.get(&id).cloned())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Product>> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.values().cloned().collect())
    }

    async fn exists_by_id(&self, id: ProductId) -> RepositoryResult<bool> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.contains_key(&id))
    }

    async fn delete_by_id(&self, id: ProductId) -> RepositoryResult<()> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        rows.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn product(name: &str, price: i64) -> Product {
        Product::new(name, price).unwrap()
    }

    #[tokio::test]
    async fn save_assigns_sequential_ids() {
        let repo = InMemoryProductRepository::new();

        let a = repo.save(product("A", 1)).await.unwrap();
        let b = repo.save(product("B", 2)).await.unwrap();

        assert_eq!(a.id(), Some(ProductId::new(1)));
        assert_eq!(b.id(), Some(ProductId::new(2)));
    }

    #[tokio::test]
    async fn save_with_id_overwrites() {
        let repo = InMemoryProductRepository::new();
        let saved = repo.save(product("Old", 1)).await.unwrap();
        let id = saved.id().unwrap();

        let mut changed = saved.clone();
        changed.replace_details(product("New", 2));
        repo.save(changed).await.unwrap();

        let stored = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.name(), "New");
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let repo = InMemoryProductRepository::new();
        let first = repo.save(product("A", 1)).await.unwrap().id().unwrap();
        repo.delete_by_id(first).await.unwrap();

        let second = repo.save(product("B", 1)).await.unwrap().id().unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn explicit_id_advances_sequence() {
        let repo = InMemoryProductRepository::new();
        repo.save(product("Imported", 1).assign_id(ProductId::new(10)))
            .await
            .unwrap();

        let next = repo.save(product("Fresh", 1)).await.unwrap();
        assert_eq!(next.id(), Some(ProductId::new(11)));
    }

    #[tokio::test]
    async fn absence_is_a_value() {
        let repo = InMemoryProductRepository::new();
        assert_eq!(repo.find_by_id(ProductId::new(5)).await.unwrap(), None);
        assert!(!repo.exists_by_id(ProductId::new(5)).await.unwrap());
    }

    #[tokio::test]
    async fn find_all_is_ordered_by_id() {
        let repo = InMemoryProductRepository::new();
        for name in ["C", "A", "B"] {
            repo.save(product(name, 1)).await.unwrap();
        }
        let names: Vec<_> = repo
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[tokio::test]
    async fn concurrent_creates_get_distinct_ids() {
        let repo = Arc::new(InMemoryProductRepository::new());

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.save(product(&format!("P{i}"), 1)).await })
            })
            .collect();

        let mut ids = Vec::new();
        for h in handles {
            ids.push(h.await.unwrap().unwrap().id().unwrap());
        }
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 32);
    }
}
