//! Product service: sequences lookup → mutation → persistence.
//!
//! Inputs are already-validated [`Product`] values; failures come back as
//! [`ServiceError`] and are turned into transport responses by the caller.

use thiserror::Error;
use tracing::instrument;

use catalog_core::{DomainError, Entity, ProductId};

use crate::product::Product;
use crate::repository::{ProductRepository, RepositoryError};

/// Message carried by every not-found failure.
pub const NOT_FOUND_MESSAGE: &str = "Product not found";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Domain outcome (currently only absence).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The storage port failed; never retried here.
    #[error(transparent)]
    StorageUnavailable(#[from] RepositoryError),
}

impl ServiceError {
    pub fn not_found() -> Self {
        Self::Domain(DomainError::not_found(NOT_FOUND_MESSAGE))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Domain(DomainError::NotFound(_)))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Orchestrates product operations against a [`ProductRepository`].
///
/// Holds no state besides the repository handle.
#[derive(Debug, Clone)]
pub struct ProductService<R> {
    repository: R,
}

impl<R> ProductService<R>
where
    R: ProductRepository,
{
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    #[instrument(skip_all, fields(name = %product.name()), err)]
    pub async fn create(&self, product: Product) -> ServiceResult<Product> {
        let saved = self.repository.save(product.without_id()).await?;
        tracing::info!(product_id = ?saved.id(), "product created");
        Ok(saved)
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    pub async fn get_by_id(&self, id: ProductId) -> ServiceResult<Product> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(ServiceError::not_found)
    }

    #[instrument(skip(self), err)]
    pub async fn list(&self) -> ServiceResult<Vec<Product>> {
        Ok(self.repository.find_all().await?)
    }

    /// Replace name and price of an existing product. Both fields are always
    /// overwritten; the id never changes.
    #[instrument(skip(self, details), fields(product_id = %id), err)]
    pub async fn update(&self, id: ProductId, details: Product) -> ServiceResult<Product> {
        let mut product = self.get_by_id(id).await?;
        product.replace_details(details);

        let saved = self.repository.save(product).await?;
        tracing::info!("product updated");
        Ok(saved)
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    pub async fn delete(&self, id: ProductId) -> ServiceResult<()> {
        if !self.repository.exists_by_id(id).await? {
            return Err(ServiceError::not_found());
        }
        self.repository.delete_by_id(id).await?;
        tracing::info!("product deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::repository::RepositoryResult;

    /// Map-backed repository that records every call and can be told to fail.
    #[derive(Default)]
    struct RecordingRepository {
        rows: Mutex<BTreeMap<ProductId, Product>>,
        calls: Mutex<Vec<&'static str>>,
        next_id: Mutex<i64>,
        offline: bool,
    }

    impl RecordingRepository {
        fn offline() -> Self {
            Self {
                offline: true,
                ..Self::default()
            }
        }

        fn record(&self, call: &'static str) -> RepositoryResult<()> {
            self.calls.lock().unwrap().push(call);
            if self.offline {
                return Err(RepositoryError::unavailable("connection refused"));
            }
            Ok(())
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ProductRepository for RecordingRepository {
        async fn save(&self, product: Product) -> RepositoryResult<Product> {
            self.record("save")?;
            let product = match product.id() {
                Some(_) => product,
                None => {
                    let mut next = self.next_id.lock().unwrap();
                    *next += 1;
                    product.assign_id(ProductId::new(*next))
                }
            };
            let id = product.id().unwrap();
            self.rows.lock().unwrap().insert(id, product.clone());
            Ok(product)
        }

        async fn find_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
            self.record("find_by_id")?;
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }

        async fn find_all(&self) -> RepositoryResult<Vec<Product>> {
            self.record("find_all")?;
            Ok(self.rows.lock().unwrap().values().cloned().collect())
        }

        async fn exists_by_id(&self, id: ProductId) -> RepositoryResult<bool> {
            self.record("exists_by_id")?;
            Ok(self.rows.lock().unwrap().contains_key(&id))
        }

        async fn delete_by_id(&self, id: ProductId) -> RepositoryResult<()> {
            self.record("delete_by_id")?;
            self.rows.lock().unwrap().remove(&id);
            Ok(())
        }
    }

    fn service() -> ProductService<RecordingRepository> {
        ProductService::new(RecordingRepository::default())
    }

    fn product(name: &str, price: i64) -> Product {
        Product::new(name, price).unwrap()
    }

    #[tokio::test]
    async fn create_then_get_round_trips_name_and_price() {
        let svc = service();

        let created = svc.create(product("Notebook", 250_000)).await.unwrap();
        let id = created.id().expect("id assigned on create");

        let fetched = svc.get_by_id(id).await.unwrap();
        assert_eq!(fetched.name(), "Notebook");
        assert_eq!(fetched.price_in_cents(), 250_000);
    }

    #[tokio::test]
    async fn create_ignores_caller_supplied_id() {
        let svc = service();
        let existing = svc.create(product("Pen", 100)).await.unwrap();

        let smuggled = product("Pencil", 50).assign_id(existing.id().unwrap());
        let created = svc.create(smuggled).await.unwrap();

        assert_ne!(created.id(), existing.id());
        assert_eq!(svc.get_by_id(existing.id().unwrap()).await.unwrap().name(), "Pen");
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found() {
        let err = service().get_by_id(ProductId::new(999_999)).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), NOT_FOUND_MESSAGE);
    }

    #[tokio::test]
    async fn update_replaces_name_and_price_but_not_id() {
        let svc = service();
        let created = svc.create(product("Chair", 4_000)).await.unwrap();
        let id = created.id().unwrap();

        let updated = svc.update(id, product("Armchair", 9_000)).await.unwrap();
        assert_eq!(updated.id(), Some(id));
        assert_eq!(updated.name(), "Armchair");
        assert_eq!(updated.price_in_cents(), 9_000);

        let fetched = svc.get_by_id(id).await.unwrap();
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn update_ignores_id_on_new_details() {
        let svc = service();
        let id = svc.create(product("Mug", 800)).await.unwrap().id().unwrap();

        let details = product("Cup", 700).assign_id(ProductId::new(12_345));
        let updated = svc.update(id, details).await.unwrap();

        assert_eq!(updated.id(), Some(id));
        assert!(svc.get_by_id(ProductId::new(12_345)).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found_and_saves_nothing() {
        let svc = service();
        let err = svc
            .update(ProductId::new(42), product("Ghost", 1))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(svc.repository().calls(), vec!["find_by_id"]);
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let svc = service();
        let id = svc.create(product("Lamp", 1_500)).await.unwrap().id().unwrap();

        svc.delete(id).await.unwrap();

        assert!(svc.get_by_id(id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn delete_checks_existence_before_removing() {
        let svc = service();
        let err = svc.delete(ProductId::new(7)).await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(svc.repository().calls(), vec!["exists_by_id"]);
    }

    #[tokio::test]
    async fn list_returns_every_product() {
        let svc = service();
        svc.create(product("A", 1)).await.unwrap();
        svc.create(product("B", 2)).await.unwrap();

        let names: Vec<_> = svc
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn storage_failures_propagate_without_retry() {
        let svc = ProductService::new(RecordingRepository::offline());

        let err = svc.create(product("Desk", 10)).await.unwrap_err();
        assert!(matches!(err, ServiceError::StorageUnavailable(RepositoryError::Unavailable(_))));

        let err = svc.delete(ProductId::new(1)).await.unwrap_err();
        assert!(matches!(err, ServiceError::StorageUnavailable(_)));

        assert_eq!(svc.repository().calls(), vec!["save", "exists_by_id"]);
    }
}
