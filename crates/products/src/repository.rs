//! Storage port for products.
//!
//! The service depends on this trait only; adapters (in-memory, Postgres) live
//! in the infrastructure crate.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use catalog_core::ProductId;

use crate::product::Product;

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Storage operation error.
///
/// These are **infrastructure errors**. Absence of a record is never an error
/// here; it is reported as `None` / `false`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The backing store could not be reached or rejected the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A stored record could not be turned back into a valid product.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl RepositoryError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn corrupt(msg: impl Into<String>) -> Self {
        Self::Corrupt(msg.into())
    }
}

/// Persistence capability consumed by [`crate::ProductService`].
///
/// Implementations must make each call atomic on its own; no cross-call
/// transactions are expected.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert when `product` has no id (returning it with the assigned id),
    /// otherwise overwrite the record with that id.
    async fn save(&self, product: Product) -> RepositoryResult<Product>;

    async fn find_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>>;

    /// Every stored product, in storage-defined order.
    async fn find_all(&self) -> RepositoryResult<Vec<Product>>;

    async fn exists_by_id(&self, id: ProductId) -> RepositoryResult<bool>;

    /// Remove the record. Callers check existence first.
    async fn delete_by_id(&self, id: ProductId) -> RepositoryResult<()>;
}

#[async_trait]
impl<S> ProductRepository for Arc<S>
where
    S: ProductRepository + ?Sized,
{
    async fn save(&self, product: Product) -> RepositoryResult<Product> {
        (**self).save(product).await
    }

    async fn find_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        (**self).find_by_id(id).await
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Product>> {
        (**self).find_all().await
    }

    async fn exists_by_id(&self, id: ProductId) -> RepositoryResult<bool> {
        (**self).exists_by_id(id).await
    }

    async fn delete_by_id(&self, id: ProductId) -> RepositoryResult<()> {
        (**self).delete_by_id(id).await
    }
}
